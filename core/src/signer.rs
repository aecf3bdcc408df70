//! RSA sign/verify over signable plaintexts.

use crate::credential::{Credential, SignatureAlgorithm};
use crate::hash::{base64_decode, base64_encode};
use crate::{Error, Result};
use rsa::pkcs1v15::{Signature, SigningKey, VerifyingKey};
use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey};
use rsa::signature::{SignatureEncoding, Signer, Verifier};
use rsa::{RsaPrivateKey, RsaPublicKey};
use sha1::Sha1;
use sha2::Sha256;
use std::fmt::{Debug, Formatter};

/// Encoding of a signature on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SignatureFormat {
    /// Standard base64. The platform default.
    #[default]
    Base64,
    /// Lowercase hex.
    Hex,
}

/// Signing engine configured with one [`Credential`].
///
/// Key material is decoded from its base64 PKCS#8 form once, here, and held
/// only as parsed keys. Signing is PKCS#1 v1.5 and therefore deterministic:
/// the same plaintext under the same key always yields the same signature.
pub struct RsaSigner {
    private_key: RsaPrivateKey,
    public_key: RsaPublicKey,
    algorithm: SignatureAlgorithm,
}

impl RsaSigner {
    /// Build the engine from a credential.
    ///
    /// Fails with `CredentialInvalid` when either key blob is empty or does
    /// not decode to a PKCS#8 key. A passphrase on the credential selects the
    /// encrypted PKCS#8 parser.
    pub fn new(credential: &Credential) -> Result<Self> {
        if !credential.is_valid() {
            return Err(Error::credential_invalid("credential is missing key material"));
        }

        let private_der = base64_decode(&credential.private_key)
            .map_err(|e| Error::credential_invalid("private key is not valid base64").with_source(e))?;
        let private_key = match &credential.passphrase {
            Some(passphrase) => {
                RsaPrivateKey::from_pkcs8_encrypted_der(&private_der, passphrase.as_bytes())
            }
            None => RsaPrivateKey::from_pkcs8_der(&private_der),
        }
        .map_err(|e| Error::credential_invalid("failed to parse PKCS#8 private key").with_source(e))?;

        let public_der = base64_decode(&credential.public_key)
            .map_err(|e| Error::credential_invalid("public key is not valid base64").with_source(e))?;
        let public_key = RsaPublicKey::from_public_key_der(&public_der)
            .map_err(|e| Error::credential_invalid("failed to parse PKCS#8 public key").with_source(e))?;

        Ok(Self {
            private_key,
            public_key,
            algorithm: credential.algorithm,
        })
    }

    /// Sign a plaintext, returning the base64-encoded signature.
    pub fn sign(&self, plaintext: &str) -> Result<String> {
        self.sign_with_format(plaintext, SignatureFormat::Base64)
    }

    /// Sign a plaintext with an explicit output encoding.
    pub fn sign_with_format(&self, plaintext: &str, format: SignatureFormat) -> Result<String> {
        let signature = match self.algorithm {
            SignatureAlgorithm::Sha1WithRsa => SigningKey::<Sha1>::new(self.private_key.clone())
                .try_sign(plaintext.as_bytes())
                .map(|s| s.to_vec()),
            SignatureAlgorithm::Sha256WithRsa => {
                SigningKey::<Sha256>::new(self.private_key.clone())
                    .try_sign(plaintext.as_bytes())
                    .map(|s| s.to_vec())
            }
        }
        .map_err(|e| Error::unexpected("RSA signing failed").with_source(e))?;

        Ok(match format {
            SignatureFormat::Base64 => base64_encode(&signature),
            SignatureFormat::Hex => hex::encode(&signature),
        })
    }

    /// Verify a signature over a plaintext.
    ///
    /// A structurally invalid signature (bad encoding, wrong length) verifies
    /// as `false`; this never errors.
    pub fn verify(&self, plaintext: &str, signature: &str, format: SignatureFormat) -> bool {
        let decoded = match format {
            SignatureFormat::Base64 => match base64_decode(signature) {
                Ok(v) => v,
                Err(_) => return false,
            },
            SignatureFormat::Hex => match hex::decode(signature) {
                Ok(v) => v,
                Err(_) => return false,
            },
        };
        let Ok(signature) = Signature::try_from(decoded.as_slice()) else {
            return false;
        };

        match self.algorithm {
            SignatureAlgorithm::Sha1WithRsa => VerifyingKey::<Sha1>::new(self.public_key.clone())
                .verify(plaintext.as_bytes(), &signature)
                .is_ok(),
            SignatureAlgorithm::Sha256WithRsa => {
                VerifyingKey::<Sha256>::new(self.public_key.clone())
                    .verify(plaintext.as_bytes(), &signature)
                    .is_ok()
            }
        }
    }
}

impl Debug for RsaSigner {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RsaSigner")
            .field("algorithm", &self.algorithm)
            .finish_non_exhaustive()
    }
}
