use crate::utils::Redact;
use std::fmt::{Debug, Formatter};

/// Signature algorithm used on the outbound channel.
///
/// The platform's default is SHA1-with-RSA (PKCS#1 v1.5); SHA256-with-RSA is
/// accepted for tenants provisioned with newer keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SignatureAlgorithm {
    /// SHA1withRSA, PKCS#1 v1.5. The platform default.
    #[default]
    Sha1WithRsa,
    /// SHA256withRSA, PKCS#1 v1.5.
    Sha256WithRsa,
}

/// Key pair for signing outbound requests and verifying inbound signatures.
///
/// Both keys are supplied as base64-encoded PKCS#8 blobs (the form the
/// platform hands out) and are decoded exactly once, when an `RsaSigner` is
/// constructed from this credential. Immutable afterwards.
#[derive(Default, Clone)]
pub struct Credential {
    /// Base64-encoded PKCS#8 private key.
    pub private_key: String,
    /// Base64-encoded PKCS#8 (SPKI) public key.
    pub public_key: String,
    /// Signature algorithm, `Sha1WithRsa` unless overridden.
    pub algorithm: SignatureAlgorithm,
    /// Passphrase for an encrypted PKCS#8 private key.
    pub passphrase: Option<String>,
}

impl Credential {
    /// Create a credential from base64-encoded PKCS#8 key blobs.
    pub fn new(private_key: impl Into<String>, public_key: impl Into<String>) -> Self {
        Self {
            private_key: private_key.into(),
            public_key: public_key.into(),
            ..Default::default()
        }
    }

    /// Select the signature algorithm.
    pub fn with_algorithm(mut self, algorithm: SignatureAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Set the passphrase of an encrypted private key.
    pub fn with_passphrase(mut self, passphrase: impl Into<String>) -> Self {
        self.passphrase = Some(passphrase.into());
        self
    }

    /// Check if the credential carries both key blobs.
    pub fn is_valid(&self) -> bool {
        !self.private_key.is_empty() && !self.public_key.is_empty()
    }
}

impl Debug for Credential {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("private_key", &Redact::from(&self.private_key))
            .field("public_key", &Redact::from(&self.public_key))
            .field("algorithm", &self.algorithm)
            .field("passphrase", &Redact::from(&self.passphrase))
            .finish()
    }
}
