//! Verification of inbound callback notifications.

use crate::hash::hex_md5;
use serde_json::Value;

/// Verify the signature of an inbound notification callback.
///
/// The callback channel authenticates with a shared secret rather than RSA:
/// the expected signature is `md5(md5(json(data)) + rtick + access_key)`,
/// compared as a string against the signature the platform sent.
///
/// Unlike the outbound plaintext rule, the body digest here always hashes the
/// serialized form; `{}` serializes to the non-empty text `"{}"` and is
/// hashed, matching how the platform computes the signature on its side.
pub fn verify_notification(data: &Value, rtick: &str, signature: &str, access_key: &str) -> bool {
    let body_digest = match serde_json::to_string(data) {
        Ok(serialized) => hex_md5(serialized.as_bytes()),
        Err(_) => return false,
    };
    let expected = hex_md5(format!("{body_digest}{rtick}{access_key}").as_bytes());
    expected == signature
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn expected_signature(data: &Value, rtick: &str, access_key: &str) -> String {
        let body_digest = hex_md5(serde_json::to_string(data).unwrap().as_bytes());
        hex_md5(format!("{body_digest}{rtick}{access_key}").as_bytes())
    }

    #[test]
    fn test_accepts_matching_signature() {
        let data = json!({"a": 1});
        let signature = expected_signature(&data, "1700000000000", "ak-123");
        assert!(verify_notification(&data, "1700000000000", &signature, "ak-123"));
    }

    #[test]
    fn test_rejects_any_mutation() {
        let data = json!({"a": 1});
        let signature = expected_signature(&data, "1700000000000", "ak-123");

        // Flip each character of the signature in turn.
        for i in 0..signature.len() {
            let mut mutated: Vec<u8> = signature.clone().into_bytes();
            mutated[i] = if mutated[i] == b'0' { b'1' } else { b'0' };
            let mutated = String::from_utf8(mutated).unwrap();
            assert!(
                !verify_notification(&data, "1700000000000", &mutated, "ak-123"),
                "mutation at {i} must not verify"
            );
        }
    }

    #[test]
    fn test_rejects_changed_inputs() {
        let data = json!({"a": 1});
        let signature = expected_signature(&data, "1700000000000", "ak-123");

        assert!(!verify_notification(&json!({"a": 2}), "1700000000000", &signature, "ak-123"));
        assert!(!verify_notification(&data, "1700000000001", &signature, "ak-123"));
        assert!(!verify_notification(&data, "1700000000000", &signature, "ak-999"));
    }

    #[test]
    fn test_empty_object_body_is_hashed() {
        // "{}" is non-empty text, so it participates in the digest.
        let signature = expected_signature(&json!({}), "1", "ak");
        assert!(verify_notification(&json!({}), "1", &signature, "ak"));
        assert_ne!(signature, hex_md5("1ak".as_bytes()));
    }
}
