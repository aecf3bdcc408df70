//! Assembly of the exact string that gets signed.

use crate::canonical::canonicalize;
use crate::hash::hex_md5;
use crate::Result;
use http::Uri;
use serde_json::Value;

/// A body counts as empty when it would not be submitted at all: absent,
/// null, an empty string, array, or object. Mirrors the platform's own
/// emptiness rule.
pub(crate) fn is_empty_body(body: &Value) -> bool {
    match body {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(m) => m.is_empty(),
        _ => false,
    }
}

/// Build the signable plaintext for a request.
///
/// The plaintext is the concatenation, with no separators, of:
///
/// 1. the [canonical query string](canonicalize),
/// 2. the path component of `url` (scheme, host, and query string are
///    excluded, so the same path signs identically across environments),
/// 3. the hex MD5 digest of the JSON-serialized body, or the empty string
///    when the body is empty.
///
/// The body is serialized compactly with keys in insertion order
/// (`serde_json` with `preserve_order`); the remote side re-serializes the
/// same way before comparing digests, so the serialization form is part of
/// the wire contract and must not drift.
pub fn build_plaintext(url: &str, query: &[(String, String)], body: Option<&Value>) -> Result<String> {
    let uri = url.parse::<Uri>()?;
    let query_str = canonicalize(query);

    let body_digest = match body {
        Some(body) if !is_empty_body(body) => hex_md5(serde_json::to_string(body)?.as_bytes()),
        _ => String::new(),
    };

    Ok(format!("{query_str}{}{body_digest}", uri.path()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn query() -> Vec<(String, String)> {
        vec![
            ("developerId".to_string(), "dev".to_string()),
            ("rtick".to_string(), "1700000000000".to_string()),
            ("signType".to_string(), "rsa".to_string()),
        ]
    }

    #[test]
    fn test_concatenation_order() {
        let body = json!({"name": "a", "identity": "b"});
        let plaintext =
            build_plaintext("https://api.example.com/user/reg/", &query(), Some(&body)).unwrap();

        let expected_digest = hex_md5(serde_json::to_string(&body).unwrap().as_bytes());
        assert_eq!(
            plaintext,
            format!("developerId=devrtick=1700000000000signType=rsa/user/reg/{expected_digest}")
        );
    }

    #[test]
    fn test_empty_body_digest_is_empty() {
        let url = "https://api.example.com/contract/download/";
        let bare = build_plaintext(url, &query(), None).unwrap();
        assert!(bare.ends_with("/contract/download/"));

        // Null and empty maps count as absent.
        assert_eq!(build_plaintext(url, &query(), Some(&Value::Null)).unwrap(), bare);
        assert_eq!(build_plaintext(url, &query(), Some(&json!({}))).unwrap(), bare);
    }

    #[test]
    fn test_host_and_scheme_do_not_participate() {
        let body = json!({"a": 1});
        let a = build_plaintext("https://prod.example.com/x/", &query(), Some(&body)).unwrap();
        let b = build_plaintext("http://sandbox.example.org/x/", &query(), Some(&body)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_deterministic() {
        let body = json!({"k": "v"});
        let a = build_plaintext("https://api.example.com/x/", &query(), Some(&body)).unwrap();
        let b = build_plaintext("https://api.example.com/x/", &query(), Some(&body)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_any_input_change_changes_plaintext() {
        let body = json!({"k": "v"});
        let base = build_plaintext("https://api.example.com/x/", &query(), Some(&body)).unwrap();

        let mut q = query();
        q[0].1 = "other".to_string();
        assert_ne!(
            build_plaintext("https://api.example.com/x/", &q, Some(&body)).unwrap(),
            base
        );
        assert_ne!(
            build_plaintext("https://api.example.com/y/", &query(), Some(&body)).unwrap(),
            base
        );
        assert_ne!(
            build_plaintext("https://api.example.com/x/", &query(), Some(&json!({"k": "w"})))
                .unwrap(),
            base
        );
    }

    #[test]
    fn test_invalid_url() {
        let err = build_plaintext("not a url", &query(), None).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::RequestInvalid);
    }
}
