//! Deterministic serialization of query parameters into a signable string.

use crate::constants::QUERY_SIGN;

/// Canonicalize query parameters into the string the platform signs over.
///
/// - Entries with an empty value are dropped entirely (not emitted as `key=`).
/// - The reserved `sign` key is always dropped, so a stale signature can never
///   be signed over.
/// - Remaining entries are sorted ascending by key (byte order) and
///   concatenated as `key=value` with no delimiter between pairs.
///
/// No escaping is performed; values containing `=` pass through verbatim.
/// That is the wire contract with the remote service, not an oversight.
///
/// The result is a pure function of the entries: any permutation of the input
/// canonicalizes to the same string.
pub fn canonicalize(query: &[(String, String)]) -> String {
    let mut entries: Vec<&(String, String)> = query
        .iter()
        .filter(|(k, v)| !v.is_empty() && k != QUERY_SIGN)
        .collect();
    entries.sort();

    let mut s = String::with_capacity(entries.iter().map(|(k, v)| k.len() + v.len() + 1).sum());
    for (k, v) in entries {
        s.push_str(k);
        s.push('=');
        s.push_str(v);
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(input: &[(&str, &str)]) -> Vec<(String, String)> {
        input
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_sorts_by_key() {
        let q = pairs(&[("rtick", "123"), ("developerId", "dev"), ("signType", "rsa")]);
        assert_eq!(canonicalize(&q), "developerId=devrtick=123signType=rsa");
    }

    #[test]
    fn test_drops_empty_values_and_sign() {
        let q = pairs(&[("a", "1"), ("b", ""), ("sign", "x")]);
        assert_eq!(canonicalize(&q), "a=1");
    }

    #[test]
    fn test_order_independent() {
        let sorted = pairs(&[("a", "1"), ("b", "2"), ("c", "3")]);
        let shuffled = pairs(&[("c", "3"), ("a", "1"), ("b", "2")]);
        let reversed = pairs(&[("c", "3"), ("b", "2"), ("a", "1")]);

        let expected = canonicalize(&sorted);
        assert_eq!(canonicalize(&shuffled), expected);
        assert_eq!(canonicalize(&reversed), expected);
    }

    #[test]
    fn test_values_pass_through_verbatim() {
        let q = pairs(&[("k", "a=b&c")]);
        assert_eq!(canonicalize(&q), "k=a=b&c");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(canonicalize(&[]), "");
    }
}
