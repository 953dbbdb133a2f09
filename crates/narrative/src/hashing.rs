use serde_json::Value;
use sha2::{Digest, Sha256};

/// Hex characters of the SHA-256 digest kept in a context hash.
const CONTEXT_HASH_LEN: usize = 16;

/// Compact JSON with object keys sorted at every depth. `serde_json::Map` is
/// a `BTreeMap` unless `preserve_order` is enabled, which this workspace never does.
pub fn canonical_json(value: &Value) -> String {
    value.to_string()
}

/// First 16 hex characters of SHA-256 over the canonical JSON of `context`.
pub fn context_hash(context: &Value) -> String {
    let digest = Sha256::digest(canonical_json(context).as_bytes());
    let mut encoded = hex::encode(digest);
    encoded.truncate(CONTEXT_HASH_LEN);
    encoded
}

/// `"{kind}:{tone}:{context_hash}"`.
pub fn cache_key(kind: &str, tone: &str, context_hash: &str) -> String {
    format!("{kind}:{tone}:{context_hash}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn key_order_does_not_change_the_hash() {
        let a = json!({"member": {"name": "Ann", "wins": 10}, "year": 2023});
        let b = json!({"year": 2023, "member": {"wins": 10, "name": "Ann"}});
        assert_eq!(canonical_json(&a), canonical_json(&b));
        assert_eq!(context_hash(&a), context_hash(&b));
        assert_eq!(context_hash(&a).len(), 16);
        assert!(context_hash(&a).chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn different_values_hash_differently() {
        assert_ne!(context_hash(&json!({"wins": 10})), context_hash(&json!({"wins": 11})));
    }

    #[test]
    fn canonical_json_is_compact() {
        let v = json!({"b": [1, {"d": null, "c": "x"}], "a": true});
        assert_eq!(canonical_json(&v), r#"{"a":true,"b":[1,{"c":"x","d":null}]}"#);
    }

    #[test]
    fn cache_key_layout() {
        assert_eq!(cache_key("summary_standings", "poet", "abc"), "summary_standings:poet:abc");
    }
}
