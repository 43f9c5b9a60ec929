//! Deterministic serialization and hashing.
//!
//! Hash stability across nodes depends on byte-identical preimages, so this
//! module pins one encoder (`serde_json`'s default map, which is
//! `BTreeMap`-backed and therefore always key-sorted) and documents its
//! number formatting rather than leaving it to whatever call site builds
//! the JSON.

use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

/// Builds a canonical JSON object from `fields` in the order given and
/// returns its UTF-8 bytes. Keys end up sorted because `serde_json::Map`
/// is `BTreeMap`-backed by default (the `preserve_order` feature, which
/// would switch it to an index map, is not enabled on this crate).
pub fn canonical_bytes(fields: &[(&str, Value)]) -> Vec<u8> {
    let mut map = Map::new();
    for (key, value) in fields {
        map.insert((*key).to_string(), value.clone());
    }
    serde_json::to_vec(&Value::Object(map)).expect("canonical map always serializes")
}

/// SHA-256 of the canonical bytes, as lowercase hex.
pub fn canonical_hash(fields: &[(&str, Value)]) -> String {
    let bytes = canonical_bytes(fields);
    hex::encode(Sha256::digest(&bytes))
}

/// SHA-256 digest of the canonical bytes, raw (for prehashed signing).
pub fn canonical_digest(fields: &[(&str, Value)]) -> [u8; 32] {
    let bytes = canonical_bytes(fields);
    Sha256::digest(&bytes).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn sorts_keys_regardless_of_insertion_order() {
        let a = canonical_bytes(&[("b", json!(1)), ("a", json!(2))]);
        let b = canonical_bytes(&[("a", json!(2)), ("b", json!(1))]);
        assert_eq!(a, b);
        assert_eq!(String::from_utf8(a).unwrap(), r#"{"a":2,"b":1}"#);
    }

    #[test]
    fn hash_is_deterministic() {
        let fields: Vec<(&str, Value)> = vec![("index", json!(1)), ("proof", json!(42))];
        let h1 = canonical_hash(&fields);
        let h2 = canonical_hash(&fields);
        assert_eq!(h1, h2);
        assert_eq!(h1.len(), 64);
    }

    #[test]
    fn different_fields_hash_differently() {
        let h1 = canonical_hash(&[("amount", json!(1.0))]);
        let h2 = canonical_hash(&[("amount", json!(1.5))]);
        assert_ne!(h1, h2);
    }
}
