//! Recursive key lowercasing.

use serde_json::{Map, Value};

/// Lowercase every object key in `value`, at any depth.
///
/// Arrays are walked element by element and scalars pass through. When two
/// keys collide after lowercasing, a key that was already lowercase wins.
/// Among mixed-case spellings the one that sorts first by bytes is kept:
/// `Map` iterates in sorted key order, so the input document's key order
/// never decides a collision.
pub fn normalize_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(normalize_map(map)),
        Value::Array(items) => Value::Array(items.into_iter().map(normalize_keys).collect()),
        scalar => scalar,
    }
}

/// [`normalize_keys`] for a top-level object.
pub fn normalize_map(map: Map<String, Value>) -> Map<String, Value> {
    let mut out = Map::with_capacity(map.len());
    for (key, value) in map {
        let lowered = key.to_lowercase();
        let already_lower = lowered == key;
        let value = normalize_keys(value);
        if already_lower || !out.contains_key(&lowered) {
            out.insert(lowered, value);
        }
    }
    out
}
