//! Pruning and merging of key-value mappings.

use serde_json::{Map, Value};

/// Drop keys whose values are empty-like: null, an empty array, or an
/// empty object. Non-container primitives are always kept, including `0`,
/// `false`, and `""`.
pub fn prune_empty_values(map: &Map<String, Value>) -> Map<String, Value> {
    map.iter()
        .filter(|(_, value)| !is_empty_like(value))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

fn is_empty_like(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Array(items) => items.is_empty(),
        Value::Object(fields) => fields.is_empty(),
        _ => false,
    }
}

/// Shallow-merge a sequence of mappings into one. Later entries win on
/// key collision.
pub fn merge_mappings<I>(maps: I) -> Map<String, Value>
where
    I: IntoIterator<Item = Map<String, Value>>,
{
    maps.into_iter().fold(Map::new(), |mut merged, map| {
        merged.extend(map);
        merged
    })
}
