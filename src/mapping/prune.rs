//! Removal of empty values from mapped documents.

use serde_json::Value;

/// Key whose array elements are kept verbatim.
const CONTACT_POINTS: &str = "contactPoints";

/// Recursively removes `null`, `""`, `[]` and `{}` from a JSON value.
///
/// Contact points are exempt: their multilingual sub-fields keep every
/// supported language even when all values are empty. An empty
/// `contactPoints` array is still removed.
pub fn prune(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for (key, child) in map.iter_mut() {
                if key != CONTACT_POINTS {
                    prune(child);
                }
            }
            map.retain(|_, child| !is_empty(child));
        },
        Value::Array(items) => {
            items.iter_mut().for_each(prune);
            items.retain(|child| !is_empty(child));
        },
        _ => {},
    }
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}
