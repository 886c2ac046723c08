//! Emptiness rules shared by the required check and the has-value aggregate

use serde_json::Value;

/// True for `undefined`, `null`, `false`, `0`, `""` and `[]`.
///
/// Objects are never empty, even `{}`.
pub fn is_empty_value(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::Bool(b)) => !b,
        Some(Value::Number(n)) => n.as_f64().map_or(false, |f| f == 0.0),
        Some(Value::String(s)) => s.is_empty(),
        Some(Value::Array(items)) => items.is_empty(),
        Some(Value::Object(_)) => false,
    }
}

/// Inverse of [`is_empty_value`]
pub fn has_value(value: Option<&Value>) -> bool {
    !is_empty_value(value)
}
