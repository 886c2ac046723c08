//! Hidden predicate evaluation

use serde_json::Value;

use super::field::FieldConfig;

/// `hidden(item)` when a predicate is configured, else `false`
pub fn resolve_hidden(config: &FieldConfig, item: &Value) -> bool {
    config.hidden.as_ref().map_or(false, |predicate| predicate(item))
}
