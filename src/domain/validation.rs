//! Error computation for a single field
//!
//! The required rule always wins over the custom validator. Errors are
//! computed on every render; the show-validation flag only gates display.

use serde_json::Value;

use super::field::{FieldConfig, Validated};
use super::value::is_empty_value;

/// Compute the field's error for the current value and item
pub fn compute_error(
    config: &FieldConfig,
    value: Option<&Value>,
    item: &Value,
    required_message: &str,
) -> Option<String> {
    if config.required && is_empty_value(value) {
        return Some(required_message.to_string());
    }
    config
        .validation
        .as_ref()
        .and_then(|validator| validator(value, item))
}

/// `Some(Validated::Error)` only when errors are shown and one exists
pub fn displayed_state(show_validation: bool, error: Option<&str>) -> Option<Validated> {
    match (show_validation, error) {
        (true, Some(_)) => Some(Validated::Error),
        _ => None,
    }
}
