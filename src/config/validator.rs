use std::collections::HashMap;
use thiserror::Error;

use crate::config::FormSettings;
use crate::domain::field::FieldConfig;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Duplicate entry: {0}")]
    Duplicate(String),
}

pub struct ConfigValidator;

impl ConfigValidator {
    pub fn validate(settings: &FormSettings) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if settings.required_message.trim().is_empty() {
            errors.push(ValidationError::MissingField("required_message".to_string()));
        }

        if settings.max_settle_passes == 0 {
            errors.push(ValidationError::InvalidValue {
                field: "max_settle_passes".to_string(),
                reason: "At least one render/commit pass is needed".to_string(),
            });
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Check a set of field configurations before they are mounted together
    pub fn validate_fields(fields: &[FieldConfig]) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();
        let mut seen_ids = HashMap::new();

        for (idx, field) in fields.iter().enumerate() {
            if matches!(&field.id, Some(id) if id.trim().is_empty()) {
                errors.push(ValidationError::MissingField(format!("fields[{}].id", idx)));
                continue;
            }

            let id = field.resolved_id();
            if let Some(prev_idx) = seen_ids.insert(id.clone(), idx) {
                errors.push(ValidationError::Duplicate(format!(
                    "Field id '{}' appears at indices {} and {}",
                    id, prev_idx, idx
                )));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_settings() {
        assert!(ConfigValidator::validate(&FormSettings::default()).is_ok());
    }

    #[test]
    fn test_invalid_settings_collects_all_errors() {
        let settings = FormSettings {
            required_message: "  ".to_string(),
            max_settle_passes: 0,
            ..FormSettings::default()
        };

        let errors = ConfigValidator::validate(&settings).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().any(|e| matches!(e, ValidationError::MissingField(_))));
        assert!(errors.iter().any(|e| matches!(e, ValidationError::InvalidValue { .. })));
    }

    #[test]
    fn test_duplicate_field_ids() {
        let fields = vec![
            FieldConfig::parse("user.name").unwrap(),
            FieldConfig::parse("user.email").unwrap(),
            FieldConfig::parse("other").unwrap().with_id("user-name"),
        ];

        let errors = ConfigValidator::validate_fields(&fields).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(matches!(&errors[0], ValidationError::Duplicate(msg) if msg.contains("indices 0 and 2")));
    }

    #[test]
    fn test_empty_explicit_id() {
        let fields = vec![FieldConfig::parse("a").unwrap().with_id("")];
        let errors = ConfigValidator::validate_fields(&fields).unwrap_err();
        assert!(matches!(&errors[0], ValidationError::MissingField(f) if f == "fields[0].id"));
    }
}
