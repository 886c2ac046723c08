//! Per-field configuration and the form-wide modes fields read

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::rc::Rc;

use super::error::PathError;
use super::path::Path;

// ============================================================================
// Callbacks
// ============================================================================

/// Stored value -> display value
pub type PathToInput = Rc<dyn Fn(Option<&Value>) -> Option<Value>>;

/// (new display value, prior stored value) -> new stored value
pub type InputToPath = Rc<dyn Fn(Value, Option<&Value>) -> Value>;

/// Custom validator: (stored value, item) -> error message
pub type Validator = Rc<dyn Fn(Option<&Value>, &Value) -> Option<String>>;

/// Hidden predicate evaluated against the whole item
pub type HiddenPredicate = Rc<dyn Fn(&Value) -> bool>;

/// Called after each write with (new stored value, item)
pub type OnValueChange = Rc<dyn Fn(&Value, &Value)>;

// ============================================================================
// Form-wide modes
// ============================================================================

/// Whether the form creates a new item or edits an existing one
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditMode {
    #[default]
    Create,
    Edit,
}

/// How widgets render their value
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    /// Editable controls
    #[default]
    Edit,
    /// Read-only presentation
    View,
}

/// Displayed validation state
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Validated {
    Error,
}

/// Form-scoped inputs read during the render phase
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormContext {
    pub show_validation: bool,
    pub edit_mode: EditMode,
    pub display_mode: DisplayMode,
    pub required_message: String,
}

impl Default for FormContext {
    fn default() -> Self {
        Self {
            show_validation: false,
            edit_mode: EditMode::default(),
            display_mode: DisplayMode::default(),
            required_message: crate::config::DEFAULT_REQUIRED_MESSAGE.to_string(),
        }
    }
}

// ============================================================================
// Field configuration
// ============================================================================

/// Session-assigned identity of one mounted field
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct FieldKey(pub(crate) u64);

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Everything a bound control declares about itself
#[derive(Clone)]
pub struct FieldConfig {
    pub(crate) path: Path,
    pub(crate) id: Option<String>,
    pub(crate) default_value: Option<Value>,
    pub(crate) path_to_input: Option<PathToInput>,
    pub(crate) input_to_path: Option<InputToPath>,
    pub(crate) on_value_change: Option<OnValueChange>,
    pub(crate) required: bool,
    pub(crate) validation: Option<Validator>,
    pub(crate) hidden: Option<HiddenPredicate>,
    pub(crate) disabled: bool,
    pub(crate) disabled_in_edit_mode: Option<bool>,
}

impl FieldConfig {
    pub fn new(path: Path) -> Self {
        Self {
            path,
            id: None,
            default_value: None,
            path_to_input: None,
            input_to_path: None,
            on_value_change: None,
            required: false,
            validation: None,
            hidden: None,
            disabled: false,
            disabled_in_edit_mode: None,
        }
    }

    /// Parse `path` and build a config for it
    pub fn parse(path: &str) -> Result<Self, PathError> {
        Ok(Self::new(Path::parse(path)?))
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Value used while nothing (or `null`) is stored at the path
    pub fn with_default(mut self, value: Value) -> Self {
        self.default_value = Some(value);
        self
    }

    /// Bidirectional transform between the stored and the displayed value
    pub fn with_transforms<F, G>(mut self, path_to_input: F, input_to_path: G) -> Self
    where
        F: Fn(Option<&Value>) -> Option<Value> + 'static,
        G: Fn(Value, Option<&Value>) -> Value + 'static,
    {
        self.path_to_input = Some(Rc::new(path_to_input));
        self.input_to_path = Some(Rc::new(input_to_path));
        self
    }

    pub fn with_display_transform<F>(mut self, path_to_input: F) -> Self
    where
        F: Fn(Option<&Value>) -> Option<Value> + 'static,
    {
        self.path_to_input = Some(Rc::new(path_to_input));
        self
    }

    pub fn with_store_transform<G>(mut self, input_to_path: G) -> Self
    where
        G: Fn(Value, Option<&Value>) -> Value + 'static,
    {
        self.input_to_path = Some(Rc::new(input_to_path));
        self
    }

    pub fn on_value_change<F>(mut self, callback: F) -> Self
    where
        F: Fn(&Value, &Value) + 'static,
    {
        self.on_value_change = Some(Rc::new(callback));
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn with_validation<F>(mut self, validator: F) -> Self
    where
        F: Fn(Option<&Value>, &Value) -> Option<String> + 'static,
    {
        self.validation = Some(Rc::new(validator));
        self
    }

    pub fn hidden_when<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&Value) -> bool + 'static,
    {
        self.hidden = Some(Rc::new(predicate));
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Overrides `disabled` while the form is in [`EditMode::Edit`]
    pub fn disabled_in_edit_mode(mut self, disabled: bool) -> Self {
        self.disabled_in_edit_mode = Some(disabled);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Explicit id, else the path lowercased with dots turned into hyphens
    pub fn resolved_id(&self) -> String {
        match &self.id {
            Some(id) => id.clone(),
            None => self.path.to_string().to_lowercase().replace('.', "-"),
        }
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Effective disabled flag for the given edit mode
    pub fn resolve_disabled(&self, edit_mode: EditMode) -> bool {
        match (edit_mode, self.disabled_in_edit_mode) {
            (EditMode::Edit, Some(disabled)) => disabled,
            _ => self.disabled,
        }
    }
}

impl fmt::Debug for FieldConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldConfig")
            .field("path", &self.path.to_string())
            .field("id", &self.id)
            .field("default_value", &self.default_value)
            .field("required", &self.required)
            .field("has_validation", &self.validation.is_some())
            .field("has_hidden", &self.hidden.is_some())
            .field("has_transforms", &(self.path_to_input.is_some() || self.input_to_path.is_some()))
            .field("disabled", &self.disabled)
            .field("disabled_in_edit_mode", &self.disabled_in_edit_mode)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolved_id_from_path() {
        let config = FieldConfig::parse("User.Address.City").unwrap();
        assert_eq!(config.resolved_id(), "user-address-city");

        let config = FieldConfig::parse("tags[0]").unwrap();
        assert_eq!(config.resolved_id(), "tags-0");

        let config = FieldConfig::parse("user.name").unwrap().with_id("name-input");
        assert_eq!(config.resolved_id(), "name-input");
    }

    #[test]
    fn test_disabled_resolution() {
        let config = FieldConfig::parse("a").unwrap().disabled(false).disabled_in_edit_mode(true);
        assert!(config.resolve_disabled(EditMode::Edit));
        assert!(!config.resolve_disabled(EditMode::Create));

        let config = FieldConfig::parse("a").unwrap().disabled(true);
        assert!(config.resolve_disabled(EditMode::Edit));

        let config = FieldConfig::parse("a").unwrap().disabled(true).disabled_in_edit_mode(false);
        assert!(!config.resolve_disabled(EditMode::Edit));
        assert!(config.resolve_disabled(EditMode::Create));
    }

    #[test]
    fn test_modes_deserialize_lowercase() {
        let mode: EditMode = serde_json::from_str("\"edit\"").unwrap();
        assert_eq!(mode, EditMode::Edit);
        let mode: DisplayMode = serde_json::from_str("\"view\"").unwrap();
        assert_eq!(mode, DisplayMode::View);
        assert_eq!(serde_json::to_string(&Validated::Error).unwrap(), "\"error\"");
    }
}
