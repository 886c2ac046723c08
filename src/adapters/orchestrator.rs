//! Per-field orchestration: one pure render step and one ordered commit step
//!
//! [`render_field`] derives a [`FieldDescriptor`] from the item and the form
//! context without touching any shared state. [`FieldEffects::commit`] then
//! applies that descriptor to the aggregates in a fixed order:
//!
//! 1. register presence in `Inputs` when visible;
//! 2. when the hidden flag changed (mount included), recompute `Inputs`
//!    membership;
//! 3. register in `ValidationError` when visible with an error, otherwise
//!    retract;
//! 4. request a form-wide validation recompute when value, hidden, or error
//!    changed since the previous commit;
//! 5. register in `Value` when visible with a non-empty value, otherwise
//!    retract.
//!
//! A hidden field ends the commit with no contribution at all, exactly like
//! an unmounted one.

use serde_json::Value;
use std::fmt;
use tracing::trace;

use super::aggregate::{Aggregate, Aggregates};
use super::binding::{ValueBinding, ValueSetter};
use super::item_store::ItemStore;
use crate::domain::field::{DisplayMode, FieldConfig, FieldKey, FormContext, Validated};
use crate::domain::path::Path;
use crate::domain::validation::{compute_error, displayed_state};
use crate::domain::value::has_value;
use crate::domain::visibility::resolve_hidden;

/// Everything a widget renderer needs for one field, recomputed every render
#[derive(Clone)]
pub struct FieldDescriptor {
    pub key: FieldKey,
    pub id: String,
    pub path: Path,
    pub display_mode: DisplayMode,
    /// Display value, after the stored -> display transform
    pub value: Option<Value>,
    /// Raw value at the path, after default resolution
    pub stored_value: Option<Value>,
    pub validated: Option<Validated>,
    pub error: Option<String>,
    pub hidden: bool,
    pub disabled: bool,
    setter: ValueSetter,
}

impl FieldDescriptor {
    /// Write a new display value through the field's binding
    pub fn set_value(&self, value: Value) {
        self.setter.set(value);
    }

    pub fn setter(&self) -> &ValueSetter {
        &self.setter
    }
}

impl fmt::Debug for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("key", &self.key)
            .field("id", &self.id)
            .field("path", &self.path.to_string())
            .field("display_mode", &self.display_mode)
            .field("value", &self.value)
            .field("stored_value", &self.stored_value)
            .field("validated", &self.validated)
            .field("error", &self.error)
            .field("hidden", &self.hidden)
            .field("disabled", &self.disabled)
            .finish()
    }
}

/// Render phase for one field. Pure: reads `item` and `context` only.
pub fn render_field(
    key: FieldKey,
    config: &FieldConfig,
    item: &Value,
    context: &FormContext,
    store: &ItemStore,
) -> FieldDescriptor {
    let (stored_value, value) = ValueBinding::resolve(config, item).into_parts();
    let hidden = resolve_hidden(config, item);
    let error = compute_error(config, stored_value.as_ref(), item, &context.required_message);
    let validated = displayed_state(context.show_validation, error.as_deref());

    FieldDescriptor {
        key,
        id: config.resolved_id(),
        path: config.path.clone(),
        display_mode: context.display_mode,
        value,
        stored_value,
        validated,
        error,
        hidden,
        disabled: config.resolve_disabled(context.edit_mode),
        setter: ValueSetter::new(store.clone(), config),
    }
}

/// What the previous commit saw, compared against on the next one
#[derive(Clone, Debug, PartialEq)]
struct CommittedState {
    value: Option<Value>,
    hidden: bool,
    error: Option<String>,
}

/// Effect-phase memory of one mounted field
#[derive(Debug, Default)]
pub struct FieldEffects {
    last: Option<CommittedState>,
}

impl FieldEffects {
    pub fn new() -> Self {
        Self::default()
    }

    /// True until the first commit after mount
    pub fn is_pending_mount(&self) -> bool {
        self.last.is_none()
    }

    /// Commit phase for one field. Returns whether a form-wide validation
    /// recompute was requested.
    pub fn commit(&mut self, descriptor: &FieldDescriptor, aggregates: &mut Aggregates) -> bool {
        let key = descriptor.key;
        let hidden = descriptor.hidden;
        let visible_value = descriptor.stored_value.as_ref();

        // 1
        if !hidden {
            aggregates.register(Aggregate::Inputs, key);
        }

        // 2
        let hidden_changed = self.last.as_ref().map_or(true, |last| last.hidden != hidden);
        if hidden_changed && hidden {
            aggregates.deregister(Aggregate::Inputs, key);
        }

        // 3
        if !hidden && descriptor.error.is_some() {
            aggregates.register(Aggregate::ValidationError, key);
        } else {
            aggregates.deregister(Aggregate::ValidationError, key);
        }

        // 4
        let current = CommittedState {
            value: descriptor.stored_value.clone(),
            hidden,
            error: descriptor.error.clone(),
        };
        let recompute = self.last.as_ref() != Some(&current);
        if recompute {
            trace!(field = %key, id = %descriptor.id, "requesting validation recompute");
        }

        // 5
        if !hidden && has_value(visible_value) {
            aggregates.register(Aggregate::Value, key);
        } else {
            aggregates.deregister(Aggregate::Value, key);
        }

        self.last = Some(current);
        recompute
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::field::EditMode;
    use serde_json::json;

    fn context(show_validation: bool) -> FormContext {
        FormContext {
            show_validation,
            required_message: "Required".to_string(),
            ..FormContext::default()
        }
    }

    #[test]
    fn test_render_builds_descriptor() {
        let store = ItemStore::new(json!({"user": {"name": ""}}));
        let config = FieldConfig::parse("user.name").unwrap().required(true);
        let item = store.snapshot();

        let descriptor = render_field(FieldKey(1), &config, &item, &context(false), &store);
        assert_eq!(descriptor.id, "user-name");
        assert_eq!(descriptor.value, Some(json!("")));
        assert_eq!(descriptor.error.as_deref(), Some("Required"));
        assert_eq!(descriptor.validated, None);
        assert!(!descriptor.hidden);
        assert!(!descriptor.disabled);

        let descriptor = render_field(FieldKey(1), &config, &item, &context(true), &store);
        assert_eq!(descriptor.validated, Some(Validated::Error));
    }

    #[test]
    fn test_render_resolves_disabled_in_edit_mode() {
        let store = ItemStore::default();
        let config = FieldConfig::parse("code").unwrap().disabled(false).disabled_in_edit_mode(true);
        let ctx = FormContext {
            edit_mode: EditMode::Edit,
            ..FormContext::default()
        };
        let descriptor = render_field(FieldKey(1), &config, &store.snapshot(), &ctx, &store);
        assert!(descriptor.disabled);
    }

    #[test]
    fn test_render_is_pure() {
        let store = ItemStore::new(json!({"a": 1}));
        let config = FieldConfig::parse("b.c").unwrap().with_default(json!("x"));
        let item = store.snapshot();
        let first = render_field(FieldKey(1), &config, &item, &context(false), &store);
        let second = render_field(FieldKey(1), &config, &item, &context(false), &store);

        assert_eq!(first.value, second.value);
        assert_eq!(store.snapshot(), json!({"a": 1}));
        assert_eq!(store.version(), 0);
    }

    #[test]
    fn test_commit_visible_field() {
        let store = ItemStore::new(json!({"name": "Alice"}));
        let config = FieldConfig::parse("name").unwrap();
        let descriptor = render_field(FieldKey(1), &config, &store.snapshot(), &context(false), &store);

        let mut aggregates = Aggregates::new();
        let mut effects = FieldEffects::new();
        assert!(effects.is_pending_mount());
        assert!(effects.commit(&descriptor, &mut aggregates));
        assert!(aggregates.has_inputs());
        assert!(aggregates.has_value());
        assert!(!aggregates.has_validation_error());

        // Same state again: nothing changed, no recompute.
        assert!(!effects.commit(&descriptor, &mut aggregates));
    }

    #[test]
    fn test_commit_hidden_field_contributes_nothing() {
        let store = ItemStore::new(json!({"flag": false}));
        let config = FieldConfig::parse("name")
            .unwrap()
            .required(true)
            .hidden_when(|item| !item["flag"].as_bool().unwrap_or(false));
        let descriptor = render_field(FieldKey(1), &config, &store.snapshot(), &context(true), &store);
        assert!(descriptor.hidden);
        assert!(descriptor.error.is_some());

        let mut aggregates = Aggregates::new();
        FieldEffects::new().commit(&descriptor, &mut aggregates);
        assert_eq!(aggregates.snapshot(), Default::default());
    }

    #[test]
    fn test_commit_becoming_hidden_retracts_everything() {
        let config = FieldConfig::parse("name")
            .unwrap()
            .with_validation(|_, _| Some("bad".to_string()))
            .hidden_when(|item| item["hide"].as_bool().unwrap_or(false));

        let store = ItemStore::new(json!({"name": "x", "hide": false}));
        let mut aggregates = Aggregates::new();
        let mut effects = FieldEffects::new();

        let shown = render_field(FieldKey(1), &config, &store.snapshot(), &context(false), &store);
        effects.commit(&shown, &mut aggregates);
        assert!(aggregates.has_inputs() && aggregates.has_value() && aggregates.has_validation_error());

        let hidden_item = json!({"name": "x", "hide": true});
        let hidden = render_field(FieldKey(1), &config, &hidden_item, &context(false), &store);
        assert!(effects.commit(&hidden, &mut aggregates));
        assert!(!aggregates.has_inputs());
        assert!(!aggregates.has_value());
        assert!(!aggregates.has_validation_error());
    }
}
