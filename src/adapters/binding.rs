//! Value binding between one field and the shared item
//!
//! Reading resolves `get(item, path) ?? default` and applies the optional
//! display transform. Writing goes through [`ValueSetter`], which performs
//! exactly one write and at most one store notification per call.

use serde_json::Value;
use std::fmt;

use super::item_store::ItemStore;
use crate::domain::accessor;
use crate::domain::field::{FieldConfig, InputToPath, OnValueChange};
use crate::domain::path::Path;

/// Stored value at `path`, falling back to `default` for missing or `null`
pub fn resolve_stored(item: &Value, path: &Path, default: Option<&Value>) -> Option<Value> {
    match (accessor::get(item, path), default) {
        (Some(value), _) if !value.is_null() => Some(value.clone()),
        (_, Some(default)) => Some(default.clone()),
        (stored, None) => stored.cloned(),
    }
}

/// Stored and display value of one field for one render
#[derive(Clone, Debug, PartialEq)]
pub struct ValueBinding {
    stored: Option<Value>,
    display: Option<Value>,
}

impl ValueBinding {
    pub fn resolve(config: &FieldConfig, item: &Value) -> Self {
        let stored = resolve_stored(item, &config.path, config.default_value.as_ref());
        let display = match &config.path_to_input {
            Some(transform) => transform(stored.as_ref()),
            None => stored.clone(),
        };
        Self { stored, display }
    }

    pub fn stored_value(&self) -> Option<&Value> {
        self.stored.as_ref()
    }

    pub fn display_value(&self) -> Option<&Value> {
        self.display.as_ref()
    }

    pub fn into_parts(self) -> (Option<Value>, Option<Value>) {
        (self.stored, self.display)
    }
}

/// Write handle for one field, handed to widget renderers
#[derive(Clone)]
pub struct ValueSetter {
    store: ItemStore,
    path: Path,
    default: Option<Value>,
    input_to_path: Option<InputToPath>,
    on_value_change: Option<OnValueChange>,
}

impl ValueSetter {
    pub fn new(store: ItemStore, config: &FieldConfig) -> Self {
        Self {
            store,
            path: config.path.clone(),
            default: config.default_value.clone(),
            input_to_path: config.input_to_path.clone(),
            on_value_change: config.on_value_change.clone(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Store a new display value.
    ///
    /// The prior stored value handed to the store transform is read at call
    /// time, so repeated calls between renders chain correctly.
    pub fn set(&self, display: Value) {
        let stored = match &self.input_to_path {
            Some(transform) => {
                let prior = self
                    .store
                    .with_item(|item| resolve_stored(item, &self.path, self.default.as_ref()));
                transform(display, prior.as_ref())
            }
            None => display,
        };

        let changed = match &self.on_value_change {
            Some(callback) => {
                let changed = self.store.write(&self.path, stored.clone());
                // No borrow may be held here: the callback can write through
                // another setter on the same store.
                let item = self.store.snapshot();
                callback(&stored, &item);
                changed
            }
            None => self.store.write(&self.path, stored),
        };

        if changed {
            self.store.notify();
        }
    }
}

impl fmt::Debug for ValueSetter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValueSetter")
            .field("path", &self.path.to_string())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    #[test]
    fn test_resolve_uses_default_for_missing_and_null() {
        let config = FieldConfig::parse("a").unwrap().with_default(json!("fallback"));
        assert_eq!(
            ValueBinding::resolve(&config, &json!({})).stored_value(),
            Some(&json!("fallback"))
        );
        assert_eq!(
            ValueBinding::resolve(&config, &json!({"a": null})).stored_value(),
            Some(&json!("fallback"))
        );
        assert_eq!(
            ValueBinding::resolve(&config, &json!({"a": ""})).stored_value(),
            Some(&json!(""))
        );

        let plain = FieldConfig::parse("a").unwrap();
        assert_eq!(ValueBinding::resolve(&plain, &json!({})).stored_value(), None);
        assert_eq!(
            ValueBinding::resolve(&plain, &json!({"a": null})).stored_value(),
            Some(&Value::Null)
        );
    }

    #[test]
    fn test_display_transform() {
        let config = FieldConfig::parse("price")
            .unwrap()
            .with_display_transform(|v| v.and_then(Value::as_i64).map(|cents| json!(cents as f64 / 100.0)));
        let binding = ValueBinding::resolve(&config, &json!({"price": 1250}));
        assert_eq!(binding.stored_value(), Some(&json!(1250)));
        assert_eq!(binding.display_value(), Some(&json!(12.5)));
    }

    #[test]
    fn test_setter_applies_store_transform_with_prior() {
        let store = ItemStore::new(json!({"tags": ["a"]}));
        let config = FieldConfig::parse("tags").unwrap().with_store_transform(|new, prior| {
            let mut tags = prior.and_then(Value::as_array).cloned().unwrap_or_default();
            tags.push(new);
            Value::Array(tags)
        });
        let setter = ValueSetter::new(store.clone(), &config);

        setter.set(json!("b"));
        setter.set(json!("c"));

        assert_eq!(store.snapshot(), json!({"tags": ["a", "b", "c"]}));
    }

    #[test]
    fn test_setter_notifies_only_on_change() {
        let store = ItemStore::default();
        let notifications = Rc::new(Cell::new(0));
        let counter = notifications.clone();
        store.subscribe(move |_| counter.set(counter.get() + 1));

        let setter = ValueSetter::new(store.clone(), &FieldConfig::parse("user.name").unwrap());
        setter.set(json!("Alice"));
        setter.set(json!("Alice"));

        assert_eq!(notifications.get(), 1);
        assert_eq!(store.get(setter.path()), Some(json!("Alice")));
    }

    #[test]
    fn test_on_value_change_receives_stored_value_and_item() {
        let store = ItemStore::new(json!({"other": 1}));
        let seen = Rc::new(RefCell::new(None));
        let sink = seen.clone();
        let config = FieldConfig::parse("flag")
            .unwrap()
            .with_store_transform(|v, _| json!(v == json!("yes")))
            .on_value_change(move |stored, item| {
                *sink.borrow_mut() = Some((stored.clone(), item.clone()));
            });

        ValueSetter::new(store, &config).set(json!("yes"));

        assert_eq!(
            *seen.borrow(),
            Some((json!(true), json!({"other": 1, "flag": true})))
        );
    }
}
