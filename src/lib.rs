//! # formbind - path-based form binding
//!
//! formbind keeps a tree of form fields consistent with one shared, untyped
//! item (`serde_json::Value`). Each field binds to a dot-separated path inside
//! the item; the engine derives value, visibility, validation, and disabled
//! state per field and maintains three form-wide aggregates: whether any
//! visible field exists, whether any visible field has a value, and whether
//! any visible field has a validation error.
//!
//! ## Features
//!
//! - **Total reads, safe writes**: `get` never fails; `set` creates missing
//!   containers and leaves sibling paths untouched
//! - **Bidirectional transforms** between stored and displayed values
//! - **Required + custom validation**, displayed only when the form asks
//! - **Hidden predicates** that fully remove a field from every aggregate
//! - **Two-phase updates**: a pure render phase followed by an ordered
//!   commit phase, repeated until the form settles
//!
//! ## Quick Start
//!
//! ```rust
//! use formbind::{FieldConfig, FormSession, FormSettings};
//! use serde_json::json;
//!
//! let mut form = FormSession::new(json!({}), &FormSettings::default());
//! let name = form.mount(FieldConfig::parse("user.name").unwrap().required(true));
//! form.update();
//! assert!(form.has_validation_error());
//!
//! form.set_value(name, json!("Alice"));
//! form.flush();
//! assert!(form.has_value());
//! assert!(!form.has_validation_error());
//! assert_eq!(form.store().snapshot(), json!({"user": {"name": "Alice"}}));
//! ```
//!
//! ## Architecture
//!
//! - **Domain**: paths, the get/set accessor, and the per-field rules
//!   (validation, visibility, emptiness). Pure functions only.
//! - **Adapters**: the item store, value bindings, aggregates, the field
//!   orchestrator, and the form session that sequences them.
//! - **Config**: form settings loaded through the `config` crate.

pub mod adapters;
pub mod config;
pub mod domain;

pub use adapters::{AggregateSnapshot, FieldDescriptor, FormSession, ItemStore, ValueSetter};
pub use config::FormSettings;
pub use domain::{
    DisplayMode, EditMode, FieldConfig, FieldKey, FormContext, Path, PathError, PathSegment,
    Validated,
};
