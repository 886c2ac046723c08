//! Pure building blocks: paths, value access, and per-field rules
//!
//! Nothing in this module holds shared state. The stateful pieces that
//! compose these rules live in [`crate::adapters`].

pub mod accessor;
pub mod error;
pub mod field;
pub mod path;
pub mod validation;
pub mod value;
pub mod visibility;

pub use error::PathError;
pub use field::{
    DisplayMode, EditMode, FieldConfig, FieldKey, FormContext, HiddenPredicate, InputToPath,
    OnValueChange, PathToInput, Validated, Validator,
};
pub use path::{Path, PathSegment};
