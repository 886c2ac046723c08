pub mod aggregate;
pub mod binding;
pub mod item_store;
pub mod orchestrator;
pub mod session;

pub use aggregate::{Aggregate, AggregateSnapshot, Aggregates};
pub use binding::{ValueBinding, ValueSetter};
pub use item_store::{ItemStore, SubscriptionId};
pub use orchestrator::{FieldDescriptor, FieldEffects};
pub use session::{CommitOutcome, FormSession};
