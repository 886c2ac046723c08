//! Form-wide aggregates over visible fields
//!
//! Each aggregate is the set of fields currently contributing to it, so
//! registering twice is harmless and retracting a field is exact no matter
//! how many passes it went through. An aggregate is true iff its set is
//! non-empty.

use serde::Serialize;
use std::collections::BTreeSet;
use tracing::trace;

use crate::domain::field::FieldKey;

/// One of the three tree-wide aggregates
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Aggregate {
    Inputs,
    Value,
    ValidationError,
}

/// Read model for consumers such as a submit button
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct AggregateSnapshot {
    pub has_inputs: bool,
    pub has_value: bool,
    pub has_validation_error: bool,
    /// Incremented by every validation recompute
    pub validation_generation: u64,
}

#[derive(Debug, Default)]
pub struct Aggregates {
    inputs: BTreeSet<FieldKey>,
    values: BTreeSet<FieldKey>,
    errors: BTreeSet<FieldKey>,
    validation_generation: u64,
}

impl Aggregates {
    pub fn new() -> Self {
        Self::default()
    }

    fn members_mut(&mut self, aggregate: Aggregate) -> &mut BTreeSet<FieldKey> {
        match aggregate {
            Aggregate::Inputs => &mut self.inputs,
            Aggregate::Value => &mut self.values,
            Aggregate::ValidationError => &mut self.errors,
        }
    }

    fn members(&self, aggregate: Aggregate) -> &BTreeSet<FieldKey> {
        match aggregate {
            Aggregate::Inputs => &self.inputs,
            Aggregate::Value => &self.values,
            Aggregate::ValidationError => &self.errors,
        }
    }

    /// Add `key`'s contribution; returns true if it was not yet present
    pub fn register(&mut self, aggregate: Aggregate, key: FieldKey) -> bool {
        let added = self.members_mut(aggregate).insert(key);
        if added {
            trace!(field = %key, ?aggregate, "registered");
        }
        added
    }

    /// Remove `key`'s contribution; returns true if it was present
    pub fn deregister(&mut self, aggregate: Aggregate, key: FieldKey) -> bool {
        let removed = self.members_mut(aggregate).remove(&key);
        if removed {
            trace!(field = %key, ?aggregate, "deregistered");
        }
        removed
    }

    /// Remove every contribution of `key`
    pub fn retract_all(&mut self, key: FieldKey) {
        for aggregate in [Aggregate::Inputs, Aggregate::Value, Aggregate::ValidationError] {
            self.deregister(aggregate, key);
        }
    }

    pub fn contains(&self, aggregate: Aggregate, key: FieldKey) -> bool {
        self.members(aggregate).contains(&key)
    }

    pub fn is_set(&self, aggregate: Aggregate) -> bool {
        !self.members(aggregate).is_empty()
    }

    pub fn has_inputs(&self) -> bool {
        self.is_set(Aggregate::Inputs)
    }

    pub fn has_value(&self) -> bool {
        self.is_set(Aggregate::Value)
    }

    pub fn has_validation_error(&self) -> bool {
        self.is_set(Aggregate::ValidationError)
    }

    pub(crate) fn bump_validation_generation(&mut self) {
        self.validation_generation += 1;
    }

    pub fn snapshot(&self) -> AggregateSnapshot {
        AggregateSnapshot {
            has_inputs: self.has_inputs(),
            has_value: self.has_value(),
            has_validation_error: self.has_validation_error(),
            validation_generation: self.validation_generation,
        }
    }
}
