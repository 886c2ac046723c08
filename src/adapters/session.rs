//! Form session: owns the item, the form context, and the aggregates
//!
//! Every update cycle is two strictly ordered phases. [`FormSession::render`]
//! derives a descriptor for each mounted field and mutates nothing.
//! [`FormSession::commit`] then runs each field's effects in mount order and
//! is the only place the aggregates change. [`FormSession::update`] repeats
//! render+commit until no field asks for another validation recompute, so a
//! field whose visibility depends on another field's value never leaves a
//! stale contribution behind.
//!
//! Item mutation happens outside both phases, through a descriptor's setter
//! or [`FormSession::set_value`]; it marks the session dirty and the next
//! [`FormSession::flush`] runs a new cycle.

use serde_json::Value;
use std::cell::Cell;
use std::collections::BTreeMap;
use std::rc::Rc;
use tracing::{debug, trace, warn};

use super::aggregate::{AggregateSnapshot, Aggregates};
use super::binding::ValueSetter;
use super::item_store::{ItemStore, SubscriptionId};
use super::orchestrator::{render_field, FieldDescriptor, FieldEffects};
use crate::config::validator::{ConfigValidator, ValidationError};
use crate::config::FormSettings;
use crate::domain::field::{DisplayMode, EditMode, FieldConfig, FieldKey, FormContext};

struct MountedField {
    config: FieldConfig,
    effects: FieldEffects,
}

/// Result of one effect phase
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CommitOutcome {
    /// Number of descriptors applied
    pub committed: usize,
    /// Some field changed value, visibility, or error since its last commit
    pub recompute_requested: bool,
}

pub struct FormSession {
    store: ItemStore,
    context: FormContext,
    aggregates: Aggregates,
    fields: BTreeMap<FieldKey, MountedField>,
    next_key: u64,
    max_settle_passes: u32,
    dirty: Rc<Cell<bool>>,
    pending_validation: bool,
    subscription: SubscriptionId,
}

impl FormSession {
    pub fn new(item: Value, settings: &FormSettings) -> Self {
        Self::with_store(ItemStore::new(item), settings)
    }

    /// Build a session around an existing store handle
    pub fn with_store(store: ItemStore, settings: &FormSettings) -> Self {
        let dirty = Rc::new(Cell::new(true));
        let flag = Rc::clone(&dirty);
        let subscription = store.subscribe(move |_| flag.set(true));

        Self {
            store,
            context: settings.context(),
            aggregates: Aggregates::new(),
            fields: BTreeMap::new(),
            next_key: 0,
            max_settle_passes: settings.max_settle_passes.max(1),
            dirty,
            pending_validation: false,
            subscription,
        }
    }

    pub fn store(&self) -> &ItemStore {
        &self.store
    }

    pub fn context(&self) -> &FormContext {
        &self.context
    }

    /// True when the item or the context changed since the last cycle
    pub fn is_dirty(&self) -> bool {
        self.dirty.get()
    }

    // ------------------------------------------------------------------------
    // Field tree
    // ------------------------------------------------------------------------

    /// Mount a field. Its contributions appear after the next commit.
    pub fn mount(&mut self, config: FieldConfig) -> FieldKey {
        let key = FieldKey(self.next_key);
        self.next_key += 1;

        let id = config.resolved_id();
        if self.key_of(&id).is_some() {
            warn!(%id, "mounting a field whose id is already in use");
        }
        debug!(field = %key, %id, path = %config.path(), "mounting field");

        self.fields.insert(
            key,
            MountedField {
                config,
                effects: FieldEffects::new(),
            },
        );
        self.dirty.set(true);
        key
    }

    /// Validate a batch of configurations, then mount them in order
    pub fn mount_all(
        &mut self,
        configs: Vec<FieldConfig>,
    ) -> Result<Vec<FieldKey>, Vec<ValidationError>> {
        ConfigValidator::validate_fields(&configs)?;
        Ok(configs.into_iter().map(|config| self.mount(config)).collect())
    }

    /// Unmount a field, retracting every contribution immediately
    pub fn unmount(&mut self, key: FieldKey) -> Option<FieldConfig> {
        let field = self.fields.remove(&key)?;
        self.aggregates.retract_all(key);
        self.pending_validation = true;
        self.dirty.set(true);
        debug!(field = %key, id = %field.config.resolved_id(), "unmounted field");
        Some(field.config)
    }

    pub fn is_mounted(&self, key: FieldKey) -> bool {
        self.fields.contains_key(&key)
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    pub fn field_config(&self, key: FieldKey) -> Option<&FieldConfig> {
        self.fields.get(&key).map(|field| &field.config)
    }

    /// First mounted field with the given resolved id
    pub fn key_of(&self, id: &str) -> Option<FieldKey> {
        self.fields
            .iter()
            .find(|(_, field)| field.config.resolved_id() == id)
            .map(|(key, _)| *key)
    }

    // ------------------------------------------------------------------------
    // Form context
    // ------------------------------------------------------------------------

    pub fn set_show_validation(&mut self, show: bool) {
        if self.context.show_validation != show {
            self.context.show_validation = show;
            self.dirty.set(true);
        }
    }

    pub fn set_edit_mode(&mut self, mode: EditMode) {
        if self.context.edit_mode != mode {
            self.context.edit_mode = mode;
            self.dirty.set(true);
        }
    }

    pub fn set_display_mode(&mut self, mode: DisplayMode) {
        if self.context.display_mode != mode {
            self.context.display_mode = mode;
            self.dirty.set(true);
        }
    }

    /// External validation-recompute trigger, honoured by the next cycle
    pub fn request_validation(&mut self) {
        self.pending_validation = true;
        self.dirty.set(true);
    }

    // ------------------------------------------------------------------------
    // Mutation
    // ------------------------------------------------------------------------

    /// Write a display value for a mounted field. Returns false if unknown.
    pub fn set_value(&self, key: FieldKey, value: Value) -> bool {
        match self.fields.get(&key) {
            Some(field) => {
                ValueSetter::new(self.store.clone(), &field.config).set(value);
                true
            }
            None => {
                warn!(field = %key, "set_value on a field that is not mounted");
                false
            }
        }
    }

    // ------------------------------------------------------------------------
    // Render / commit
    // ------------------------------------------------------------------------

    /// Render phase: derive every mounted field's descriptor from the
    /// current item. Validators and hidden predicates must not write to the
    /// store while this runs.
    pub fn render(&self) -> Vec<FieldDescriptor> {
        self.store.with_item(|item| {
            self.fields
                .iter()
                .map(|(key, field)| render_field(*key, &field.config, item, &self.context, &self.store))
                .collect()
        })
    }

    /// Render a single mounted field
    pub fn render_one(&self, key: FieldKey) -> Option<FieldDescriptor> {
        let field = self.fields.get(&key)?;
        Some(
            self.store
                .with_item(|item| render_field(key, &field.config, item, &self.context, &self.store)),
        )
    }

    /// Effect phase: apply descriptors in order. Descriptors of fields that
    /// were unmounted since the render are skipped.
    pub fn commit(&mut self, descriptors: &[FieldDescriptor]) -> CommitOutcome {
        let mut outcome = CommitOutcome::default();

        for descriptor in descriptors {
            let Some(field) = self.fields.get_mut(&descriptor.key) else {
                trace!(field = %descriptor.key, "skipping descriptor of unmounted field");
                continue;
            };
            if field.effects.commit(descriptor, &mut self.aggregates) {
                outcome.recompute_requested = true;
            }
            outcome.committed += 1;
        }

        if outcome.recompute_requested || self.pending_validation {
            self.pending_validation = false;
            self.aggregates.bump_validation_generation();
        }
        outcome
    }

    /// Run render+commit passes until the form settles
    pub fn update(&mut self) -> Vec<FieldDescriptor> {
        let mut passes = 0;
        loop {
            self.dirty.set(false);
            let descriptors = self.render();
            let outcome = self.commit(&descriptors);
            passes += 1;

            if !outcome.recompute_requested && !self.dirty.get() {
                debug!(passes, fields = outcome.committed, status = ?self.status(), "form settled");
                return descriptors;
            }
            if passes >= self.max_settle_passes {
                warn!(passes, "form did not settle within the pass limit");
                return descriptors;
            }
        }
    }

    /// Run [`update`](Self::update) only if something changed
    pub fn flush(&mut self) -> Option<Vec<FieldDescriptor>> {
        if self.dirty.get() {
            Some(self.update())
        } else {
            None
        }
    }

    // ------------------------------------------------------------------------
    // Aggregates
    // ------------------------------------------------------------------------

    /// Aggregates as of the last commit
    pub fn status(&self) -> AggregateSnapshot {
        self.aggregates.snapshot()
    }

    pub fn has_inputs(&self) -> bool {
        self.aggregates.has_inputs()
    }

    pub fn has_value(&self) -> bool {
        self.aggregates.has_value()
    }

    pub fn has_validation_error(&self) -> bool {
        self.aggregates.has_validation_error()
    }
}

impl Drop for FormSession {
    fn drop(&mut self) {
        self.store.unsubscribe(self.subscription);
    }
}

impl std::fmt::Debug for FormSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormSession")
            .field("context", &self.context)
            .field("fields", &self.fields.len())
            .field("status", &self.status())
            .field("dirty", &self.dirty.get())
            .finish()
    }
}
