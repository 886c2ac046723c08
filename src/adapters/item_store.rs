//! Shared item owned by one form session
//!
//! The store hands out read access and change notifications. Writes are
//! crate-private and only reachable through
//! [`ValueSetter::set`](super::binding::ValueSetter::set).

use serde_json::Value;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use tracing::trace;

use crate::domain::accessor;
use crate::domain::path::Path;

type Subscriber = Rc<dyn Fn(u64)>;

/// Handle for removing a subscriber
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SubscriptionId(u64);

struct ItemStoreInner {
    item: RefCell<Value>,
    version: Cell<u64>,
    subscribers: RefCell<Vec<(SubscriptionId, Subscriber)>>,
    next_subscription: Cell<u64>,
}

/// Cheaply clonable handle to the shared item
#[derive(Clone)]
pub struct ItemStore {
    inner: Rc<ItemStoreInner>,
}

impl ItemStore {
    pub fn new(item: Value) -> Self {
        Self {
            inner: Rc::new(ItemStoreInner {
                item: RefCell::new(item),
                version: Cell::new(0),
                subscribers: RefCell::new(Vec::new()),
                next_subscription: Cell::new(0),
            }),
        }
    }

    /// Bumped once per write that changed the item
    pub fn version(&self) -> u64 {
        self.inner.version.get()
    }

    pub fn get(&self, path: &Path) -> Option<Value> {
        accessor::get(&self.inner.item.borrow(), path).cloned()
    }

    /// Run `f` against the current item without copying it
    pub fn with_item<R>(&self, f: impl FnOnce(&Value) -> R) -> R {
        f(&self.inner.item.borrow())
    }

    pub fn snapshot(&self) -> Value {
        self.inner.item.borrow().clone()
    }

    pub fn subscribe(&self, callback: impl Fn(u64) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.inner.next_subscription.get());
        self.inner.next_subscription.set(id.0 + 1);
        self.inner.subscribers.borrow_mut().push((id, Rc::new(callback)));
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.inner.subscribers.borrow_mut().retain(|(sub, _)| *sub != id);
    }

    /// Replace the value at `path`; returns whether the stored value changed
    pub(crate) fn write(&self, path: &Path, value: Value) -> bool {
        let mut item = self.inner.item.borrow_mut();
        let changed = accessor::get(&item, path) != Some(&value);
        accessor::set(&mut item, path, value);
        if changed {
            self.inner.version.set(self.inner.version.get() + 1);
        }
        trace!(path = %path, changed, version = self.version(), "item write");
        changed
    }

    /// Tell every subscriber about the current version
    pub(crate) fn notify(&self) {
        // Clone the list so callbacks may subscribe, unsubscribe, or read the item.
        let subscribers: Vec<Subscriber> = self
            .inner
            .subscribers
            .borrow()
            .iter()
            .map(|(_, callback)| Rc::clone(callback))
            .collect();
        let version = self.version();
        for callback in subscribers {
            callback(version);
        }
    }
}

impl Default for ItemStore {
    fn default() -> Self {
        Self::new(Value::Object(serde_json::Map::new()))
    }
}

impl std::fmt::Debug for ItemStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ItemStore")
            .field("version", &self.version())
            .field("item", &*self.inner.item.borrow())
            .finish()
    }
}
