// ABOUTME: Observable key-value state container with per-key subscriptions
// ABOUTME: Notifies subscribers synchronously from inside set() before it returns

use indexmap::IndexMap;
use serde_json::Value;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};
use tracing::debug;

type Handler = Rc<dyn Fn(&str, &Value)>;

/// Handle returned by [`State::subscribe`], used to unsubscribe later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

struct Subscriber {
    id: SubscriptionId,
    key: String,
    handler: Handler,
}

struct StateInner {
    values: RefCell<IndexMap<String, Value>>,
    subscribers: RefCell<Vec<Subscriber>>,
    next_id: Cell<u64>,
}

/// Mutable state of a single view.
///
/// Cloning a `State` yields another handle to the same container. Writes go
/// through [`State::set`], which dispatches to every subscriber of the key
/// inline. The handler list is snapshotted before dispatch, so handlers may
/// subscribe or unsubscribe while a notification is running.
#[derive(Clone)]
pub struct State {
    inner: Rc<StateInner>,
}

/// Non-owning handle to a [`State`].
#[derive(Clone)]
pub struct WeakState {
    inner: Weak<StateInner>,
}

impl State {
    pub fn new() -> Self {
        Self::from_values(IndexMap::new())
    }

    pub fn from_values(values: IndexMap<String, Value>) -> Self {
        Self {
            inner: Rc::new(StateInner {
                values: RefCell::new(values),
                subscribers: RefCell::new(Vec::new()),
                next_id: Cell::new(0),
            }),
        }
    }

    /// Get a copy of the value stored under `key`
    pub fn get(&self, key: &str) -> Option<Value> {
        self.inner.values.borrow().get(key).cloned()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.inner.values.borrow().contains_key(key)
    }

    /// Keys in insertion order
    pub fn keys(&self) -> Vec<String> {
        self.inner.values.borrow().keys().cloned().collect()
    }

    pub fn snapshot(&self) -> IndexMap<String, Value> {
        self.inner.values.borrow().clone()
    }

    /// Store `value` under `key` and notify the key's subscribers.
    ///
    /// Every call notifies, even when the new value equals the old one.
    pub fn set(&self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        let value = value.into();

        self.inner
            .values
            .borrow_mut()
            .insert(key.clone(), value.clone());

        let handlers: Vec<Handler> = self
            .inner
            .subscribers
            .borrow()
            .iter()
            .filter(|s| s.key == key)
            .map(|s| Rc::clone(&s.handler))
            .collect();

        debug!("State key '{}' set, notifying {} subscriber(s)", key, handlers.len());

        for handler in handlers {
            handler(&key, &value);
        }
    }

    /// Register `handler` to run after every `set` of `key`
    pub fn subscribe<F>(&self, key: impl Into<String>, handler: F) -> SubscriptionId
    where
        F: Fn(&str, &Value) + 'static,
    {
        let id = SubscriptionId(self.inner.next_id.get());
        self.inner.next_id.set(id.0 + 1);

        self.inner.subscribers.borrow_mut().push(Subscriber {
            id,
            key: key.into(),
            handler: Rc::new(handler),
        });

        id
    }

    /// Remove a subscription. Returns false if it was already gone.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self.inner.subscribers.borrow_mut();
        let before = subscribers.len();
        subscribers.retain(|s| s.id != id);
        subscribers.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.borrow().len()
    }

    /// Whether both handles point at the same container
    pub fn ptr_eq(&self, other: &State) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    pub fn downgrade(&self) -> WeakState {
        WeakState {
            inner: Rc::downgrade(&self.inner),
        }
    }
}

impl WeakState {
    pub fn upgrade(&self) -> Option<State> {
        self.inner.upgrade().map(|inner| State { inner })
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}

impl From<IndexMap<String, Value>> for State {
    fn from(values: IndexMap<String, Value>) -> Self {
        Self::from_values(values)
    }
}

impl fmt::Debug for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("State")
            .field("values", &*self.inner.values.borrow())
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}
