use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc, RwLock,
};

use super::error::ListenerError;

/// Identifies one attached listener so it can be detached again
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

impl ListenerId {
    /// Allocates a process-wide unique id
    pub fn next() -> Self {
        static NEXT_LISTENER_ID: AtomicU64 = AtomicU64::new(0);
        Self(NEXT_LISTENER_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

/// Anything that can be attached to a notifier and detached again by id
pub trait Listener: Send + Sync {
    fn id(&self) -> ListenerId;
}

/// Receives a notification whenever the value of a property changes
pub trait ValueChangeListener: Listener {
    fn value_change(&self);
}

/// Capability of a property that can announce changes to its value.
/// Properties without it are never observed.
pub trait ValueChangeNotifier: Send + Sync {
    fn add_value_change_listener(
        &self,
        listener: Arc<dyn ValueChangeListener>,
    ) -> Result<(), ListenerError>;

    /// Detaches a listener. Returns false if it was not attached.
    fn remove_value_change_listener(&self, listener_id: ListenerId) -> Result<bool, ListenerError>;
}

/// A change to the set of items in a container
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemSetChange {
    /// `count` items were added starting at `first_index`
    ItemAdd { first_index: usize, count: usize },
    /// `count` items were removed starting at `first_index`
    ItemRemove { first_index: usize, count: usize },
    /// Something changed, but no index information is available
    Unstructured,
}

/// Receives notifications about structural changes to a container
pub trait ItemSetChangeListener: Listener {
    fn item_set_change(&self, change: &ItemSetChange);
}

/// Capability of a container that can announce structural changes
pub trait ItemSetChangeNotifier: Send + Sync {
    fn add_item_set_change_listener(
        &self,
        listener: Arc<dyn ItemSetChangeListener>,
    ) -> Result<(), ListenerError>;

    /// Detaches a listener. Returns false if it was not attached.
    fn remove_item_set_change_listener(
        &self,
        listener_id: ListenerId,
    ) -> Result<bool, ListenerError>;
}

/// A lock-guarded list of attached listeners. Notifiers snapshot the list
/// before calling out so a listener may detach itself while being notified.
pub struct Listeners<L: ?Sized + Listener> {
    inner: RwLock<Vec<Arc<L>>>,
}

impl<L: ?Sized + Listener> Listeners<L> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Vec::new()),
        }
    }

    pub fn try_add(&self, listener: Arc<L>) -> Result<(), ListenerError> {
        let mut listeners = self
            .inner
            .write()
            .map_err(|_| ListenerError::RwLockPoisoned)?;
        let listener_id = listener.id();
        if listeners.iter().any(|l| l.id() == listener_id) {
            return Err(ListenerError::AlreadyAttached {
                listener_id: listener_id.value(),
            });
        }
        listeners.push(listener);
        Ok(())
    }

    pub fn try_remove(&self, listener_id: ListenerId) -> Result<bool, ListenerError> {
        let mut listeners = self
            .inner
            .write()
            .map_err(|_| ListenerError::RwLockPoisoned)?;
        let before = listeners.len();
        listeners.retain(|l| l.id() != listener_id);
        Ok(listeners.len() != before)
    }

    pub fn try_snapshot(&self) -> Result<Vec<Arc<L>>, ListenerError> {
        let listeners = self
            .inner
            .read()
            .map_err(|_| ListenerError::RwLockPoisoned)?;
        Ok(listeners.clone())
    }

    pub fn len(&self) -> usize {
        self.inner.read().map(|l| l.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<L: ?Sized + Listener> Default for Listeners<L> {
    fn default() -> Self {
        Self::new()
    }
}
