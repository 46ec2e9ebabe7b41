use thiserror::Error;

/// Errors that can occur while attaching or detaching change listeners
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ListenerError {
    /// A listener list's lock was poisoned by a panicking holder
    #[error("Listener list lock was poisoned by a panicking thread")]
    RwLockPoisoned,

    /// The same listener was attached twice to one notifier
    #[error("Listener {listener_id} is already attached")]
    AlreadyAttached { listener_id: u64 },
}

/// Errors that can occur during Property operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PropertyError {
    /// Attempted to set the value of a property that cannot be written
    #[error("Property is read-only and cannot be set")]
    ReadOnly,

    /// The property value's lock was poisoned by a panicking holder
    #[error("Property value lock was poisoned by a panicking thread")]
    RwLockPoisoned,

    /// Notifying the property's listeners failed
    #[error("Property listeners could not be notified: {0}")]
    Listener(#[from] ListenerError),
}
