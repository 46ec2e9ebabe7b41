use thiserror::Error;

use gridsync_shared::ListenerError;

/// Errors that can occur while operating a DataProvider
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataProviderError {
    /// The provider was detached from its session and no longer serves rows
    #[error("DataProvider is detached and cannot {operation}")]
    Detached { operation: &'static str },

    /// Attaching to or detaching from the container failed
    #[error("DataProvider listener error: {0}")]
    Listener(#[from] ListenerError),
}
