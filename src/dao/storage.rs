use std::error::Error;
use thiserror::Error;

use crate::state::lifecycle::SessionStatus;

/// Result alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Error raised by storage backends regardless of the underlying database.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backend could not be reached or the operation failed outright.
    #[error("storage unavailable: {message}")]
    Unavailable {
        /// Human-readable description of the failed operation.
        message: String,
        /// Backend-specific cause.
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
    /// A write's status precondition did not hold at commit time.
    ///
    /// Every mutating session operation re-checks the session status inside
    /// the same atomic write; hiding controls in the UI is not enforcement.
    #[error("session is {} but the operation requires {}", actual.as_str(), required.as_str())]
    StatusConflict {
        /// Status the operation required.
        required: SessionStatus,
        /// Status the session actually had.
        actual: SessionStatus,
    },
    /// A freshly generated session code collided with an existing session.
    #[error("session code `{code}` is already taken")]
    CodeTaken {
        /// The colliding code.
        code: String,
    },
}

impl StorageError {
    /// Construct an unavailable error from any backend failure.
    pub fn unavailable(message: String, source: impl Error + Send + Sync + 'static) -> Self {
        StorageError::Unavailable {
            message,
            source: Box::new(source),
        }
    }
}
