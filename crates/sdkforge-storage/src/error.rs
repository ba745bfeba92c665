//! Storage error types for sdkforge-storage.
//!
//! [`StorageError`] covers all anticipated failure modes in the storage
//! layer: I/O, serialization, and replay of a log whose records no longer
//! apply. None of these are recoverable; no partial state is assumed valid.

use sdkforge_core::ApplyError;
use thiserror::Error;

/// Errors produced by storage and replay operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing an artifact failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization or deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A log record failed to re-apply during replay.
    #[error("replay failed at log index {index}: {source}")]
    Replay {
        index: usize,
        #[source]
        source: ApplyError,
    },
}
