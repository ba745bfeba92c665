//! Pipeline error taxonomy.
//!
//! Only schema-invalid payloads are recovered locally, inside the bounded
//! repair loop. Everything else propagates to the caller undisguised:
//! silently skipping a requested edit would break the patch log's claim to
//! be the source of truth.

use sdkforge_check::ValidateError;
use sdkforge_core::ApplyError;
use sdkforge_storage::StorageError;
use thiserror::Error;

/// Errors from the text-generation collaborator boundary.
#[derive(Debug, Error)]
pub enum LlmError {
    /// Client-side configuration is missing or inconsistent.
    #[error("llm configuration error: {0}")]
    Config(String),

    /// The request could not be sent or the response could not be read.
    #[error("provider request failed: {0}")]
    Request(String),

    /// The provider answered with a non-success status.
    #[error("provider request failed ({status}): {body}")]
    Provider { status: u16, body: String },

    /// The provider response carried no assistant content.
    #[error("provider response missing assistant content")]
    EmptyResponse,
}

/// Errors from compiling an instruction into a change set.
#[derive(Debug, Error)]
pub enum CompileError {
    /// The collaborator call itself failed.
    #[error(transparent)]
    Llm(#[from] LlmError),

    /// Validation kept failing past the retry bound. Carries the last
    /// invalid payload and error for operator inspection.
    #[error("no valid change set after {attempts} repair attempt(s); last error: {last_error}")]
    RepairExhausted {
        attempts: u32,
        last_error: ValidateError,
        last_payload: String,
    },
}

/// Unified error for the front-door pipeline operations.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error(transparent)]
    Validate(#[from] ValidateError),

    #[error(transparent)]
    Apply(#[from] ApplyError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    /// A rollback asked for more patches than the log holds.
    #[error("cannot roll back {requested} patch(es): only {available} exist")]
    Rollback { requested: usize, available: usize },
}
