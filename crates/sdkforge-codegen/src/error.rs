//! Codegen error types.

use thiserror::Error;

/// Errors produced while emitting source from a document.
#[derive(Debug, Error)]
pub enum CodegenError {
    /// Writing an output file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
