//! Validation error types.
//!
//! Every variant's `Display` output names the offending field path and rule,
//! so the message can be fed back into a repair prompt as-is.

use serde::Serialize;
use thiserror::Error;

/// Errors produced while validating an edit payload.
///
/// All of these are recoverable through the repair loop; none of them
/// indicate a problem with the document itself. Serializable so callers can
/// surface them as structured diagnostics.
#[derive(Debug, Clone, Serialize, Error)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum ValidateError {
    /// The payload is not parseable as JSON at all.
    #[error("invalid JSON: {message}")]
    Json { message: String },

    /// Parsed JSON does not map onto the closed change vocabulary
    /// (unknown `kind` discriminator, missing field, wrong type).
    #[error("schema mismatch: {message}")]
    Shape { message: String },

    /// An identifier-bearing field failed the identifier rule.
    #[error("{path}: '{value}' is not a valid identifier (non-empty, first character not a digit, alphanumeric and underscore only)")]
    Identifier { path: String, value: String },

    /// A rule spanning multiple fields was violated.
    #[error("{path}: {message}")]
    CrossField { path: String, message: String },
}
