//! Core error types for sdkforge-core.
//!
//! Uses `thiserror` for structured, matchable error variants. These cover
//! well-formed edits that target a non-existent entity or collide with an
//! existing one; schema-level problems are rejected earlier, by the
//! validator.

use thiserror::Error;

/// Errors raised while applying a change set to a document.
///
/// Application is all-or-nothing: any of these leaves the document untouched.
#[derive(Debug, Error)]
pub enum ApplyError {
    /// A class with this name (or a resolvable alias) already exists.
    #[error("class already exists: '{name}'")]
    ClassExists { name: String },

    /// No class with this name or alias.
    #[error("class not found: '{name}'")]
    ClassNotFound { name: String },

    /// A method with this name (or a resolvable alias) already exists.
    #[error("method already exists: '{class}.{method}'")]
    MethodExists { class: String, method: String },

    /// No method with this name or alias on the class.
    #[error("method not found: '{class}.{method}'")]
    MethodNotFound { class: String, method: String },

    /// A method target did not have the `Class.method` form.
    #[error("invalid method target '{target}': expected 'Class.method'")]
    InvalidTarget { target: String },

    /// A destination identifier failed the identifier rule.
    #[error("invalid identifier: '{value}'")]
    InvalidIdentifier { value: String },
}
