//! Validation of untrusted edit payloads.
//!
//! Turns an arbitrary text blob -- typically a generative model's response,
//! possibly wrapped in prose or markdown fencing -- into a validated
//! [`ChangeSet`](sdkforge_core::ChangeSet), or a structured error naming the
//! offending field path and rule. There is no partial success: either the
//! whole payload validates or the call fails.
//!
//! - [`extract`]: locates the candidate JSON object inside free-form text
//! - [`validate`]: parse, map onto the closed change vocabulary, and walk
//!   every identifier-bearing field and cross-field rule

pub mod error;
pub mod extract;
pub mod validate;

pub use error::ValidateError;
pub use extract::extract_payload;
pub use validate::{validate_changeset, validate_response};
