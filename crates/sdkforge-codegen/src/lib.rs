//! Source emission for finished specification documents.
//!
//! Mechanical string templating over a validated document: one models module
//! for every distinct shape, one module per class with a service trait, and
//! an index module tying them together. Emission carries no invariants of
//! its own -- it consumes a structurally valid document and produces text.

pub mod error;
pub mod renderer;
pub mod sanitize;

pub use error::CodegenError;
pub use renderer::render_sdk;
