//! Immutable record of one applied change set.
//!
//! The ordered sequence of [`PatchRecord`]s is the document's sole source of
//! truth; the in-memory document is a cache derivable from it by replay.

use serde::{Deserialize, Serialize};

use crate::changes::ChangeSet;

/// One entry in the append-only patch log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatchRecord {
    /// Epoch-seconds timestamp of when the set was applied.
    pub timestamp: String,
    /// The instruction the change set was compiled from, when there was one.
    pub instruction_text: Option<String>,
    /// The applied change set, verbatim.
    pub changeset: ChangeSet,
    /// Human-readable summary of what was applied.
    pub summary: String,
    /// Document version before application.
    pub version_before: String,
    /// Document version after application.
    pub version_after: String,
}

pub(crate) fn now_string() -> String {
    let now = std::time::SystemTime::now();
    let secs = now
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    secs.to_string()
}
