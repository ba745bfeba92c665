//! In-memory implementation of [`SpecStore`].
//!
//! [`MemoryStore`] is a first-class backend for tests, ephemeral sessions,
//! and anywhere persistence isn't needed. Semantics are identical to the
//! on-disk backend: saving replaces both artifacts, loading before any save
//! yields the empty starting state.

use sdkforge_core::{PatchRecord, SdkSpec};

use crate::error::StorageError;
use crate::traits::SpecStore;

/// A store holding the snapshot and log in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    saved: Option<(SdkSpec, Vec<PatchRecord>)>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }
}

impl SpecStore for MemoryStore {
    fn save(&mut self, spec: &SdkSpec, log: &[PatchRecord]) -> Result<(), StorageError> {
        self.saved = Some((spec.clone(), log.to_vec()));
        Ok(())
    }

    fn load(&self) -> Result<(SdkSpec, Vec<PatchRecord>), StorageError> {
        Ok(match &self.saved {
            Some((spec, log)) => (spec.clone(), log.clone()),
            None => (SdkSpec::new(), Vec::new()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sdkforge_core::{apply_changeset, Change, ChangeSet};

    #[test]
    fn load_before_save_is_empty_state() {
        let store = MemoryStore::new();
        let (spec, log) = store.load().unwrap();
        assert_eq!(spec, SdkSpec::new());
        assert!(log.is_empty());
    }

    #[test]
    fn save_load_roundtrip() {
        let mut spec = SdkSpec::new();
        let changeset = ChangeSet {
            changes: vec![Change::AddClass {
                class_name: "UserService".to_string(),
                doc: None,
            }],
        };
        let record = apply_changeset(&mut spec, &changeset, Some("add it")).unwrap();

        let mut store = MemoryStore::new();
        store.save(&spec, &[record.clone()]).unwrap();
        let (loaded_spec, loaded_log) = store.load().unwrap();
        assert_eq!(loaded_spec, spec);
        assert_eq!(loaded_log, vec![record]);
    }
}
