//! On-disk implementation of [`SpecStore`]: JSON artifacts in a project
//! directory.
//!
//! Two files per directory: `spec.json` (document snapshot) and
//! `patch_log.json` (ordered patch log). Each loads independently; a missing
//! file yields its empty starting state. Writes are append-then-replace, not
//! transactional across the two files -- the log goes first, and the
//! snapshot is always reconstructible from it.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use sdkforge_core::{PatchRecord, SdkSpec};

use crate::error::StorageError;
use crate::traits::SpecStore;

const SPEC_FILE: &str = "spec.json";
const PATCH_LOG_FILE: &str = "patch_log.json";

/// A store backed by a directory of JSON artifacts.
#[derive(Debug, Clone)]
pub struct DirStore {
    dir: PathBuf,
}

impl DirStore {
    /// Creates a store rooted at `dir`. The directory is created on first
    /// save, not here.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        DirStore { dir: dir.into() }
    }

    /// The project directory this store reads and writes.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn spec_path(&self) -> PathBuf {
        self.dir.join(SPEC_FILE)
    }

    fn log_path(&self) -> PathBuf {
        self.dir.join(PATCH_LOG_FILE)
    }
}

impl SpecStore for DirStore {
    fn save(&mut self, spec: &SdkSpec, log: &[PatchRecord]) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir)?;

        // Log first: a crash before the snapshot write leaves a log the
        // snapshot can be rebuilt from.
        let log_json = serde_json::to_vec_pretty(&log)?;
        fs::write(self.log_path(), log_json)?;

        let spec_json = serde_json::to_vec_pretty(spec)?;
        fs::write(self.spec_path(), spec_json)?;
        Ok(())
    }

    fn load(&self) -> Result<(SdkSpec, Vec<PatchRecord>), StorageError> {
        let spec = match fs::read(self.spec_path()) {
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => SdkSpec::new(),
            Err(e) => return Err(e.into()),
        };
        let log = match fs::read(self.log_path()) {
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e.into()),
        };
        Ok((spec, log))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sdkforge_core::{apply_changeset, Change, ChangeSet};

    fn populated() -> (SdkSpec, Vec<PatchRecord>) {
        let mut spec = SdkSpec::new();
        let mut log = Vec::new();
        for name in ["UserService", "BillingService"] {
            let changeset = ChangeSet {
                changes: vec![Change::AddClass {
                    class_name: name.to_string(),
                    doc: None,
                }],
            };
            log.push(apply_changeset(&mut spec, &changeset, None).unwrap());
        }
        (spec, log)
    }

    #[test]
    fn load_from_empty_directory_is_empty_state() {
        let tmp = tempfile::tempdir().unwrap();
        let store = DirStore::new(tmp.path());
        let (spec, log) = store.load().unwrap();
        assert_eq!(spec, SdkSpec::new());
        assert!(log.is_empty());
    }

    #[test]
    fn save_then_load_reproduces_document_and_log_exactly() {
        let tmp = tempfile::tempdir().unwrap();
        let (spec, log) = populated();

        let mut store = DirStore::new(tmp.path());
        store.save(&spec, &log).unwrap();
        let (loaded_spec, loaded_log) = store.load().unwrap();
        assert_eq!(loaded_spec, spec);
        assert_eq!(loaded_log, log);

        // Saving what was loaded changes nothing.
        store.save(&loaded_spec, &loaded_log).unwrap();
        let (again_spec, again_log) = store.load().unwrap();
        assert_eq!(again_spec, spec);
        assert_eq!(again_log, log);
    }

    #[test]
    fn load_with_only_log_present() {
        let tmp = tempfile::tempdir().unwrap();
        let (spec, log) = populated();
        let mut store = DirStore::new(tmp.path());
        store.save(&spec, &log).unwrap();
        fs::remove_file(store.spec_path()).unwrap();

        let (loaded_spec, loaded_log) = store.load().unwrap();
        assert_eq!(loaded_spec, SdkSpec::new());
        assert_eq!(loaded_log, log);
    }

    #[test]
    fn load_with_only_snapshot_present() {
        let tmp = tempfile::tempdir().unwrap();
        let (spec, log) = populated();
        let mut store = DirStore::new(tmp.path());
        store.save(&spec, &log).unwrap();
        fs::remove_file(store.log_path()).unwrap();

        let (loaded_spec, loaded_log) = store.load().unwrap();
        assert_eq!(loaded_spec, spec);
        assert!(loaded_log.is_empty());
    }

    #[test]
    fn save_creates_missing_directories() {
        let tmp = tempfile::tempdir().unwrap();
        let nested = tmp.path().join("a").join("b");
        let (spec, log) = populated();
        let mut store = DirStore::new(&nested);
        store.save(&spec, &log).unwrap();
        assert!(nested.join("spec.json").exists());
        assert!(nested.join("patch_log.json").exists());
    }
}
