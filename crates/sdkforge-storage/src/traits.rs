//! The [`SpecStore`] trait defining the storage contract.
//!
//! A store persists the document snapshot and the patch log as one unit.
//! All backends implement this trait, ensuring they are fully swappable
//! without changing pipeline logic. The trait is synchronous: the pipeline
//! is single-writer and runs each ingest to completion.

use sdkforge_core::{PatchRecord, SdkSpec};

use crate::error::StorageError;

/// The storage contract for document snapshots and patch logs.
pub trait SpecStore {
    /// Persists the full document snapshot and the full patch log.
    ///
    /// The log must be durable before the snapshot is replaced.
    fn save(&mut self, spec: &SdkSpec, log: &[PatchRecord]) -> Result<(), StorageError>;

    /// Loads the document and log.
    ///
    /// A missing artifact yields its empty starting state: a fresh document
    /// at the initial version, an empty log, or both.
    fn load(&self) -> Result<(SdkSpec, Vec<PatchRecord>), StorageError>;
}

impl<S: SpecStore + ?Sized> SpecStore for &mut S {
    fn save(&mut self, spec: &SdkSpec, log: &[PatchRecord]) -> Result<(), StorageError> {
        (**self).save(spec, log)
    }

    fn load(&self) -> Result<(SdkSpec, Vec<PatchRecord>), StorageError> {
        (**self).load()
    }
}
