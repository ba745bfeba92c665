//! SpecService: the front door owning document, patch log, and store as one
//! unit of resource ownership.
//!
//! All pipeline operations flow through [`SpecService`]. Every mutating
//! method takes `&mut self` -- the document is exclusively owned by the
//! ingesting call for its duration, and there is no internal locking. A
//! caller requiring concurrency serializes calls through a single-writer
//! queue or a per-document mutex.

use sdkforge_check::validate_changeset;
use sdkforge_core::{apply_changeset, ChangeSet, PatchRecord, SdkSpec};
use sdkforge_storage::{replay, SpecStore};

use crate::compile::{compile_instruction, InstructionReceipt, DEFAULT_MAX_REPAIR_ATTEMPTS};
use crate::error::PipelineError;
use crate::llm::LlmClient;

/// The central service coordinating compilation, application, history,
/// rollback, and persistence for one document.
pub struct SpecService<S: SpecStore> {
    /// The current in-memory document.
    spec: SdkSpec,
    /// The append-only patch log; the document is derivable from it.
    patch_log: Vec<PatchRecord>,
    /// Storage backend for the snapshot/log pair.
    store: S,
    /// Bound on repair re-prompts per instruction.
    max_repair_attempts: u32,
}

impl<S: SpecStore> SpecService<S> {
    /// Opens a service over `store`, loading the persisted state or starting
    /// from the empty document.
    pub fn open(store: S) -> Result<Self, PipelineError> {
        let (spec, patch_log) = store.load()?;
        Ok(SpecService {
            spec,
            patch_log,
            store,
            max_repair_attempts: DEFAULT_MAX_REPAIR_ATTEMPTS,
        })
    }

    /// Overrides the repair bound.
    pub fn with_max_repair_attempts(mut self, bound: u32) -> Self {
        self.max_repair_attempts = bound;
        self
    }

    /// The current document.
    pub fn current_spec(&self) -> &SdkSpec {
        &self.spec
    }

    /// The patch history, oldest first.
    pub fn history(&self) -> &[PatchRecord] {
        &self.patch_log
    }

    /// Ingests a natural-language instruction: compile (with repair loop),
    /// apply, append to the log, and persist.
    pub fn ingest_instruction(
        &mut self,
        text: &str,
        client: &dyn LlmClient,
    ) -> Result<InstructionReceipt, PipelineError> {
        let receipt = compile_instruction(text, &self.spec, client, self.max_repair_attempts)?;
        let record = apply_changeset(&mut self.spec, &receipt.changeset, Some(text))?;
        tracing::info!(
            version = %record.version_after,
            summary = %record.summary,
            "applied change set"
        );
        self.patch_log.push(record);
        self.save()?;
        Ok(receipt)
    }

    /// Ingests a pre-validated change set directly, bypassing the
    /// collaborator. Used for hand-authored payloads.
    pub fn ingest_changeset(
        &mut self,
        changeset: ChangeSet,
        source_text: Option<&str>,
    ) -> Result<PatchRecord, PipelineError> {
        let record = apply_changeset(&mut self.spec, &changeset, source_text)?;
        tracing::info!(
            version = %record.version_after,
            summary = %record.summary,
            "applied change set"
        );
        self.patch_log.push(record.clone());
        self.save()?;
        Ok(record)
    }

    /// Validates a raw payload string and ingests the resulting change set.
    ///
    /// Unlike the repair loop there is no second chance here: a hand-authored
    /// payload either validates or the call fails.
    pub fn ingest_payload(
        &mut self,
        payload: &str,
        source_text: Option<&str>,
    ) -> Result<PatchRecord, PipelineError> {
        let changeset = validate_changeset(payload)?;
        self.ingest_changeset(changeset, source_text)
    }

    /// Rolls back the last `n` patches by replaying the shorter log prefix
    /// from an empty document, then truncating the log and persisting.
    pub fn rollback(&mut self, n: usize) -> Result<(), PipelineError> {
        if n > self.patch_log.len() {
            return Err(PipelineError::Rollback {
                requested: n,
                available: self.patch_log.len(),
            });
        }
        let target = self.patch_log.len() - n;
        self.spec = replay(&SdkSpec::new(), &self.patch_log, target)?;
        self.patch_log.truncate(target);
        self.save()?;
        tracing::info!(remaining = target, rolled_back = n, "rolled back patches");
        Ok(())
    }

    /// Persists the snapshot/log pair.
    pub fn save(&mut self) -> Result<(), PipelineError> {
        self.store.save(&self.spec, &self.patch_log)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sdkforge_core::Change;
    use sdkforge_storage::MemoryStore;

    fn add_class(name: &str) -> ChangeSet {
        ChangeSet {
            changes: vec![Change::AddClass {
                class_name: name.to_string(),
                doc: None,
            }],
        }
    }

    #[test]
    fn ingest_changeset_appends_and_bumps() {
        let mut service = SpecService::open(MemoryStore::new()).unwrap();
        let record = service
            .ingest_changeset(add_class("UserService"), Some("add it"))
            .unwrap();
        assert_eq!(record.version_after, "1.0.1");
        assert_eq!(service.history().len(), 1);
        assert!(service.current_spec().class("UserService").is_some());
    }

    #[test]
    fn ingest_payload_validates_before_applying() {
        let mut service = SpecService::open(MemoryStore::new()).unwrap();
        service
            .ingest_payload(
                r#"{"changes": [{"kind": "ADD_CLASS", "class_name": "UserService"}]}"#,
                Some("add it"),
            )
            .unwrap();
        assert!(service.current_spec().class("UserService").is_some());

        let err = service
            .ingest_payload(r#"{"changes": [{"kind": "ADD_CLASS", "class_name": "123Bad"}]}"#, None)
            .unwrap_err();
        assert!(matches!(err, PipelineError::Validate(_)));
        // The invalid payload left no trace.
        assert_eq!(service.history().len(), 1);
    }

    #[test]
    fn rollback_truncates_history_and_matches_replay() {
        let mut service = SpecService::open(MemoryStore::new()).unwrap();
        for name in ["A", "B", "C"] {
            service.ingest_changeset(add_class(name), None).unwrap();
        }
        let full_log = service.history().to_vec();
        assert_eq!(service.current_spec().version, "1.0.3");

        service.rollback(2).unwrap();

        assert_eq!(service.history().len(), 1);
        let expected = replay(&SdkSpec::new(), &full_log, 1).unwrap();
        assert_eq!(*service.current_spec(), expected);
        assert_eq!(service.current_spec().version, "1.0.1");
        assert!(service.current_spec().class("A").is_some());
        assert!(service.current_spec().class("B").is_none());
    }

    #[test]
    fn rollback_past_history_is_rejected() {
        let mut service = SpecService::open(MemoryStore::new()).unwrap();
        service.ingest_changeset(add_class("A"), None).unwrap();

        let err = service.rollback(2).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Rollback {
                requested: 2,
                available: 1
            }
        ));
        // Nothing was lost.
        assert_eq!(service.history().len(), 1);
    }

    #[test]
    fn rollback_of_zero_is_a_noop() {
        let mut service = SpecService::open(MemoryStore::new()).unwrap();
        service.ingest_changeset(add_class("A"), None).unwrap();
        let before = service.current_spec().clone();

        service.rollback(0).unwrap();
        assert_eq!(*service.current_spec(), before);
        assert_eq!(service.history().len(), 1);
    }

    #[test]
    fn failed_apply_leaves_service_state_untouched() {
        let mut service = SpecService::open(MemoryStore::new()).unwrap();
        service.ingest_changeset(add_class("A"), None).unwrap();

        let err = service.ingest_changeset(add_class("A"), None).unwrap_err();
        assert!(matches!(err, PipelineError::Apply(_)));
        assert_eq!(service.history().len(), 1);
        assert_eq!(service.current_spec().version, "1.0.1");
    }

    #[test]
    fn reopening_from_the_same_store_restores_state() {
        let mut store = MemoryStore::new();
        {
            let mut service = SpecService::open(&mut store).unwrap();
            service.ingest_changeset(add_class("A"), None).unwrap();
        }
        let service = SpecService::open(&mut store).unwrap();
        assert_eq!(service.history().len(), 1);
        assert!(service.current_spec().class("A").is_some());
    }
}
