//! Rebuilding a document by forward replay of a patch-log prefix.
//!
//! Replay is the system's only mechanism for "undo": rolling back *n* edits
//! means re-running the patch applier over `log[0..len - n]` from an empty
//! document, never mutating backward. A document produced by replay is
//! field-for-field identical to one produced by live application stopped at
//! the same point.

use sdkforge_core::{apply_changeset, PatchRecord, SdkSpec};

use crate::error::StorageError;

/// Re-executes `log[0..up_to)` against a deep copy of `initial`.
///
/// `up_to` is clamped to the log length. A record whose change set no longer
/// applies surfaces [`StorageError::Replay`] with the failing index; that
/// indicates a corrupt or truncated-from-the-front log, since every record
/// was valid when appended.
pub fn replay(
    initial: &SdkSpec,
    log: &[PatchRecord],
    up_to: usize,
) -> Result<SdkSpec, StorageError> {
    let mut spec = initial.clone();
    let upper = up_to.min(log.len());
    for (index, record) in log[..upper].iter().enumerate() {
        apply_changeset(
            &mut spec,
            &record.changeset,
            record.instruction_text.as_deref(),
        )
        .map_err(|source| StorageError::Replay { index, source })?;
    }
    Ok(spec)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::fingerprint;
    use sdkforge_core::changes::{Change, ChangeSet, FieldDecl, ShapeDecl, TargetType};
    use sdkforge_core::FieldType;

    fn changesets() -> Vec<ChangeSet> {
        vec![
            ChangeSet {
                changes: vec![Change::AddClass {
                    class_name: "UserService".to_string(),
                    doc: Some("Manages users".to_string()),
                }],
            },
            ChangeSet {
                changes: vec![Change::AddMethod {
                    class_name: "UserService".to_string(),
                    method_name: "create_user".to_string(),
                    inputs: ShapeDecl {
                        name: "CreateUserInput".to_string(),
                        fields: vec![FieldDecl {
                            name: "email".to_string(),
                            ty: FieldType::Str,
                            optional: false,
                            default: None,
                            description: None,
                        }],
                    },
                    outputs: ShapeDecl {
                        name: "User".to_string(),
                        fields: vec![],
                    },
                    doc: None,
                    constraints: vec![],
                    steps: vec![],
                }],
            },
            ChangeSet {
                changes: vec![Change::Rename {
                    target_type: TargetType::Class,
                    from_name: "UserService".to_string(),
                    to_name: "AccountService".to_string(),
                    alias_old: true,
                    doc_note: None,
                }],
            },
        ]
    }

    fn apply_live() -> (SdkSpec, Vec<PatchRecord>) {
        let mut spec = SdkSpec::new();
        let mut log = Vec::new();
        for cs in changesets() {
            log.push(apply_changeset(&mut spec, &cs, None).unwrap());
        }
        (spec, log)
    }

    #[test]
    fn replay_of_full_log_matches_live_application() {
        let (live, log) = apply_live();
        let replayed = replay(&SdkSpec::new(), &log, log.len()).unwrap();
        assert_eq!(replayed, live);
        assert_eq!(fingerprint(&replayed), fingerprint(&live));
    }

    #[test]
    fn replay_of_prefix_matches_stopping_early() {
        let (_, log) = apply_live();

        let mut expected = SdkSpec::new();
        for record in &log[..2] {
            apply_changeset(&mut expected, &record.changeset, None).unwrap();
        }

        let replayed = replay(&SdkSpec::new(), &log, 2).unwrap();
        assert_eq!(replayed, expected);
        assert_eq!(replayed.version, "1.0.2");
        assert!(replayed.class("UserService").is_some());
        assert!(replayed.class("AccountService").is_none());
    }

    #[test]
    fn replay_up_to_zero_is_the_initial_document() {
        let (_, log) = apply_live();
        let replayed = replay(&SdkSpec::new(), &log, 0).unwrap();
        assert_eq!(replayed, SdkSpec::new());
    }

    #[test]
    fn up_to_is_clamped_to_log_length() {
        let (live, log) = apply_live();
        let replayed = replay(&SdkSpec::new(), &log, 100).unwrap();
        assert_eq!(replayed, live);
    }

    #[test]
    fn replay_surfaces_failing_index_on_corrupt_log() {
        let (_, mut log) = apply_live();
        // Drop the first record; the second now targets a missing class.
        log.remove(0);
        let err = replay(&SdkSpec::new(), &log, log.len()).unwrap_err();
        match err {
            StorageError::Replay { index, .. } => assert_eq!(index, 0),
            other => panic!("expected Replay error, got: {:?}", other),
        }
    }
}
