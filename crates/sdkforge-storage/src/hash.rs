//! Deterministic content fingerprinting for documents using blake3.
//!
//! The fingerprint is derived state, never stored. Determinism holds because
//! the document uses `IndexMap` for every name-keyed collection -- canonical
//! JSON serialization of the same document always produces the same bytes.

use sdkforge_core::SdkSpec;

/// Computes a blake3 fingerprint of a document's canonical serialization.
///
/// Two documents compare equal if and only if their fingerprints do, which
/// makes this the cheap way to assert replay equality.
pub fn fingerprint(spec: &SdkSpec) -> blake3::Hash {
    let bytes =
        serde_json::to_vec(spec).expect("SdkSpec serialization should never fail");
    blake3::hash(&bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sdkforge_core::{apply_changeset, Change, ChangeSet};

    #[test]
    fn identical_documents_share_a_fingerprint() {
        let a = SdkSpec::new();
        let b = SdkSpec::new();
        assert_eq!(fingerprint(&a), fingerprint(&b));
    }

    #[test]
    fn any_edit_changes_the_fingerprint() {
        let empty = SdkSpec::new();
        let mut edited = SdkSpec::new();
        let changeset = ChangeSet {
            changes: vec![Change::AddClass {
                class_name: "UserService".to_string(),
                doc: None,
            }],
        };
        apply_changeset(&mut edited, &changeset, None).unwrap();
        assert_ne!(fingerprint(&empty), fingerprint(&edited));
    }
}
