pub mod apply;
pub mod changes;
pub mod error;
pub mod ident;
pub mod record;
pub mod spec;

// Re-export commonly used types
pub use apply::{apply_changeset, bump_patch_version};
pub use changes::{Change, ChangeSet, FieldDecl, ShapeDecl, StepDecl, TargetType};
pub use error::ApplyError;
pub use ident::is_valid_identifier;
pub use record::PatchRecord;
pub use spec::{
    ClassSpec, ConstraintKind, ConstraintSpec, ErrorSpec, FieldSpec, FieldType, MethodSpec,
    SdkSpec, ShapeSpec, StepSpec, DOC_NOTE_LIMIT, INITIAL_VERSION,
};
