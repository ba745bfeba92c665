//! The closed edit vocabulary: [`Change`] variants and the [`ChangeSet`]
//! batch container.
//!
//! This is the sole contract between any producer (model-generated or
//! hand-authored) and the rest of the pipeline. Each element of the wire
//! payload's `changes` array is discriminated by its `kind` field; unknown
//! discriminators fail deserialization. The set is exhaustive -- adding a
//! variant is a compile-visible change to the validator, the patch applier,
//! and the prompt text.
//!
//! Wire-level shape declarations ([`ShapeDecl`], [`FieldDecl`], [`StepDecl`])
//! carry fields as ordered arrays, the producer-facing format. The document
//! model keys the same data by name; conversion happens during application.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::spec::{ConstraintSpec, FieldType};

/// An ordered batch of edit operations submitted together.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChangeSet {
    #[serde(default)]
    pub changes: Vec<Change>,
}

/// Whether a rename or deprecation targets a class or a method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetType {
    Class,
    Method,
}

/// A single edit operation.
///
/// Each variant carries only the fields it needs. Method targets in
/// [`Change::Rename`] and [`Change::Deprecate`] use the `Class.method` form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Change {
    /// Add a new, empty class.
    #[serde(rename = "ADD_CLASS")]
    AddClass {
        class_name: String,
        #[serde(default)]
        doc: Option<String>,
    },

    /// Add a new method to an existing class.
    #[serde(rename = "ADD_METHOD")]
    AddMethod {
        class_name: String,
        method_name: String,
        inputs: ShapeDecl,
        outputs: ShapeDecl,
        #[serde(default)]
        doc: Option<String>,
        #[serde(default)]
        constraints: Vec<ConstraintSpec>,
        #[serde(default)]
        steps: Vec<StepDecl>,
    },

    /// Modify an existing method's signature: remove then add parameters,
    /// optionally replace the return shape and the doc summary.
    #[serde(rename = "MODIFY_METHOD_SIGNATURE")]
    ModifySignature {
        class_name: String,
        method_name: String,
        #[serde(default)]
        add_params: Vec<FieldDecl>,
        #[serde(default)]
        remove_params: Vec<String>,
        #[serde(default)]
        change_return: Option<ShapeDecl>,
        #[serde(default)]
        doc_note: Option<String>,
        #[serde(default)]
        replace_doc_summary: bool,
        #[serde(default)]
        new_doc_summary: Option<String>,
    },

    /// Append a constraint to an existing method.
    #[serde(rename = "ADD_CONSTRAINT")]
    AddConstraint {
        class_name: String,
        method_name: String,
        constraint: ConstraintSpec,
        #[serde(default)]
        doc_note: Option<String>,
    },

    /// Rename a class or method, optionally keeping the old name resolvable
    /// as an alias.
    #[serde(rename = "RENAME")]
    Rename {
        target_type: TargetType,
        #[serde(rename = "from")]
        from_name: String,
        #[serde(rename = "to")]
        to_name: String,
        #[serde(default = "default_true")]
        alias_old: bool,
        #[serde(default)]
        doc_note: Option<String>,
    },

    /// Mark a class or method deprecated.
    #[serde(rename = "DEPRECATE")]
    Deprecate {
        target_type: TargetType,
        target: String,
        #[serde(default)]
        message: Option<String>,
        #[serde(default)]
        doc_note: Option<String>,
    },
}

fn default_true() -> bool {
    true
}

impl Change {
    /// The wire discriminator for this variant.
    pub fn kind(&self) -> &'static str {
        match self {
            Change::AddClass { .. } => "ADD_CLASS",
            Change::AddMethod { .. } => "ADD_METHOD",
            Change::ModifySignature { .. } => "MODIFY_METHOD_SIGNATURE",
            Change::AddConstraint { .. } => "ADD_CONSTRAINT",
            Change::Rename { .. } => "RENAME",
            Change::Deprecate { .. } => "DEPRECATE",
        }
    }
}

/// Wire-level shape declaration: a name plus an ordered field array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeDecl {
    pub name: String,
    #[serde(default)]
    pub fields: Vec<FieldDecl>,
}

/// Wire-level field declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDecl {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: FieldType,
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub default: Option<Value>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Wire-level semantic step declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepDecl {
    pub op: String,
    #[serde(default)]
    pub params: IndexMap<String, Value>,
    #[serde(default)]
    pub description: Option<String>,
}
