//! The versioned SDK specification document tree.
//!
//! [`SdkSpec`] is the root: a version string plus named classes, each holding
//! named methods with typed input/output shapes, constraints, and a bounded
//! documentation history. All name-keyed collections are `IndexMap`s so that
//! iteration order, serialization, and the prompt summary are deterministic.
//!
//! # Normalization
//!
//! Every collection in the document is always present, possibly empty --
//! there is no "uninitialized" state. Deserialization maps both absent and
//! `null` collections to empty ones, so snapshots written by older producers
//! load into the same normalized shape.
//!
//! # Aliases
//!
//! A rename with `alias_old` leaves the previous name resolvable: lookup via
//! [`SdkSpec::class`] / [`ClassSpec::method`] checks canonical keys first,
//! then alias lists. The maps hold exactly one entry per entity; an alias is
//! never a second map key.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Version string a freshly created document starts at.
pub const INITIAL_VERSION: &str = "1.0.0";

/// Maximum number of documentation notes retained per class or method.
/// Appends beyond this evict the oldest entries first.
pub const DOC_NOTE_LIMIT: usize = 10;

// ---------------------------------------------------------------------------
// Deserialization helpers: absent and null both normalize to empty
// ---------------------------------------------------------------------------

fn null_as_empty_map<'de, D, V>(deserializer: D) -> Result<IndexMap<String, V>, D::Error>
where
    D: Deserializer<'de>,
    V: Deserialize<'de>,
{
    let opt = Option::<IndexMap<String, V>>::deserialize(deserializer)?;
    Ok(opt.unwrap_or_default())
}

fn null_as_empty_vec<'de, D, V>(deserializer: D) -> Result<Vec<V>, D::Error>
where
    D: Deserializer<'de>,
    V: Deserialize<'de>,
{
    let opt = Option::<Vec<V>>::deserialize(deserializer)?;
    Ok(opt.unwrap_or_default())
}

// ---------------------------------------------------------------------------
// Field types
// ---------------------------------------------------------------------------

/// Primitive-or-reference type tag carried by a field.
///
/// Serializes as the wire string: `"str"`, `"int"`, `"float"`, `"bool"`, or
/// the referenced shape name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    Str,
    Int,
    Float,
    Bool,
    /// Reference to a named shape defined elsewhere in the document.
    Ref(String),
}

impl FieldType {
    /// Parses a wire type string. Unknown names become [`FieldType::Ref`].
    pub fn from_name(name: &str) -> FieldType {
        match name {
            "str" => FieldType::Str,
            "int" => FieldType::Int,
            "float" => FieldType::Float,
            "bool" => FieldType::Bool,
            other => FieldType::Ref(other.to_string()),
        }
    }

    /// The wire string for this type.
    pub fn as_str(&self) -> &str {
        match self {
            FieldType::Str => "str",
            FieldType::Int => "int",
            FieldType::Float => "float",
            FieldType::Bool => "bool",
            FieldType::Ref(name) => name,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for FieldType {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for FieldType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(FieldType::from_name(&name))
    }
}

// ---------------------------------------------------------------------------
// Document leaves
// ---------------------------------------------------------------------------

/// A single field in an input or output shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: FieldType,
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub default: Option<Value>,
    #[serde(default)]
    pub description: String,
}

/// An input or output shape: a name plus fields keyed by field name.
///
/// The field map may be empty but is never absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeSpec {
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty_map")]
    pub fields: IndexMap<String, FieldSpec>,
}

impl ShapeSpec {
    /// Creates an empty shape with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        ShapeSpec {
            name: name.into(),
            fields: IndexMap::new(),
        }
    }
}

/// Constraint classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConstraintKind {
    Precondition,
    Postcondition,
    Policy,
}

/// A documentation-grade constraint on a method.
///
/// The expression is free text; nothing evaluates it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstraintSpec {
    pub kind: ConstraintKind,
    pub expression: String,
    #[serde(default)]
    pub message: String,
}

/// An ordered, descriptive semantic step of a method.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepSpec {
    pub op: String,
    #[serde(default, deserialize_with = "null_as_empty_map")]
    pub params: IndexMap<String, Value>,
    #[serde(default)]
    pub description: String,
}

/// An error a method may surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorSpec {
    pub name: String,
    pub message: String,
}

// ---------------------------------------------------------------------------
// Methods and classes
// ---------------------------------------------------------------------------

/// A method on a class: signature shapes, constraints, steps, and a bounded
/// documentation history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodSpec {
    pub name: String,
    #[serde(default)]
    pub doc_summary: String,
    #[serde(default, deserialize_with = "null_as_empty_vec")]
    pub doc_notes: Vec<String>,
    pub inputs: ShapeSpec,
    pub outputs: ShapeSpec,
    #[serde(default, deserialize_with = "null_as_empty_vec")]
    pub constraints: Vec<ConstraintSpec>,
    #[serde(default, deserialize_with = "null_as_empty_vec")]
    pub steps: Vec<StepSpec>,
    #[serde(default, deserialize_with = "null_as_empty_vec")]
    pub errors: Vec<ErrorSpec>,
    #[serde(default)]
    pub deprecated: bool,
    #[serde(default, deserialize_with = "null_as_empty_vec")]
    pub aliases: Vec<String>,
}

impl MethodSpec {
    /// Appends a documentation note, evicting the oldest past the limit.
    pub fn push_doc_note(&mut self, note: impl Into<String>) {
        push_bounded(&mut self.doc_notes, note.into());
    }
}

/// A class: named methods plus documentation state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassSpec {
    pub name: String,
    #[serde(default)]
    pub doc_summary: String,
    #[serde(default, deserialize_with = "null_as_empty_vec")]
    pub doc_notes: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty_map")]
    pub methods: IndexMap<String, MethodSpec>,
    #[serde(default)]
    pub deprecated: bool,
    #[serde(default, deserialize_with = "null_as_empty_vec")]
    pub aliases: Vec<String>,
}

impl ClassSpec {
    /// Creates an empty class with the given name and doc summary.
    pub fn new(name: impl Into<String>, doc_summary: impl Into<String>) -> Self {
        ClassSpec {
            name: name.into(),
            doc_summary: doc_summary.into(),
            doc_notes: Vec::new(),
            methods: IndexMap::new(),
            deprecated: false,
            aliases: Vec::new(),
        }
    }

    /// Resolves a method by canonical name or alias.
    pub fn method(&self, name: &str) -> Option<&MethodSpec> {
        if let Some(method) = self.methods.get(name) {
            return Some(method);
        }
        self.methods
            .values()
            .find(|m| m.aliases.iter().any(|a| a == name))
    }

    /// Mutable variant of [`ClassSpec::method`].
    pub fn method_mut(&mut self, name: &str) -> Option<&mut MethodSpec> {
        if self.methods.contains_key(name) {
            return self.methods.get_mut(name);
        }
        self.methods
            .values_mut()
            .find(|m| m.aliases.iter().any(|a| a == name))
    }

    /// Returns the canonical map key under which `name` resolves, if any.
    pub fn resolve_method_key(&self, name: &str) -> Option<String> {
        if self.methods.contains_key(name) {
            return Some(name.to_string());
        }
        self.methods
            .iter()
            .find(|(_, m)| m.aliases.iter().any(|a| a == name))
            .map(|(key, _)| key.clone())
    }

    /// Appends a documentation note, evicting the oldest past the limit.
    pub fn push_doc_note(&mut self, note: impl Into<String>) {
        push_bounded(&mut self.doc_notes, note.into());
    }
}

fn push_bounded(notes: &mut Vec<String>, note: String) {
    notes.push(note);
    if notes.len() > DOC_NOTE_LIMIT {
        let excess = notes.len() - DOC_NOTE_LIMIT;
        notes.drain(..excess);
    }
}

// ---------------------------------------------------------------------------
// Document root
// ---------------------------------------------------------------------------

/// The root specification document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SdkSpec {
    pub version: String,
    #[serde(default, deserialize_with = "null_as_empty_map")]
    pub classes: IndexMap<String, ClassSpec>,
    #[serde(default, deserialize_with = "null_as_empty_map")]
    pub metadata: IndexMap<String, Value>,
}

impl Default for SdkSpec {
    fn default() -> Self {
        SdkSpec::new()
    }
}

impl SdkSpec {
    /// Creates an empty document at [`INITIAL_VERSION`].
    pub fn new() -> Self {
        SdkSpec {
            version: INITIAL_VERSION.to_string(),
            classes: IndexMap::new(),
            metadata: IndexMap::new(),
        }
    }

    /// Resolves a class by canonical name or alias.
    pub fn class(&self, name: &str) -> Option<&ClassSpec> {
        if let Some(class) = self.classes.get(name) {
            return Some(class);
        }
        self.classes
            .values()
            .find(|c| c.aliases.iter().any(|a| a == name))
    }

    /// Mutable variant of [`SdkSpec::class`].
    pub fn class_mut(&mut self, name: &str) -> Option<&mut ClassSpec> {
        if self.classes.contains_key(name) {
            return self.classes.get_mut(name);
        }
        self.classes
            .values_mut()
            .find(|c| c.aliases.iter().any(|a| a == name))
    }

    /// Returns the canonical map key under which `name` resolves, if any.
    pub fn resolve_class_key(&self, name: &str) -> Option<String> {
        if self.classes.contains_key(name) {
            return Some(name.to_string());
        }
        self.classes
            .iter()
            .find(|(_, c)| c.aliases.iter().any(|a| a == name))
            .map(|(key, _)| key.clone())
    }

    /// Renders the deterministic text summary embedded in compiler prompts.
    ///
    /// Lists every class with its doc line, deprecation marker, and method
    /// signatures. Contains no internal identifiers, so the same document
    /// always produces the same summary.
    pub fn render_summary(&self) -> String {
        if self.classes.is_empty() {
            return "Empty SDK (no classes defined yet).".to_string();
        }

        let mut lines = vec!["Current SDK specification:".to_string()];
        for (class_name, class) in &self.classes {
            lines.push(format!("\n{}:", class_name));
            if !class.doc_summary.is_empty() {
                lines.push(format!("  Doc: {}", class.doc_summary));
            }
            if class.deprecated {
                lines.push("  [DEPRECATED]".to_string());
            }
            if !class.aliases.is_empty() {
                lines.push(format!("  Aliases: {}", class.aliases.join(", ")));
            }

            if class.methods.is_empty() {
                lines.push("  Methods: (none)".to_string());
            } else {
                lines.push("  Methods:".to_string());
                for (method_name, method) in &class.methods {
                    let params: Vec<String> = method
                        .inputs
                        .fields
                        .iter()
                        .map(|(field_name, field)| {
                            let optional = if field.optional { "?" } else { "" };
                            format!("{}: {}{}", field_name, field.ty, optional)
                        })
                        .collect();
                    let mut sig = format!(
                        "    {}({}) -> {}",
                        method_name,
                        params.join(", "),
                        method.outputs.name
                    );
                    if method.deprecated {
                        sig.push_str(" [DEPRECATED]");
                    }
                    lines.push(sig);
                }
            }
        }
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn method(name: &str) -> MethodSpec {
        MethodSpec {
            name: name.to_string(),
            doc_summary: String::new(),
            doc_notes: Vec::new(),
            inputs: ShapeSpec::new(format!("{}Input", name)),
            outputs: ShapeSpec::new(format!("{}Output", name)),
            constraints: Vec::new(),
            steps: Vec::new(),
            errors: Vec::new(),
            deprecated: false,
            aliases: Vec::new(),
        }
    }

    #[test]
    fn new_document_is_empty_at_initial_version() {
        let spec = SdkSpec::new();
        assert_eq!(spec.version, "1.0.0");
        assert!(spec.classes.is_empty());
    }

    #[test]
    fn class_lookup_resolves_aliases() {
        let mut spec = SdkSpec::new();
        let mut class = ClassSpec::new("AccountService", "Accounts");
        class.aliases.push("UserService".to_string());
        spec.classes.insert("AccountService".to_string(), class);

        assert!(spec.class("AccountService").is_some());
        let via_alias = spec.class("UserService").expect("alias should resolve");
        assert_eq!(via_alias.name, "AccountService");
        assert_eq!(
            spec.resolve_class_key("UserService").as_deref(),
            Some("AccountService")
        );
    }

    #[test]
    fn method_lookup_resolves_aliases() {
        let mut class = ClassSpec::new("Svc", "");
        let mut m = method("create");
        m.aliases.push("make".to_string());
        class.methods.insert("create".to_string(), m);

        assert!(class.method("create").is_some());
        assert_eq!(class.method("make").map(|m| m.name.as_str()), Some("create"));
        assert!(class.method("missing").is_none());
    }

    #[test]
    fn doc_notes_bounded_to_limit_oldest_dropped() {
        let mut class = ClassSpec::new("Svc", "");
        for i in 0..15 {
            class.push_doc_note(format!("note {}", i));
        }
        assert_eq!(class.doc_notes.len(), DOC_NOTE_LIMIT);
        assert_eq!(class.doc_notes.first().map(String::as_str), Some("note 5"));
        assert_eq!(class.doc_notes.last().map(String::as_str), Some("note 14"));
    }

    #[test]
    fn field_type_wire_strings_roundtrip() {
        for (name, ty) in [
            ("str", FieldType::Str),
            ("int", FieldType::Int),
            ("float", FieldType::Float),
            ("bool", FieldType::Bool),
            ("User", FieldType::Ref("User".to_string())),
        ] {
            assert_eq!(FieldType::from_name(name), ty);
            let json = serde_json::to_string(&ty).unwrap();
            assert_eq!(json, format!("\"{}\"", name));
            let back: FieldType = serde_json::from_str(&json).unwrap();
            assert_eq!(back, ty);
        }
    }

    #[test]
    fn null_collections_normalize_to_empty() {
        let json = r#"{
            "version": "1.0.0",
            "classes": {
                "Svc": {
                    "name": "Svc",
                    "doc_notes": null,
                    "methods": null,
                    "aliases": null
                }
            },
            "metadata": null
        }"#;
        let spec: SdkSpec = serde_json::from_str(json).unwrap();
        let class = spec.class("Svc").unwrap();
        assert!(class.methods.is_empty());
        assert!(class.doc_notes.is_empty());
        assert!(class.aliases.is_empty());
    }

    #[test]
    fn summary_of_empty_document() {
        assert_eq!(
            SdkSpec::new().render_summary(),
            "Empty SDK (no classes defined yet)."
        );
    }

    #[test]
    fn summary_lists_signatures_and_deprecation() {
        let mut spec = SdkSpec::new();
        let mut class = ClassSpec::new("UserService", "Manages users");
        let mut m = method("create_user");
        m.inputs.fields.insert(
            "email".to_string(),
            FieldSpec {
                name: "email".to_string(),
                ty: FieldType::Str,
                optional: false,
                default: None,
                description: String::new(),
            },
        );
        m.inputs.fields.insert(
            "nickname".to_string(),
            FieldSpec {
                name: "nickname".to_string(),
                ty: FieldType::Str,
                optional: true,
                default: None,
                description: String::new(),
            },
        );
        m.outputs = ShapeSpec::new("User");
        m.deprecated = true;
        class.methods.insert("create_user".to_string(), m);
        spec.classes.insert("UserService".to_string(), class);

        let summary = spec.render_summary();
        assert!(summary.contains("UserService:"));
        assert!(summary.contains("Doc: Manages users"));
        assert!(summary
            .contains("create_user(email: str, nickname: str?) -> User [DEPRECATED]"));
    }
}
