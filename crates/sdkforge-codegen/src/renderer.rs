//! Renders a document into Rust source modules.
//!
//! Output layout mirrors the document: `models.rs` holds one struct per
//! distinct shape (plus the shared `ServiceError`), each class becomes a
//! module with a service trait, and `mod.rs` ties them together. Everything
//! here is string templating; no output is parsed back.

use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use sdkforge_core::{ClassSpec, ConstraintKind, FieldType, MethodSpec, SdkSpec, ShapeSpec};

use crate::error::CodegenError;
use crate::sanitize::{
    clean_doc, escape_keyword, sanitize_identifier, to_pascal_case, to_snake_case,
};

/// Emits the generated SDK into `out_dir`, returning the written paths.
pub fn render_sdk(spec: &SdkSpec, out_dir: &Path) -> Result<Vec<PathBuf>, CodegenError> {
    fs::create_dir_all(out_dir)?;
    let mut written = Vec::new();

    let models_path = out_dir.join("models.rs");
    fs::write(&models_path, render_models(spec))?;
    written.push(models_path);

    for class in spec.classes.values() {
        let module = class_module_name(class);
        let path = out_dir.join(format!("{}.rs", module));
        fs::write(&path, render_service(class))?;
        written.push(path);
    }

    let index_path = out_dir.join("mod.rs");
    fs::write(&index_path, render_index(spec))?;
    written.push(index_path);

    Ok(written)
}

fn class_module_name(class: &ClassSpec) -> String {
    to_snake_case(&sanitize_identifier(&class.name))
}

fn struct_name(name: &str) -> String {
    escape_keyword(&to_pascal_case(&sanitize_identifier(name)))
}

fn rust_type(ty: &FieldType) -> String {
    match ty {
        FieldType::Str => "String".to_string(),
        FieldType::Int => "i64".to_string(),
        FieldType::Float => "f64".to_string(),
        FieldType::Bool => "bool".to_string(),
        FieldType::Ref(name) => struct_name(name),
    }
}

fn render_models(spec: &SdkSpec) -> String {
    // Collect every distinct shape across all method signatures; first
    // occurrence of a name wins.
    let mut shapes: IndexMap<String, &ShapeSpec> = IndexMap::new();
    for class in spec.classes.values() {
        for method in class.methods.values() {
            for shape in [&method.inputs, &method.outputs] {
                shapes.entry(struct_name(&shape.name)).or_insert(shape);
            }
        }
    }

    let mut out = String::new();
    out.push_str(&format!(
        "//! Data shapes for the generated SDK (document version {}).\n\n",
        spec.version
    ));

    out.push_str("/// Error surfaced by generated service methods.\n");
    out.push_str("#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]\n");
    out.push_str("pub struct ServiceError {\n");
    out.push_str("    pub name: String,\n");
    out.push_str("    pub message: String,\n");
    out.push_str("}\n");

    let mut referenced: Vec<String> = Vec::new();
    for (name, shape) in &shapes {
        out.push('\n');
        out.push_str("#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]\n");
        out.push_str(&format!("pub struct {} {{\n", name));
        for field in shape.fields.values() {
            if !field.description.is_empty() {
                out.push_str(&format!("    /// {}\n", clean_doc(&field.description)));
            }
            let mut ty = rust_type(&field.ty);
            if let FieldType::Ref(ref_name) = &field.ty {
                let target = struct_name(ref_name);
                // Direct self-reference needs indirection.
                if &target == name {
                    ty = format!("Box<{}>", ty);
                }
                if !referenced.contains(&target) {
                    referenced.push(target);
                }
            }
            if field.optional {
                ty = format!("Option<{}>", ty);
            }
            out.push_str(&format!(
                "    pub {}: {},\n",
                escape_keyword(&to_snake_case(&sanitize_identifier(&field.name))),
                ty
            ));
        }
        out.push_str("}\n");
    }

    // Referenced-but-undefined shapes get empty placeholders so the module
    // stays self-contained.
    for target in referenced {
        if !shapes.contains_key(&target) {
            out.push('\n');
            out.push_str("#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]\n");
            out.push_str(&format!("pub struct {} {{}}\n", target));
        }
    }

    out
}

fn render_service(class: &ClassSpec) -> String {
    let trait_name = struct_name(&class.name);
    let mut out = String::new();
    out.push_str(&format!("//! {} service.\n\n", trait_name));
    out.push_str("use super::models::*;\n\n");

    if !class.doc_summary.is_empty() {
        out.push_str(&format!("/// {}\n", clean_doc(&class.doc_summary)));
    }
    for alias in &class.aliases {
        out.push_str(&format!("/// Formerly known as `{}`.\n", alias));
    }
    if class.deprecated {
        out.push_str("#[deprecated]\n");
    }
    out.push_str(&format!("pub trait {} {{\n", trait_name));

    let mut first = true;
    for method in class.methods.values() {
        if !first {
            out.push('\n');
        }
        first = false;
        out.push_str(&render_method(method));
    }

    out.push_str("}\n");
    out
}

fn render_method(method: &MethodSpec) -> String {
    let mut out = String::new();
    if !method.doc_summary.is_empty() {
        out.push_str(&format!("    /// {}\n", clean_doc(&method.doc_summary)));
    }
    for constraint in &method.constraints {
        let label = match constraint.kind {
            ConstraintKind::Precondition => "Precondition",
            ConstraintKind::Postcondition => "Postcondition",
            ConstraintKind::Policy => "Policy",
        };
        out.push_str(&format!(
            "    /// {}: {}\n",
            label,
            clean_doc(&constraint.expression)
        ));
    }
    for alias in &method.aliases {
        out.push_str(&format!("    /// Formerly known as `{}`.\n", alias));
    }
    if method.deprecated {
        out.push_str("    #[deprecated]\n");
    }
    out.push_str(&format!(
        "    fn {}(&self, input: {}) -> Result<{}, ServiceError>;\n",
        escape_keyword(&sanitize_identifier(&method.name)),
        struct_name(&method.inputs.name),
        struct_name(&method.outputs.name),
    ));
    out
}

fn render_index(spec: &SdkSpec) -> String {
    let mut out = String::new();
    out.push_str(&format!("//! Generated SDK version {}.\n\n", spec.version));
    out.push_str("pub mod models;\n");
    for class in spec.classes.values() {
        out.push_str(&format!("pub mod {};\n", class_module_name(class)));
    }
    out.push('\n');
    out.push_str("pub use models::*;\n");
    out
}
