//! The patch applier: executes one [`ChangeSet`] against a document.
//!
//! Application is all-or-nothing across a set: changes run in order against
//! a working copy, and the live document is replaced only after every change
//! succeeds. A failing change therefore leaves the document exactly as it
//! was. Within a set, application is strictly sequential -- a later change
//! sees the effects of an earlier one.
//!
//! Every successful application bumps the version's patch component once and
//! produces a [`PatchRecord`] for the append-only log.

use crate::changes::{Change, ChangeSet, FieldDecl, ShapeDecl, StepDecl, TargetType};
use crate::error::ApplyError;
use crate::ident::is_valid_identifier;
use crate::record::{now_string, PatchRecord};
use crate::spec::{ClassSpec, FieldSpec, MethodSpec, SdkSpec, ShapeSpec, StepSpec};

/// Applies a change set to the document in place.
///
/// On success the document reflects every change in order, its version's
/// patch component is incremented, and the returned [`PatchRecord`] carries
/// the change set verbatim plus before/after versions. On error the document
/// is untouched.
pub fn apply_changeset(
    spec: &mut SdkSpec,
    changeset: &ChangeSet,
    instruction_text: Option<&str>,
) -> Result<PatchRecord, ApplyError> {
    let version_before = spec.version.clone();

    let mut next = spec.clone();
    let mut summary_parts = Vec::with_capacity(changeset.changes.len());
    for change in &changeset.changes {
        apply_change(&mut next, change, &mut summary_parts)?;
    }

    let version_after = bump_patch_version(&version_before);
    next.version = version_after.clone();
    *spec = next;

    let summary = if summary_parts.is_empty() {
        "No changes".to_string()
    } else {
        summary_parts.join("; ")
    };

    Ok(PatchRecord {
        timestamp: now_string(),
        instruction_text: instruction_text.map(str::to_string),
        changeset: changeset.clone(),
        summary,
        version_before,
        version_after,
    })
}

/// Increments the patch component of a `MAJOR.MINOR.PATCH` version string.
///
/// Version strings in any other form are carried through unchanged.
pub fn bump_patch_version(version: &str) -> String {
    let parts: Vec<&str> = version.split('.').collect();
    if parts.len() == 3 {
        if let Ok(patch) = parts[2].parse::<u64>() {
            return format!("{}.{}.{}", parts[0], parts[1], patch + 1);
        }
    }
    version.to_string()
}

fn apply_change(
    spec: &mut SdkSpec,
    change: &Change,
    summary: &mut Vec<String>,
) -> Result<(), ApplyError> {
    match change {
        Change::AddClass { class_name, doc } => {
            if spec.class(class_name).is_some() {
                return Err(ApplyError::ClassExists {
                    name: class_name.clone(),
                });
            }
            let doc_summary = doc.clone().unwrap_or_else(|| {
                format!("{} service generated from instruction specs.", class_name)
            });
            spec.classes
                .insert(class_name.clone(), ClassSpec::new(class_name, doc_summary));
            summary.push(format!("Added class {}", class_name));
        }

        Change::AddMethod {
            class_name,
            method_name,
            inputs,
            outputs,
            doc,
            constraints,
            steps,
        } => {
            let class = spec
                .class_mut(class_name)
                .ok_or_else(|| ApplyError::ClassNotFound {
                    name: class_name.clone(),
                })?;
            if class.method(method_name).is_some() {
                return Err(ApplyError::MethodExists {
                    class: class_name.clone(),
                    method: method_name.clone(),
                });
            }
            let method = MethodSpec {
                name: method_name.clone(),
                doc_summary: doc
                    .clone()
                    .unwrap_or_else(|| format!("{} method", method_name)),
                doc_notes: Vec::new(),
                inputs: shape_from_decl(inputs),
                outputs: shape_from_decl(outputs),
                constraints: constraints.clone(),
                steps: steps.iter().map(step_from_decl).collect(),
                errors: Vec::new(),
                deprecated: false,
                aliases: Vec::new(),
            };
            class.methods.insert(method_name.clone(), method);
            summary.push(format!("Added method {}.{}", class_name, method_name));
        }

        Change::ModifySignature {
            class_name,
            method_name,
            add_params,
            remove_params,
            change_return,
            doc_note,
            replace_doc_summary,
            new_doc_summary,
        } => {
            let class = spec
                .class_mut(class_name)
                .ok_or_else(|| ApplyError::ClassNotFound {
                    name: class_name.clone(),
                })?;
            let method =
                class
                    .method_mut(method_name)
                    .ok_or_else(|| ApplyError::MethodNotFound {
                        class: class_name.clone(),
                        method: method_name.clone(),
                    })?;

            for param in remove_params {
                method.inputs.fields.shift_remove(param);
            }
            // Name collisions overwrite the existing parameter.
            for field in add_params {
                method
                    .inputs
                    .fields
                    .insert(field.name.clone(), field_from_decl(field));
            }
            if let Some(ret) = change_return {
                method.outputs = shape_from_decl(ret);
            }
            if *replace_doc_summary {
                if let Some(new_summary) = new_doc_summary {
                    method.doc_summary = new_summary.clone();
                }
            }
            method.push_doc_note(doc_note.as_deref().unwrap_or("Method signature modified"));
            summary.push(format!("Modified {}.{}", class_name, method_name));
        }

        Change::AddConstraint {
            class_name,
            method_name,
            constraint,
            doc_note,
        } => {
            let class = spec
                .class_mut(class_name)
                .ok_or_else(|| ApplyError::ClassNotFound {
                    name: class_name.clone(),
                })?;
            let method =
                class
                    .method_mut(method_name)
                    .ok_or_else(|| ApplyError::MethodNotFound {
                        class: class_name.clone(),
                        method: method_name.clone(),
                    })?;
            method.constraints.push(constraint.clone());
            method.push_doc_note(doc_note.as_deref().unwrap_or("Added constraint"));
            summary.push(format!(
                "Added constraint to {}.{}",
                class_name, method_name
            ));
        }

        Change::Rename {
            target_type,
            from_name,
            to_name,
            alias_old,
            doc_note,
        } => match target_type {
            TargetType::Class => {
                if !is_valid_identifier(to_name) {
                    return Err(ApplyError::InvalidIdentifier {
                        value: to_name.clone(),
                    });
                }
                let canonical =
                    spec.resolve_class_key(from_name)
                        .ok_or_else(|| ApplyError::ClassNotFound {
                            name: from_name.clone(),
                        })?;
                let Some(mut class) = spec.classes.shift_remove(&canonical) else {
                    return Err(ApplyError::ClassNotFound {
                        name: from_name.clone(),
                    });
                };
                class.name = to_name.clone();
                if *alias_old && !class.aliases.iter().any(|a| a == &canonical) {
                    class.aliases.push(canonical.clone());
                }
                class.push_doc_note(
                    doc_note
                        .clone()
                        .unwrap_or_else(|| format!("Renamed from {}", canonical)),
                );
                spec.classes.insert(to_name.clone(), class);
                summary.push(format!("Renamed class {} -> {}", from_name, to_name));
            }
            TargetType::Method => {
                if !is_valid_identifier(to_name) {
                    return Err(ApplyError::InvalidIdentifier {
                        value: to_name.clone(),
                    });
                }
                let (class_part, method_part) = split_method_target(from_name)?;
                let class =
                    spec.class_mut(class_part)
                        .ok_or_else(|| ApplyError::ClassNotFound {
                            name: class_part.to_string(),
                        })?;
                let canonical = class.resolve_method_key(method_part).ok_or_else(|| {
                    ApplyError::MethodNotFound {
                        class: class_part.to_string(),
                        method: method_part.to_string(),
                    }
                })?;
                let Some(mut method) = class.methods.shift_remove(&canonical) else {
                    return Err(ApplyError::MethodNotFound {
                        class: class_part.to_string(),
                        method: method_part.to_string(),
                    });
                };
                method.name = to_name.clone();
                if *alias_old && !method.aliases.iter().any(|a| a == &canonical) {
                    method.aliases.push(canonical.clone());
                }
                method.push_doc_note(
                    doc_note
                        .clone()
                        .unwrap_or_else(|| format!("Renamed from {}", canonical)),
                );
                class.methods.insert(to_name.clone(), method);
                summary.push(format!("Renamed method {} -> {}", from_name, to_name));
            }
        },

        Change::Deprecate {
            target_type,
            target,
            message,
            doc_note,
        } => match target_type {
            TargetType::Class => {
                let class = spec
                    .class_mut(target)
                    .ok_or_else(|| ApplyError::ClassNotFound {
                        name: target.clone(),
                    })?;
                class.deprecated = true;
                class.push_doc_note(deprecation_note(doc_note, message));
                summary.push(format!("Deprecated class {}", target));
            }
            TargetType::Method => {
                let (class_part, method_part) = split_method_target(target)?;
                let class =
                    spec.class_mut(class_part)
                        .ok_or_else(|| ApplyError::ClassNotFound {
                            name: class_part.to_string(),
                        })?;
                let method =
                    class
                        .method_mut(method_part)
                        .ok_or_else(|| ApplyError::MethodNotFound {
                            class: class_part.to_string(),
                            method: method_part.to_string(),
                        })?;
                method.deprecated = true;
                method.push_doc_note(deprecation_note(doc_note, message));
                summary.push(format!("Deprecated method {}", target));
            }
        },
    }
    Ok(())
}

fn deprecation_note(doc_note: &Option<String>, message: &Option<String>) -> String {
    doc_note
        .clone()
        .unwrap_or_else(|| format!("Deprecated: {}", message.as_deref().unwrap_or_default()))
}

/// Splits a `Class.method` target, rejecting anything else.
fn split_method_target(target: &str) -> Result<(&str, &str), ApplyError> {
    let mut parts = target.splitn(2, '.');
    match (parts.next(), parts.next()) {
        (Some(class), Some(method))
            if !class.is_empty() && !method.is_empty() && !method.contains('.') =>
        {
            Ok((class, method))
        }
        _ => Err(ApplyError::InvalidTarget {
            target: target.to_string(),
        }),
    }
}

fn shape_from_decl(decl: &ShapeDecl) -> ShapeSpec {
    let mut shape = ShapeSpec::new(decl.name.clone());
    for field in &decl.fields {
        shape
            .fields
            .insert(field.name.clone(), field_from_decl(field));
    }
    shape
}

fn field_from_decl(decl: &FieldDecl) -> FieldSpec {
    FieldSpec {
        name: decl.name.clone(),
        ty: decl.ty.clone(),
        optional: decl.optional,
        default: decl.default.clone(),
        description: decl.description.clone().unwrap_or_default(),
    }
}

fn step_from_decl(decl: &StepDecl) -> StepSpec {
    StepSpec {
        op: decl.op.clone(),
        params: decl.params.clone(),
        description: decl.description.clone().unwrap_or_default(),
    }
}
