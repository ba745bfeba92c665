//! Payload validation against the closed change vocabulary.
//!
//! Validation is two-phase: serde maps the JSON onto the typed
//! [`ChangeSet`] (rejecting unknown discriminators, missing fields, and
//! wrong types), then an explicit walk checks every identifier-bearing
//! field and cross-field rule, producing errors that name the offending
//! field path (`changes[2].class_name`) so a repair prompt can point at it.

use sdkforge_core::changes::{Change, ChangeSet, ShapeDecl, TargetType};
use sdkforge_core::ident::is_valid_identifier;

use crate::error::ValidateError;
use crate::extract::extract_payload;

/// Validates a JSON payload string into a [`ChangeSet`].
pub fn validate_changeset(payload: &str) -> Result<ChangeSet, ValidateError> {
    let value: serde_json::Value =
        serde_json::from_str(payload).map_err(|e| ValidateError::Json {
            message: e.to_string(),
        })?;
    let changeset: ChangeSet =
        serde_json::from_value(value).map_err(|e| ValidateError::Shape {
            message: e.to_string(),
        })?;

    for (index, change) in changeset.changes.iter().enumerate() {
        check_change(index, change)?;
    }
    Ok(changeset)
}

/// Extracts the candidate payload from a free-form response and validates it.
///
/// When no object can be located, the raw response is validated as-is so the
/// resulting error describes what was actually received.
pub fn validate_response(response: &str) -> Result<ChangeSet, ValidateError> {
    let payload = extract_payload(response).unwrap_or(response);
    validate_changeset(payload)
}

fn check_change(index: usize, change: &Change) -> Result<(), ValidateError> {
    let at = |field: &str| format!("changes[{}].{}", index, field);

    match change {
        Change::AddClass { class_name, .. } => {
            ensure_identifier(at("class_name"), class_name)?;
        }

        Change::AddMethod {
            class_name,
            method_name,
            inputs,
            outputs,
            ..
        } => {
            ensure_identifier(at("class_name"), class_name)?;
            ensure_identifier(at("method_name"), method_name)?;
            check_shape(&at("inputs"), inputs)?;
            check_shape(&at("outputs"), outputs)?;
        }

        Change::ModifySignature {
            class_name,
            method_name,
            add_params,
            remove_params,
            change_return,
            replace_doc_summary,
            new_doc_summary,
            ..
        } => {
            ensure_identifier(at("class_name"), class_name)?;
            ensure_identifier(at("method_name"), method_name)?;
            for (j, param) in add_params.iter().enumerate() {
                ensure_identifier(at(&format!("add_params[{}].name", j)), &param.name)?;
            }
            for (j, param) in remove_params.iter().enumerate() {
                ensure_identifier(at(&format!("remove_params[{}]", j)), param)?;
            }
            if let Some(ret) = change_return {
                check_shape(&at("change_return"), ret)?;
            }
            if *replace_doc_summary
                && new_doc_summary.as_deref().map_or(true, str::is_empty)
            {
                return Err(ValidateError::CrossField {
                    path: at("new_doc_summary"),
                    message: "required when replace_doc_summary is true".to_string(),
                });
            }
        }

        Change::AddConstraint {
            class_name,
            method_name,
            ..
        } => {
            ensure_identifier(at("class_name"), class_name)?;
            ensure_identifier(at("method_name"), method_name)?;
        }

        Change::Rename {
            target_type,
            from_name,
            to_name,
            ..
        } => {
            ensure_identifier(at("to"), to_name)?;
            match target_type {
                TargetType::Class => ensure_identifier(at("from"), from_name)?,
                TargetType::Method => check_method_target(at("from"), from_name)?,
            }
        }

        Change::Deprecate {
            target_type,
            target,
            ..
        } => match target_type {
            TargetType::Class => ensure_identifier(at("target"), target)?,
            TargetType::Method => check_method_target(at("target"), target)?,
        },
    }
    Ok(())
}

fn ensure_identifier(path: String, value: &str) -> Result<(), ValidateError> {
    if is_valid_identifier(value) {
        Ok(())
    } else {
        Err(ValidateError::Identifier {
            path,
            value: value.to_string(),
        })
    }
}

fn check_shape(path: &str, shape: &ShapeDecl) -> Result<(), ValidateError> {
    ensure_identifier(format!("{}.name", path), &shape.name)?;
    for (j, field) in shape.fields.iter().enumerate() {
        ensure_identifier(format!("{}.fields[{}].name", path, j), &field.name)?;
    }
    Ok(())
}

fn check_method_target(path: String, target: &str) -> Result<(), ValidateError> {
    let parts: Vec<&str> = target.split('.').collect();
    if parts.len() == 2 && is_valid_identifier(parts[0]) && is_valid_identifier(parts[1]) {
        Ok(())
    } else {
        Err(ValidateError::CrossField {
            path,
            message: format!("'{}' must have the form 'Class.method'", target),
        })
    }
}
