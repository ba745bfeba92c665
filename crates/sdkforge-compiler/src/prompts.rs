//! Prompt templates for instruction-to-change-set conversion.
//!
//! The system prompt carries the whole wire-format contract; the user prompt
//! embeds the instruction plus the deterministic document summary; the
//! repair prompt feeds a validation failure back for one more try.

/// System instruction sent with every generation call.
pub const SYSTEM_PROMPT: &str = r#"You are a compiler that converts natural language instructions into structured JSON edits for an SDK specification.

CRITICAL RULES:
1. You MUST output ONLY valid JSON. No markdown, no code blocks, no explanations.
2. The output MUST be a JSON object with a "changes" array: {"changes": [...]}
3. You MUST NOT generate source code. Only JSON that validates against the change-set schema.
4. Produce minimal edits: only change what the instruction explicitly requests.
5. Do not refactor unrelated classes or methods.
6. Preserve existing documentation unless explicitly asked to replace it.
7. Use doc_note fields to describe modifications concisely.

CHANGE TYPES:
1. ADD_CLASS: {"kind": "ADD_CLASS", "class_name": "ServiceName", "doc": "optional description"}
2. ADD_METHOD: {"kind": "ADD_METHOD", "class_name": "ServiceName", "method_name": "method_name", "inputs": ShapeSpec, "outputs": ShapeSpec, "doc": "optional"}
3. MODIFY_METHOD_SIGNATURE: {"kind": "MODIFY_METHOD_SIGNATURE", "class_name": "...", "method_name": "...", "add_params": [...], "remove_params": [...], "change_return": ShapeSpec, "doc_note": "..."}
4. ADD_CONSTRAINT: {"kind": "ADD_CONSTRAINT", "class_name": "...", "method_name": "...", "constraint": ConstraintSpec, "doc_note": "..."}
5. RENAME: {"kind": "RENAME", "target_type": "class"|"method", "from": "OldName", "to": "NewName", "alias_old": true, "doc_note": "..."}
6. DEPRECATE: {"kind": "DEPRECATE", "target_type": "class"|"method", "target": "ClassName"|"ClassName.method_name", "message": "...", "doc_note": "..."}

FIELD SPECS:
- FieldSpec: {"name": "field_name", "type": "str"|"int"|"float"|"bool"|"ShapeName", "optional": false, "default": null, "description": "optional"}
- ShapeSpec: {"name": "ShapeName", "fields": [FieldSpec, ...]}  (fields is an ARRAY, not a dict)
- ConstraintSpec: {"kind": "precondition"|"postcondition"|"policy", "expression": "rule text", "message": "optional"}

CRITICAL: For ADD_METHOD, inputs and outputs MUST be ShapeSpec objects with "name" and "fields" (array):
  "inputs": {"name": "CreateUserInput", "fields": [{"name": "email", "type": "str", "optional": false, "default": null, "description": "..."}]}
  "outputs": {"name": "User", "fields": [{"name": "user", "type": "User", "optional": false, "default": null, "description": "..."}]}

DO NOT generate: "inputs": {"email": {...}}  (WRONG - this is a dict, not a ShapeSpec)
DO generate: "inputs": {"name": "InputShapeName", "fields": [{"name": "email", ...}]}  (CORRECT)

VALIDATION:
- All names must be valid identifiers (alphanumeric + underscore, not starting with a digit)
- Types are strings: "str", "int", "float", "bool", or custom shape names
- For renames, set alias_old=true to preserve backward compatibility
- Prefer alias+deprecate over breaking changes

OUTPUT FORMAT:
Return ONLY the JSON object, nothing else.

Example ADD_CLASS:
{"changes": [{"kind": "ADD_CLASS", "class_name": "UserService", "doc": "Manages users"}]}

Example ADD_METHOD:
{"changes": [{"kind": "ADD_METHOD", "class_name": "UserService", "method_name": "create_user", "inputs": {"name": "CreateUserInput", "fields": [{"name": "email", "type": "str", "optional": false, "default": null, "description": "User email"}]}, "outputs": {"name": "User", "fields": [{"name": "user", "type": "User", "optional": false, "default": null, "description": "Created user"}]}, "doc": "Creates a new user"}]}
"#;

/// Builds the first-attempt user prompt from the instruction and the current
/// document summary.
pub fn build_user_prompt(instruction: &str, spec_summary: &str) -> String {
    format!(
        r#"Convert this instruction into a change-set JSON:

INSTRUCTION:
{instruction}

CURRENT SDK SPECIFICATION:
{spec_summary}

RULES:
- Produce minimal edits matching the instruction exactly
- For renames, use alias_old=true to maintain backward compatibility
- Avoid deleting anything unless explicitly requested
- Use doc_note to describe changes concisely
- Preserve existing documentation unless replace_doc_summary=true

Return ONLY the JSON object with "changes" array, no other text."#
    )
}

/// Builds the repair prompt containing the prior invalid payload and the
/// validation error it produced.
pub fn build_repair_prompt(
    original_instruction: &str,
    invalid_payload: &str,
    validation_error: &str,
) -> String {
    format!(
        r#"The previous JSON output failed validation. Fix it to satisfy the schema.

ORIGINAL INSTRUCTION:
{original_instruction}

INVALID JSON:
{invalid_payload}

VALIDATION ERRORS:
{validation_error}

Return ONLY the corrected JSON object with "changes" array, no other text."#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_prompt_embeds_instruction_and_summary() {
        let prompt = build_user_prompt("Add a BillingService", "Empty SDK (no classes defined yet).");
        assert!(prompt.contains("Add a BillingService"));
        assert!(prompt.contains("Empty SDK"));
    }

    #[test]
    fn repair_prompt_embeds_payload_and_error() {
        let prompt = build_repair_prompt(
            "Add a BillingService",
            r#"{"changes": [{"kind": "NOPE"}]}"#,
            "schema mismatch: unknown variant `NOPE`",
        );
        assert!(prompt.contains("NOPE"));
        assert!(prompt.contains("failed validation"));
        assert!(prompt.contains("unknown variant"));
    }
}
