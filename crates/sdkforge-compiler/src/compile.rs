//! The bounded repair loop: instruction text to validated change set.
//!
//! One generation attempt, then up to `max_repair_attempts` re-prompts, each
//! carrying the prior invalid payload and its validation error. This is the
//! system's only tolerance mechanism for an unreliable upstream producer; it
//! corrects schema, never semantics.

use sdkforge_check::{extract_payload, validate_changeset};
use sdkforge_core::{ChangeSet, SdkSpec};

use crate::error::CompileError;
use crate::llm::LlmClient;
use crate::prompts::{build_repair_prompt, build_user_prompt, SYSTEM_PROMPT};

/// Default bound on repair re-prompts after the initial attempt.
pub const DEFAULT_MAX_REPAIR_ATTEMPTS: u32 = 2;

/// Outcome of a successful compilation.
#[derive(Debug, Clone)]
pub struct InstructionReceipt {
    pub instruction_text: String,
    pub changeset: ChangeSet,
    /// How many repair re-prompts were needed (0 = first attempt validated).
    pub repair_attempts: u32,
}

/// Compiles a natural-language instruction into a validated [`ChangeSet`].
///
/// Builds the document summary, prompts the collaborator once, and validates
/// the response. On validation failure, re-prompts with the invalid payload
/// and error, up to `max_repair_attempts` times. Exhausting the bound raises
/// [`CompileError::RepairExhausted`] carrying the last payload and error.
pub fn compile_instruction(
    instruction: &str,
    spec: &SdkSpec,
    client: &dyn LlmClient,
    max_repair_attempts: u32,
) -> Result<InstructionReceipt, CompileError> {
    let spec_summary = spec.render_summary();

    let user_prompt = build_user_prompt(instruction, &spec_summary);
    let response = client.generate(SYSTEM_PROMPT, &user_prompt)?;

    let mut payload = extract_payload(&response).unwrap_or(&response).to_string();
    let mut repair_attempts = 0u32;

    loop {
        match validate_changeset(&payload) {
            Ok(changeset) => {
                return Ok(InstructionReceipt {
                    instruction_text: instruction.to_string(),
                    changeset,
                    repair_attempts,
                });
            }
            Err(error) => {
                if repair_attempts >= max_repair_attempts {
                    tracing::warn!(
                        attempts = repair_attempts,
                        error = %error,
                        "repair budget exhausted"
                    );
                    return Err(CompileError::RepairExhausted {
                        attempts: repair_attempts,
                        last_error: error,
                        last_payload: payload,
                    });
                }
                repair_attempts += 1;
                tracing::debug!(
                    attempt = repair_attempts,
                    error = %error,
                    "re-prompting after invalid payload"
                );

                let repair_prompt = build_repair_prompt(instruction, &payload, &error.to_string());
                let repair_response = client.generate(SYSTEM_PROMPT, &repair_prompt)?;
                payload = extract_payload(&repair_response)
                    .unwrap_or(&repair_response)
                    .to_string();
            }
        }
    }
}
