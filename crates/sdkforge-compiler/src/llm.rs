//! The text-generation collaborator boundary.
//!
//! [`LlmClient`] is the whole contract: prompt text in, free-form response
//! text out. The response is expected to contain the edit wire format,
//! possibly surrounded by extraneous text; nothing else is assumed.
//!
//! [`OpenAiChatClient`] talks to any OpenAI-compatible chat-completions
//! endpoint. The call is blocking by design -- the pipeline is synchronous
//! and single-writer, and a caller wanting timeouts wraps the client at
//! this boundary.

use serde::Deserialize;
use serde_json::json;

use crate::error::LlmError;

/// Generates a response to a system + user prompt pair.
pub trait LlmClient {
    fn generate(&self, system_prompt: &str, user_prompt: &str) -> Result<String, LlmError>;
}

/// Configuration for [`OpenAiChatClient`].
#[derive(Debug, Clone, Default)]
pub struct LlmConfig {
    /// Provider kind: `openrouter` (default) or `openai_compatible`.
    pub provider: Option<String>,
    /// Base URL of the chat-completions API. Required for
    /// `openai_compatible`; defaults to the public endpoint for
    /// `openrouter`.
    pub api_base_url: Option<String>,
    pub api_key: Option<String>,
    pub model: Option<String>,
}

impl LlmConfig {
    /// Reads configuration from `SDKFORGE_PROVIDER`, `SDKFORGE_API_BASE_URL`,
    /// `SDKFORGE_API_KEY`, and `SDKFORGE_MODEL`.
    pub fn from_env() -> Self {
        LlmConfig {
            provider: std::env::var("SDKFORGE_PROVIDER").ok(),
            api_base_url: std::env::var("SDKFORGE_API_BASE_URL").ok(),
            api_key: std::env::var("SDKFORGE_API_KEY").ok(),
            model: std::env::var("SDKFORGE_MODEL").ok(),
        }
    }
}

/// Blocking client for OpenAI-compatible chat-completions endpoints.
pub struct OpenAiChatClient {
    config: LlmConfig,
    client: reqwest::blocking::Client,
}

impl OpenAiChatClient {
    pub fn new(config: LlmConfig) -> Self {
        OpenAiChatClient {
            config,
            client: reqwest::blocking::Client::new(),
        }
    }
}

impl LlmClient for OpenAiChatClient {
    fn generate(&self, system_prompt: &str, user_prompt: &str) -> Result<String, LlmError> {
        let provider = self.config.provider.as_deref().unwrap_or("openrouter");
        let base_url = match provider {
            "openrouter" => self
                .config
                .api_base_url
                .clone()
                .unwrap_or_else(|| "https://openrouter.ai/api/v1".to_string()),
            "openai_compatible" => self.config.api_base_url.clone().ok_or_else(|| {
                LlmError::Config(
                    "openai_compatible provider requires an api_base_url".to_string(),
                )
            })?,
            other => {
                return Err(LlmError::Config(format!(
                    "unsupported provider '{}': use openrouter or openai_compatible",
                    other
                )))
            }
        };

        let endpoint = format!("{}/chat/completions", base_url.trim_end_matches('/'));
        let api_key = self.config.api_key.clone().unwrap_or_default();
        let model = self.config.model.clone().unwrap_or_default();

        let body = json!({
            "model": model,
            "messages": [
                { "role": "system", "content": system_prompt },
                { "role": "user", "content": user_prompt }
            ],
            // Low temperature: the output is supposed to be schema-valid
            // JSON, not prose.
            "temperature": 0.1
        });

        let mut req = self
            .client
            .post(&endpoint)
            .header("Authorization", format!("Bearer {}", api_key))
            .header("Content-Type", "application/json")
            .json(&body);

        if provider == "openrouter" {
            req = req
                .header("HTTP-Referer", "https://localhost")
                .header("X-Title", "sdkforge");
        }

        let response = req
            .send()
            .map_err(|err| LlmError::Request(err.to_string()))?;

        let status = response.status();
        let body_text = response
            .text()
            .map_err(|err| LlmError::Request(format!("response read failed: {}", err)))?;

        if !status.is_success() {
            return Err(LlmError::Provider {
                status: status.as_u16(),
                body: body_text,
            });
        }

        let parsed: ChatResponse = serde_json::from_str(&body_text)
            .map_err(|err| LlmError::Request(format!("response parse failed: {}", err)))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or(LlmError::EmptyResponse)
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}
