use async_trait::async_trait;
use serde::Serialize;

use crate::providers::error::AssistantError;

/// Outcome of a single round trip to the external assistant.
///
/// Failures are carried in-band: `success` is false, `error` holds the reason
/// and `content` is empty. `input_prompt` is always the prompt that was (or
/// would have been) sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssistantResponse {
    pub success: bool,
    pub content: String,
    pub error: Option<String>,
    pub input_prompt: String,
}

impl AssistantResponse {
    #[must_use]
    pub fn success(content: impl Into<String>, input_prompt: impl Into<String>) -> Self {
        Self {
            success: true,
            content: content.into(),
            error: None,
            input_prompt: input_prompt.into(),
        }
    }

    #[must_use]
    pub fn failure(error: impl Into<String>, input_prompt: impl Into<String>) -> Self {
        Self {
            success: false,
            content: String::new(),
            error: Some(error.into()),
            input_prompt: input_prompt.into(),
        }
    }

    #[must_use]
    pub fn error_message(&self) -> &str {
        self.error.as_deref().unwrap_or("unknown error")
    }
}

/// Joins the system and user prompts into the single text handed to a
/// command-line assistant.
#[must_use]
pub fn compose_prompt(system_prompt: &str, user_prompt: &str) -> String {
    if system_prompt.trim().is_empty() {
        format!("User: {user_prompt}")
    } else {
        format!("System: {system_prompt}\n\nUser: {user_prompt}")
    }
}

#[async_trait]
pub trait Assistant: Send + Sync {
    fn name(&self) -> &str;

    fn model(&self) -> &str;

    /// Sends one prompt pair. Never fails: launch errors, non-zero exits and
    /// timeouts come back as `success == false`.
    async fn call(&self, system_prompt: &str, user_prompt: &str) -> AssistantResponse;

    async fn check_available(&self) -> Result<(), AssistantError>;

    async fn verify_authentication(&self) -> bool;
}
