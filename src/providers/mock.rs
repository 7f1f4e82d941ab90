#![allow(clippy::expect_used)]

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use super::error::AssistantError;
use crate::core::assistant::{Assistant, AssistantResponse, compose_prompt};

#[derive(Debug, Clone)]
pub enum MockReply {
    Text(String),
    Failure(String),
}

impl MockReply {
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    #[must_use]
    pub fn failure(error: impl Into<String>) -> Self {
        Self::Failure(error.into())
    }
}

/// Scripted stand-in for the Gemini CLI: replays queued replies in order and
/// records every composed prompt.
#[derive(Clone)]
pub struct MockAssistant {
    model: String,
    available: bool,
    authenticated: bool,
    replies: Arc<Mutex<Vec<MockReply>>>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl MockAssistant {
    #[must_use]
    pub fn new() -> Self {
        Self {
            model: "mock-model".to_string(),
            available: true,
            authenticated: true,
            replies: Arc::new(Mutex::new(Vec::new())),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    #[must_use]
    pub fn with_reply(self, reply: MockReply) -> Self {
        self.replies
            .lock()
            .expect("MockAssistant mutex poisoned")
            .push(reply);
        self
    }

    #[must_use]
    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.with_reply(MockReply::text(text))
    }

    #[must_use]
    pub fn with_failure(self, error: impl Into<String>) -> Self {
        self.with_reply(MockReply::failure(error))
    }

    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Behaves as if the CLI binary were missing.
    #[must_use]
    pub const fn unavailable(mut self) -> Self {
        self.available = false;
        self.authenticated = false;
        self
    }

    #[must_use]
    pub const fn unauthenticated(mut self) -> Self {
        self.authenticated = false;
        self
    }

    #[must_use]
    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .expect("MockAssistant mutex poisoned")
            .clone()
    }

    #[must_use]
    pub fn call_count(&self) -> usize {
        self.prompts
            .lock()
            .expect("MockAssistant mutex poisoned")
            .len()
    }

    fn next_reply(&self) -> MockReply {
        let mut replies = self.replies.lock().expect("MockAssistant mutex poisoned");
        if replies.is_empty() {
            MockReply::failure("MockAssistant: no responses queued")
        } else {
            replies.remove(0)
        }
    }
}

impl Default for MockAssistant {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Assistant for MockAssistant {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn call(&self, system_prompt: &str, user_prompt: &str) -> AssistantResponse {
        let prompt = compose_prompt(system_prompt, user_prompt);
        self.prompts
            .lock()
            .expect("MockAssistant mutex poisoned")
            .push(prompt.clone());

        match self.next_reply() {
            MockReply::Text(text) => AssistantResponse::success(text, prompt),
            MockReply::Failure(error) => AssistantResponse::failure(error, prompt),
        }
    }

    async fn check_available(&self) -> Result<(), AssistantError> {
        if self.available {
            Ok(())
        } else {
            Err(AssistantError::NotFound {
                binary: "gemini".to_string(),
            })
        }
    }

    async fn verify_authentication(&self) -> bool {
        self.authenticated
    }
}
