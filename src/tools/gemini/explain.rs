use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;

use super::{base_metadata, consult, or_default};
use crate::core::interpret::Interpreter;
use crate::core::prompt::defaults::CODE_EXPLANATION;
use crate::tools::result::GeminiToolResponse;
use crate::tools::{ToolContext, TypedTool};

pub const DEFAULT_DETAIL_LEVEL: &str = "intermediate";

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CodeExplanationRequest {
    /// Code to explain
    pub code: String,
    /// Programming language
    #[serde(default)]
    pub language: Option<String>,
    /// Detail level: basic, intermediate, or advanced
    #[serde(default)]
    pub detail_level: Option<String>,
    /// Specific questions about the code
    #[serde(default)]
    pub questions: Option<String>,
}

impl CodeExplanationRequest {
    #[must_use]
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            language: None,
            detail_level: None,
            questions: None,
        }
    }

    #[must_use]
    pub fn detail_level(&self) -> &str {
        self.detail_level.as_deref().unwrap_or(DEFAULT_DETAIL_LEVEL)
    }
}

pub struct ExplainCodeTool;

#[async_trait]
impl TypedTool for ExplainCodeTool {
    type Input = CodeExplanationRequest;
    type Output = GeminiToolResponse;

    fn name(&self) -> &'static str {
        "gemini_explain_code"
    }

    fn description(&self) -> &'static str {
        "Explain code functionality and implementation using Gemini, at a basic, intermediate, or advanced level of detail."
    }

    async fn execute_typed(&self, ctx: &ToolContext, input: Self::Input) -> Self::Output {
        let detail_level = input.detail_level();
        tracing::info!("Starting code explanation ({} level)", detail_level);

        let language = or_default(input.language.as_deref(), "auto-detect");
        let mut metadata = base_metadata(ctx, CODE_EXPLANATION);
        metadata.insert("detail_level".to_string(), Value::from(detail_level));
        metadata.insert("language".to_string(), Value::from(language));

        let fields = [
            ("language", language),
            ("code", input.code.as_str()),
            ("detail_level", detail_level),
            ("questions", input.questions.as_deref().unwrap_or_default()),
        ];

        match consult(ctx, CODE_EXPLANATION, "Code explanation", &fields).await {
            Ok(response) => {
                let result = Interpreter::text().extract(&response.content).into_text();
                GeminiToolResponse::success(result, response.input_prompt, response.content, metadata)
            }
            Err(e) => {
                tracing::warn!("Code explanation failed: {}", e);
                GeminiToolResponse::failure("code explanation", &e, metadata)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServerConfig;
    use crate::core::prompt::TemplateStore;
    use crate::providers::MockAssistant;
    use serde_json::json;
    use std::sync::Arc;

    fn ctx(mock: &MockAssistant) -> ToolContext {
        ToolContext::new(
            ServerConfig::default(),
            TemplateStore::with_defaults(),
            Arc::new(mock.clone()),
        )
    }

    #[tokio::test]
    async fn test_explanation_passes_text_through() {
        let reply = "```json\n{\"summary\": \"not parsed\"}\n```";
        let mock = MockAssistant::new().with_text(reply);

        let request = CodeExplanationRequest {
            language: Some("rust".to_string()),
            questions: Some("Why the Arc?".to_string()),
            ..CodeExplanationRequest::new("let a = Arc::new(1);")
        };
        let response = ExplainCodeTool.execute_typed(&ctx(&mock), request).await;

        assert_eq!(response.result, reply);
        assert_eq!(response.metadata["detail_level"], json!("intermediate"));
        assert_eq!(response.metadata["language"], json!("rust"));

        let prompt = &mock.prompts()[0];
        assert!(prompt.contains("Please explain this rust code"));
        assert!(prompt.contains("Detail level: intermediate"));
        assert!(prompt.contains("Specific questions: Why the Arc?"));
    }

    #[tokio::test]
    async fn test_explanation_failing_assistant() {
        let mock = MockAssistant::new().with_failure("Gemini CLI exited with status 1");

        let response = ExplainCodeTool
            .execute_typed(&ctx(&mock), CodeExplanationRequest::new("x"))
            .await;

        assert!(response.result.starts_with("Error during code explanation:"));
        assert!(response.gemini_response.contains("exited with status 1"));
        assert_eq!(response.metadata["status"], json!("Failed"));
        assert_eq!(response.metadata["language"], json!("auto-detect"));
    }
}
