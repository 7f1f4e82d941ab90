use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;

use super::{base_metadata, consult, or_default};
use crate::core::interpret::Interpreter;
use crate::core::prompt::defaults::BUG_ANALYSIS;
use crate::tools::result::GeminiToolResponse;
use crate::tools::{ToolContext, TypedTool};

#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct BugAnalysisRequest {
    /// Description of the bug
    pub bug_description: String,
    /// Relevant code snippets
    #[serde(default)]
    pub code_context: Option<String>,
    /// Error messages and logs
    #[serde(default)]
    pub error_logs: Option<String>,
    /// Environment details
    #[serde(default)]
    pub environment: Option<String>,
    /// Steps to reproduce
    #[serde(default)]
    pub reproduction_steps: Option<String>,
    /// Programming language
    #[serde(default)]
    pub language: Option<String>,
}

pub struct AnalyzeBugTool;

#[async_trait]
impl TypedTool for AnalyzeBugTool {
    type Input = BugAnalysisRequest;
    type Output = GeminiToolResponse;

    fn name(&self) -> &'static str {
        "gemini_analyze_bug"
    }

    fn description(&self) -> &'static str {
        "Analyze bugs and suggest fixes using Gemini. Provides root cause analysis, fix suggestions, and preventive measures."
    }

    async fn execute_typed(&self, ctx: &ToolContext, input: Self::Input) -> Self::Output {
        tracing::info!("Starting bug analysis");

        let language = or_default(input.language.as_deref(), "unknown");
        let mut metadata = base_metadata(ctx, BUG_ANALYSIS);
        metadata.insert("language".to_string(), Value::from(language));

        let fields = [
            ("bug_description", input.bug_description.as_str()),
            ("error_logs", input.error_logs.as_deref().unwrap_or_default()),
            ("code_context", input.code_context.as_deref().unwrap_or_default()),
            ("language", language),
            ("environment", input.environment.as_deref().unwrap_or_default()),
            (
                "reproduction_steps",
                input.reproduction_steps.as_deref().unwrap_or_default(),
            ),
        ];

        match consult(ctx, BUG_ANALYSIS, "Bug analysis", &fields).await {
            Ok(response) => {
                let result = Interpreter::text().extract(&response.content).into_text();
                GeminiToolResponse::success(result, response.input_prompt, response.content, metadata)
            }
            Err(e) => {
                tracing::warn!("Bug analysis failed: {}", e);
                GeminiToolResponse::failure("bug analysis", &e, metadata)
            }
        }
    }
}
