use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Deserialize;

use super::{consult, or_default};
use crate::core::interpret::{Interpretation, Interpreter};
use crate::core::prompt::defaults::CODE_REVIEW;
use crate::tools::result::CodeReviewResponse;
use crate::tools::{ToolContext, TypedTool};

pub const DEFAULT_FOCUS: &str = "general";

fn default_focus() -> Option<String> {
    Some(DEFAULT_FOCUS.to_string())
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CodeReviewRequest {
    /// Code to review
    pub code: String,
    /// Programming language
    #[serde(default)]
    pub language: Option<String>,
    /// Focus area: general, security, performance, style, or bugs
    #[serde(default = "default_focus")]
    pub focus: Option<String>,
}

impl CodeReviewRequest {
    #[must_use]
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            language: None,
            focus: default_focus(),
        }
    }
}

/// Sentence appended to the review prompt for a focus area.
///
/// Matching ignores case and surrounding whitespace. Anything unrecognised,
/// including no focus at all, gets the general instruction.
#[must_use]
pub fn focus_instruction(focus: Option<&str>) -> &'static str {
    let focus = focus.map(|f| f.trim().to_ascii_lowercase());
    match focus.as_deref() {
        Some("security") => "Focus specifically on security vulnerabilities and potential exploits.",
        Some("performance") => "Focus on performance optimizations and bottlenecks.",
        Some("style") => "Focus on code style, formatting, and best practices.",
        Some("bugs") => "Focus on potential bugs and logical errors.",
        _ => "Provide a comprehensive review covering all aspects.",
    }
}

pub struct ReviewCodeTool;

#[async_trait]
impl TypedTool for ReviewCodeTool {
    type Input = CodeReviewRequest;
    type Output = CodeReviewResponse;

    fn name(&self) -> &'static str {
        "gemini_review_code"
    }

    fn description(&self) -> &'static str {
        "Analyze code quality, style, and potential issues using Gemini. Provides bug detection, security analysis, performance suggestions, and best practice recommendations."
    }

    async fn execute_typed(&self, ctx: &ToolContext, input: Self::Input) -> Self::Output {
        tracing::info!("Starting code review for {} characters of code", input.code.len());

        let language = or_default(input.language.as_deref(), "auto-detect");
        let fields = [
            ("language", language),
            ("code", input.code.as_str()),
            ("focus_instruction", focus_instruction(input.focus.as_deref())),
        ];

        match consult(ctx, CODE_REVIEW, "Code review", &fields).await {
            Ok(response) => match Interpreter::review().extract(&response.content) {
                Interpretation::Review(review) => {
                    CodeReviewResponse::from_fields(review, response.input_prompt, response.content)
                }
                Interpretation::Text(text) => {
                    tracing::warn!("Review interpreter produced plain text");
                    CodeReviewResponse {
                        summary: text,
                        issues: Vec::new(),
                        suggestions: Vec::new(),
                        rating: "Review completed".to_string(),
                        input_prompt: response.input_prompt,
                        gemini_response: response.content,
                    }
                }
            },
            Err(e) => {
                tracing::warn!("Code review failed: {}", e);
                CodeReviewResponse::failure(&e)
            }
        }
    }
}
