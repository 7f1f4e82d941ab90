use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use super::error::ToolError;
use crate::core::interpret::ReviewFields;

/// `input_prompt` value used when a call failed before any prompt existed.
pub const PROMPT_SENTINEL: &str = "Error occurred before prompt creation";

pub const RATING_FAILED: &str = "Failed";
pub const STATUS_COMPLETED: &str = "Completed";
pub const STATUS_FAILED: &str = "Failed";

fn failure_prompt(err: &ToolError) -> String {
    err.input_prompt().unwrap_or(PROMPT_SENTINEL).to_string()
}

/// Result of `gemini_review_code`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CodeReviewResponse {
    /// Overall assessment summary
    pub summary: String,
    /// List of identified issues
    pub issues: Vec<Value>,
    /// Improvement suggestions
    pub suggestions: Vec<String>,
    /// Overall code quality rating
    pub rating: String,
    /// The prompt sent to Gemini
    pub input_prompt: String,
    /// The raw response from Gemini
    pub gemini_response: String,
}

impl CodeReviewResponse {
    #[must_use]
    pub fn from_fields(
        fields: ReviewFields,
        input_prompt: impl Into<String>,
        gemini_response: impl Into<String>,
    ) -> Self {
        Self {
            summary: fields.summary,
            issues: fields.issues,
            suggestions: fields.suggestions,
            rating: fields.rating,
            input_prompt: input_prompt.into(),
            gemini_response: gemini_response.into(),
        }
    }

    #[must_use]
    pub fn failure(err: &ToolError) -> Self {
        Self {
            summary: format!("Error during review: {err}"),
            issues: Vec::new(),
            suggestions: Vec::new(),
            rating: RATING_FAILED.to_string(),
            input_prompt: failure_prompt(err),
            gemini_response: format!("Error: {err}"),
        }
    }

    #[must_use]
    pub fn is_failure(&self) -> bool {
        self.rating == RATING_FAILED
    }
}

/// Result shape shared by the feature plan, bug analysis and explanation tools.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct GeminiToolResponse {
    /// The processed result
    pub result: String,
    /// The prompt sent to Gemini
    pub input_prompt: String,
    /// The raw response from Gemini
    pub gemini_response: String,
    /// Additional metadata
    #[serde(default)]
    pub metadata: BTreeMap<String, Value>,
}

impl GeminiToolResponse {
    #[must_use]
    pub fn success(
        result: impl Into<String>,
        input_prompt: impl Into<String>,
        gemini_response: impl Into<String>,
        mut metadata: BTreeMap<String, Value>,
    ) -> Self {
        metadata.insert("status".to_string(), Value::from(STATUS_COMPLETED));
        Self {
            result: result.into(),
            input_prompt: input_prompt.into(),
            gemini_response: gemini_response.into(),
            metadata,
        }
    }

    /// `context` names the operation, as in "Error during {context}: ...".
    #[must_use]
    pub fn failure(
        context: &str,
        err: &ToolError,
        mut metadata: BTreeMap<String, Value>,
    ) -> Self {
        metadata.insert("status".to_string(), Value::from(STATUS_FAILED));
        Self {
            result: format!("Error during {context}: {err}"),
            input_prompt: failure_prompt(err),
            gemini_response: format!("Error: {err}"),
            metadata,
        }
    }

    #[must_use]
    pub fn is_failure(&self) -> bool {
        self.metadata.get("status").and_then(Value::as_str) == Some(STATUS_FAILED)
    }
}
