//! The four Gemini-backed tools. Each renders its template, calls the
//! assistant once and shapes the reply into an envelope.

mod bug;
mod explain;
mod feature;
mod review;

pub use bug::{AnalyzeBugTool, BugAnalysisRequest};
pub use explain::{CodeExplanationRequest, ExplainCodeTool};
pub use feature::{FeaturePlanRequest, ProofreadFeaturePlanTool};
pub use review::{CodeReviewRequest, ReviewCodeTool, focus_instruction};

use serde_json::Value;
use std::collections::BTreeMap;

use super::ToolContext;
use super::error::ToolError;
use crate::core::assistant::AssistantResponse;

/// Template lookup, rendering and the assistant round trip.
///
/// `label` is the human name used in "<label> template not found".
pub(crate) async fn consult(
    ctx: &ToolContext,
    template_name: &str,
    label: &'static str,
    fields: &[(&str, &str)],
) -> Result<AssistantResponse, ToolError> {
    let template = ctx
        .templates
        .get_template(template_name)
        .ok_or(ToolError::TemplateMissing(label))?;

    let (system_prompt, user_prompt) = template.format(fields)?;
    tracing::debug!(template = template_name, "Rendered prompt:\n{}", user_prompt);

    let response = ctx.assistant.call(&system_prompt, &user_prompt).await;
    if response.success {
        Ok(response)
    } else {
        Err(ToolError::Assistant {
            message: response.error_message().to_string(),
            input_prompt: response.input_prompt,
        })
    }
}

/// Metadata common to every generic envelope.
pub(crate) fn base_metadata(ctx: &ToolContext, operation: &str) -> BTreeMap<String, Value> {
    let mut metadata = BTreeMap::new();
    metadata.insert("operation".to_string(), Value::from(operation));
    metadata.insert("model".to_string(), Value::from(ctx.assistant.model()));
    metadata
}

/// `value` unless it is missing or blank.
pub(crate) fn or_default<'a>(value: Option<&'a str>, default: &'a str) -> &'a str {
    match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => default,
    }
}
