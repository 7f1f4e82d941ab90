use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;

use super::{base_metadata, consult};
use crate::core::interpret::Interpreter;
use crate::core::prompt::defaults::FEATURE_PLAN_REVIEW;
use crate::tools::result::GeminiToolResponse;
use crate::tools::{ToolContext, TypedTool};

pub const DEFAULT_FOCUS_AREAS: &str = "completeness,feasibility,clarity";

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct FeaturePlanRequest {
    /// Feature plan document
    pub feature_plan: String,
    /// Project context
    #[serde(default)]
    pub context: Option<String>,
    /// Areas to focus on
    #[serde(default)]
    pub focus_areas: Option<String>,
}

impl FeaturePlanRequest {
    #[must_use]
    pub fn new(feature_plan: impl Into<String>) -> Self {
        Self {
            feature_plan: feature_plan.into(),
            context: None,
            focus_areas: None,
        }
    }

    #[must_use]
    pub fn focus_areas(&self) -> &str {
        self.focus_areas.as_deref().unwrap_or(DEFAULT_FOCUS_AREAS)
    }
}

pub struct ProofreadFeaturePlanTool;

#[async_trait]
impl TypedTool for ProofreadFeaturePlanTool {
    type Input = FeaturePlanRequest;
    type Output = GeminiToolResponse;

    fn name(&self) -> &'static str {
        "gemini_proofread_feature_plan"
    }

    fn description(&self) -> &'static str {
        "Review and improve feature plans and specifications using Gemini. Checks completeness, clarity, and technical feasibility, and suggests improvements."
    }

    async fn execute_typed(&self, ctx: &ToolContext, input: Self::Input) -> Self::Output {
        tracing::info!("Starting feature plan review");

        let focus_areas = input.focus_areas();
        let mut metadata = base_metadata(ctx, FEATURE_PLAN_REVIEW);
        metadata.insert("focus_areas".to_string(), Value::from(focus_areas));

        let fields = [
            ("feature_plan", input.feature_plan.as_str()),
            ("context", input.context.as_deref().unwrap_or_default()),
            ("focus_areas", focus_areas),
        ];

        match consult(ctx, FEATURE_PLAN_REVIEW, "Feature plan review", &fields).await {
            Ok(response) => {
                let result = Interpreter::text().extract(&response.content).into_text();
                GeminiToolResponse::success(result, response.input_prompt, response.content, metadata)
            }
            Err(e) => {
                tracing::warn!("Feature plan review failed: {}", e);
                GeminiToolResponse::failure("feature plan review", &e, metadata)
            }
        }
    }
}
