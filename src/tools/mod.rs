use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

use crate::core::error::{AppError, Result};

pub mod context;
pub mod error;
pub mod gemini;
pub mod registry;
pub mod result;

pub use context::ToolContext;
pub use error::ToolError;
pub use gemini::{AnalyzeBugTool, ExplainCodeTool, ProofreadFeaturePlanTool, ReviewCodeTool};
pub use registry::{ToolDefinition, ToolRegistry};
pub use result::{CodeReviewResponse, GeminiToolResponse, PROMPT_SENTINEL};

#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    fn input_schema(&self) -> Value;
    fn output_schema(&self) -> Value;
    async fn execute(&self, ctx: &ToolContext, input: Value) -> Result<Value>;
}

/// A tool with typed arguments and a typed envelope.
///
/// `execute_typed` is infallible: pipeline failures are reported inside the
/// returned envelope. Only malformed arguments fail, in [`Tool::execute`].
#[async_trait]
pub trait TypedTool: Send + Sync {
    type Input: JsonSchema + DeserializeOwned + Send;
    type Output: JsonSchema + Serialize + Send;

    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str;

    async fn execute_typed(&self, ctx: &ToolContext, input: Self::Input) -> Self::Output;
}

fn schema_value<T: JsonSchema>() -> Value {
    let mut schema =
        serde_json::to_value(schemars::schema_for!(T)).unwrap_or_else(|_| serde_json::json!({}));

    if let Some(obj) = schema.as_object_mut()
        && obj.get("type").and_then(|t| t.as_str()) == Some("object")
        && !obj.contains_key("properties")
    {
        obj.insert("properties".to_string(), serde_json::json!({}));
    }
    schema
}

/// Accepts both flat arguments and arguments wrapped as `{"request": {...}}`.
fn unwrap_request(input: Value) -> Value {
    match input {
        Value::Object(mut map) if map.len() == 1 && map.get("request").is_some_and(Value::is_object) => {
            map.remove("request").unwrap_or(Value::Null)
        }
        other => other,
    }
}

#[async_trait]
impl<T: TypedTool> Tool for T {
    fn name(&self) -> &str {
        TypedTool::name(self)
    }

    fn description(&self) -> &str {
        TypedTool::description(self)
    }

    fn input_schema(&self) -> Value {
        schema_value::<T::Input>()
    }

    fn output_schema(&self) -> Value {
        schema_value::<T::Output>()
    }

    async fn execute(&self, ctx: &ToolContext, input: Value) -> Result<Value> {
        let typed_input: T::Input =
            serde_json::from_value(unwrap_request(input)).map_err(|e| {
                AppError::InvalidToolInput {
                    tool: TypedTool::name(self).to_string(),
                    reason: e.to_string(),
                }
            })?;
        let output = self.execute_typed(ctx, typed_input).await;
        Ok(serde_json::to_value(output)?)
    }
}

/// Registry holding the four Gemini tools.
#[must_use]
pub fn default_registry() -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(Arc::new(ReviewCodeTool));
    registry.register(Arc::new(ProofreadFeaturePlanTool));
    registry.register(Arc::new(AnalyzeBugTool));
    registry.register(Arc::new(ExplainCodeTool));
    registry
}
