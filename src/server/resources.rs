use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::core::error::{AppError, Result};
use crate::tools::ToolContext;

pub const CONFIG_URI: &str = "gemini://config";
pub const TEMPLATES_URI: &str = "gemini://templates";
pub const STATUS_URI: &str = "gemini://status";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceDefinition {
    pub uri: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub mime_type: &'static str,
}

#[must_use]
pub fn definitions() -> Vec<ResourceDefinition> {
    vec![
        ResourceDefinition {
            uri: CONFIG_URI,
            name: "config",
            description: "Current Gemini MCP server configuration",
            mime_type: "application/json",
        },
        ResourceDefinition {
            uri: TEMPLATES_URI,
            name: "templates",
            description: "Available prompt templates",
            mime_type: "application/json",
        },
        ResourceDefinition {
            uri: STATUS_URI,
            name: "status",
            description: "Gemini CLI status and authentication info",
            mime_type: "application/json",
        },
    ]
}

/// Reachability of the external assistant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssistantStatus {
    pub authenticated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    pub cli_available: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Probes the assistant. Never fails: a missing CLI is reported in the value.
pub async fn status(ctx: &ToolContext) -> AssistantStatus {
    match ctx.assistant.check_available().await {
        Ok(()) => AssistantStatus {
            authenticated: ctx.assistant.verify_authentication().await,
            model: Some(ctx.assistant.model().to_string()),
            cli_available: true,
            error: None,
        },
        Err(e) => {
            tracing::warn!("Assistant unavailable: {}", e);
            AssistantStatus {
                authenticated: false,
                model: None,
                cli_available: false,
                error: Some(e.to_string()),
            }
        }
    }
}

pub fn config_snapshot(ctx: &ToolContext) -> Result<Value> {
    Ok(serde_json::to_value(ctx.config.as_ref())?)
}

#[must_use]
pub fn templates(ctx: &ToolContext) -> BTreeMap<String, String> {
    ctx.templates.list_templates()
}

/// JSON document behind a resource URI.
pub async fn read(ctx: &ToolContext, uri: &str) -> Result<Value> {
    match uri {
        CONFIG_URI => config_snapshot(ctx),
        TEMPLATES_URI => Ok(serde_json::to_value(templates(ctx))?),
        STATUS_URI => Ok(serde_json::to_value(status(ctx).await)?),
        other => Err(AppError::ResourceNotFound(other.to_string())),
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

    fn ctx(mock: MockAssistant) -> ToolContext {
        ToolContext::new(
            ServerConfig::default(),
            TemplateStore::with_defaults(),
            Arc::new(mock),
        )
    }

    #[tokio::test]
    async fn test_status_available() {
        let value = read(&ctx(MockAssistant::new()), STATUS_URI).await.unwrap();
        assert_eq!(
            value,
            json!({"authenticated": true, "model": "mock-model", "cli_available": true})
        );
    }

    #[tokio::test]
    async fn test_status_unauthenticated() {
        let status = status(&ctx(MockAssistant::new().unauthenticated())).await;
        assert!(!status.authenticated);
        assert!(status.cli_available);
        assert!(status.error.is_none());
    }

    #[tokio::test]
    async fn test_status_unreachable() {
        let status = status(&ctx(MockAssistant::new().unavailable())).await;
        assert!(!status.authenticated);
        assert!(!status.cli_available);
        assert!(status.model.is_none());
        assert!(status.error.unwrap().contains("not found"));
    }

    #[tokio::test]
    async fn test_read_config_and_templates() {
        let ctx = ctx(MockAssistant::new());

        let config = read(&ctx, CONFIG_URI).await.unwrap();
        assert_eq!(config["name"], json!("Gemini MCP Server"));
        assert_eq!(config["gemini"]["model"], json!("gemini-2.5-pro"));

        let templates = read(&ctx, TEMPLATES_URI).await.unwrap();
        let names: Vec<&String> = templates.as_object().unwrap().keys().collect();
        assert_eq!(
            names,
            vec!["bug_analysis", "code_explanation", "code_review", "feature_plan_review"]
        );
    }

    #[tokio::test]
    async fn test_read_unknown_uri() {
        let err = read(&ctx(MockAssistant::new()), "gemini://nope").await.unwrap_err();
        assert!(matches!(err, AppError::ResourceNotFound(_)));
    }

    #[test]
    fn test_definitions() {
        let uris: Vec<&str> = definitions().iter().map(|d| d.uri).collect();
        assert_eq!(uris, vec![CONFIG_URI, TEMPLATES_URI, STATUS_URI]);
        let json = serde_json::to_value(&definitions()[0]).unwrap();
        assert_eq!(json["mimeType"], json!("application/json"));
    }
}
