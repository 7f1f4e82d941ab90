use serde_json::{Value, json};
use std::sync::Arc;

use super::protocol::{JSONRPC_VERSION, MCP_VERSION, RpcRequest, RpcResponse};
use super::resources;
use crate::core::error::AppError;
use crate::tools::{ToolContext, ToolRegistry};

/// Maps one JSON-RPC request to its response. Stateless apart from the
/// shared, read-only tool context.
#[derive(Clone, Debug)]
pub struct McpHandler {
    ctx: ToolContext,
    registry: Arc<ToolRegistry>,
}

impl McpHandler {
    #[must_use]
    pub fn new(ctx: ToolContext, registry: ToolRegistry) -> Self {
        Self {
            ctx,
            registry: Arc::new(registry),
        }
    }

    #[must_use]
    pub const fn context(&self) -> &ToolContext {
        &self.ctx
    }

    /// `None` for notifications.
    pub async fn handle(&self, request: RpcRequest) -> Option<RpcResponse> {
        tracing::debug!(method = %request.method, id = ?request.id, "Received request");

        if request.jsonrpc != JSONRPC_VERSION {
            return Some(RpcResponse::invalid_request(
                request.id,
                "Unsupported jsonrpc version (expected 2.0)",
            ));
        }

        let id = request.id.clone();
        let response = match request.method.as_str() {
            "initialize" => RpcResponse::success(id, self.initialize(&request)),
            "ping" => RpcResponse::success(id, json!({})),
            "tools/list" => RpcResponse::success(
                id,
                json!({ "tools": self.registry.definitions() }),
            ),
            "tools/call" => self.call_tool(&request).await,
            "resources/list" => RpcResponse::success(
                id,
                json!({ "resources": resources::definitions() }),
            ),
            "resources/read" => self.read_resource(&request).await,
            method if request.is_notification() => {
                tracing::debug!("Ignoring notification {}", method);
                return None;
            }
            other => {
                tracing::warn!("Unknown method: {}", other);
                RpcResponse::method_not_found(id, other)
            }
        };

        if request.is_notification() {
            None
        } else {
            Some(response)
        }
    }

    fn initialize(&self, request: &RpcRequest) -> Value {
        let protocol_version = request
            .param("protocolVersion")
            .and_then(Value::as_str)
            .unwrap_or(MCP_VERSION);
        tracing::info!("Client initialized with protocol {}", protocol_version);

        json!({
            "protocolVersion": protocol_version,
            "capabilities": {
                "tools": { "listChanged": false },
                "resources": { "subscribe": false, "listChanged": false }
            },
            "serverInfo": {
                "name": self.ctx.config.name,
                "version": self.ctx.config.version
            },
            "instructions": self.ctx.config.description
        })
    }

    async fn call_tool(&self, request: &RpcRequest) -> RpcResponse {
        let id = request.id.clone();
        let Some(name) = request.param("name").and_then(Value::as_str) else {
            return RpcResponse::invalid_params(id, "params.name must be a tool name");
        };
        let arguments = request
            .param("arguments")
            .cloned()
            .unwrap_or_else(|| json!({}));

        match self.registry.execute(&self.ctx, name, arguments).await {
            Ok(envelope) => {
                let text = match serde_json::to_string_pretty(&envelope) {
                    Ok(text) => text,
                    Err(e) => return RpcResponse::from_app_error(id, &AppError::from(e)),
                };
                RpcResponse::success(
                    id,
                    json!({
                        "content": [{ "type": "text", "text": text }],
                        "structuredContent": envelope,
                        "isError": false
                    }),
                )
            }
            Err(e) => {
                tracing::warn!("Tool call {} rejected: {}", name, e);
                RpcResponse::from_app_error(id, &e)
            }
        }
    }

    async fn read_resource(&self, request: &RpcRequest) -> RpcResponse {
        let id = request.id.clone();
        let Some(uri) = request.param("uri").and_then(Value::as_str) else {
            return RpcResponse::invalid_params(id, "params.uri must be a resource URI");
        };

        let document = match resources::read(&self.ctx, uri).await {
            Ok(document) => document,
            Err(e) => return RpcResponse::from_app_error(id, &e),
        };
        match serde_json::to_string_pretty(&document) {
            Ok(text) => RpcResponse::success(
                id,
                json!({
                    "contents": [{
                        "uri": uri,
                        "mimeType": "application/json",
                        "text": text
                    }]
                }),
            ),
            Err(e) => RpcResponse::from_app_error(id, &AppError::from(e)),
        }
    }
}
