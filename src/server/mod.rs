//! MCP over newline-delimited JSON-RPC 2.0.

mod error;
mod handler;
pub mod protocol;
pub mod resources;

pub use error::ServerError;
pub use handler::McpHandler;
pub use protocol::{RpcError, RpcRequest, RpcResponse};

use parking_lot::Mutex;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::{AbortHandle, JoinSet};

use crate::tools::{ToolContext, ToolRegistry, default_registry};

const CANCELLED: &str = "notifications/cancelled";

type InFlight = Arc<Mutex<HashMap<String, AbortHandle>>>;

fn request_key(id: &Value) -> String {
    id.to_string()
}

/// Reads requests line by line and answers each one from its own task.
///
/// Responses go through a single writer task, so they may arrive out of
/// request order. A `notifications/cancelled` aborts the matching task,
/// which kills any assistant subprocess it was waiting on.
#[derive(Debug, Clone)]
pub struct McpServer {
    handler: McpHandler,
}

impl McpServer {
    #[must_use]
    pub fn new(ctx: ToolContext) -> Self {
        Self::with_registry(ctx, default_registry())
    }

    #[must_use]
    pub fn with_registry(ctx: ToolContext, registry: ToolRegistry) -> Self {
        Self {
            handler: McpHandler::new(ctx, registry),
        }
    }

    pub async fn serve_stdio(self) -> Result<(), ServerError> {
        tracing::info!(
            "Starting {} v{} (stdio transport)",
            self.handler.context().config.name,
            self.handler.context().config.version
        );
        self.serve(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
            .await
    }

    /// Serves until `reader` hits end of input, then drains in-flight requests.
    pub async fn serve<R, W>(self, reader: R, writer: W) -> Result<(), ServerError>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let (tx, rx) = mpsc::unbounded_channel::<RpcResponse>();
        let writer_task = tokio::spawn(write_responses(writer, rx));

        let in_flight: InFlight = Arc::new(Mutex::new(HashMap::new()));
        let mut tasks = JoinSet::new();
        let mut lines = reader.lines();

        while let Some(line) = lines.next_line().await? {
            while tasks.try_join_next().is_some() {}

            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let request = match parse_request(line) {
                Ok(request) => request,
                Err(response) => {
                    let _ = tx.send(response);
                    continue;
                }
            };

            if request.method == CANCELLED {
                cancel(&in_flight, &request);
                continue;
            }

            let key = request.id.as_ref().map(request_key);
            let mut running = in_flight.lock();
            if key.as_ref().is_some_and(|key| running.contains_key(key)) {
                drop(running);
                tracing::warn!("Rejecting duplicate request id {:?}", request.id);
                let _ = tx.send(RpcResponse::invalid_request(
                    request.id,
                    "Request id is already in flight",
                ));
                continue;
            }

            let handler = self.handler.clone();
            let responses = tx.clone();
            let registry = Arc::clone(&in_flight);
            let task_key = key.clone();

            // The entry is gone before the response is sent, so a client may
            // reuse the id as soon as it has its answer.
            let handle = tasks.spawn(async move {
                let response = handler.handle(request).await;
                if let Some(key) = task_key {
                    registry.lock().remove(&key);
                }
                if let Some(response) = response {
                    let _ = responses.send(response);
                }
            });
            if let Some(key) = key {
                running.insert(key, handle);
            }
        }

        tracing::info!("Input closed, waiting for {} request(s)", tasks.len());
        while tasks.join_next().await.is_some() {}

        drop(tx);
        writer_task
            .await
            .map_err(|e| ServerError::Writer(e.to_string()))?
    }
}

fn parse_request(line: &str) -> Result<RpcRequest, RpcResponse> {
    let value: Value = serde_json::from_str(line).map_err(|e| {
        tracing::warn!("Failed to parse request: {}", e);
        RpcResponse::parse_error(e)
    })?;
    let id = value.get("id").cloned();
    serde_json::from_value(value)
        .map_err(|e| RpcResponse::invalid_request(id, format!("Invalid request: {e}")))
}

fn cancel(in_flight: &InFlight, request: &RpcRequest) {
    let Some(id) = request.param("requestId") else {
        return;
    };
    let reason = request
        .param("reason")
        .and_then(Value::as_str)
        .unwrap_or("no reason given");

    match in_flight.lock().remove(&request_key(id)) {
        Some(handle) => {
            tracing::info!("Cancelling request {}: {}", id, reason);
            handle.abort();
        }
        None => tracing::debug!("Cancel for unknown or finished request {}", id),
    }
}

async fn write_responses<W>(
    mut writer: W,
    mut rx: mpsc::UnboundedReceiver<RpcResponse>,
) -> Result<(), ServerError>
where
    W: AsyncWrite + Unpin,
{
    while let Some(response) = rx.recv().await {
        let mut line = serde_json::to_string(&response)?;
        line.push('\n');
        writer.write_all(line.as_bytes()).await?;
        writer.flush().await?;
    }
    Ok(())
}
