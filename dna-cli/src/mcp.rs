//! Model Context Protocol transport: JSON-RPC 2.0 messages, one per line.
//!
//! Only the tool surface of MCP is implemented: `initialize`, `ping`,
//! `tools/list` and `tools/call`. Notifications are accepted and never
//! answered.

use std::sync::Arc;

use dna::store::SubjectStore;
use dna::{DnaOps, FsStore, ToolError, tool_descriptors};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;

/// Protocol revision announced during `initialize`.
pub const PROTOCOL_VERSION: &str = "2025-06-18";

/// Name announced in `serverInfo`.
pub const SERVER_NAME: &str = "DNA Analysis";

pub const PARSE_ERROR: i64 = -32700;
pub const INVALID_REQUEST: i64 = -32600;
pub const METHOD_NOT_FOUND: i64 = -32601;
pub const INVALID_PARAMS: i64 = -32602;

/// Incoming JSON-RPC message. A missing `id` marks a notification.
#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcRequest {
    #[serde(default)]
    pub jsonrpc: Option<String>,
    #[serde(default)]
    pub id: Option<Value>,
    pub method: String,
    #[serde(default)]
    pub params: Value,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct JsonRpcError {
    pub code: i64,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct JsonRpcResponse {
    pub jsonrpc: &'static str,
    pub id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

impl JsonRpcResponse {
    #[must_use]
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: Some(result),
            error: None,
        }
    }

    #[must_use]
    pub fn failure(id: Value, code: i64, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: None,
            error: Some(JsonRpcError {
                code,
                message: message.into(),
            }),
        }
    }
}

#[derive(Debug, Deserialize)]
struct CallParams {
    name: String,
    #[serde(default)]
    arguments: Value,
}

/// MCP server over a shared [`DnaOps`].
///
/// Cloning is cheap; each clone serves requests against the same store.
#[derive(Debug)]
pub struct McpServer<S = FsStore> {
    ops: Arc<DnaOps<S>>,
}

impl<S> Clone for McpServer<S> {
    fn clone(&self) -> Self {
        Self {
            ops: Arc::clone(&self.ops),
        }
    }
}

impl<S: SubjectStore + 'static> McpServer<S> {
    #[must_use]
    pub fn new(ops: DnaOps<S>) -> Self {
        Self { ops: Arc::new(ops) }
    }

    #[must_use]
    pub fn ops(&self) -> &DnaOps<S> {
        &self.ops
    }

    /// Handle one raw message. Returns `None` for notifications.
    pub async fn handle_bytes(&self, raw: &[u8]) -> Option<JsonRpcResponse> {
        let value: Value = match serde_json::from_slice(raw) {
            Ok(v) => v,
            Err(e) => {
                return Some(JsonRpcResponse::failure(
                    Value::Null,
                    PARSE_ERROR,
                    format!("Parse error: {e}"),
                ));
            }
        };

        let id = value.get("id").cloned().unwrap_or(Value::Null);
        match serde_json::from_value::<JsonRpcRequest>(value) {
            Ok(request) => self.handle_request(request).await,
            Err(e) => Some(JsonRpcResponse::failure(
                id,
                INVALID_REQUEST,
                format!("Invalid request: {e}"),
            )),
        }
    }

    /// Dispatch a decoded request. Returns `None` for notifications.
    pub async fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        let Some(id) = request.id else {
            tracing::debug!(method = %request.method, "notification");
            return None;
        };

        if request.jsonrpc.as_deref().is_some_and(|v| v != "2.0") {
            return Some(JsonRpcResponse::failure(
                id,
                INVALID_REQUEST,
                "Invalid request: jsonrpc must be \"2.0\"",
            ));
        }

        tracing::debug!(method = %request.method, "request");
        let response = match request.method.as_str() {
            "initialize" => JsonRpcResponse::success(id, initialize_result()),
            "ping" => JsonRpcResponse::success(id, json!({})),
            "tools/list" => JsonRpcResponse::success(id, json!({ "tools": tool_descriptors() })),
            "tools/call" => match serde_json::from_value::<CallParams>(request.params) {
                Ok(params) => JsonRpcResponse::success(id, self.call_tool(params).await),
                Err(e) => JsonRpcResponse::failure(id, INVALID_PARAMS, format!("Invalid params: {e}")),
            },
            other => JsonRpcResponse::failure(id, METHOD_NOT_FOUND, format!("Method not found: {other}")),
        };
        Some(response)
    }

    async fn call_tool(&self, params: CallParams) -> Value {
        match self.ops.call(&params.name, params.arguments).await {
            Ok(payload) => tool_result(&payload, Some(payload.clone()), false),
            Err(err) => {
                tracing::warn!(tool = %params.name, error = %err, "tool call rejected");
                let message = err.to_string();
                let kind = match err {
                    ToolError::UnknownOperation(_) => "unknown_operation",
                    ToolError::InvalidArguments { .. } => "invalid_arguments",
                };
                tool_result(&json!({ "error": message, "kind": kind }), None, true)
            }
        }
    }

    /// Serve newline-delimited JSON-RPC from `reader` to `writer` until
    /// `reader` reaches EOF.
    ///
    /// Each request runs as its own task, so a slow read for one request
    /// does not hold up the others. Responses are written by a single task
    /// in completion order.
    ///
    /// # Errors
    /// Returns an error if reading the input or writing a response fails.
    pub async fn serve<R, W>(self, reader: R, mut writer: W) -> anyhow::Result<()>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let (tx, mut rx) = mpsc::unbounded_channel::<String>();

        let writer_task = tokio::spawn(async move {
            while let Some(frame) = rx.recv().await {
                writer.write_all(frame.as_bytes()).await?;
                writer.write_all(b"\n").await?;
                writer.flush().await?;
            }
            Ok::<_, std::io::Error>(())
        });

        let mut lines = BufReader::new(reader).lines();
        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }
            let server = self.clone();
            let tx = tx.clone();
            tokio::spawn(async move {
                let Some(response) = server.handle_bytes(line.as_bytes()).await else {
                    return;
                };
                match serde_json::to_string(&response) {
                    Ok(frame) => {
                        // The writer only goes away after every sender is dropped.
                        let _ = tx.send(frame);
                    }
                    Err(e) => tracing::error!(error = %e, "failed to encode response"),
                }
            });
        }
        drop(tx);

        writer_task.await??;
        Ok(())
    }
}

fn initialize_result() -> Value {
    json!({
        "protocolVersion": PROTOCOL_VERSION,
        "capabilities": { "tools": { "listChanged": false } },
        "serverInfo": {
            "name": SERVER_NAME,
            "version": env!("CARGO_PKG_VERSION"),
        },
    })
}

fn tool_result(payload: &Value, structured: Option<Value>, is_error: bool) -> Value {
    let mut result = json!({
        "content": [{ "type": "text", "text": payload.to_string() }],
        "isError": is_error,
    });
    if let Some(structured) = structured {
        result["structuredContent"] = structured;
    }
    result
}
