//! HTTP transport.
//!
//! `POST /mcp` accepts the same JSON-RPC messages as the stdio transport.
//! `GET /tools` and `POST /tools/{name}` expose the operations directly,
//! returning the raw payload without the MCP envelope.

use std::net::SocketAddr;

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Path, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use dna::{ToolError, tool_descriptors};
use serde_json::{Value, json};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::logging::LoggingMiddleware;
use crate::mcp::{McpServer, SERVER_NAME};

/// Build the router for `server`.
#[must_use]
pub fn router(server: McpServer, verbose: u8) -> Router {
    let logging = LoggingMiddleware::new(verbose);

    Router::new()
        .route("/health", get(health))
        .route("/tools", get(list_tools))
        .route("/tools/{name}", post(call_tool))
        .route("/mcp", post(mcp))
        .with_state(server)
        .layer(middleware::from_fn(move |request: Request, next: Next| {
            logging.handle(request, next)
        }))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Bind `addr` and serve until the process is stopped.
///
/// # Errors
/// Returns an error if the address cannot be bound or the server fails.
pub async fn serve(server: McpServer, addr: SocketAddr, verbose: u8) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "listening");
    axum::serve(listener, router(server, verbose)).await?;
    Ok(())
}

#[allow(clippy::unused_async)]
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "server": SERVER_NAME,
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[allow(clippy::unused_async)]
async fn list_tools() -> Json<Value> {
    Json(json!({ "tools": tool_descriptors() }))
}

#[allow(clippy::needless_pass_by_value)]
async fn call_tool(
    State(server): State<McpServer>,
    Path(name): Path<String>,
    body: Bytes,
) -> Response {
    let arguments = if body.iter().all(u8::is_ascii_whitespace) {
        Value::Null
    } else {
        match serde_json::from_slice(&body) {
            Ok(arguments) => arguments,
            Err(e) => {
                return error_response(StatusCode::BAD_REQUEST, &format!("Invalid JSON body: {e}"));
            }
        }
    };

    match server.ops().call(&name, arguments).await {
        Ok(payload) => Json(payload).into_response(),
        Err(err @ ToolError::UnknownOperation(_)) => {
            error_response(StatusCode::NOT_FOUND, &err.to_string())
        }
        Err(err @ ToolError::InvalidArguments { .. }) => {
            error_response(StatusCode::UNPROCESSABLE_ENTITY, &err.to_string())
        }
    }
}

#[allow(clippy::needless_pass_by_value)]
async fn mcp(State(server): State<McpServer>, body: Bytes) -> Response {
    if let Some(response) = server.handle_bytes(&body).await {
        Json(response).into_response()
    } else {
        StatusCode::ACCEPTED.into_response()
    }
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}
