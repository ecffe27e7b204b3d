//! Streamable HTTP transport
//!
//! Stateless: every request carries its own Redmine credentials in the query
//! string and gets a freshly built client, tool handler and server.

use std::collections::HashMap;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::{header, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::any;
use axum::{Json, Router};
use serde_json::{json, Value};

use crate::config::Config;
use crate::error::Result;
use crate::mcp::server::McpServer;
use crate::mcp::tools::ToolHandler;
use crate::mcp::types::{JsonRpcError, JsonRpcResponse};
use crate::redmine::{Credentials, RedmineClient};

/// Build the router serving the MCP endpoint at `config.mcp_path`
pub fn router(config: Config) -> Router {
    let path = config.mcp_path.clone();
    Router::new()
        .route(&path, any(handle_mcp))
        .with_state(Arc::new(config))
}

/// Bind and serve until the process is interrupted
pub async fn serve(config: Config) -> Result<()> {
    let addr = config.bind_addr;
    let path = config.mcp_path.clone();

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("MCP endpoint listening on http://{}{}", addr, path);

    axum::serve(listener, router(config))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}

async fn handle_mcp(
    State(config): State<Arc<Config>>,
    method: Method,
    Query(params): Query<HashMap<String, String>>,
    body: Bytes,
) -> Response {
    let credentials = match Credentials::from_query(&params) {
        Ok(credentials) => credentials,
        Err(e) => {
            tracing::warn!(%method, "Rejecting request without credentials");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string() })),
            )
                .into_response();
        }
    };

    // No server-initiated streams or sessions to open or close
    if method != Method::POST {
        return (
            StatusCode::METHOD_NOT_ALLOWED,
            [(header::ALLOW, "POST")],
            Json(json!({ "error": format!("Method {} not allowed", method) })),
        )
            .into_response();
    }

    let message: Value = match serde_json::from_slice(&body) {
        Ok(message) => message,
        Err(e) => {
            let response = JsonRpcResponse::error(None, JsonRpcError::parse_error(e.to_string()));
            return (StatusCode::BAD_REQUEST, Json(response)).into_response();
        }
    };

    let client = RedmineClient::new(credentials).with_process_field_id(config.tools.process_field_id);
    let server = McpServer::new(ToolHandler::new(Arc::new(client), config.tools));

    match server.handle_value(message).await {
        Some(response) => (StatusCode::OK, Json(response)).into_response(),
        None => StatusCode::ACCEPTED.into_response(),
    }
}
