// Bridge RPC server - exposes host tools over HTTP to sandboxed processes

use axum::Router;
use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, info};
use uuid::Uuid;

use crate::bridge::ToolBridge;
use crate::tools::ToolContext;

use super::cache::SchemaCache;
use super::config::ServerConfig;
use super::error::{Result, ServerError};

/// Factory producing the per-request tool context
pub type ContextFactory = Arc<dyn Fn() -> ToolContext + Send + Sync>;

#[derive(Clone)]
struct AppState {
    bridge: Arc<ToolBridge>,
    schema_cache: Arc<SchemaCache>,
    context_factory: Option<ContextFactory>,
}

impl AppState {
    fn tool_context(&self) -> ToolContext {
        match &self.context_factory {
            Some(factory) => factory(),
            None => ToolContext::default(),
        }
    }
}

/// Request body for POST /tools/call
#[derive(Debug, Deserialize)]
struct ToolCallRequest {
    #[serde(default)]
    tool: String,
    #[serde(default)]
    input: Map<String, Value>,
}

/// Response body for POST /tools/call
///
/// Tool-level failure is still HTTP 200; only a malformed request earns a
/// non-2xx status.
#[derive(Debug, Serialize)]
struct ToolCallResponse {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

async fn handle_tool_call(State(state): State<AppState>, body: Bytes) -> Response {
    let request: ToolCallRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(_) => return error_response(StatusCode::BAD_REQUEST, "Invalid JSON request"),
    };

    if request.tool.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "Tool name is required");
    }

    let request_id = Uuid::new_v4();
    info!(request_id = %request_id, tool = %request.tool, "tool call received");

    let tcx = state.tool_context();
    let result = state.bridge.call_tool(&request.tool, request.input, &tcx).await;

    info!(
        request_id = %request_id,
        tool = %result.name,
        success = result.success,
        "tool call completed"
    );

    Json(ToolCallResponse {
        success: result.success,
        result: result.result,
        error: result.error,
    })
    .into_response()
}

async fn handle_tool_list(State(state): State<AppState>) -> Json<Value> {
    Json(json!({ "tools": state.bridge.list_available_tools() }))
}

#[derive(Debug, Deserialize)]
struct SchemaQuery {
    #[serde(default)]
    name: String,
}

async fn handle_tool_schema(
    State(state): State<AppState>,
    Query(query): Query<SchemaQuery>,
) -> Response {
    if query.name.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "Tool name is required");
    }

    if let Some(cached) = state.schema_cache.get(&query.name) {
        debug!(tool = %query.name, "schema served from cache");
        return Json(cached).into_response();
    }

    match state.bridge.get_tool_schema(&query.name) {
        Ok(schema) => {
            state.schema_cache.set(&query.name, schema.clone());
            Json(schema).into_response()
        }
        Err(e) => error_response(StatusCode::NOT_FOUND, &e.to_string()),
    }
}

async fn handle_health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

struct ServeHandle {
    stop: oneshot::Sender<()>,
    task: JoinHandle<Result<()>>,
}

/// HTTP server exposing a tool bridge to sandboxed child processes
pub struct BridgeServer {
    config: ServerConfig,
    state: AppState,
    handle: Mutex<Option<ServeHandle>>,
}

impl BridgeServer {
    pub fn new(bridge: Arc<ToolBridge>, config: ServerConfig) -> Self {
        let ttl = Duration::from_secs(config.schema_cache_ttl_secs);
        Self {
            state: AppState {
                bridge,
                schema_cache: Arc::new(SchemaCache::new(ttl)),
                context_factory: None,
            },
            config,
            handle: Mutex::new(None),
        }
    }

    /// Install a factory producing the per-request tool context
    pub fn set_context_factory(&mut self, factory: ContextFactory) {
        self.state.context_factory = Some(factory);
    }

    /// Build the router with all bridge endpoints
    pub fn router(&self) -> Router {
        Router::new()
            .route("/tools/call", post(handle_tool_call))
            .route("/tools/list", get(handle_tool_list))
            .route("/tools/schema", get(handle_tool_schema))
            .route("/health", get(handle_health))
            .with_state(self.state.clone())
    }

    /// Bind and serve on the calling task until the process exits
    pub async fn start(&self) -> Result<()> {
        let listener = TcpListener::bind(self.config.bind_addr())
            .await
            .map_err(|e| ServerError::BindFailed(e.to_string()))?;

        info!(addr = %self.config.bind_addr(), "bridge server listening");

        axum::serve(listener, self.router())
            .await
            .map_err(|e| ServerError::Serve(e.to_string()))
    }

    /// Bind and serve in a background task; returns the bound address
    pub async fn start_async(&self) -> Result<SocketAddr> {
        let listener = TcpListener::bind(self.config.bind_addr())
            .await
            .map_err(|e| ServerError::BindFailed(e.to_string()))?;
        let addr = listener
            .local_addr()
            .map_err(|e| ServerError::BindFailed(e.to_string()))?;

        let (stop_tx, stop_rx) = oneshot::channel::<()>();
        let router = self.router();

        let task = tokio::spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(async {
                    stop_rx.await.ok();
                })
                .await
                .map_err(|e| ServerError::Serve(e.to_string()))
        });

        *self.handle.lock().unwrap() = Some(ServeHandle { stop: stop_tx, task });

        info!(addr = %addr, "bridge server listening");
        Ok(addr)
    }

    /// Gracefully stop a server started with `start_async`
    ///
    /// In-flight requests are allowed to finish until the deadline elapses.
    pub async fn shutdown(&self, deadline: Duration) -> Result<()> {
        let handle = self
            .handle
            .lock()
            .unwrap()
            .take()
            .ok_or(ServerError::NotRunning)?;

        let _ = handle.stop.send(());

        match tokio::time::timeout(deadline, handle.task).await {
            Ok(Ok(result)) => result?,
            Ok(Err(e)) => return Err(ServerError::Serve(e.to_string())),
            Err(_) => return Err(ServerError::ShutdownTimeout),
        }

        info!("bridge server stopped");
        Ok(())
    }
}
