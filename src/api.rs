//! REST API server for the travel planner tools
//!
//! Serves the agent action-group endpoint plus direct tool routes for
//! local testing and other callers.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::invocation::{handle_event, ActionGroupEvent};
use crate::openapi::openapi_document;
use crate::tools::{run_tool, ToolRegistry, ToolResponse};

/// =============================
/// Response Wrapper
/// =============================

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse {
    pub success: bool,
    pub data: Option<serde_json::Value>,
    pub error: Option<String>,
    pub timestamp: String,
}

impl ApiResponse {
    pub fn success<T: Serialize>(data: T) -> Self {
        Self {
            success: true,
            data: serde_json::to_value(data).ok(),
            error: None,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Wrap a tool body with the tool's own verdict.
    pub fn from_tool(outcome: ToolResponse) -> Self {
        Self {
            success: outcome.success && outcome.status.is_success(),
            data: Some(outcome.body),
            error: outcome.error,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// =============================
/// API State
/// =============================

#[derive(Clone)]
pub struct ApiState {
    pub registry: Arc<ToolRegistry>,
}

/// =============================
/// Health Endpoint
/// =============================

async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// =============================
/// Agent Action Group Endpoint
/// =============================

async fn invoke_action_group(
    State(state): State<ApiState>,
    payload: Result<Json<ActionGroupEvent>, JsonRejection>,
) -> (StatusCode, Json<Value>) {
    let Json(event) = match payload {
        Ok(event) => event,
        Err(rejection) => {
            warn!(error = %rejection.body_text(), "Rejected action group event");
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": format!("Invalid action group event: {}", rejection.body_text()) })),
            );
        }
    };

    let request_id = Uuid::new_v4();
    let response = handle_event(&state.registry, event)
        .instrument(info_span!("invoke", %request_id))
        .await;

    match serde_json::to_value(&response) {
        Ok(body) => (StatusCode::OK, Json(body)),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": format!("Failed to encode response: {}", e) })),
        ),
    }
}

/// =============================
/// Direct Tool Endpoints
/// =============================

async fn run_tool_query(
    State(state): State<ApiState>,
    Path(name): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> (StatusCode, Json<ApiResponse>) {
    let parameters: Map<String, Value> = query
        .into_iter()
        .map(|(key, value)| (key, Value::String(value)))
        .collect();

    info!(tool_name = %name, "Direct tool call (query)");
    let outcome = run_tool(&state.registry, &name, Value::Object(parameters)).await;
    (outcome.status, Json(ApiResponse::from_tool(outcome)))
}

async fn run_tool_json(
    State(state): State<ApiState>,
    Path(name): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> (StatusCode, Json<ApiResponse>) {
    let parameters = match payload {
        Ok(Json(body)) => body,
        Err(rejection) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::error(format!(
                    "Invalid JSON body: {}",
                    rejection.body_text()
                ))),
            );
        }
    };

    info!(tool_name = %name, "Direct tool call (json)");
    let outcome = run_tool(&state.registry, &name, parameters).await;
    (outcome.status, Json(ApiResponse::from_tool(outcome)))
}

/// =============================
/// Schema Endpoint
/// =============================

async fn openapi(State(state): State<ApiState>) -> Json<Value> {
    Json(openapi_document(&state.registry))
}

async fn list_tools(State(state): State<ApiState>) -> Json<ApiResponse> {
    let tools: Vec<Value> = state
        .registry
        .tools()
        .iter()
        .map(|tool| json!({ "name": tool.name(), "description": tool.description() }))
        .collect();
    Json(ApiResponse::success(tools))
}

/// =============================
/// Router
/// =============================

pub fn create_router(registry: Arc<ToolRegistry>) -> Router {
    let state = ApiState { registry };

    Router::new()
        .route("/health", get(health))
        .route("/invoke", post(invoke_action_group))
        .route("/openapi.json", get(openapi))
        .route("/tools", get(list_tools))
        .route("/tools/:name", get(run_tool_query).post(run_tool_json))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// =============================
/// Server Startup
/// =============================

pub async fn start_server(
    registry: Arc<ToolRegistry>,
    port: u16,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let router = create_router(registry);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;

    info!("API Server listening on http://0.0.0.0:{}", port);
    info!("Local: http://127.0.0.1:{}", port);

    axum::serve(listener, router).await?;

    Ok(())
}
