// SPDX-FileCopyrightText: 2026 Overdue Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the todo REST API.
//!
//! Extractors are taken as `Result` so malformed bodies, ids and query
//! strings produce the same JSON error shape as service failures.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use overdue_core::{HealthStatus, TodoId, TodoItem, TodoStatus};

use crate::error::ApiError;
use crate::server::GatewayState;

/// Request body for POST /todos.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTodoRequest {
    pub description: String,
    /// RFC 3339 due time. Defaults to the configured offset from now.
    #[serde(default)]
    pub due_at: Option<DateTime<Utc>>,
}

/// Request body for PATCH /todos/{id}/description.
#[derive(Debug, Deserialize)]
pub struct ChangeDescriptionRequest {
    pub description: String,
}

/// Query string for GET /todos.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTodosQuery {
    /// `false` (default) lists open items only; `true` lists every item.
    #[serde(default)]
    pub include_done: bool,
}

/// Wire representation of a todo item.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoResponse {
    pub id: Option<TodoId>,
    pub description: String,
    pub status: TodoStatus,
    pub created_at: DateTime<Utc>,
    pub due_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub done_at: Option<DateTime<Utc>>,
}

impl From<&TodoItem> for TodoResponse {
    fn from(item: &TodoItem) -> Self {
        Self {
            id: item.id(),
            description: item.description().to_string(),
            status: item.status(),
            created_at: item.created_at(),
            due_at: item.due_at(),
            done_at: item.done_at(),
        }
    }
}

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Health status string.
    pub status: String,
    /// Binary version.
    pub version: String,
    /// Seconds since the gateway state was created.
    pub uptime_secs: u64,
}

/// POST /todos
pub async fn create_todo(
    State(state): State<GatewayState>,
    body: Result<Json<CreateTodoRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<TodoResponse>), ApiError> {
    let Json(body) = body?;
    let item = state.service.add_todo(&body.description, body.due_at).await?;
    Ok((StatusCode::CREATED, Json(TodoResponse::from(&item))))
}

/// GET /todos?includeDone=bool
pub async fn list_todos(
    State(state): State<GatewayState>,
    query: Result<Query<ListTodosQuery>, QueryRejection>,
) -> Result<Json<Vec<TodoResponse>>, ApiError> {
    let Query(query) = query?;
    let items = state.service.list(query.include_done).await?;
    Ok(Json(items.iter().map(TodoResponse::from).collect()))
}

/// GET /todos/{id}
pub async fn get_todo(
    State(state): State<GatewayState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<TodoResponse>, ApiError> {
    let Path(id) = id?;
    let item = state.service.get_by_id(TodoId(id)).await?;
    Ok(Json(TodoResponse::from(&item)))
}

/// PATCH /todos/{id}/description
pub async fn change_description(
    State(state): State<GatewayState>,
    id: Result<Path<i64>, PathRejection>,
    body: Result<Json<ChangeDescriptionRequest>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = id?;
    let Json(body) = body?;
    state
        .service
        .change_description(TodoId(id), &body.description)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PATCH /todos/{id}/done
pub async fn mark_done(
    State(state): State<GatewayState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = id?;
    state.service.mark_done(TodoId(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PATCH /todos/{id}/not-done
pub async fn mark_not_done(
    State(state): State<GatewayState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = id?;
    state.service.mark_not_done(TodoId(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /health
///
/// 200 while the store answers its health check, 503 otherwise.
pub async fn get_health(State(state): State<GatewayState>) -> Response {
    let (status_code, status) = match state.storage.health_check().await {
        Ok(HealthStatus::Healthy) => (StatusCode::OK, "ok".to_string()),
        Ok(HealthStatus::Degraded(reason)) => (StatusCode::OK, format!("degraded: {reason}")),
        Ok(HealthStatus::Unhealthy(reason)) => {
            (StatusCode::SERVICE_UNAVAILABLE, format!("unhealthy: {reason}"))
        }
        Err(e) => {
            tracing::warn!(error = %e, "storage health check failed");
            (StatusCode::SERVICE_UNAVAILABLE, "unavailable".to_string())
        }
    };

    let body = HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.health.start_time.elapsed().as_secs(),
    };
    (status_code, Json(body)).into_response()
}
