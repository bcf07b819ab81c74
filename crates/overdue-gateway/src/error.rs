// SPDX-FileCopyrightText: 2026 Overdue Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mapping from service errors to HTTP responses.

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use overdue_core::OverdueError;
use serde::Serialize;

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error description.
    pub error: String,
}

/// Error returned by every todo handler.
#[derive(Debug)]
pub enum ApiError {
    /// A failure reported by the service or store.
    Service(OverdueError),
    /// The request could not be parsed (body, path or query).
    BadRequest(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Service(err) => match err {
                OverdueError::NotFound { .. } => StatusCode::NOT_FOUND,
                OverdueError::InvalidState(_) => StatusCode::CONFLICT,
                OverdueError::Validation(_) => StatusCode::BAD_REQUEST,
                OverdueError::Config(_)
                | OverdueError::Storage { .. }
                | OverdueError::Gateway { .. }
                | OverdueError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl From<OverdueError> for ApiError {
    fn from(err: OverdueError) -> Self {
        Self::Service(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error = match self {
            Self::BadRequest(message) => message,
            Self::Service(err) if status.is_server_error() => {
                tracing::error!(error = %err, "request failed");
                "internal server error".to_string()
            }
            Self::Service(err) => err.to_string(),
        };
        (status, Json(ErrorResponse { error })).into_response()
    }
}
