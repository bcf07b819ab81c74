// SPDX-FileCopyrightText: 2026 Overdue Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the gateway.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    routing::{get, patch},
    Router,
};
use overdue_config::model::ServerConfig;
use overdue_core::{OverdueError, StorageAdapter};
use overdue_service::TodoService;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;

/// Health state for the unauthenticated health endpoint.
#[derive(Clone)]
pub struct HealthState {
    /// Process start time for uptime calculation.
    pub start_time: std::time::Instant,
}

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    /// Todo lookup and mutation gateway.
    pub service: TodoService,
    /// Store probed by `/health`.
    pub storage: Arc<dyn StorageAdapter + Send + Sync>,
    pub health: HealthState,
}

impl GatewayState {
    pub fn new(service: TodoService, storage: Arc<dyn StorageAdapter + Send + Sync>) -> Self {
        Self {
            service,
            storage,
            health: HealthState {
                start_time: std::time::Instant::now(),
            },
        }
    }
}

/// Build the application router.
///
/// Routes:
/// - POST /todos, GET /todos
/// - GET /todos/{id}
/// - PATCH /todos/{id}/description, /todos/{id}/done, /todos/{id}/not-done
/// - GET /health
pub fn build_router(state: GatewayState) -> Router {
    Router::new()
        .route("/health", get(handlers::get_health))
        .route(
            "/todos",
            get(handlers::list_todos).post(handlers::create_todo),
        )
        .route("/todos/{id}", get(handlers::get_todo))
        .route(
            "/todos/{id}/description",
            patch(handlers::change_description),
        )
        .route("/todos/{id}/done", patch(handlers::mark_done))
        .route("/todos/{id}/not-done", patch(handlers::mark_not_done))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind the listener for `config`. Port `0` picks a free port.
pub async fn bind(config: &ServerConfig) -> Result<TcpListener, OverdueError> {
    let addr = format!("{}:{}", config.host, config.port);
    TcpListener::bind(&addr)
        .await
        .map_err(|e| OverdueError::Gateway {
            message: format!("failed to bind gateway to {addr}: {e}"),
            source: Some(Box::new(e)),
        })
}

/// Serve `router` on `listener` until `cancel` fires, then drain in-flight requests.
pub async fn serve(
    listener: TcpListener,
    router: Router,
    cancel: CancellationToken,
) -> Result<(), OverdueError> {
    let addr: Option<SocketAddr> = listener.local_addr().ok();
    tracing::info!(?addr, "gateway server listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(async move { cancel.cancelled().await })
        .await
        .map_err(|e| OverdueError::Gateway {
            message: format!("gateway server error: {e}"),
            source: Some(Box::new(e)),
        })?;

    tracing::info!("gateway server stopped");
    Ok(())
}
