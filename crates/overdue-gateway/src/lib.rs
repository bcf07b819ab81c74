// SPDX-FileCopyrightText: 2026 Overdue Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway for the Overdue todo service.
//!
//! [`TodoGateway`] owns the axum server task. Handlers translate JSON
//! requests into [`TodoService`] calls and service errors into status codes.

pub mod error;
pub mod handlers;
pub mod server;

use std::net::SocketAddr;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use overdue_config::model::ServerConfig;
use overdue_core::{AdapterType, HealthStatus, OverdueError, PluginAdapter, StorageAdapter};
use overdue_service::TodoService;

pub use error::{ApiError, ErrorResponse};
pub use server::{build_router, GatewayState};

/// HTTP gateway adapter.
///
/// `start` binds the listener up front so address errors surface to the
/// caller, then serves in a background task until the token fires.
pub struct TodoGateway {
    config: ServerConfig,
    state: GatewayState,
    server_handle: Mutex<Option<tokio::task::JoinHandle<Result<(), OverdueError>>>>,
}

impl TodoGateway {
    pub fn new(
        config: ServerConfig,
        service: TodoService,
        storage: Arc<dyn StorageAdapter + Send + Sync>,
    ) -> Self {
        Self {
            config,
            state: GatewayState::new(service, storage),
            server_handle: Mutex::new(None),
        }
    }

    /// Bind and start serving. Returns the bound address.
    pub async fn start(&self, cancel: CancellationToken) -> Result<SocketAddr, OverdueError> {
        let mut handle = self.server_handle.lock().await;
        if handle.is_some() {
            return Err(OverdueError::Gateway {
                message: "gateway already started".to_string(),
                source: None,
            });
        }

        let listener = server::bind(&self.config).await?;
        let addr = listener.local_addr().map_err(|e| OverdueError::Gateway {
            message: format!("failed to read bound address: {e}"),
            source: Some(Box::new(e)),
        })?;
        let router = build_router(self.state.clone());
        *handle = Some(tokio::spawn(server::serve(listener, router, cancel)));
        Ok(addr)
    }

    /// Wait for the server task to finish after its token was cancelled.
    pub async fn wait(&self) -> Result<(), OverdueError> {
        let handle = self.server_handle.lock().await.take();
        match handle {
            Some(handle) => handle
                .await
                .map_err(|e| OverdueError::Internal(format!("gateway task failed: {e}")))?,
            None => Ok(()),
        }
    }
}

#[async_trait]
impl PluginAdapter for TodoGateway {
    fn name(&self) -> &str {
        "http"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Gateway
    }

    async fn health_check(&self) -> Result<HealthStatus, OverdueError> {
        let handle = self.server_handle.lock().await;
        Ok(match handle.as_ref() {
            Some(h) if !h.is_finished() => HealthStatus::Healthy,
            Some(_) => HealthStatus::Unhealthy("server task exited".to_string()),
            None => HealthStatus::Unhealthy("server not started".to_string()),
        })
    }

    async fn shutdown(&self) -> Result<(), OverdueError> {
        if let Some(handle) = self.server_handle.lock().await.take() {
            handle.abort();
        }
        Ok(())
    }
}
