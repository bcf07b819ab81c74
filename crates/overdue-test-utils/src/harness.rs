// SPDX-FileCopyrightText: 2026 Overdue Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end integration testing.
//!
//! `TestHarness` assembles the complete stack over a temp SQLite database:
//! storage, service, sweep and HTTP router. `request()` drives the router
//! in-process without binding a socket.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use overdue_config::model::{OverdueConfig, StorageConfig};
use overdue_core::{OverdueError, StorageAdapter};
use overdue_gateway::{build_router, GatewayState};
use overdue_service::{PastDueSweep, TodoService};
use overdue_storage::SqliteStorage;

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    default_due_hours: u32,
    sweep_interval: Duration,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        let config = OverdueConfig::default();
        Self {
            default_due_hours: config.todos.default_due_hours,
            sweep_interval: Duration::from_secs(config.sweep.interval_secs),
        }
    }

    /// Offset applied to items created without a due time.
    pub fn with_default_due_hours(mut self, hours: u32) -> Self {
        self.default_due_hours = hours;
        self
    }

    /// Interval used by the sweep's periodic loop.
    pub fn with_sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval = interval;
        self
    }

    /// Build the test harness, creating all required subsystems.
    pub async fn build(self) -> Result<TestHarness, OverdueError> {
        let temp_dir = tempfile::TempDir::new().map_err(OverdueError::storage)?;
        let db_path = temp_dir.path().join("test.db");

        let mut config = OverdueConfig::default();
        config.storage = StorageConfig {
            database_path: db_path.to_string_lossy().to_string(),
            wal_mode: true,
        };
        config.todos.default_due_hours = self.default_due_hours;
        config.sweep.interval_secs = self.sweep_interval.as_secs().max(1);

        let storage = Arc::new(SqliteStorage::new(config.storage.clone()));
        storage.initialize().await?;
        let store: Arc<dyn StorageAdapter + Send + Sync> = storage.clone();

        let service = TodoService::new(store.clone(), &config.todos);
        let sweep = Arc::new(PastDueSweep::with_interval(
            store.clone(),
            self.sweep_interval,
        ));
        let router = build_router(GatewayState::new(service.clone(), store));

        Ok(TestHarness {
            storage,
            service,
            sweep,
            router,
            config,
            _temp_dir: temp_dir,
        })
    }
}

/// A fully wired Overdue stack for integration tests.
pub struct TestHarness {
    pub storage: Arc<SqliteStorage>,
    pub service: TodoService,
    pub sweep: Arc<PastDueSweep>,
    pub router: axum::Router,
    pub config: OverdueConfig,
    _temp_dir: tempfile::TempDir,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Send one request through the router.
    ///
    /// Returns the status and the decoded JSON body (`Value::Null` when empty).
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> Result<(StatusCode, Value), OverdueError> {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header("content-type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        let request = builder
            .body(body)
            .map_err(|e| OverdueError::Internal(format!("bad test request: {e}")))?;

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .map_err(|e| OverdueError::Internal(format!("router failed: {e}")))?;
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .map_err(|e| OverdueError::Internal(format!("failed to read body: {e}")))?;
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .map_err(|e| OverdueError::Internal(format!("response is not JSON: {e}")))?
        };
        Ok((status, json))
    }

    /// Checkpoint and close the database.
    pub async fn shutdown(&self) -> Result<(), OverdueError> {
        self.storage.close().await
    }
}
