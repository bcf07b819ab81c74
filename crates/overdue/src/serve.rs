// SPDX-FileCopyrightText: 2026 Overdue Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `overdue serve` command implementation.
//!
//! Opens SQLite storage, spawns the past-due sweep, and serves the HTTP API
//! until SIGINT or SIGTERM. Shutdown drains in-flight requests, stops the
//! sweep, and checkpoints the database.

use std::sync::Arc;

use overdue_config::OverdueConfig;
use overdue_core::{OverdueError, PluginAdapter, StorageAdapter};
use overdue_gateway::TodoGateway;
use overdue_service::shutdown;
use overdue_service::{PastDueSweep, TodoService};
use overdue_storage::SqliteStorage;
use tracing::{info, warn};

/// Runs the `overdue serve` command.
pub async fn run_serve(config: OverdueConfig) -> Result<(), OverdueError> {
    info!(name = %config.service.name, "starting overdue serve");

    // Initialize storage.
    let storage = Arc::new(SqliteStorage::new(config.storage.clone()));
    storage.initialize().await?;
    info!(path = %config.storage.database_path, "storage ready");
    let store: Arc<dyn StorageAdapter + Send + Sync> = storage.clone();

    let service = TodoService::new(store.clone(), &config.todos);

    // Install signal handler.
    let cancel = shutdown::install_signal_handler();

    // Spawn the sweep background task if enabled.
    let sweep_handle = if config.sweep.enabled {
        let sweep = Arc::new(PastDueSweep::new(store.clone(), &config.sweep));
        info!(
            interval_secs = config.sweep.interval_secs,
            "past-due sweep enabled"
        );
        Some(sweep.spawn(cancel.clone()))
    } else {
        info!("past-due sweep disabled");
        None
    };

    let gateway = TodoGateway::new(config.server.clone(), service, store);
    let served = match gateway.start(cancel.clone()).await {
        Ok(addr) => {
            info!(%addr, "overdue listening");
            gateway.wait().await
        }
        Err(e) => Err(e),
    };

    // The server may have stopped on its own; make sure the sweep follows.
    cancel.cancel();
    if let Some(handle) = sweep_handle
        && let Err(e) = handle.await
    {
        warn!(error = %e, "sweep task ended abnormally");
    }

    storage.shutdown().await?;
    info!("overdue serve shutdown complete");
    served
}

/// Initializes the tracing subscriber with the given log level.
pub fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("overdue={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
