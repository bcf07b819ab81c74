// SPDX-FileCopyrightText: 2026 Overdue Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `overdue sweep` command implementation.
//!
//! Runs one past-due pass against the configured database and exits.

use std::sync::Arc;

use overdue_config::OverdueConfig;
use overdue_core::{OverdueError, StorageAdapter};
use overdue_service::{PastDueSweep, SweepReport};
use overdue_storage::SqliteStorage;
use tracing::info;

pub async fn run_sweep(config: OverdueConfig) -> Result<(), OverdueError> {
    let storage = Arc::new(SqliteStorage::new(config.storage.clone()));
    storage.initialize().await?;

    let sweep = PastDueSweep::new(storage.clone(), &config.sweep);
    let outcome = sweep.run_now().await;
    storage.close().await?;
    let report = outcome?;

    info!(?report, "one-shot sweep finished");
    println!("{}", summarize(&report));

    if report.failed > 0 {
        return Err(OverdueError::Internal(format!(
            "{} item(s) could not be marked past due",
            report.failed
        )));
    }
    Ok(())
}

fn summarize(report: &SweepReport) -> String {
    format!(
        "sweep: {} overdue, {} marked past due, {} failed",
        report.matched, report.transitioned, report.failed
    )
}
