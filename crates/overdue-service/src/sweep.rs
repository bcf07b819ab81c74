// SPDX-FileCopyrightText: 2026 Overdue Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Periodic past-due sweep.
//!
//! Each pass asks the store for open items whose due time has passed and
//! freezes them. The sweep is the only writer of the `PastDue` status.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use overdue_config::model::SweepConfig;
use overdue_core::{OverdueError, StorageAdapter, TodoStatus};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Outcome of a single sweep pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Open items found past their due time.
    pub matched: usize,
    /// Items successfully saved as past due.
    pub transitioned: usize,
    /// Items whose save failed; they remain eligible for the next pass.
    pub failed: usize,
}

/// Forces overdue open items into the past-due state on a fixed interval.
pub struct PastDueSweep {
    storage: Arc<dyn StorageAdapter + Send + Sync>,
    interval: Duration,
}

impl PastDueSweep {
    pub fn new(storage: Arc<dyn StorageAdapter + Send + Sync>, config: &SweepConfig) -> Self {
        Self::with_interval(storage, Duration::from_secs(config.interval_secs))
    }

    pub fn with_interval(storage: Arc<dyn StorageAdapter + Send + Sync>, interval: Duration) -> Self {
        Self { storage, interval }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Run one pass treating `now` as the current time.
    ///
    /// A failing save is logged and counted; the pass moves on to the next
    /// item. Only a failure of the initial query aborts the pass.
    pub async fn run_once(&self, now: DateTime<Utc>) -> Result<SweepReport, OverdueError> {
        let overdue = self
            .storage
            .find_by_status_and_due_before(TodoStatus::NotDone, now)
            .await?;

        let mut report = SweepReport {
            matched: overdue.len(),
            ..SweepReport::default()
        };

        for mut item in overdue {
            let id = item.id();
            let due_at = item.due_at();
            item.mark_past_due();
            match self.storage.save(item).await {
                Ok(_) => {
                    report.transitioned += 1;
                    debug!(?id, %due_at, "todo marked past due");
                }
                Err(e) => {
                    report.failed += 1;
                    warn!(?id, error = %e, "failed to mark todo past due");
                }
            }
        }

        if report.matched == 0 {
            debug!("sweep found no overdue items");
        } else {
            info!(
                matched = report.matched,
                transitioned = report.transitioned,
                failed = report.failed,
                "past-due sweep complete"
            );
        }
        Ok(report)
    }

    /// Run one pass against the wall clock.
    pub async fn run_now(&self) -> Result<SweepReport, OverdueError> {
        self.run_once(Utc::now()).await
    }

    /// Sweep every interval until `cancel` fires. The first pass runs immediately.
    pub async fn run(&self, cancel: CancellationToken) {
        let mut interval = tokio::time::interval(self.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    if let Err(e) = self.run_now().await {
                        warn!(error = %e, "past-due sweep failed, retrying next tick");
                    }
                }
                _ = cancel.cancelled() => {
                    info!("past-due sweep shutting down");
                    break;
                }
            }
        }
    }

    /// Spawn [`run`](Self::run) as a background task.
    pub fn spawn(self: Arc<Self>, cancel: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(async move { self.run(cancel).await })
    }
}
