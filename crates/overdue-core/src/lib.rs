// SPDX-FileCopyrightText: 2026 Overdue Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Overdue todo service.
//!
//! This crate provides the todo lifecycle state machine, the error taxonomy,
//! and the adapter traits that storage backends implement. It performs no
//! I/O of its own.

pub mod error;
pub mod todo;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::OverdueError;
pub use todo::{TodoError, TodoItem, TodoState, MAX_DESCRIPTION_LEN, MAX_DUE_YEAR, MIN_DUE_YEAR};
pub use traits::{PluginAdapter, StorageAdapter};
pub use types::{AdapterType, HealthStatus, TodoId, TodoStatus};
