// SPDX-FileCopyrightText: 2026 Overdue Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Overdue integration tests.
//!
//! Provides an in-memory store and a test harness for fast, deterministic
//! tests without a long-lived database.
//!
//! # Components
//!
//! - [`MemoryStore`] - In-memory `StorageAdapter` with save-failure injection
//! - [`TestHarness`] - Temp SQLite store wired to the service, sweep and router

pub mod harness;
pub mod memory_store;

pub use harness::{TestHarness, TestHarnessBuilder};
pub use memory_store::MemoryStore;
