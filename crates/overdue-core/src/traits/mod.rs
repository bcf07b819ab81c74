// SPDX-FileCopyrightText: 2026 Overdue Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter trait definitions.
//!
//! Adapters extend the [`PluginAdapter`] base trait and use `#[async_trait]`
//! so they can be shared as `Arc<dyn ...>` trait objects.

pub mod adapter;
pub mod storage;

pub use adapter::PluginAdapter;
pub use storage::StorageAdapter;
