// SPDX-FileCopyrightText: 2026 Overdue Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage adapter trait for todo persistence backends.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::OverdueError;
use crate::todo::TodoItem;
use crate::traits::adapter::PluginAdapter;
use crate::types::{TodoId, TodoStatus};

/// Adapter for todo item persistence.
///
/// Implementations perform no business logic: status transitions happen on
/// [`TodoItem`] before `save` is called. Concurrent saves of the same item
/// are last-write-wins.
#[async_trait]
pub trait StorageAdapter: PluginAdapter {
    /// Initializes the storage backend (migrations, connection, etc.).
    async fn initialize(&self) -> Result<(), OverdueError>;

    /// Closes the storage backend, flushing pending writes.
    async fn close(&self) -> Result<(), OverdueError>;

    /// Look up one item. `Ok(None)` when the identity is unknown.
    async fn find_by_id(&self, id: TodoId) -> Result<Option<TodoItem>, OverdueError>;

    /// All items, oldest first.
    async fn find_all(&self) -> Result<Vec<TodoItem>, OverdueError>;

    /// Items with the given status, oldest first.
    async fn find_by_status(&self, status: TodoStatus) -> Result<Vec<TodoItem>, OverdueError>;

    /// Items with the given status whose `due_at` is strictly before `before`.
    async fn find_by_status_and_due_before(
        &self,
        status: TodoStatus,
        before: DateTime<Utc>,
    ) -> Result<Vec<TodoItem>, OverdueError>;

    /// Insert an unsaved item (assigning its identity) or overwrite a saved one.
    ///
    /// Returns [`OverdueError::NotFound`] when overwriting an identity the
    /// store does not hold.
    async fn save(&self, item: TodoItem) -> Result<TodoItem, OverdueError>;
}
