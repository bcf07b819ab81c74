// SPDX-FileCopyrightText: 2026 Overdue Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory todo store for deterministic testing.
//!
//! `MemoryStore` implements `StorageAdapter` over a `BTreeMap`, assigns ids
//! sequentially from 1, and can be told to fail saves for chosen ids.

use std::collections::{BTreeMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use overdue_core::{
    AdapterType, HealthStatus, OverdueError, PluginAdapter, StorageAdapter, TodoId, TodoItem,
    TodoStatus,
};

#[derive(Default)]
struct Inner {
    items: BTreeMap<TodoId, TodoItem>,
    next_id: i64,
    failing: HashSet<TodoId>,
    health: Option<HealthStatus>,
}

/// A `StorageAdapter` kept entirely in memory.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Make every later `save` of `id` fail with a storage error.
    pub fn fail_saves_for(&self, id: TodoId) {
        self.lock().failing.insert(id);
    }

    /// Stop failing saves of `id`.
    pub fn heal(&self, id: TodoId) {
        self.lock().failing.remove(&id);
    }

    /// Override what `health_check` reports.
    pub fn set_health(&self, status: HealthStatus) {
        self.lock().health = Some(status);
    }

    pub fn len(&self) -> usize {
        self.lock().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().items.is_empty()
    }

    fn select(&self, mut keep: impl FnMut(&TodoItem) -> bool) -> Vec<TodoItem> {
        self.lock()
            .items
            .values()
            .filter(|item| keep(item))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl PluginAdapter for MemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, OverdueError> {
        Ok(self.lock().health.clone().unwrap_or(HealthStatus::Healthy))
    }

    async fn shutdown(&self) -> Result<(), OverdueError> {
        Ok(())
    }
}

#[async_trait]
impl StorageAdapter for MemoryStore {
    async fn initialize(&self) -> Result<(), OverdueError> {
        Ok(())
    }

    async fn close(&self) -> Result<(), OverdueError> {
        Ok(())
    }

    async fn find_by_id(&self, id: TodoId) -> Result<Option<TodoItem>, OverdueError> {
        Ok(self.lock().items.get(&id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<TodoItem>, OverdueError> {
        Ok(self.select(|_| true))
    }

    async fn find_by_status(&self, status: TodoStatus) -> Result<Vec<TodoItem>, OverdueError> {
        Ok(self.select(|item| item.status() == status))
    }

    async fn find_by_status_and_due_before(
        &self,
        status: TodoStatus,
        before: DateTime<Utc>,
    ) -> Result<Vec<TodoItem>, OverdueError> {
        let mut items = self.select(|item| item.status() == status && item.due_at() < before);
        items.sort_by_key(|item| (item.due_at(), item.id()));
        Ok(items)
    }

    async fn save(&self, item: TodoItem) -> Result<TodoItem, OverdueError> {
        let mut inner = self.lock();
        match item.id() {
            None => {
                inner.next_id += 1;
                let id = TodoId(inner.next_id);
                let item = item.with_id(id);
                inner.items.insert(id, item.clone());
                Ok(item)
            }
            Some(id) if inner.failing.contains(&id) => {
                Err(OverdueError::storage(format!("injected save failure for {id}")))
            }
            Some(id) => match inner.items.get_mut(&id) {
                Some(stored) => {
                    *stored = item.clone();
                    Ok(item)
                }
                None => Err(OverdueError::NotFound { id }),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn item(description: &str) -> TodoItem {
        let now = Utc::now();
        TodoItem::create(description, now + Duration::hours(1), now).unwrap()
    }

    #[tokio::test]
    async fn assigns_sequential_ids() {
        let store = MemoryStore::new();
        let a = store.save(item("a")).await.unwrap();
        let b = store.save(item("b")).await.unwrap();
        assert_eq!(a.id(), Some(TodoId(1)));
        assert_eq!(b.id(), Some(TodoId(2)));
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn injected_failure_leaves_item_untouched() {
        let store = MemoryStore::new();
        let mut saved = store.save(item("a")).await.unwrap();
        let id = saved.id().unwrap();
        store.fail_saves_for(id);

        saved.mark_past_due();
        assert!(store.save(saved.clone()).await.is_err());
        assert_eq!(
            store.find_by_id(id).await.unwrap().unwrap().status(),
            TodoStatus::NotDone
        );

        store.heal(id);
        store.save(saved).await.unwrap();
        assert_eq!(
            store.find_by_id(id).await.unwrap().unwrap().status(),
            TodoStatus::PastDue
        );
    }

    #[tokio::test]
    async fn update_of_unknown_id_is_not_found() {
        let store = MemoryStore::new();
        let ghost = item("ghost").with_id(TodoId(9));
        assert!(matches!(
            store.save(ghost).await,
            Err(OverdueError::NotFound { .. })
        ));
    }
}
