// SPDX-FileCopyrightText: 2026 Overdue Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Lookup and mutation gateway over the todo store.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use overdue_config::model::TodosConfig;
use overdue_core::{OverdueError, StorageAdapter, TodoId, TodoItem, TodoStatus};
use tracing::{debug, info};

/// Stateless orchestration of todo mutations.
///
/// Every mutation fetches fresh state, applies exactly one transition on
/// the entity and saves the result. Entity failures surface as
/// [`OverdueError::InvalidState`] or [`OverdueError::Validation`].
#[derive(Clone)]
pub struct TodoService {
    storage: Arc<dyn StorageAdapter + Send + Sync>,
    default_due: Duration,
}

impl TodoService {
    /// Create a service using the configured due-date default.
    pub fn new(storage: Arc<dyn StorageAdapter + Send + Sync>, todos: &TodosConfig) -> Self {
        Self::with_default_due(storage, Duration::hours(i64::from(todos.default_due_hours)))
    }

    /// Create a service with an explicit offset for items added without a due time.
    pub fn with_default_due(
        storage: Arc<dyn StorageAdapter + Send + Sync>,
        default_due: Duration,
    ) -> Self {
        Self {
            storage,
            default_due,
        }
    }

    /// Create and persist a new open item.
    ///
    /// A missing `due_at` defaults to now plus the configured offset. A due
    /// time in the past is accepted; the next sweep will flag the item.
    pub async fn add_todo(
        &self,
        description: &str,
        due_at: Option<DateTime<Utc>>,
    ) -> Result<TodoItem, OverdueError> {
        let now = Utc::now();
        let due_at = match due_at {
            Some(due_at) => due_at,
            None => now.checked_add_signed(self.default_due).ok_or_else(|| {
                OverdueError::Validation(format!(
                    "default due offset of {} hours is out of range",
                    self.default_due.num_hours()
                ))
            })?,
        };
        let item = TodoItem::create(description, due_at, now)?;
        let saved = self.storage.save(item).await?;
        info!(id = ?saved.id(), due_at = %saved.due_at(), "todo added");
        Ok(saved)
    }

    /// Fetch one item or fail with [`OverdueError::NotFound`].
    pub async fn get_by_id(&self, id: TodoId) -> Result<TodoItem, OverdueError> {
        self.storage
            .find_by_id(id)
            .await?
            .ok_or(OverdueError::NotFound { id })
    }

    pub async fn get_all(&self) -> Result<Vec<TodoItem>, OverdueError> {
        self.storage.find_all().await
    }

    pub async fn get_not_done(&self) -> Result<Vec<TodoItem>, OverdueError> {
        self.storage.find_by_status(TodoStatus::NotDone).await
    }

    /// `include_done == false` lists open items only; `true` lists everything.
    pub async fn list(&self, include_done: bool) -> Result<Vec<TodoItem>, OverdueError> {
        if include_done {
            self.get_all().await
        } else {
            self.get_not_done().await
        }
    }

    pub async fn change_description(
        &self,
        id: TodoId,
        description: &str,
    ) -> Result<TodoItem, OverdueError> {
        let mut item = self.get_by_id(id).await?;
        item.change_description(description)?;
        let saved = self.storage.save(item).await?;
        debug!(%id, "todo description changed");
        Ok(saved)
    }

    pub async fn mark_done(&self, id: TodoId) -> Result<TodoItem, OverdueError> {
        let mut item = self.get_by_id(id).await?;
        item.mark_done(Utc::now())?;
        let saved = self.storage.save(item).await?;
        debug!(%id, "todo marked done");
        Ok(saved)
    }

    pub async fn mark_not_done(&self, id: TodoId) -> Result<TodoItem, OverdueError> {
        let mut item = self.get_by_id(id).await?;
        item.mark_not_done()?;
        let saved = self.storage.save(item).await?;
        debug!(%id, "todo marked not done");
        Ok(saved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use overdue_test_utils::MemoryStore;

    fn service() -> (TodoService, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let service = TodoService::new(store.clone(), &TodosConfig::default());
        (service, store)
    }

    #[tokio::test]
    async fn add_then_fetch_returns_same_fields() {
        let (service, _store) = service();
        let due = Utc::now() + Duration::days(1);

        let created = service.add_todo("Test task", Some(due)).await.unwrap();
        let id = created.id().unwrap();
        let fetched = service.get_by_id(id).await.unwrap();

        assert_eq!(fetched.description(), "Test task");
        assert_eq!(fetched.status(), TodoStatus::NotDone);
        assert_eq!(fetched.due_at(), due);
        assert!(fetched.done_at().is_none());
    }

    #[tokio::test]
    async fn add_without_due_uses_default_offset() {
        let (service, _store) = service();
        let before = Utc::now();
        let created = service.add_todo("someday", None).await.unwrap();
        let after = Utc::now();

        assert!(created.due_at() >= before + Duration::hours(24));
        assert!(created.due_at() <= after + Duration::hours(24));
    }

    #[tokio::test]
    async fn add_with_oversized_default_offset_is_rejected() {
        let store = Arc::new(MemoryStore::new());
        let todos = TodosConfig {
            default_due_hours: u32::MAX,
        };
        let service = TodoService::new(store.clone(), &todos);

        let err = service.add_todo("someday", None).await.unwrap_err();
        assert!(matches!(err, OverdueError::Validation(_)), "got {err:?}");
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn add_with_default_offset_past_year_9999_is_rejected() {
        let store = Arc::new(MemoryStore::new());
        let service =
            TodoService::with_default_due(store.clone(), Duration::days(365 * 9_000));

        let err = service.add_todo("far", None).await.unwrap_err();
        assert!(matches!(err, OverdueError::Validation(_)), "got {err:?}");
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn add_rejects_blank_description() {
        let (service, store) = service();
        let err = service.add_todo("   ", None).await.unwrap_err();
        assert!(matches!(err, OverdueError::Validation(_)));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn add_with_past_due_time_is_still_open() {
        let (service, _store) = service();
        let created = service
            .add_todo("already late", Some(Utc::now() - Duration::days(1)))
            .await
            .unwrap();
        let fetched = service.get_by_id(created.id().unwrap()).await.unwrap();
        assert_eq!(fetched.status(), TodoStatus::NotDone);
    }

    #[tokio::test]
    async fn get_by_id_unknown_is_not_found() {
        let (service, _store) = service();
        match service.get_by_id(TodoId(404)).await {
            Err(OverdueError::NotFound { id }) => assert_eq!(id, TodoId(404)),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn done_and_not_done_toggle() {
        let (service, _store) = service();
        let id = service.add_todo("toggle", None).await.unwrap().id().unwrap();

        let done = service.mark_done(id).await.unwrap();
        assert_eq!(done.status(), TodoStatus::Done);
        assert!(done.done_at().is_some());

        let reopened = service.mark_not_done(id).await.unwrap();
        assert_eq!(reopened.status(), TodoStatus::NotDone);
        assert!(reopened.done_at().is_none());
    }

    #[tokio::test]
    async fn past_due_item_refuses_every_mutation() {
        let (service, store) = service();
        let created = service.add_todo("frozen", None).await.unwrap();
        let id = created.id().unwrap();
        let mut late = created.clone();
        late.mark_past_due();
        store.save(late).await.unwrap();

        for result in [
            service.mark_done(id).await,
            service.mark_not_done(id).await,
            service.change_description(id, "thaw").await,
        ] {
            match result {
                Err(OverdueError::InvalidState(msg)) => assert!(msg.contains("Past-due")),
                other => panic!("expected InvalidState, got {other:?}"),
            }
        }

        let unchanged = service.get_by_id(id).await.unwrap();
        assert_eq!(unchanged.status(), TodoStatus::PastDue);
        assert_eq!(unchanged.description(), "frozen");
    }

    #[tokio::test]
    async fn change_description_trims_and_validates() {
        let (service, _store) = service();
        let id = service.add_todo("old", None).await.unwrap().id().unwrap();

        let updated = service.change_description(id, "  new text  ").await.unwrap();
        assert_eq!(updated.description(), "new text");

        let too_long = "x".repeat(256);
        let err = service.change_description(id, &too_long).await.unwrap_err();
        assert!(matches!(err, OverdueError::Validation(_)));
        assert_eq!(service.get_by_id(id).await.unwrap().description(), "new text");
    }

    #[tokio::test]
    async fn list_filters_two_ways() {
        let (service, _store) = service();
        let open = service.add_todo("open", None).await.unwrap();
        let done = service.add_todo("done", None).await.unwrap();
        service.mark_done(done.id().unwrap()).await.unwrap();

        let only_open = service.list(false).await.unwrap();
        assert_eq!(only_open.len(), 1);
        assert_eq!(only_open[0].id(), open.id());

        assert_eq!(service.list(true).await.unwrap().len(), 2);
    }
}
