// SPDX-FileCopyrightText: 2026 Overdue Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the StorageAdapter trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::OnceCell;
use tracing::debug;

use overdue_config::model::StorageConfig;
use overdue_core::{
    AdapterType, HealthStatus, OverdueError, PluginAdapter, StorageAdapter, TodoId, TodoItem,
    TodoStatus,
};

use crate::database::Database;
use crate::queries;

/// SQLite-backed todo store.
///
/// Wraps a [`Database`] handle and delegates all query operations to
/// [`queries::todos`]. The database is lazily opened on the first call to
/// [`StorageAdapter::initialize`].
pub struct SqliteStorage {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteStorage {
    /// Create a new SqliteStorage with the given configuration.
    ///
    /// The database connection is not opened until [`StorageAdapter::initialize`] is called.
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    /// Returns a reference to the underlying Database, or an error if not initialized.
    fn db(&self) -> Result<&Database, OverdueError> {
        self.db
            .get()
            .ok_or_else(|| OverdueError::storage("storage not initialized -- call initialize() first"))
    }
}

#[async_trait]
impl PluginAdapter for SqliteStorage {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, OverdueError> {
        let db = self.db()?;
        db.connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await
            .map_err(crate::database::map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), OverdueError> {
        if let Some(db) = self.db.get() {
            db.checkpoint().await?;
            debug!("shutdown: WAL checkpoint complete");
        }
        Ok(())
    }
}

#[async_trait]
impl StorageAdapter for SqliteStorage {
    async fn initialize(&self) -> Result<(), OverdueError> {
        let db = Database::open_with(&self.config.database_path, self.config.wal_mode).await?;
        self.db
            .set(db)
            .map_err(|_| OverdueError::storage("storage already initialized"))?;
        debug!(path = %self.config.database_path, "SQLite storage initialized");
        Ok(())
    }

    async fn close(&self) -> Result<(), OverdueError> {
        self.db()?.checkpoint().await?;
        debug!("WAL checkpoint complete");
        Ok(())
    }

    async fn find_by_id(&self, id: TodoId) -> Result<Option<TodoItem>, OverdueError> {
        queries::todos::get_todo(self.db()?, id).await
    }

    async fn find_all(&self) -> Result<Vec<TodoItem>, OverdueError> {
        queries::todos::list_todos(self.db()?, None).await
    }

    async fn find_by_status(&self, status: TodoStatus) -> Result<Vec<TodoItem>, OverdueError> {
        queries::todos::list_todos(self.db()?, Some(status)).await
    }

    async fn find_by_status_and_due_before(
        &self,
        status: TodoStatus,
        before: DateTime<Utc>,
    ) -> Result<Vec<TodoItem>, OverdueError> {
        queries::todos::list_todos_due_before(self.db()?, status, before).await
    }

    async fn save(&self, item: TodoItem) -> Result<TodoItem, OverdueError> {
        let db = self.db()?;
        match item.id() {
            None => queries::todos::insert_todo(db, &item).await,
            Some(id) => queries::todos::update_todo(db, id, &item)
                .await?
                .ok_or(OverdueError::NotFound { id }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use tempfile::tempdir;

    fn make_config(path: &str) -> StorageConfig {
        StorageConfig {
            database_path: path.to_string(),
            wal_mode: true,
        }
    }

    async fn initialized(dir: &tempfile::TempDir, name: &str) -> SqliteStorage {
        let db_path = dir.path().join(name);
        let storage = SqliteStorage::new(make_config(db_path.to_str().unwrap()));
        storage.initialize().await.unwrap();
        storage
    }

    #[tokio::test]
    async fn sqlite_storage_implements_plugin_adapter() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let storage = SqliteStorage::new(make_config(db_path.to_str().unwrap()));

        assert_eq!(storage.name(), "sqlite");
        assert_eq!(storage.version(), semver::Version::new(0, 1, 0));
        assert_eq!(storage.adapter_type(), AdapterType::Storage);
    }

    #[tokio::test]
    async fn initialize_opens_database_at_configured_path() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("init_test.db");
        let storage = SqliteStorage::new(make_config(db_path.to_str().unwrap()));

        storage.initialize().await.unwrap();
        assert!(db_path.exists(), "database file should be created");
    }

    #[tokio::test]
    async fn initialize_twice_returns_error() {
        let dir = tempdir().unwrap();
        let storage = initialized(&dir, "double_init.db").await;
        let result = storage.initialize().await;
        assert!(result.is_err(), "second initialize should fail");
    }

    #[tokio::test]
    async fn health_check_returns_healthy_when_initialized() {
        let dir = tempdir().unwrap();
        let storage = initialized(&dir, "health.db").await;
        let status = storage.health_check().await.unwrap();
        assert_eq!(status, HealthStatus::Healthy);
    }

    #[tokio::test]
    async fn operations_fail_when_not_initialized() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("no_init.db");
        let storage = SqliteStorage::new(make_config(db_path.to_str().unwrap()));

        assert!(storage.health_check().await.is_err());
        assert!(storage.find_all().await.is_err());
    }

    #[tokio::test]
    async fn save_assigns_id_then_updates_in_place() {
        let dir = tempdir().unwrap();
        let storage = initialized(&dir, "save.db").await;
        let now = Utc::now();

        let item = TodoItem::create("Test task", now + Duration::days(1), now).unwrap();
        let mut saved = storage.save(item).await.unwrap();
        let id = saved.id().expect("first save assigns an id");

        saved.change_description("Renamed task").unwrap();
        saved.mark_done(now).unwrap();
        let updated = storage.save(saved).await.unwrap();
        assert_eq!(updated.id(), Some(id));

        let fetched = storage.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(fetched.description(), "Renamed task");
        assert_eq!(fetched.status(), TodoStatus::Done);
        assert!(fetched.done_at().is_some());
        assert_eq!(storage.find_all().await.unwrap().len(), 1);

        storage.close().await.unwrap();
    }

    #[tokio::test]
    async fn save_unknown_id_is_not_found() {
        let dir = tempdir().unwrap();
        let storage = initialized(&dir, "missing.db").await;
        let now = Utc::now();
        let ghost = TodoItem::create("ghost", now, now)
            .unwrap()
            .with_id(TodoId(77));

        match storage.save(ghost).await {
            Err(OverdueError::NotFound { id }) => assert_eq!(id, TodoId(77)),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn sweep_query_selects_only_overdue_open_items() {
        let dir = tempdir().unwrap();
        let storage = initialized(&dir, "sweep.db").await;
        let now = Utc::now();

        let overdue = storage
            .save(TodoItem::create("overdue", now - Duration::hours(1), now - Duration::hours(2)).unwrap())
            .await
            .unwrap();
        storage
            .save(TodoItem::create("future", now + Duration::hours(1), now).unwrap())
            .await
            .unwrap();

        let due = storage
            .find_by_status_and_due_before(TodoStatus::NotDone, now)
            .await
            .unwrap();
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].id(), overdue.id());

        let open = storage.find_by_status(TodoStatus::NotDone).await.unwrap();
        assert_eq!(open.len(), 2);
    }

    #[tokio::test]
    async fn data_survives_reopen() {
        let dir = tempdir().unwrap();
        let id = {
            let storage = initialized(&dir, "reopen.db").await;
            let now = Utc::now();
            let saved = storage
                .save(TodoItem::create("persist me", now + Duration::days(1), now).unwrap())
                .await
                .unwrap();
            storage.shutdown().await.unwrap();
            saved.id().unwrap()
        };

        let storage = initialized(&dir, "reopen.db").await;
        let fetched = storage.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(fetched.description(), "persist me");
    }
}
