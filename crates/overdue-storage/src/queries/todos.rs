// SPDX-FileCopyrightText: 2026 Overdue Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Todo item queries.

use chrono::{DateTime, Utc};
use overdue_core::{OverdueError, TodoId, TodoItem, TodoStatus};
use rusqlite::params;

use crate::database::{map_tr_err, Database};
use crate::models::{to_db_timestamp, todo_from_row, TODO_COLUMNS};

/// Get a todo item by ID.
pub async fn get_todo(db: &Database, id: TodoId) -> Result<Option<TodoItem>, OverdueError> {
    db.connection()
        .call(move |conn| -> Result<Option<TodoItem>, rusqlite::Error> {
            let sql = format!("SELECT {TODO_COLUMNS} FROM todo_items WHERE id = ?1");
            match conn.query_row(&sql, params![id.0], todo_from_row) {
                Ok(item) => Ok(Some(item)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(map_tr_err)
}

/// List todo items, optionally filtered by status, oldest first.
pub async fn list_todos(
    db: &Database,
    status: Option<TodoStatus>,
) -> Result<Vec<TodoItem>, OverdueError> {
    let status = status.map(|s| s.to_string());
    db.connection()
        .call(move |conn| -> Result<Vec<TodoItem>, rusqlite::Error> {
            let sql = format!(
                "SELECT {TODO_COLUMNS} FROM todo_items
                 WHERE (?1 IS NULL OR status = ?1)
                 ORDER BY id ASC"
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map(params![status], todo_from_row)?;
            rows.collect()
        })
        .await
        .map_err(map_tr_err)
}

/// List items with `status` whose due time is strictly before `before`.
pub async fn list_todos_due_before(
    db: &Database,
    status: TodoStatus,
    before: DateTime<Utc>,
) -> Result<Vec<TodoItem>, OverdueError> {
    let status = status.to_string();
    let before = to_db_timestamp(before);
    db.connection()
        .call(move |conn| -> Result<Vec<TodoItem>, rusqlite::Error> {
            let sql = format!(
                "SELECT {TODO_COLUMNS} FROM todo_items
                 WHERE status = ?1 AND due_at < ?2
                 ORDER BY due_at ASC, id ASC"
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map(params![status, before], todo_from_row)?;
            rows.collect()
        })
        .await
        .map_err(map_tr_err)
}

/// Insert a new item, returning it as stored with its assigned ID.
pub async fn insert_todo(db: &Database, item: &TodoItem) -> Result<TodoItem, OverdueError> {
    let description = item.description().to_string();
    let status = item.status().to_string();
    let created_at = to_db_timestamp(item.created_at());
    let due_at = to_db_timestamp(item.due_at());
    let done_at = item.done_at().map(to_db_timestamp);
    db.connection()
        .call(move |conn| -> Result<TodoItem, rusqlite::Error> {
            let sql = format!(
                "INSERT INTO todo_items (description, status, created_at, due_at, done_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 RETURNING {TODO_COLUMNS}"
            );
            conn.query_row(
                &sql,
                params![description, status, created_at, due_at, done_at],
                todo_from_row,
            )
        })
        .await
        .map_err(map_tr_err)
}

/// Overwrite the mutable columns of an existing item.
///
/// `created_at` and `due_at` are never rewritten. Returns `Ok(None)` when
/// no row has the item's ID.
pub async fn update_todo(
    db: &Database,
    id: TodoId,
    item: &TodoItem,
) -> Result<Option<TodoItem>, OverdueError> {
    let description = item.description().to_string();
    let status = item.status().to_string();
    let done_at = item.done_at().map(to_db_timestamp);
    db.connection()
        .call(move |conn| -> Result<Option<TodoItem>, rusqlite::Error> {
            let sql = format!(
                "UPDATE todo_items SET description = ?1, status = ?2, done_at = ?3
                 WHERE id = ?4
                 RETURNING {TODO_COLUMNS}"
            );
            match conn.query_row(&sql, params![description, status, done_at, id.0], todo_from_row) {
                Ok(item) => Ok(Some(item)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use tempfile::tempdir;

    async fn setup_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
        (db, dir)
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
    }

    fn make_todo(description: &str, due_in: Duration) -> TodoItem {
        TodoItem::create(description, t0() + due_in, t0()).unwrap()
    }

    #[tokio::test]
    async fn insert_and_get_roundtrips() {
        let (db, _dir) = setup_db().await;
        let item = make_todo("Test task", Duration::days(1));

        let saved = insert_todo(&db, &item).await.unwrap();
        let id = saved.id().expect("insert assigns an id");

        let fetched = get_todo(&db, id).await.unwrap().unwrap();
        assert_eq!(fetched, saved);
        assert_eq!(fetched.description(), "Test task");
        assert_eq!(fetched.status(), TodoStatus::NotDone);
        assert_eq!(fetched.created_at(), t0());
        assert_eq!(fetched.due_at(), t0() + Duration::days(1));
        assert!(fetched.done_at().is_none());

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn get_nonexistent_todo_returns_none() {
        let (db, _dir) = setup_db().await;
        assert!(get_todo(&db, TodoId(999)).await.unwrap().is_none());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn ids_are_assigned_in_sequence() {
        let (db, _dir) = setup_db().await;
        let a = insert_todo(&db, &make_todo("a", Duration::hours(1))).await.unwrap();
        let b = insert_todo(&db, &make_todo("b", Duration::hours(1))).await.unwrap();
        assert!(a.id().unwrap() < b.id().unwrap());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn update_persists_done_state() {
        let (db, _dir) = setup_db().await;
        let mut saved = insert_todo(&db, &make_todo("finish", Duration::days(1)))
            .await
            .unwrap();
        let id = saved.id().unwrap();

        saved.mark_done(t0() + Duration::minutes(30)).unwrap();
        let updated = update_todo(&db, id, &saved).await.unwrap().unwrap();
        assert_eq!(updated.status(), TodoStatus::Done);
        assert_eq!(updated.done_at(), Some(t0() + Duration::minutes(30)));

        let mut reopened = updated.clone();
        reopened.mark_not_done().unwrap();
        let updated = update_todo(&db, id, &reopened).await.unwrap().unwrap();
        assert_eq!(updated.status(), TodoStatus::NotDone);
        assert!(updated.done_at().is_none());

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn update_missing_row_returns_none() {
        let (db, _dir) = setup_db().await;
        let ghost = make_todo("ghost", Duration::days(1)).with_id(TodoId(42));
        assert!(update_todo(&db, TodoId(42), &ghost).await.unwrap().is_none());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn list_with_and_without_status_filter() {
        let (db, _dir) = setup_db().await;
        let open = insert_todo(&db, &make_todo("open", Duration::days(1))).await.unwrap();
        let mut done = insert_todo(&db, &make_todo("done", Duration::days(1))).await.unwrap();
        done.mark_done(t0()).unwrap();
        update_todo(&db, done.id().unwrap(), &done).await.unwrap();
        let mut late = insert_todo(&db, &make_todo("late", -Duration::days(1))).await.unwrap();
        late.mark_past_due();
        update_todo(&db, late.id().unwrap(), &late).await.unwrap();

        let all = list_todos(&db, None).await.unwrap();
        assert_eq!(all.len(), 3);

        let not_done = list_todos(&db, Some(TodoStatus::NotDone)).await.unwrap();
        assert_eq!(not_done.len(), 1);
        assert_eq!(not_done[0].id(), open.id());

        let past_due = list_todos(&db, Some(TodoStatus::PastDue)).await.unwrap();
        assert_eq!(past_due.len(), 1);
        assert_eq!(past_due[0].description(), "late");

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn due_before_is_strict_and_status_filtered() {
        let (db, _dir) = setup_db().await;
        let overdue = insert_todo(&db, &make_todo("overdue", -Duration::hours(1))).await.unwrap();
        insert_todo(&db, &make_todo("exactly now", Duration::zero())).await.unwrap();
        insert_todo(&db, &make_todo("future", Duration::hours(1))).await.unwrap();
        let mut done_late = insert_todo(&db, &make_todo("done late", -Duration::hours(2)))
            .await
            .unwrap();
        done_late.mark_done(t0()).unwrap();
        update_todo(&db, done_late.id().unwrap(), &done_late).await.unwrap();

        let due = list_todos_due_before(&db, TodoStatus::NotDone, t0()).await.unwrap();
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].id(), overdue.id());

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn schema_rejects_done_without_done_at() {
        let (db, _dir) = setup_db().await;
        let result = db
            .connection()
            .call(|conn| -> Result<usize, rusqlite::Error> {
                conn.execute(
                    "INSERT INTO todo_items (description, status, created_at, due_at, done_at)
                     VALUES ('bad', 'DONE', '2026-01-01T00:00:00.000Z', '2026-01-02T00:00:00.000Z', NULL)",
                    [],
                )
            })
            .await;
        assert!(result.is_err(), "CHECK constraint should reject the row");
        db.close().await.unwrap();
    }
}
