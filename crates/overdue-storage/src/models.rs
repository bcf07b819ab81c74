// SPDX-FileCopyrightText: 2026 Overdue Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Row mapping between `todo_items` and [`TodoItem`].
//!
//! Timestamps are stored as UTC RFC 3339 text with millisecond precision
//! (`2026-01-01T00:00:00.000Z`). The format is fixed-width, so SQL string
//! comparison orders rows chronologically.

use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use overdue_core::{TodoId, TodoItem, TodoState, TodoStatus};
use rusqlite::types::Type;
use rusqlite::Row;

/// Column list shared by every query that materializes a [`TodoItem`].
pub(crate) const TODO_COLUMNS: &str = "id, description, status, created_at, due_at, done_at";

/// Format a timestamp for storage.
pub fn to_db_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse a stored timestamp.
pub fn parse_db_timestamp(text: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(text).map(|ts| ts.with_timezone(&Utc))
}

/// Build a [`TodoItem`] from a row selected with [`TODO_COLUMNS`].
pub(crate) fn todo_from_row(row: &Row<'_>) -> rusqlite::Result<TodoItem> {
    let id: i64 = row.get(0)?;
    let description: String = row.get(1)?;
    let status_text: String = row.get(2)?;
    let status = TodoStatus::from_str(&status_text).map_err(|e| conversion_error(2, e))?;
    let created_at = timestamp_column(row, 3)?;
    let due_at = timestamp_column(row, 4)?;
    let done_at = match row.get::<_, Option<String>>(5)? {
        Some(text) => Some(parse_db_timestamp(&text).map_err(|e| conversion_error(5, e))?),
        None => None,
    };
    let state = TodoState::from_parts(status, done_at).map_err(|e| conversion_error(2, e))?;

    Ok(TodoItem::restore(
        TodoId(id),
        description,
        state,
        created_at,
        due_at,
    ))
}

fn timestamp_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let text: String = row.get(idx)?;
    parse_db_timestamp(&text).map_err(|e| conversion_error(idx, e))
}

fn conversion_error(
    idx: usize,
    err: impl std::error::Error + Send + Sync + 'static,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(err))
}
