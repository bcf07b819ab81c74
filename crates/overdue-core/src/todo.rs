// SPDX-FileCopyrightText: 2026 Overdue Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The todo item entity and its lifecycle state machine.
//!
//! ```text
//!   create ──► NotDone ◄──── mark_not_done ────┐
//!                 │                             │
//!                 ├──── mark_done ───────────► Done
//!                 │                             │
//!                 └──► PastDue ◄── mark_past_due┘
//! ```
//!
//! `PastDue` is terminal: every user-driven operation on it fails with
//! [`TodoError::PastDue`] and leaves the item untouched. Only the past-due
//! sweep calls [`TodoItem::mark_past_due`], which never fails.

use chrono::{DateTime, Datelike, Utc};
use thiserror::Error;

use crate::types::{TodoId, TodoStatus};

/// Maximum description length in characters.
pub const MAX_DESCRIPTION_LEN: usize = 255;

/// Due times must fall within four-digit years.
pub const MIN_DUE_YEAR: i32 = 0;
pub const MAX_DUE_YEAR: i32 = 9999;

/// Why an entity operation was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TodoError {
    /// The item is past due and frozen.
    #[error("Past-due items cannot be modified")]
    PastDue,

    /// The description is empty or whitespace only.
    #[error("description must not be empty")]
    EmptyDescription,

    /// The description exceeds [`MAX_DESCRIPTION_LEN`].
    #[error("description is {len} characters long, the maximum is {max}")]
    DescriptionTooLong { len: usize, max: usize },

    /// The due time lies outside [`MIN_DUE_YEAR`]..=[`MAX_DUE_YEAR`].
    #[error("due time {due_at} is outside years 0000 to 9999")]
    DueOutOfRange { due_at: DateTime<Utc> },
}

/// A persisted status/`done_at` pair that cannot be represented.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("status {status} is inconsistent with done_at {done_at:?}")]
pub struct InconsistentState {
    pub status: TodoStatus,
    pub done_at: Option<DateTime<Utc>>,
}

/// Lifecycle state with its payload. `done_at` exists only while `Done`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TodoState {
    NotDone,
    Done { done_at: DateTime<Utc> },
    PastDue,
}

impl TodoState {
    /// The flat status tag.
    pub fn status(&self) -> TodoStatus {
        match self {
            Self::NotDone => TodoStatus::NotDone,
            Self::Done { .. } => TodoStatus::Done,
            Self::PastDue => TodoStatus::PastDue,
        }
    }

    pub fn done_at(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Done { done_at } => Some(*done_at),
            Self::NotDone | Self::PastDue => None,
        }
    }

    /// Rebuild a state from its stored columns.
    pub fn from_parts(
        status: TodoStatus,
        done_at: Option<DateTime<Utc>>,
    ) -> Result<Self, InconsistentState> {
        match (status, done_at) {
            (TodoStatus::NotDone, None) => Ok(Self::NotDone),
            (TodoStatus::Done, Some(done_at)) => Ok(Self::Done { done_at }),
            (TodoStatus::PastDue, None) => Ok(Self::PastDue),
            (status, done_at) => Err(InconsistentState { status, done_at }),
        }
    }
}

/// A single to-do item.
///
/// Fields are private so every change goes through a transition method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoItem {
    id: Option<TodoId>,
    description: String,
    state: TodoState,
    created_at: DateTime<Utc>,
    due_at: DateTime<Utc>,
}

impl TodoItem {
    /// Create a new, unsaved item in the `NotDone` state.
    ///
    /// `due_at` may already lie in the past; such an item is picked up by
    /// the next sweep rather than rejected here. It must fall within
    /// four-digit years.
    pub fn create(
        description: impl Into<String>,
        due_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<Self, TodoError> {
        let description = validate_description(description.into())?;
        if !(MIN_DUE_YEAR..=MAX_DUE_YEAR).contains(&due_at.year()) {
            return Err(TodoError::DueOutOfRange { due_at });
        }
        Ok(Self {
            id: None,
            description,
            state: TodoState::NotDone,
            created_at: now,
            due_at,
        })
    }

    /// Reassemble an item loaded from a store. No validation is applied.
    pub fn restore(
        id: TodoId,
        description: String,
        state: TodoState,
        created_at: DateTime<Utc>,
        due_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Some(id),
            description,
            state,
            created_at,
            due_at,
        }
    }

    /// Attach the identity a store assigned on first save.
    pub fn with_id(mut self, id: TodoId) -> Self {
        debug_assert!(
            self.id.is_none_or(|existing| existing == id),
            "todo identity is immutable once assigned"
        );
        self.id = Some(id);
        self
    }

    pub fn mark_done(&mut self, now: DateTime<Utc>) -> Result<(), TodoError> {
        self.ensure_open()?;
        self.state = TodoState::Done { done_at: now };
        Ok(())
    }

    pub fn mark_not_done(&mut self) -> Result<(), TodoError> {
        self.ensure_open()?;
        self.state = TodoState::NotDone;
        Ok(())
    }

    /// Replace the description. Input is validated before the state check.
    pub fn change_description(&mut self, description: impl Into<String>) -> Result<(), TodoError> {
        let description = validate_description(description.into())?;
        self.ensure_open()?;
        self.description = description;
        Ok(())
    }

    /// Freeze the item. A no-op when already past due.
    pub fn mark_past_due(&mut self) {
        if self.state != TodoState::PastDue {
            self.state = TodoState::PastDue;
        }
    }

    fn ensure_open(&self) -> Result<(), TodoError> {
        match self.state {
            TodoState::PastDue => Err(TodoError::PastDue),
            TodoState::NotDone | TodoState::Done { .. } => Ok(()),
        }
    }

    pub fn id(&self) -> Option<TodoId> {
        self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn state(&self) -> TodoState {
        self.state
    }

    pub fn status(&self) -> TodoStatus {
        self.state.status()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn due_at(&self) -> DateTime<Utc> {
        self.due_at
    }

    pub fn done_at(&self) -> Option<DateTime<Utc>> {
        self.state.done_at()
    }
}

fn validate_description(description: String) -> Result<String, TodoError> {
    let trimmed = description.trim();
    if trimmed.is_empty() {
        return Err(TodoError::EmptyDescription);
    }
    let len = trimmed.chars().count();
    if len > MAX_DESCRIPTION_LEN {
        return Err(TodoError::DescriptionTooLong {
            len,
            max: MAX_DESCRIPTION_LEN,
        });
    }
    Ok(trimmed.to_string())
}
