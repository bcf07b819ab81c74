// SPDX-FileCopyrightText: 2026 Overdue Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Overdue service.

use thiserror::Error;

use crate::todo::TodoError;
use crate::types::TodoId;

/// The primary error type used across storage adapters, the service layer,
/// and the HTTP gateway.
///
/// The first three variants are caller-facing and map 1:1 onto client
/// errors; the rest are infrastructure failures.
#[derive(Debug, Error)]
pub enum OverdueError {
    /// No todo item exists with the requested identity.
    #[error("todo item {id} not found")]
    NotFound { id: TodoId },

    /// Attempted mutation is illegal for the item's current status.
    #[error("{0}")]
    InvalidState(String),

    /// Malformed input rejected before any state change.
    #[error("validation error: {0}")]
    Validation(String),

    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database connection, query failure, corrupt rows).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// HTTP gateway errors (bind failure, server crash).
    #[error("gateway error: {message}")]
    Gateway {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl OverdueError {
    /// Wrap any error as a storage failure.
    pub fn storage(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Storage {
            source: source.into(),
        }
    }
}

/// Entity-level transition failures become the caller-facing taxonomy:
/// a frozen item is an invalid-state condition, a bad description is a
/// validation failure.
impl From<TodoError> for OverdueError {
    fn from(err: TodoError) -> Self {
        match err {
            TodoError::PastDue => Self::InvalidState(err.to_string()),
            TodoError::EmptyDescription
            | TodoError::DescriptionTooLong { .. }
            | TodoError::DueOutOfRange { .. } => Self::Validation(err.to_string()),
        }
    }
}
