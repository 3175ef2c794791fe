//! Task domain model.
//!
//! # Responsibility
//! - Define the canonical task record stored in the `tasks` table.
//! - Validate create requests before they reach persistence.
//!
//! # Invariants
//! - `id` is assigned by the store on insert and never reused.
//! - `title`, `priority` and `scheduled_time` are immutable after creation;
//!   only `done` ever changes, and only from `false` to `true`.
//! - `scheduled_time` is opaque text at this layer. The store never parses
//!   it; only the sync adapter does, right before a push.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Stable store-assigned identifier (the SQLite rowid).
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type TaskId = i64;

/// Expected layout of `scheduled_time`, as shown to users and as parsed by
/// the sync adapter.
pub const SCHEDULED_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Urgency bucket chosen at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    /// Canonical storage/config spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }

    /// Parses user or persisted input, case-insensitively.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "high" => Some(Self::High),
            "medium" => Some(Self::Medium),
            "low" => Some(Self::Low),
            _ => None,
        }
    }
}

impl Display for Priority {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical persisted task record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub priority: Priority,
    /// `YYYY-MM-DD HH:MM` by convention; not enforced here.
    pub scheduled_time: String,
    pub done: bool,
}

/// Create-request shape. The store assigns the id and sets `done = false`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub priority: Priority,
    pub scheduled_time: String,
}

impl NewTask {
    pub fn new(
        title: impl Into<String>,
        priority: Priority,
        scheduled_time: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            priority,
            scheduled_time: scheduled_time.into(),
        }
    }

    /// Rejects requests with missing required input.
    ///
    /// Whitespace-only values count as empty. Runs before any SQL so a
    /// failed create leaves the store untouched.
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        if self.title.trim().is_empty() {
            return Err(TaskValidationError::EmptyTitle);
        }
        if self.scheduled_time.trim().is_empty() {
            return Err(TaskValidationError::EmptyScheduledTime);
        }
        Ok(())
    }
}

/// Validation failure for a create request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskValidationError {
    EmptyTitle,
    EmptyScheduledTime,
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "task title must not be empty"),
            Self::EmptyScheduledTime => write!(f, "scheduled time must not be empty"),
        }
    }
}

impl Error for TaskValidationError {}
