//! Push capability contract shared by all service bindings.
//!
//! # Responsibility
//! - Define `PushProvider` and its request/receipt shapes.
//! - Define `SyncError`, the non-fatal warning type for push failures.
//!
//! # Invariants
//! - `push` makes at most one outbound create attempt per call.
//! - Receipts are diagnostic only; nothing in the store references them.

use crate::model::task::SCHEDULED_TIME_FORMAT;
use chrono::{DateTime, NaiveDateTime, Utc};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type SyncResult<T> = Result<T, SyncError>;

/// Push failure. Always surfaced as a warning after the local create has
/// committed; never retried (spec'd fire-and-forget contract).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncError {
    /// No active provider is selected in the registry.
    ProviderNotSelected,
    /// Credential is missing or cannot be refreshed; the interactive
    /// authorization step happens out-of-band, so all this layer can do is
    /// tell the operator what to provision.
    AuthRequired(String),
    /// Credential file could not be read, parsed, or written.
    Credentials(String),
    /// `scheduled_time` does not parse as `YYYY-MM-DD HH:MM`.
    InvalidScheduledTime { value: String },
    /// Request never produced an HTTP response (connect/timeout/TLS).
    Transport(String),
    /// The remote service answered with a non-success status.
    Service { status: u16, detail: String },
}

impl Display for SyncError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ProviderNotSelected => write!(f, "no sync provider selected"),
            Self::AuthRequired(message) => write!(f, "authorization required: {message}"),
            Self::Credentials(message) => write!(f, "credential storage failure: {message}"),
            Self::InvalidScheduledTime { value } => write!(
                f,
                "scheduled time `{value}` does not match {SCHEDULED_TIME_FORMAT}"
            ),
            Self::Transport(message) => write!(f, "transport failure: {message}"),
            Self::Service { status, detail } => {
                write!(f, "service rejected push: HTTP {status}: {detail}")
            }
        }
    }
}

impl Error for SyncError {}

/// The slice of a task that gets pushed: title plus its scheduled time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushRequest {
    pub title: String,
    pub scheduled_time: String,
}

/// Diagnostic result of a successful push. The original surfaced only the
/// remote link in a message; nothing downstream depends on these fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PushReceipt {
    pub remote_id: Option<String>,
    pub link: Option<String>,
}

/// One concrete external service binding.
pub trait PushProvider {
    /// Stable lowercase identifier used for registration and selection.
    fn provider_id(&self) -> &str;

    /// Creates the remote event/task. Exactly one outbound attempt.
    fn push(&self, request: &PushRequest) -> SyncResult<PushReceipt>;
}

/// Parses `scheduled_time` as `YYYY-MM-DD HH:MM`, interpreted as UTC.
///
/// This is the only place the stored text gets parsed; the store itself
/// never validates it.
pub fn parse_scheduled_time(value: &str) -> SyncResult<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(value.trim(), SCHEDULED_TIME_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|_| SyncError::InvalidScheduledTime {
            value: value.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::{parse_scheduled_time, SyncError};
    use chrono::{TimeZone, Utc};

    #[test]
    fn parses_the_documented_layout_as_utc() {
        let parsed = parse_scheduled_time("2025-03-01 09:00").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap());
    }

    #[test]
    fn rejects_other_layouts() {
        for value in ["2025-03-01", "09:00", "next tuesday", "2025-03-01T09:00:00Z"] {
            assert!(matches!(
                parse_scheduled_time(value),
                Err(SyncError::InvalidScheduledTime { .. })
            ));
        }
    }
}
