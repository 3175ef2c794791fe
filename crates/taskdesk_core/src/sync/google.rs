//! Google Calendar and Google Tasks bindings of the push contract.
//!
//! # Responsibility
//! - Build the documented create payload for each service.
//! - Acquire a bearer token through the credential store, then issue the
//!   single outbound create request.
//!
//! # Invariants
//! - Calendar events span exactly one hour from the scheduled time.
//! - All timestamps are sent as UTC.
//! - Base URLs come from configuration so tests never hit live hosts.

use crate::sync::credentials::{truncate_detail, CredentialStore, OAuthConfig};
use crate::sync::provider::{
    parse_scheduled_time, PushProvider, PushReceipt, PushRequest, SyncError, SyncResult,
};
use crate::sync::transport::{PushTransport, TransportResponse};
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use log::info;
use serde_json::{json, Value};
use std::sync::Arc;

pub const GOOGLE_CALENDAR_PROVIDER_ID: &str = "google_calendar";
pub const GOOGLE_TASKS_PROVIDER_ID: &str = "google_tasks";

/// Settings shared by both Google bindings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoogleApiSettings {
    pub oauth: OAuthConfig,
    pub calendar_base_url: String,
    pub tasks_base_url: String,
    /// Target calendar for event creation (`primary` by convention).
    pub calendar_id: String,
    /// Target task list for task insertion (`@default` by convention).
    pub tasks_list_id: String,
}

/// Creates a one-hour calendar event per pushed task.
pub struct GoogleCalendarProvider {
    transport: Arc<dyn PushTransport>,
    credentials: CredentialStore,
    settings: GoogleApiSettings,
}

impl GoogleCalendarProvider {
    pub fn new(
        transport: Arc<dyn PushTransport>,
        credentials: CredentialStore,
        settings: GoogleApiSettings,
    ) -> Self {
        Self {
            transport,
            credentials,
            settings,
        }
    }
}

impl PushProvider for GoogleCalendarProvider {
    fn provider_id(&self) -> &str {
        GOOGLE_CALENDAR_PROVIDER_ID
    }

    fn push(&self, request: &PushRequest) -> SyncResult<PushReceipt> {
        let start = parse_scheduled_time(&request.scheduled_time)?;
        let end = start + Duration::hours(1);
        let body = json!({
            "summary": request.title,
            "start": { "dateTime": rfc3339(start), "timeZone": "UTC" },
            "end": { "dateTime": rfc3339(end), "timeZone": "UTC" },
        });

        let token = self.credentials.ensure_access_token(
            &self.settings.oauth,
            self.transport.as_ref(),
            Utc::now().timestamp(),
        )?;
        let url = format!(
            "{}/calendars/{}/events",
            self.settings.calendar_base_url, self.settings.calendar_id
        );
        let response = self.transport.post_json(&url, &token, &body)?;
        let receipt = receipt_from(&response, "htmlLink")?;

        info!(
            "event=sync_push module=sync status=ok provider={} remote_id={} link={}",
            self.provider_id(),
            receipt.remote_id.as_deref().unwrap_or("-"),
            receipt.link.as_deref().unwrap_or("-")
        );
        Ok(receipt)
    }
}

/// Inserts a due-dated entry into a Google Tasks list per pushed task.
pub struct GoogleTasksProvider {
    transport: Arc<dyn PushTransport>,
    credentials: CredentialStore,
    settings: GoogleApiSettings,
}

impl GoogleTasksProvider {
    pub fn new(
        transport: Arc<dyn PushTransport>,
        credentials: CredentialStore,
        settings: GoogleApiSettings,
    ) -> Self {
        Self {
            transport,
            credentials,
            settings,
        }
    }
}

impl PushProvider for GoogleTasksProvider {
    fn provider_id(&self) -> &str {
        GOOGLE_TASKS_PROVIDER_ID
    }

    fn push(&self, request: &PushRequest) -> SyncResult<PushReceipt> {
        // The Tasks API wants RFC 3339 for `due`, so the scheduled time is
        // parsed and re-encoded rather than forwarded verbatim.
        let due = parse_scheduled_time(&request.scheduled_time)?;
        let body = json!({
            "title": request.title,
            "due": rfc3339(due),
        });

        let token = self.credentials.ensure_access_token(
            &self.settings.oauth,
            self.transport.as_ref(),
            Utc::now().timestamp(),
        )?;
        let url = format!(
            "{}/lists/{}/tasks",
            self.settings.tasks_base_url, self.settings.tasks_list_id
        );
        let response = self.transport.post_json(&url, &token, &body)?;
        let receipt = receipt_from(&response, "selfLink")?;

        info!(
            "event=sync_push module=sync status=ok provider={} remote_id={}",
            self.provider_id(),
            receipt.remote_id.as_deref().unwrap_or("-")
        );
        Ok(receipt)
    }
}

fn rfc3339(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn receipt_from(response: &TransportResponse, link_field: &str) -> SyncResult<PushReceipt> {
    if !response.is_success() {
        return Err(SyncError::Service {
            status: response.status,
            detail: truncate_detail(&response.body),
        });
    }

    // The remote id/link are diagnostics; a create that answered 2xx with an
    // undecodable body still counts as pushed.
    let parsed: Option<Value> = serde_json::from_str(&response.body).ok();
    let field = |name: &str| {
        parsed
            .as_ref()
            .and_then(|value| value.get(name))
            .and_then(Value::as_str)
            .map(str::to_string)
    };

    Ok(PushReceipt {
        remote_id: field("id"),
        link: field(link_field),
    })
}
