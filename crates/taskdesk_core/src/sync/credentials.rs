//! Locally cached bearer credential for the sync adapter.
//!
//! # Responsibility
//! - Load/persist the JSON credential blob at its configured path.
//! - Hand out a usable access token, refreshing it on demand.
//!
//! # Invariants
//! - The file is read before every push and rewritten after any refresh.
//! - The interactive authorization step is out-of-band: when the file is
//!   missing or unrefreshable this layer reports `AuthRequired` and stops.

use crate::sync::provider::{SyncError, SyncResult};
use crate::sync::transport::PushTransport;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Tokens expiring within this window are treated as already expired, so a
/// push never starts with a token about to lapse mid-request.
const EXPIRY_SKEW_SECS: i64 = 60;

/// Persisted credential blob, as written by the out-of-band authorization
/// step and rewritten here after each refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    pub access_token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    /// Unix seconds.
    pub expires_at: i64,
}

impl Credential {
    pub fn is_expired(&self, now: i64) -> bool {
        self.expires_at <= now + EXPIRY_SKEW_SECS
    }
}

/// OAuth client settings needed to refresh a token. All values come from
/// configuration; nothing is hardcoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuthConfig {
    pub token_endpoint: String,
    pub client_id: String,
    pub client_secret: String,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
    refresh_token: Option<String>,
}

/// File-backed credential storage at a configurable path.
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the credential file. `None` when it does not exist yet.
    pub fn load(&self) -> SyncResult<Option<Credential>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path).map_err(|err| {
            SyncError::Credentials(format!("read `{}`: {err}", self.path.display()))
        })?;
        let credential = serde_json::from_str(&content).map_err(|err| {
            SyncError::Credentials(format!("parse `{}`: {err}", self.path.display()))
        })?;
        Ok(Some(credential))
    }

    /// Rewrites the credential file, creating parent directories as needed.
    pub fn save(&self, credential: &Credential) -> SyncResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|err| {
                SyncError::Credentials(format!("create `{}`: {err}", parent.display()))
            })?;
        }
        let content = serde_json::to_string_pretty(credential)
            .map_err(|err| SyncError::Credentials(err.to_string()))?;
        fs::write(&self.path, content).map_err(|err| {
            SyncError::Credentials(format!("write `{}`: {err}", self.path.display()))
        })?;
        Ok(())
    }

    /// Returns an access token valid for at least the expiry skew window.
    ///
    /// Expired credentials are refreshed through the token endpoint and the
    /// refreshed blob is persisted back to the same path. A missing file or
    /// a credential without a refresh token is an `AuthRequired` failure:
    /// provisioning happens out-of-band, never here.
    pub fn ensure_access_token(
        &self,
        oauth: &OAuthConfig,
        transport: &dyn PushTransport,
        now: i64,
    ) -> SyncResult<String> {
        let Some(credential) = self.load()? else {
            return Err(SyncError::AuthRequired(format!(
                "credential file `{}` not found; authorize out-of-band and place it there",
                self.path.display()
            )));
        };

        if !credential.is_expired(now) {
            return Ok(credential.access_token);
        }

        let Some(refresh_token) = credential.refresh_token.as_deref() else {
            return Err(SyncError::AuthRequired(format!(
                "credential in `{}` is expired and has no refresh token; re-authorize out-of-band",
                self.path.display()
            )));
        };

        info!("event=token_refresh module=sync status=start");
        let refreshed = self.refresh(oauth, transport, refresh_token, now);
        match &refreshed {
            Ok(_) => info!("event=token_refresh module=sync status=ok"),
            Err(err) => warn!("event=token_refresh module=sync status=warn error={err}"),
        }
        refreshed
    }

    fn refresh(
        &self,
        oauth: &OAuthConfig,
        transport: &dyn PushTransport,
        refresh_token: &str,
        now: i64,
    ) -> SyncResult<String> {
        let response = transport.post_form(
            &oauth.token_endpoint,
            &[
                ("client_id", oauth.client_id.as_str()),
                ("client_secret", oauth.client_secret.as_str()),
                ("refresh_token", refresh_token),
                ("grant_type", "refresh_token"),
            ],
        )?;

        if !response.is_success() {
            return Err(SyncError::Service {
                status: response.status,
                detail: truncate_detail(&response.body),
            });
        }

        let token: TokenResponse = serde_json::from_str(&response.body)
            .map_err(|err| SyncError::Credentials(format!("parse token response: {err}")))?;

        let credential = Credential {
            access_token: token.access_token,
            // The endpoint may rotate the refresh token; keep the old one
            // when it does not.
            refresh_token: token
                .refresh_token
                .or_else(|| Some(refresh_token.to_string())),
            expires_at: now + token.expires_in,
        };
        self.save(&credential)?;

        Ok(credential.access_token)
    }
}

pub(crate) fn truncate_detail(body: &str) -> String {
    const MAX_DETAIL_CHARS: usize = 240;
    let normalized = body.trim().replace(['\n', '\r'], " ");
    let mut detail: String = normalized.chars().take(MAX_DETAIL_CHARS).collect();
    if normalized.chars().count() > MAX_DETAIL_CHARS {
        detail.push_str("...");
    }
    detail
}

#[cfg(test)]
mod tests {
    use super::{truncate_detail, Credential};

    #[test]
    fn expiry_check_applies_skew() {
        let credential = Credential {
            access_token: "abc".to_string(),
            refresh_token: None,
            expires_at: 1_000,
        };
        assert!(!credential.is_expired(800));
        assert!(credential.is_expired(950));
        assert!(credential.is_expired(1_200));
    }

    #[test]
    fn detail_is_single_line_and_bounded() {
        let detail = truncate_detail(&format!("line1\nline2\r{}", "x".repeat(400)));
        assert!(!detail.contains('\n'));
        assert!(detail.ends_with("..."));
    }
}
