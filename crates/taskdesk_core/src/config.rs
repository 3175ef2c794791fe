//! Application configuration.
//!
//! # Responsibility
//! - Define the TOML-backed settings for storage, logging and sync.
//! - Keep every path and endpoint configurable; nothing is hardcoded at
//!   the call sites.
//!
//! # Invariants
//! - A missing config file means defaults, not an error.
//! - Unknown provider ids are caught at wiring time by the registry, not
//!   here; this layer only carries the strings.

use crate::sync::credentials::OAuthConfig;
use crate::sync::google::{GoogleApiSettings, GOOGLE_CALENDAR_PROVIDER_ID};
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: std::io::Error },
    Parse { path: PathBuf, source: toml::de::Error },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "read config `{}`: {source}", path.display())
            }
            Self::Parse { path, source } => {
                write!(f, "parse config `{}`: {source}", path.display())
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
        }
    }
}

/// Root configuration document.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    pub sync: SyncConfig,
}

impl Config {
    /// Parses the TOML file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Like [`Config::load`], but a missing file yields the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// SQLite file holding the `tasks` table.
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("taskdesk.db"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `trace|debug|info|warn|error`; build-mode default when unset.
    pub level: Option<String>,
    /// Absolute directory for rolling log files; logging is skipped when
    /// unset and the host does not supply one.
    pub dir: Option<PathBuf>,
}

/// External push settings. Disabled by default: a fresh install is a purely
/// local to-do list until credentials are provisioned.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    pub enabled: bool,
    /// Active binding: `google_calendar` or `google_tasks`.
    pub provider: String,
    pub calendar_id: String,
    pub tasks_list_id: String,
    /// Where the JSON credential blob lives.
    pub token_path: PathBuf,
    pub token_endpoint: String,
    pub client_id: String,
    pub client_secret: String,
    pub calendar_base_url: String,
    pub tasks_base_url: String,
    pub request_timeout_secs: u64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            provider: GOOGLE_CALENDAR_PROVIDER_ID.to_string(),
            calendar_id: "primary".to_string(),
            tasks_list_id: "@default".to_string(),
            token_path: PathBuf::from("token.json"),
            token_endpoint: "https://oauth2.googleapis.com/token".to_string(),
            client_id: String::new(),
            client_secret: String::new(),
            calendar_base_url: "https://www.googleapis.com/calendar/v3".to_string(),
            tasks_base_url: "https://tasks.googleapis.com/tasks/v1".to_string(),
            request_timeout_secs: 30,
        }
    }
}

impl SyncConfig {
    /// Projects the provider-facing settings out of the config document.
    pub fn google_settings(&self) -> GoogleApiSettings {
        GoogleApiSettings {
            oauth: OAuthConfig {
                token_endpoint: self.token_endpoint.clone(),
                client_id: self.client_id.clone(),
                client_secret: self.client_secret.clone(),
            },
            calendar_base_url: self.calendar_base_url.clone(),
            tasks_base_url: self.tasks_base_url.clone(),
            calendar_id: self.calendar_id.clone(),
            tasks_list_id: self.tasks_list_id.clone(),
        }
    }
}
