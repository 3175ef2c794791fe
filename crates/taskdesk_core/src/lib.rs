//! Core domain logic for TaskDesk.
//! This crate is the single source of truth for business invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod sync;

pub use config::{Config, ConfigError, DatabaseConfig, LoggingConfig, SyncConfig};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::task::{NewTask, Priority, Task, TaskId, TaskValidationError};
pub use repo::task_repo::{RepoError, RepoResult, SqliteTaskRepository, TaskRepository};
pub use service::task_service::{CreateTaskOutcome, TaskService, TaskServiceError};
pub use sync::provider::{PushProvider, PushReceipt, PushRequest, SyncError};
pub use sync::registry::{ProviderRegistry, ProviderRegistryError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
