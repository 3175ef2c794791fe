//! Task use-case service: the command layer behind every user action.
//!
//! # Responsibility
//! - Provide the Create/List/MarkDone/Delete entry points.
//! - Trigger the external push as a side effect of every successful create.
//!
//! # Invariants
//! - A failed push never rolls back or fails the local create; it comes
//!   back as a warning in the outcome.
//! - Validation and no-selection failures abort before any mutation.

use crate::model::task::{NewTask, Task, TaskId, TaskValidationError};
use crate::repo::task_repo::{RepoError, TaskRepository};
use crate::sync::provider::{PushRequest, SyncError};
use crate::sync::registry::ProviderRegistry;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Command-layer error surfaced to the presentation shell.
#[derive(Debug)]
pub enum TaskServiceError {
    /// Missing required input on create.
    Validation(TaskValidationError),
    /// Mark-done/delete aimed at a task that does not exist.
    NoSelection(TaskId),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for TaskServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NoSelection(id) => write!(f, "no task selected: id {id} does not exist"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for TaskServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::NoSelection(_) => None,
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<RepoError> for TaskServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err),
            RepoError::NotFound(id) => Self::NoSelection(id),
            other => Self::Repo(other),
        }
    }
}

/// Result of a create: the local insert always wins; the push outcome rides
/// along as an optional warning.
#[derive(Debug)]
pub struct CreateTaskOutcome {
    pub id: TaskId,
    pub sync_warning: Option<SyncError>,
}

/// Use-case facade over the task repository and the sync registry.
pub struct TaskService<R: TaskRepository> {
    repo: R,
    sync: Option<ProviderRegistry>,
}

impl<R: TaskRepository> TaskService<R> {
    /// Service without sync: creates are purely local.
    pub fn new(repo: R) -> Self {
        Self { repo, sync: None }
    }

    /// Service with a configured sync registry; every create also pushes
    /// through the registry's active binding.
    pub fn with_sync(repo: R, sync: ProviderRegistry) -> Self {
        Self {
            repo,
            sync: Some(sync),
        }
    }

    /// Creates a task, then fires the one push attempt.
    ///
    /// # Contract
    /// - `ValidationError` aborts before any mutation.
    /// - The insert commits before the push starts; a push failure is
    ///   reported in `sync_warning`, never as an `Err`.
    pub fn create_task(&self, request: &NewTask) -> Result<CreateTaskOutcome, TaskServiceError> {
        let id = self.repo.create_task(request)?;
        info!("event=task_create module=service status=ok task_id={id}");

        let sync_warning = self.push_created(id, request);
        Ok(CreateTaskOutcome { id, sync_warning })
    }

    /// Lists every task in ascending id order.
    pub fn list_tasks(&self) -> Result<Vec<Task>, TaskServiceError> {
        Ok(self.repo.list_tasks()?)
    }

    /// Reads one task back by id.
    pub fn get_task(&self, id: TaskId) -> Result<Option<Task>, TaskServiceError> {
        Ok(self.repo.get_task(id)?)
    }

    /// Flips `done` to true. Idempotent for already-done tasks; a missing
    /// id is the no-selection condition.
    pub fn mark_done(&self, id: TaskId) -> Result<(), TaskServiceError> {
        self.repo.mark_done(id)?;
        info!("event=task_done module=service status=ok task_id={id}");
        Ok(())
    }

    /// Removes the task permanently. Irreversible; a missing id is the
    /// no-selection condition.
    pub fn delete_task(&self, id: TaskId) -> Result<(), TaskServiceError> {
        self.repo.delete_task(id)?;
        info!("event=task_delete module=service status=ok task_id={id}");
        Ok(())
    }

    fn push_created(&self, id: TaskId, request: &NewTask) -> Option<SyncError> {
        let registry = self.sync.as_ref()?;
        let push = PushRequest {
            title: request.title.clone(),
            scheduled_time: request.scheduled_time.clone(),
        };

        match registry.push_active(&push) {
            Ok(_) => None,
            Err(err) => {
                warn!("event=sync_push module=service status=warn task_id={id} error={err}");
                Some(err)
            }
        }
    }
}
