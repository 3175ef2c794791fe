//! CLI entry point: the adapter-thin presentation shell.
//!
//! # Responsibility
//! - Map each user action (`add`, `list`, `done`, `delete`) onto one
//!   command-layer call in `taskdesk_core`.
//! - Wire configuration, logging, storage and the sync registry together.
//!
//! All rendering here is derived from store state at print time; nothing
//! presentational is persisted.

use clap::{Parser, Subcommand};
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use taskdesk_core::db::open_db;
use taskdesk_core::sync::credentials::CredentialStore;
use taskdesk_core::sync::google::{GoogleCalendarProvider, GoogleTasksProvider};
use taskdesk_core::sync::transport::{HttpTransport, PushTransport};
use taskdesk_core::{
    default_log_level, init_logging, Config, NewTask, Priority, ProviderRegistry,
    SqliteTaskRepository, SyncConfig, Task, TaskService,
};

#[derive(Parser)]
#[command(name = "taskdesk", version, about = "Local to-do list with optional calendar sync")]
struct Cli {
    /// Path to the TOML config file.
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Add a task; when sync is enabled it is also pushed to the
    /// configured service.
    Add {
        title: String,
        /// high, medium or low.
        #[arg(long, default_value = "medium")]
        priority: String,
        /// Scheduled time, `YYYY-MM-DD HH:MM`.
        #[arg(long = "at", value_name = "TIME")]
        scheduled_time: String,
    },
    /// List all tasks in creation order.
    List,
    /// Mark a task as done.
    Done { id: i64 },
    /// Delete a task permanently.
    Delete { id: i64 },
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let config_path = cli.config.clone().unwrap_or_else(default_config_path);
    let config = Config::load_or_default(&config_path)?;

    setup_logging(&config);

    let conn = open_db(&config.database.path)?;
    let repo = SqliteTaskRepository::try_new(&conn)?;
    let service = if config.sync.enabled {
        TaskService::with_sync(repo, build_registry(&config.sync)?)
    } else {
        TaskService::new(repo)
    };

    match cli.command {
        Command::Add {
            title,
            priority,
            scheduled_time,
        } => {
            let priority = Priority::parse(&priority)
                .ok_or_else(|| format!("unknown priority `{priority}`; use high, medium or low"))?;
            let outcome = service.create_task(&NewTask::new(title, priority, scheduled_time))?;
            println!("Created task {}.", outcome.id);
            if let Some(warning) = outcome.sync_warning {
                eprintln!("warning: task saved locally, but sync failed: {warning}");
            }
        }
        Command::List => render_table(&service.list_tasks()?),
        Command::Done { id } => {
            service.mark_done(id)?;
            println!("Task {id} marked as done.");
        }
        Command::Delete { id } => {
            service.delete_task(id)?;
            println!("Task {id} deleted.");
        }
    }

    Ok(())
}

fn setup_logging(config: &Config) {
    let level = config
        .logging
        .level
        .clone()
        .unwrap_or_else(|| default_log_level().to_string());
    let dir = config
        .logging
        .dir
        .clone()
        .or_else(|| dirs::data_local_dir().map(|base| base.join("taskdesk").join("logs")));

    // A CLI session without file logging is still usable; report and move on.
    if let Some(dir) = dir.as_deref().and_then(|path| path.to_str()) {
        if let Err(err) = init_logging(&level, dir) {
            eprintln!("warning: logging disabled: {err}");
        }
    }
}

fn build_registry(sync: &SyncConfig) -> Result<ProviderRegistry, Box<dyn Error>> {
    let transport: Arc<dyn PushTransport> = Arc::new(HttpTransport::new(Duration::from_secs(
        sync.request_timeout_secs,
    ))?);
    let settings = sync.google_settings();

    let mut registry = ProviderRegistry::new();
    registry.register(Arc::new(GoogleCalendarProvider::new(
        transport.clone(),
        CredentialStore::new(&sync.token_path),
        settings.clone(),
    )))?;
    registry.register(Arc::new(GoogleTasksProvider::new(
        transport,
        CredentialStore::new(&sync.token_path),
        settings,
    )))?;
    registry.select_active(&sync.provider)?;

    Ok(registry)
}

fn render_table(tasks: &[Task]) {
    if tasks.is_empty() {
        println!("No tasks.");
        return;
    }

    let title_width = tasks
        .iter()
        .map(|task| task.title.chars().count())
        .chain(std::iter::once("Task".len()))
        .max()
        .unwrap_or(4);

    println!(
        "{:>4}  {:<title_width$}  {:<8}  {:<16}  Status",
        "ID", "Task", "Priority", "Scheduled"
    );
    for task in tasks {
        println!(
            "{:>4}  {:<title_width$}  {:<8}  {:<16}  {}",
            task.id,
            task.title,
            task.priority,
            task.scheduled_time,
            status_cell(task)
        );
    }
}

fn status_cell(task: &Task) -> &'static str {
    if task.done {
        "done"
    } else {
        "open"
    }
}

fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .map(|base| base.join("taskdesk").join("taskdesk.toml"))
        .unwrap_or_else(|| PathBuf::from("taskdesk.toml"))
}
