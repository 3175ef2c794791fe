//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the task-store data access contract.
//! - Isolate SQLite query details from the command layer.
//!
//! # Invariants
//! - Repository writes enforce `NewTask::validate()` before persistence.
//! - Repository APIs return semantic errors (`NotFound`) in addition to DB
//!   transport errors.

pub mod task_repo;
