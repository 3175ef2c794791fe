//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository and sync calls into the command layer the
//!   presentation shell invokes.
//! - Keep CLI/UI layers decoupled from storage and network details.

pub mod task_service;
