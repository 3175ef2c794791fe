//! One-way push of newly created tasks to an external scheduling service.
//!
//! # Responsibility
//! - Define the push capability contract and its error taxonomy.
//! - Manage the locally cached bearer credential.
//! - Bind the contract to the Google Calendar and Google Tasks services.
//!
//! # Invariants
//! - A push is a single attempt: no retry, no queue, no outbox. Failures
//!   surface as warnings and never touch task-store state.
//! - Network access goes through the `PushTransport` seam so providers can
//!   be exercised against a mock in tests.

pub mod credentials;
pub mod google;
pub mod provider;
pub mod registry;
pub mod transport;
