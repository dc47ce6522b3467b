//! # octoposh Octopus API Interface
//!
//! File: cli/src/common/octopus/mod.rs
//!
//! ## Overview
//!
//! This module is the single place octoposh talks to an Octopus Deploy
//! server. It is organised like this:
//!
//! - **`connect`**: Builds the authenticated `OctopusConnection` (one per invocation).
//! - **`http`**: GET helpers on the connection, error-body decoding and page walking.
//! - **`models`**: Serde models for machines, environments, endpoints and paged collections;
//!   `Resource<T>` keeps the server's JSON alongside the typed view.
//! - **`repository`**: The `OctopusRepository` trait the commands query through,
//!   and its REST implementation on `OctopusConnection`.
//!
//! ## Usage
//!
//! ```rust
//! use crate::common::octopus::{self, OctopusRepository};
//!
//! # async fn run_example(settings: &crate::core::config::ServerSettings) -> crate::core::error::Result<()> {
//! let connection = octopus::connect(settings)?;
//! let production = connection.find_environment_by_name("production").await?;
//! let machines = connection.get_environment_machines(&production).await?;
//! println!("{} machine(s) in {}", machines.len(), production.name);
//! # Ok(())
//! # }
//! ```
//!

/// Establishes the authenticated connection to the server.
pub mod connect;
/// Request helpers shared by every query.
pub mod http;
/// API resource models.
pub mod models;
/// The query trait used by command handlers.
pub mod repository;

#[cfg(test)]
pub mod fake;
#[cfg(test)]
pub mod test_server;

// --- Re-exports for easier access from other parts of the application ---
pub use connect::connect;
pub use models::{EndpointKind, EnvironmentResource, MachineResource};
pub use repository::OctopusRepository;
