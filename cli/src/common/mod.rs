//! # octoposh Common Utilities (`common`)
//!
//! File: cli/src/common/mod.rs
//!
//! ## Overview
//!
//! Shared building blocks used by the command modules:
//!
//! - **`names`**: Builds name predicates from `--name` style filter values.
//! - **`octopus`**: Connection, HTTP helpers, resource models and the
//!   `OctopusRepository` query trait for the Octopus REST API.
//! - **`ui`**: Text tables and JSON output.
//! - **`wildcard`**: Case-insensitive wildcard patterns (`*`, `?`, `[a-z]`).
//!
//! Command-specific logic lives in `commands::`, configuration and errors in `core::`.
//!

/// Name filters shared by the machine and environment commands.
pub mod names;
/// Interface to the Octopus Deploy REST API.
pub mod octopus;
/// Output formatting (tables, JSON).
pub mod ui;
/// Wildcard pattern matching.
pub mod wildcard;
