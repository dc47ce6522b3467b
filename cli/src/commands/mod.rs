//! # octoposh Command Modules
//!
//! File: cli/src/commands/mod.rs
//!
//! ## Overview
//!
//! This module aggregates the top-level commands of the octoposh CLI.
//! Each command defines its own clap arguments struct and a `handle_*`
//! function; `main.rs` routes to them.
//!
//! ## Commands
//!
//! - `machine`: List machines, filtered by name, environment, URL or communication style
//! - `environment`: List environments and their machines
//! - `styles`: List the communication styles and their endpoint identifiers
//! - `connection`: Show (and optionally test) the effective server connection
//!

/// Effective connection settings and a reachability check.
pub mod connection;
/// Environment listing.
pub mod environment;
/// Machine listing and its filter dispatcher.
pub mod machine;
/// Offline list of communication styles.
pub mod styles;
