//! # octoposh UI Utilities Module (`common::ui`)
//!
//! File: cli/src/common/ui/mod.rs
//!
//! ## Overview
//!
//! Output helpers shared by the commands. Results are written to stdout in
//! one of two shapes chosen by `--output` (or `[output] format` in the
//! config file):
//!
//! - **`table`**: aligned text tables for people reading a terminal.
//! - **JSON**: pretty-printed JSON for scripts (`print_json`).
//!
//! Logging goes to stderr, so stdout only ever carries results.
//!
use crate::core::error::Result;
use anyhow::Context;
use serde::Serialize;

/// Aligned text tables.
pub mod table;

/// Serializes `value` as pretty JSON.
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("Failed to serialize output as JSON")
}

/// Writes `value` to stdout as pretty JSON.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", to_json(value)?);
    Ok(())
}
