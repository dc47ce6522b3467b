//! # octoposh Error Types
//!
//! File: cli/src/core/error.rs
//!
//! ## Overview
//!
//! This module defines the error types used throughout octoposh. It follows
//! a two-layer approach:
//! - `OctoposhError`: a `thiserror` enum for failures callers may want to
//!   match on (bad filter combinations, unknown environments, API errors).
//! - `Result<T>`: an alias for `anyhow::Result<T>` so handlers can attach
//!   context with `.context(...)` while still carrying an `OctoposhError`
//!   underneath.
//!
//! ## Examples
//!
//! ```rust
//! // Reject a multi-value filter mixing wildcard and exact values
//! return Err(OctoposhError::InvalidArgumentCombination {
//!     parameter: "MachineName".into(),
//! }
//! .into());
//!
//! // Pattern matching on a propagated error
//! match result {
//!     Err(e) if matches!(
//!         e.downcast_ref::<OctoposhError>(),
//!         Some(OctoposhError::EnvironmentNotFound { .. })
//!     ) => println!("No such environment"),
//!     other => other?,
//! }
//! ```
//!
use thiserror::Error;

/// Custom error type for octoposh.
#[derive(Error, Debug)]
pub enum OctoposhError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error(
        "Parameter '{parameter}' accepts either a single wildcard pattern or a list of exact values, but not both."
    )]
    InvalidArgumentCombination { parameter: String },

    #[error("Invalid wildcard pattern '{pattern}': {reason}")]
    InvalidWildcardPattern { pattern: String, reason: String },

    #[error("Environment '{name}' not found.")]
    EnvironmentNotFound { name: String },

    #[error("HTTP request to the Octopus server failed: {source}")]
    Http {
        #[from]
        source: reqwest::Error,
    },

    #[error("Octopus API returned {status} for {url}: {message}")]
    Api {
        status: u16,
        url: String,
        message: String,
    },

    #[error("Argument parsing error: {0}")]
    ArgumentParsing(String),
}

/// Type alias for Result using anyhow::Error for broad compatibility.
pub type Result<T> = anyhow::Result<T>;

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let config_err = OctoposhError::Config("Missing server URL".to_string());
        assert_eq!(config_err.to_string(), "Configuration error: Missing server URL");

        let combination = OctoposhError::InvalidArgumentCombination {
            parameter: "MachineName".into(),
        };
        assert!(combination.to_string().contains("'MachineName'"));

        let not_found = OctoposhError::EnvironmentNotFound {
            name: "staging".into(),
        };
        assert_eq!(not_found.to_string(), "Environment 'staging' not found.");

        let api = OctoposhError::Api {
            status: 401,
            url: "http://octopus/api/machines/all".into(),
            message: "You must be logged in".into(),
        };
        assert_eq!(
            api.to_string(),
            "Octopus API returned 401 for http://octopus/api/machines/all: You must be logged in"
        );
    }

    #[test]
    fn test_downcast_through_anyhow() {
        let err: anyhow::Error = OctoposhError::EnvironmentNotFound {
            name: "prod".into(),
        }
        .into();
        let err = err.context("Failed to resolve machines");
        assert!(matches!(
            err.downcast_ref::<OctoposhError>(),
            Some(OctoposhError::EnvironmentNotFound { name }) if name == "prod"
        ));
    }
}
