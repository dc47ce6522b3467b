//! # octoposh Name Filters
//!
//! File: cli/src/common/names.rs
//!
//! ## Overview
//!
//! Turns the list of names a user passes to a filter (`--name`, `--environment`)
//! into a predicate over resource names. The rules are shared by every command
//! that filters by name:
//!
//! - Values are lower-cased; comparison is case-insensitive.
//! - A single value containing wildcard syntax becomes a `WildcardPattern`.
//! - Values without wildcard syntax become an exact-membership set, for any count.
//! - Several values where at least one is wildcarded is rejected with
//!   `OctoposhError::InvalidArgumentCombination` (e.g. `--name "Web*" --name Database1`).
//! - Blank values (`--name ""`) are rejected with `OctoposhError::ArgumentParsing`.
//!
use crate::common::wildcard::{contains_wildcard_characters, WildcardPattern};
use crate::core::error::{OctoposhError, Result};
use anyhow::anyhow;
use std::collections::HashSet;
use tracing::debug;

/// A predicate over resource names built from user-supplied filter values.
#[derive(Debug, Clone)]
pub enum NameMatcher {
    /// Exactly one wildcarded value.
    Pattern(WildcardPattern),
    /// One or more literal values, lower-cased.
    Exact(HashSet<String>),
}

impl NameMatcher {
    /// Builds a matcher from `values`, naming `parameter` in any error.
    pub fn from_values(values: &[String], parameter: &str) -> Result<Self> {
        if values.iter().any(|v| v.trim().is_empty()) {
            return Err(anyhow!(OctoposhError::ArgumentParsing(format!(
                "Parameter '{}' does not accept empty values.",
                parameter
            ))));
        }
        let lowered: Vec<String> = values.iter().map(|v| v.to_lowercase()).collect();
        let any_wildcard = lowered.iter().any(|v| contains_wildcard_characters(v));

        if any_wildcard && lowered.len() > 1 {
            return Err(anyhow!(OctoposhError::InvalidArgumentCombination {
                parameter: parameter.to_string(),
            }));
        }
        if any_wildcard {
            let pattern = WildcardPattern::new(&lowered[0])?;
            debug!("{} uses wildcard pattern '{}'", parameter, pattern.as_str());
            return Ok(NameMatcher::Pattern(pattern));
        }
        debug!("{} uses {} exact value(s)", parameter, lowered.len());
        Ok(NameMatcher::Exact(lowered.into_iter().collect()))
    }

    /// Case-insensitive test of a resource name.
    pub fn matches(&self, name: &str) -> bool {
        match self {
            NameMatcher::Pattern(pattern) => pattern.is_match(name),
            NameMatcher::Exact(names) => names.contains(&name.to_lowercase()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_single_wildcard_becomes_pattern() {
        let matcher = NameMatcher::from_values(&values(&["Web*"]), "MachineName").unwrap();
        assert!(matches!(matcher, NameMatcher::Pattern(_)));
        assert!(matcher.matches("WebServer2"));
        assert!(!matcher.matches("Database1"));
    }

    #[test]
    fn test_single_literal_uses_exact_match() {
        let matcher = NameMatcher::from_values(&values(&["WebServer1"]), "MachineName").unwrap();
        assert!(matches!(matcher, NameMatcher::Exact(_)));
        assert!(matcher.matches("webserver1"));
        assert!(!matcher.matches("WebServer10"));
    }

    #[test]
    fn test_mixed_values_rejected() {
        let err = NameMatcher::from_values(&values(&["Web*", "Database1"]), "MachineName")
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<OctoposhError>(),
            Some(OctoposhError::InvalidArgumentCombination { parameter }) if parameter == "MachineName"
        ));
    }

    #[test]
    fn test_blank_value_rejected() {
        let err = NameMatcher::from_values(&values(&["Web1", " "]), "MachineName").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<OctoposhError>(),
            Some(OctoposhError::ArgumentParsing(_))
        ));
    }

    #[test]
    fn test_two_wildcards_rejected() {
        assert!(NameMatcher::from_values(&values(&["Web*", "Db*"]), "EnvironmentName").is_err());
    }
}
