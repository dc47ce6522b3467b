//! # octoposh Configuration System
//!
//! File: cli/src/core/config.rs
//!
//! ## Overview
//!
//! This module implements the configuration system for octoposh: where the
//! Octopus server lives, which API key to send, and how results are printed.
//!
//! ## Architecture
//!
//! Configuration sources (in order of precedence):
//! 1. `--server` / `--api-key` flags, which fall back to the `OctopusURL` and
//!    `OctopusAPIKey` environment variables
//! 2. Project-specific `.octoposh.toml` in the current directory or ancestors
//!    (the search stops at a directory containing `.git`)
//! 3. User-specific `config.toml` in the platform config directory
//!    (e.g. `~/.config/octoposh/config.toml`)
//! 4. Default values defined in the code
//!
//! Files are merged first (`load_config`); the flags are applied when the
//! connection settings are resolved (`resolve_server_settings`), which is
//! also where the URL and key are validated. Commands that never talk to the
//! server (`octoposh styles`) therefore work without any configuration.
//!
//! ## Examples
//!
//! ```toml
//! [connection]
//! url = "https://octopus.example.com"
//! api_key = "API-XXXXXXXXXXXXXXXXXXXXXXXXXX"
//!
//! [output]
//! format = "json"
//! ```
//!
//! ```rust
//! let cfg = config::load_config()?;
//! let settings = config::resolve_server_settings(&cfg, &overrides)?;
//! ```
//!
use crate::core::error::{OctoposhError, Result};
use anyhow::{anyhow, Context};
use directories::ProjectDirs;
use reqwest::Url;
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info, warn};

/// Represents the main configuration structure, loaded from TOML files.
#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)] // Error if unknown fields are in TOML
pub struct Config {
    #[serde(default)]
    pub connection: ConnectionConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Where the Octopus server is and how to authenticate against it.
#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ConnectionConfig {
    /// Base URL of the Octopus server, e.g. `https://octopus.example.com`.
    pub url: Option<String>,
    /// API key sent as `X-Octopus-ApiKey`.
    pub api_key: Option<String>,
}

/// Presentation settings.
#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    /// Default output format when `--output` is not given.
    pub format: Option<OutputFormat>,
}

/// How command results are written to stdout.
#[derive(Deserialize, clap::ValueEnum, Debug, Default, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Aligned text table.
    #[default]
    Text,
    /// Pretty-printed JSON.
    Json,
}

/// Connection values supplied on the command line (or via environment variables).
#[derive(Debug, Default, Clone)]
pub struct ConnectionOverrides {
    pub server: Option<String>,
    pub api_key: Option<String>,
}

/// Fully resolved and validated connection settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerSettings {
    pub url: Url,
    pub api_key: String,
}

const PROJECT_CONFIG_FILENAME: &str = ".octoposh.toml";

/// Loads and merges the user and project configuration files.
pub fn load_config() -> Result<Config> {
    let current_dir = std::env::current_dir().context("Failed to get current directory")?;
    let user_config = load_user_config()?;
    let project_config = load_project_config(&current_dir)?;
    let merged = merge_configs(user_config.unwrap_or_default(), project_config);
    debug!("Final loaded configuration: {:?}", redacted(&merged));
    Ok(merged)
}

fn load_user_config() -> Result<Option<Config>> {
    if let Some(proj_dirs) = ProjectDirs::from("com", "Octoposh", "octoposh") {
        let config_path = proj_dirs.config_dir().join("config.toml");
        if config_path.exists() {
            info!("Loading user configuration from: {}", config_path.display());
            load_config_from_path(&config_path).map(Some)
        } else {
            debug!(
                "User configuration file not found at {}",
                config_path.display()
            );
            Ok(None)
        }
    } else {
        warn!("Could not determine user config directory.");
        Ok(None)
    }
}

fn load_project_config(start_dir: &Path) -> Result<Option<Config>> {
    if let Some(project_config_path) = find_project_config_path(start_dir) {
        info!(
            "Loading project configuration from: {}",
            project_config_path.display()
        );
        load_config_from_path(&project_config_path).map(Some)
    } else {
        debug!("No project configuration file (.octoposh.toml) found in current directory or ancestors.");
        Ok(None)
    }
}

/// Walks from `start_dir` towards the filesystem root looking for `.octoposh.toml`.
/// A directory containing `.git` ends the search.
fn find_project_config_path(start_dir: &Path) -> Option<PathBuf> {
    let mut path: &Path = start_dir;
    loop {
        let project_config = path.join(PROJECT_CONFIG_FILENAME);
        if project_config.is_file() {
            return Some(project_config);
        }
        if path.join(".git").is_dir() {
            debug!(
                "Found .git directory at {}, stopping project config search.",
                path.display()
            );
            return None;
        }
        match path.parent() {
            Some(parent) => path = parent,
            None => return None,
        }
    }
}

fn load_config_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse TOML from file: {}", path.display()))
}

fn merge_configs(user: Config, project: Option<Config>) -> Config {
    let project = match project {
        Some(p) => p,
        None => return user,
    };
    Config {
        connection: ConnectionConfig {
            url: project.connection.url.or(user.connection.url),
            api_key: project.connection.api_key.or(user.connection.api_key),
        },
        output: OutputConfig {
            format: project.output.format.or(user.output.format),
        },
    }
}

/// Applies command-line overrides on top of the file configuration and validates the result.
pub fn resolve_server_settings(
    config: &Config,
    overrides: &ConnectionOverrides,
) -> Result<ServerSettings> {
    let raw_url = overrides
        .server
        .clone()
        .or_else(|| config.connection.url.clone())
        .filter(|u| !u.trim().is_empty())
        .ok_or_else(|| {
            anyhow!(OctoposhError::Config(
                "No Octopus server URL configured. Pass --server, set OctopusURL, or add [connection] url to .octoposh.toml.".to_string()
            ))
        })?;
    let api_key = overrides
        .api_key
        .clone()
        .or_else(|| config.connection.api_key.clone())
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
        .ok_or_else(|| {
            anyhow!(OctoposhError::Config(
                "No Octopus API key configured. Pass --api-key, set OctopusAPIKey, or add [connection] api_key to .octoposh.toml.".to_string()
            ))
        })?;

    let url = parse_server_url(raw_url.trim())?;
    if !api_key.starts_with("API-") {
        warn!("API key does not start with 'API-'; the server will probably reject it.");
    }
    debug!("Resolved Octopus server URL: {}", url);
    Ok(ServerSettings { url, api_key })
}

fn parse_server_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw).map_err(|e| {
        anyhow!(OctoposhError::Config(format!(
            "Invalid Octopus server URL '{}': {}",
            raw, e
        )))
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(anyhow!(OctoposhError::Config(format!(
            "Unsupported URL scheme '{}' in '{}'. Expected http or https.",
            other, raw
        )))),
    }
}

/// Masks an API key for display, keeping only the first and last four characters.
pub fn mask_api_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}{}{}", head, "*".repeat(chars.len() - 8), tail)
}

// Keeps API keys out of debug logs.
fn redacted(config: &Config) -> Config {
    let mut copy = config.clone();
    copy.connection.api_key = copy.connection.api_key.as_deref().map(mask_api_key);
    copy
}
