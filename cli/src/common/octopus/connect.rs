//! # Octopus Connection Helper
//!
//! File: cli/src/common/octopus/connect.rs
//!
//! ## Overview
//!
//! Builds the per-invocation `OctopusConnection`: a `reqwest::Client` that
//! sends the configured API key on every request, together with the server's
//! base URL. Commands create exactly one connection at start-up and pass it
//! by reference to whatever needs to query the server.
//!
//! ## Usage
//!
//! ```rust
//! let settings = config::resolve_server_settings(&cfg, &overrides)?;
//! let connection = octopus::connect(&settings)?;
//! let machines = connection.find_all_machines().await?;
//! ```
//!
use crate::core::config::ServerSettings;
use crate::core::error::{OctoposhError, Result};
use anyhow::{anyhow, Context};
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client, Url};
use tracing::instrument;

/// Header the Octopus API reads the key from.
pub const API_KEY_HEADER: &str = "X-Octopus-ApiKey";

/// An authenticated handle to one Octopus server.
#[derive(Debug, Clone)]
pub struct OctopusConnection {
    pub(super) client: Client,
    base: Url,
}

/// Creates a connection from validated settings.
///
/// # Errors
///
/// Fails with `OctoposhError::Config` if the API key cannot be sent as a
/// header value, or with `OctoposhError::Http` if the client cannot be built.
#[instrument(skip(settings), fields(server = %settings.url))]
pub fn connect(settings: &ServerSettings) -> Result<OctopusConnection> {
    let mut key = HeaderValue::from_str(&settings.api_key).map_err(|_| {
        anyhow!(OctoposhError::Config(
            "API key contains characters that cannot be sent in an HTTP header.".to_string()
        ))
    })?;
    key.set_sensitive(true);

    let mut headers = HeaderMap::new();
    headers.insert(API_KEY_HEADER, key);

    let client = Client::builder()
        .user_agent(concat!("octoposh/", env!("CARGO_PKG_VERSION")))
        .default_headers(headers)
        .build()
        .map_err(|e| anyhow!(OctoposhError::Http { source: e }))
        .context("Failed to build HTTP client")?;

    Ok(OctopusConnection {
        client,
        base: settings.url.clone(),
    })
}

impl OctopusConnection {
    /// Resolves an app-relative path such as `/api/machines/all` (or a
    /// `~/api/...` link returned by the server) against the base URL.
    ///
    /// Servers hosted under a virtual directory (`https://host/octopus`) may
    /// return links that already include that directory; it is not repeated.
    pub fn resolve(&self, app_relative: &str) -> Result<Url> {
        let base_path = self.base.path().trim_end_matches('/');
        let mut link = app_relative.trim_start_matches('~');
        if !base_path.is_empty()
            && link.starts_with(base_path)
            && link[base_path.len()..].starts_with('/')
        {
            link = &link[base_path.len()..];
        }

        let mut base = self.base.clone();
        if !base.path().ends_with('/') {
            let with_slash = format!("{}/", base.path());
            base.set_path(&with_slash);
        }
        base.join(link.trim_start_matches('/'))
            .with_context(|| format!("Failed to build request URL from '{}'", app_relative))
    }
}
