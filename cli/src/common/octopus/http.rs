//! # Octopus HTTP Requests
//!
//! File: cli/src/common/octopus/http.rs
//!
//! ## Overview
//!
//! Low-level GET helpers on `OctopusConnection`. Each call is a single,
//! unretried request. Non-success responses are turned into
//! `OctoposhError::Api`, using the server's `ErrorMessage` when the body has
//! one. Paged listings are walked by following `Page.Next` links until the
//! server stops returning one.
//!
use super::connect::OctopusConnection;
use super::models::{ApiErrorBody, ResourceCollection, RootResource};
use crate::core::error::{OctoposhError, Result};
use anyhow::{anyhow, Context};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

impl OctopusConnection {
    /// GETs an app-relative path and deserializes the JSON body.
    #[instrument(skip(self))]
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.resolve(path)?;
        debug!("GET {}", url);

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| anyhow!(OctoposhError::Http { source: e }))
            .with_context(|| format!("Failed to reach the Octopus server at {}", url))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .ok()
                .and_then(|b| b.error_message.map(|m| with_details(m, &b.errors)))
                .unwrap_or_else(|| {
                    status
                        .canonical_reason()
                        .unwrap_or("unexpected response")
                        .to_string()
                });
            return Err(anyhow!(OctoposhError::Api {
                status: status.as_u16(),
                url: url.to_string(),
                message,
            }));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| anyhow!(OctoposhError::Http { source: e }))
            .with_context(|| format!("Failed to parse response from {}", url))
    }

    /// GETs every page of a paged listing, starting at `path`.
    pub async fn get_all_pages<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>> {
        let mut items = Vec::new();
        let mut next = Some(path.to_string());

        while let Some(page_path) = next {
            let page: ResourceCollection<T> = self.get_json(&page_path).await?;
            next = page.next_page().map(str::to_string);
            items.extend(page.items);
        }

        debug!("Collected {} item(s) from {}", items.len(), path);
        Ok(items)
    }

    /// Fetches `GET /api`, which identifies the server.
    pub async fn server_info(&self) -> Result<RootResource> {
        self.get_json("/api").await
    }
}

fn with_details(message: String, errors: &[String]) -> String {
    if errors.is_empty() {
        message
    } else {
        format!("{} ({})", message, errors.join("; "))
    }
}
