//! # Octopus Repository
//!
//! File: cli/src/common/octopus/repository.rs
//!
//! ## Overview
//!
//! `OctopusRepository` is the narrow query surface the commands depend on:
//! fetch-all, predicate-filtered fetch, find-by-name and environment
//! membership over machines and environments. Command handlers receive a
//! repository by reference instead of building their own connection, which
//! keeps the filtering logic testable against an in-memory implementation.
//!
//! `OctopusConnection` implements the trait over the REST API:
//!
//! | Operation                  | Request                                  |
//! |----------------------------|------------------------------------------|
//! | `find_all_machines`        | `GET /api/machines/all`                  |
//! | `find_all_environments`    | `GET /api/environments/all`              |
//! | `find_environment_by_name` | `GET /api/environments?name=<name>` (paged) |
//! | `get_environment_machines` | `GET /api/environments/<id>/machines` (paged) |
//!
//! The `find_many_*` operations fetch everything and filter client-side.
//!
use super::connect::OctopusConnection;
use super::models::{EnvironmentResource, MachineResource};
use crate::core::error::{OctoposhError, Result};
use anyhow::anyhow;
use tracing::{debug, instrument};

/// Read-only queries over machines and environments.
#[allow(async_fn_in_trait)]
pub trait OctopusRepository {
    /// Every machine on the server.
    async fn find_all_machines(&self) -> Result<Vec<MachineResource>>;

    /// Machines for which `predicate` returns `true`.
    async fn find_many_machines<P>(&self, predicate: P) -> Result<Vec<MachineResource>>
    where
        P: Fn(&MachineResource) -> bool,
    {
        let all = self.find_all_machines().await?;
        Ok(all.into_iter().filter(|m| predicate(m)).collect())
    }

    /// Every environment on the server.
    async fn find_all_environments(&self) -> Result<Vec<EnvironmentResource>>;

    /// Environments for which `predicate` returns `true`.
    async fn find_many_environments<P>(&self, predicate: P) -> Result<Vec<EnvironmentResource>>
    where
        P: Fn(&EnvironmentResource) -> bool,
    {
        let all = self.find_all_environments().await?;
        Ok(all.into_iter().filter(|e| predicate(e)).collect())
    }

    /// The environment whose name equals `name`, ignoring case.
    ///
    /// # Errors
    ///
    /// `OctoposhError::EnvironmentNotFound` when no environment has that name.
    async fn find_environment_by_name(&self, name: &str) -> Result<EnvironmentResource>;

    /// Machines that belong to `environment`.
    async fn get_environment_machines(
        &self,
        environment: &EnvironmentResource,
    ) -> Result<Vec<MachineResource>>;
}

/// Shared name comparison for `find_environment_by_name` implementations.
pub fn environment_name_matches(environment: &EnvironmentResource, name: &str) -> bool {
    environment.name.to_lowercase() == name.to_lowercase()
}

impl OctopusRepository for OctopusConnection {
    #[instrument(skip(self))]
    async fn find_all_machines(&self) -> Result<Vec<MachineResource>> {
        let machines: Vec<MachineResource> = self.get_json("/api/machines/all").await?;
        debug!("Server returned {} machine(s)", machines.len());
        Ok(machines)
    }

    #[instrument(skip(self))]
    async fn find_all_environments(&self) -> Result<Vec<EnvironmentResource>> {
        let environments: Vec<EnvironmentResource> =
            self.get_json("/api/environments/all").await?;
        debug!("Server returned {} environment(s)", environments.len());
        Ok(environments)
    }

    #[instrument(skip(self))]
    async fn find_environment_by_name(&self, name: &str) -> Result<EnvironmentResource> {
        // The server's `name` query is a partial match; the exact comparison happens here.
        let mut url = self.resolve("/api/environments")?;
        url.query_pairs_mut().append_pair("name", name);
        let path = match url.query() {
            Some(query) => format!("/api/environments?{}", query),
            None => "/api/environments".to_string(),
        };

        let candidates: Vec<EnvironmentResource> = self.get_all_pages(&path).await?;
        candidates
            .into_iter()
            .find(|env| environment_name_matches(env, name))
            .ok_or_else(|| {
                anyhow!(OctoposhError::EnvironmentNotFound {
                    name: name.to_string(),
                })
            })
    }

    #[instrument(skip(self, environment), fields(environment = %environment.name))]
    async fn get_environment_machines(
        &self,
        environment: &EnvironmentResource,
    ) -> Result<Vec<MachineResource>> {
        let path = format!("/api/environments/{}/machines", environment.id);
        let machines: Vec<MachineResource> = self.get_all_pages(&path).await?;
        debug!(
            "Environment '{}' has {} machine(s)",
            environment.name,
            machines.len()
        );
        Ok(machines)
    }
}
