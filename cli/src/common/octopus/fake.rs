//! In-memory `OctopusRepository` used by command tests.
use super::models::{Endpoint, Environment, EnvironmentResource, Machine, MachineResource};
use super::repository::{environment_name_matches, OctopusRepository};
use crate::core::error::{OctoposhError, Result};
use anyhow::anyhow;
use std::cell::RefCell;

#[derive(Debug, Default)]
pub struct FakeRepository {
    pub machines: Vec<MachineResource>,
    pub environments: Vec<EnvironmentResource>,
    /// Names passed to `find_environment_by_name`, in call order.
    pub environment_lookups: RefCell<Vec<String>>,
}

impl FakeRepository {
    pub fn new(machines: Vec<MachineResource>, environments: Vec<EnvironmentResource>) -> Self {
        Self {
            machines,
            environments,
            environment_lookups: RefCell::new(Vec::new()),
        }
    }
}

impl OctopusRepository for FakeRepository {
    async fn find_all_machines(&self) -> Result<Vec<MachineResource>> {
        Ok(self.machines.clone())
    }

    async fn find_all_environments(&self) -> Result<Vec<EnvironmentResource>> {
        Ok(self.environments.clone())
    }

    async fn find_environment_by_name(&self, name: &str) -> Result<EnvironmentResource> {
        self.environment_lookups.borrow_mut().push(name.to_string());
        self.environments
            .iter()
            .find(|env| environment_name_matches(env, name))
            .cloned()
            .ok_or_else(|| {
                anyhow!(OctoposhError::EnvironmentNotFound {
                    name: name.to_string(),
                })
            })
    }

    async fn get_environment_machines(
        &self,
        environment: &EnvironmentResource,
    ) -> Result<Vec<MachineResource>> {
        Ok(self
            .machines
            .iter()
            .filter(|m| m.environment_ids.contains(&environment.id))
            .cloned()
            .collect())
    }
}

/// Typed machine fields with an endpoint of the given API communication style.
pub fn machine_fields(id: &str, name: &str, environment_ids: &[&str], style: &str) -> Machine {
    Machine {
        id: id.to_string(),
        name: name.to_string(),
        environment_ids: environment_ids.iter().map(|s| s.to_string()).collect(),
        endpoint: Some(Endpoint {
            communication_style: style.to_string().into(),
            ..Default::default()
        }),
        ..Default::default()
    }
}

pub fn machine(id: &str, name: &str, environment_ids: &[&str], style: &str) -> MachineResource {
    machine_fields(id, name, environment_ids, style).into()
}

pub fn environment_fields(id: &str, name: &str) -> Environment {
    Environment {
        id: id.to_string(),
        name: name.to_string(),
        ..Default::default()
    }
}

pub fn environment(id: &str, name: &str) -> EnvironmentResource {
    environment_fields(id, name).into()
}
