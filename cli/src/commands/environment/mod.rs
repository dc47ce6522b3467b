//! # octoposh Environment Command
//!
//! File: cli/src/commands/environment/mod.rs
//!
//! ## Overview
//!
//! Implements `octoposh environment`, which lists environments and the
//! machines in each. Name filtering follows the same rules as
//! `octoposh machine --name`: one wildcard pattern, or any number of exact
//! names, compared case-insensitively.
//!
//! ```bash
//! octoposh environment
//! octoposh environment --name "Prod*"
//! octoposh environment --name Production Staging --output json
//! octoposh environment --name Production --resource-only
//! ```
//!
use crate::common::names::NameMatcher;
use crate::common::octopus::{self, EnvironmentResource, MachineResource, OctopusRepository};
use crate::common::ui::{self, table::Table};
use crate::core::config::{self, ConnectionOverrides, OutputFormat};
use crate::core::error::Result;
use anyhow::Context;
use chrono::{DateTime, FixedOffset};
use clap::Parser;
use serde::Serialize;
use tracing::{debug, info};

const ENVIRONMENT_NAME_PARAMETER: &str = "EnvironmentName";

/// # Environment Arguments (`EnvironmentArgs`)
#[derive(Parser, Debug)]
#[command(about = "List environments and the machines they contain")]
pub struct EnvironmentArgs {
    /// Environment names. A single value may contain wildcards.
    #[arg(
        short = 'n',
        long = "name",
        visible_alias = "environment-name",
        num_args = 1..
    )]
    names: Vec<String>,

    /// Print the raw API resources (always JSON) instead of the display projection.
    #[arg(long)]
    resource_only: bool,

    /// Output format. Defaults to `[output] format` from the config file, then `text`.
    #[arg(short, long, value_enum)]
    output: Option<OutputFormat>,
}

/// An environment as shown to users.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct OutputEnvironment {
    pub name: String,
    pub id: String,
    pub description: Option<String>,
    pub use_guided_failure: bool,
    pub machines: Vec<String>,
    pub last_modified_on: Option<DateTime<FixedOffset>>,
    pub last_modified_by: Option<String>,
}

/// Raw environments or their display records.
#[derive(Debug, Clone, PartialEq)]
pub enum EnvironmentListing {
    Resources(Vec<EnvironmentResource>),
    Projected(Vec<OutputEnvironment>),
}

/// Fetches environments, optionally restricted by `names`.
pub async fn find_environments<R: OctopusRepository>(
    repo: &R,
    names: &[String],
) -> Result<Vec<EnvironmentResource>> {
    if names.is_empty() {
        return repo.find_all_environments().await;
    }
    let matcher = NameMatcher::from_values(names, ENVIRONMENT_NAME_PARAMETER)?;
    repo.find_many_environments(|env| matcher.matches(&env.name))
        .await
}

/// Fetches environments and projects them unless `resource_only` is set.
pub async fn get_environments<R: OctopusRepository>(
    repo: &R,
    names: &[String],
    resource_only: bool,
) -> Result<EnvironmentListing> {
    let environments = find_environments(repo, names).await?;
    info!("Matched {} environment(s)", environments.len());
    if resource_only {
        return Ok(EnvironmentListing::Resources(environments));
    }
    if environments.is_empty() {
        return Ok(EnvironmentListing::Projected(Vec::new()));
    }
    // One machine listing serves every environment's membership.
    let machines = repo.find_all_machines().await?;
    Ok(EnvironmentListing::Projected(project_environments(
        &environments,
        &machines,
    )))
}

/// Projects environments for display, listing the names of their machines.
pub fn project_environments(
    environments: &[EnvironmentResource],
    machines: &[MachineResource],
) -> Vec<OutputEnvironment> {
    environments
        .iter()
        .map(|env| OutputEnvironment {
            name: env.name.clone(),
            id: env.id.clone(),
            description: env.description.clone().filter(|d| !d.is_empty()),
            use_guided_failure: env.use_guided_failure,
            machines: machines
                .iter()
                .filter(|m| m.environment_ids.contains(&env.id))
                .map(|m| m.name.clone())
                .collect(),
            last_modified_on: env.last_modified_on.as_deref().and_then(parse_timestamp),
            last_modified_by: env.last_modified_by.clone(),
        })
        .collect()
}

fn parse_timestamp(raw: &str) -> Option<DateTime<FixedOffset>> {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(ts) => Some(ts),
        Err(e) => {
            debug!("Ignoring unparseable timestamp '{}': {}", raw, e);
            None
        }
    }
}

fn render_environment_table(environments: &[OutputEnvironment]) -> String {
    if environments.is_empty() {
        return "No environments found.\n".to_string();
    }
    let mut table = Table::new(["Name", "Id", "Machines", "Last Modified"]);
    for env in environments {
        table.add_row([
            env.name.clone(),
            env.id.clone(),
            env.machines.join(", "),
            env.last_modified_on
                .map(|ts| ts.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_default(),
        ]);
    }
    format!(
        "{}\nFound {} environment(s).\n",
        table.render(),
        environments.len()
    )
}

/// # Handle Environment Command (`handle_environment`)
pub async fn handle_environment(
    args: EnvironmentArgs,
    overrides: &ConnectionOverrides,
) -> Result<()> {
    info!("Handling environment command (names: {:?})", args.names);

    let cfg = config::load_config().context("Failed to load octoposh configuration")?;
    let settings = config::resolve_server_settings(&cfg, overrides)?;
    let connection = octopus::connect(&settings)?;

    let listing = get_environments(&connection, &args.names, args.resource_only).await?;
    let format = args.output.or(cfg.output.format).unwrap_or_default();
    match (&listing, format) {
        (EnvironmentListing::Resources(environments), _) => ui::print_json(environments)?,
        (EnvironmentListing::Projected(records), OutputFormat::Json) => ui::print_json(records)?,
        (EnvironmentListing::Projected(records), OutputFormat::Text) => {
            print!("{}", render_environment_table(records))
        }
    }
    Ok(())
}
