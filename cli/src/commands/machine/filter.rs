//! # Machine Filter Dispatcher
//!
//! File: cli/src/commands/machine/filter.rs
//!
//! ## Overview
//!
//! Turns one `MachineFilter` into exactly one query against an
//! `OctopusRepository`. The filter is an enum, so every mode the command line
//! can produce has a branch here:
//!
//! - `All`: every machine on the server.
//! - `ByName`: a single wildcard pattern (`Web*`), or an exact,
//!   case-insensitive list of names. A list that mixes in a wildcard is rejected.
//! - `ByEnvironment`: each named environment is looked up in order and its
//!   machines appended. A machine in two requested environments appears twice.
//!   An unknown environment name fails the whole call.
//! - `ByUrl`: accepted but not applied; always yields no machines (see below).
//! - `ByCommunicationStyle`: machines whose endpoint kind matches the style.
//!
//! `get_machines` adds the final step: either the raw resources or their
//! projection into `OutputMachine` records.
//!
use super::output::{project_machines, OutputMachine};
use crate::common::names::NameMatcher;
use crate::common::octopus::{EndpointKind, MachineResource, OctopusRepository};
use crate::core::error::Result;
use tracing::{debug, info, warn};

/// Parameter name reported when `--name` values mix wildcard and exact items.
const MACHINE_NAME_PARAMETER: &str = "MachineName";

/// The communication styles a machine can be filtered by.
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommunicationStyle {
    #[value(name = "Listening")]
    Listening,
    #[value(name = "Polling")]
    Polling,
    #[value(name = "SSH")]
    Ssh,
    #[value(name = "CloudRegion")]
    CloudRegion,
    #[value(name = "OfflineDrop")]
    OfflineDrop,
}

impl CommunicationStyle {
    pub const ALL: [CommunicationStyle; 5] = [
        CommunicationStyle::Listening,
        CommunicationStyle::Polling,
        CommunicationStyle::Ssh,
        CommunicationStyle::CloudRegion,
        CommunicationStyle::OfflineDrop,
    ];

    /// The endpoint kind a machine of this style reports.
    pub fn endpoint_kind(self) -> EndpointKind {
        match self {
            CommunicationStyle::Listening => EndpointKind::TentaclePassive,
            CommunicationStyle::Polling => EndpointKind::TentacleActive,
            CommunicationStyle::Ssh => EndpointKind::Ssh,
            CommunicationStyle::CloudRegion => EndpointKind::None,
            CommunicationStyle::OfflineDrop => EndpointKind::OfflineDrop,
        }
    }

    /// Reverse of `endpoint_kind`; `None` for kinds with no style.
    pub fn from_endpoint_kind(kind: &EndpointKind) -> Option<Self> {
        Self::ALL.into_iter().find(|style| style.endpoint_kind() == *kind)
    }

    /// Name as shown to users and accepted by `--mode`.
    pub fn as_str(self) -> &'static str {
        match self {
            CommunicationStyle::Listening => "Listening",
            CommunicationStyle::Polling => "Polling",
            CommunicationStyle::Ssh => "SSH",
            CommunicationStyle::CloudRegion => "CloudRegion",
            CommunicationStyle::OfflineDrop => "OfflineDrop",
        }
    }
}

/// Which machines to fetch. Exactly one mode per invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MachineFilter {
    All,
    ByName(Vec<String>),
    ByEnvironment(Vec<String>),
    ByUrl(Vec<String>),
    ByCommunicationStyle(CommunicationStyle),
}

/// Result of `get_machines`: raw resources or display records.
#[derive(Debug, Clone, PartialEq)]
pub enum MachineListing {
    Resources(Vec<MachineResource>),
    Projected(Vec<OutputMachine>),
}

/// Runs the query selected by `filter` and returns the raw machines.
///
/// # Errors
///
/// - `OctoposhError::InvalidArgumentCombination` when several names are given
///   and at least one is a wildcard pattern.
/// - `OctoposhError::InvalidWildcardPattern` for a malformed pattern.
/// - Any repository error, unchanged (e.g. `OctoposhError::EnvironmentNotFound`).
pub async fn resolve<R: OctopusRepository>(
    repo: &R,
    filter: &MachineFilter,
) -> Result<Vec<MachineResource>> {
    debug!("Resolving machines with filter {:?}", filter);
    let machines = match filter {
        MachineFilter::All => repo.find_all_machines().await?,

        MachineFilter::ByName(names) => {
            let matcher = NameMatcher::from_values(names, MACHINE_NAME_PARAMETER)?;
            repo.find_many_machines(|m| matcher.matches(&m.name)).await?
        }

        MachineFilter::ByEnvironment(environment_names) => {
            let mut machines = Vec::new();
            for name in environment_names.iter().map(|n| n.to_lowercase()) {
                let environment = repo.find_environment_by_name(&name).await?;
                machines.extend(repo.get_environment_machines(&environment).await?);
            }
            machines
        }

        MachineFilter::ByUrl(urls) => {
            // There is no agreed meaning yet for which URL to compare (endpoint
            // URI, environment link, ...), so nothing is matched.
            warn!(
                "Filtering machines by URL is not supported; ignoring {} URL value(s) and returning no machines.",
                urls.len()
            );
            Vec::new()
        }

        MachineFilter::ByCommunicationStyle(style) => {
            let kind = style.endpoint_kind();
            repo.find_many_machines(|m| m.endpoint_kind() == Some(&kind))
                .await?
        }
    };
    info!("Filter matched {} machine(s)", machines.len());
    Ok(machines)
}

/// Resolves `filter`, then projects the machines for display unless `resource_only` is set.
pub async fn get_machines<R: OctopusRepository>(
    repo: &R,
    filter: &MachineFilter,
    resource_only: bool,
) -> Result<MachineListing> {
    let machines = resolve(repo, filter).await?;
    if resource_only {
        return Ok(MachineListing::Resources(machines));
    }
    if machines.is_empty() {
        return Ok(MachineListing::Projected(Vec::new()));
    }
    let environments = repo.find_all_environments().await?;
    Ok(MachineListing::Projected(project_machines(
        &machines,
        &environments,
    )))
}
