//! # Machine Output Projection
//!
//! File: cli/src/commands/machine/output.rs
//!
//! ## Overview
//!
//! Converts raw `MachineResource`s into `OutputMachine` records, the
//! display-oriented shape printed by `octoposh machine` when
//! `--resource-only` is not given. The projection:
//!
//! - replaces environment ids with environment names (an id the server did
//!   not return an environment for is shown as-is),
//! - replaces the endpoint kind with the communication style users filter by
//!   (`Listening`, `Polling`, `SSH`, `CloudRegion`, `OfflineDrop`),
//! - keeps the order of the input.
//!
use super::filter::CommunicationStyle;
use crate::common::octopus::{EndpointKind, EnvironmentResource, MachineResource};
use crate::common::ui::table::Table;
use serde::Serialize;
use std::collections::HashMap;

/// A machine as shown to users.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct OutputMachine {
    pub name: String,
    pub id: String,
    pub environment_name: Vec<String>,
    pub roles: Vec<String>,
    pub uri: Option<String>,
    pub is_disabled: bool,
    pub communication_style: String,
    pub status: Option<String>,
    pub health_status: Option<String>,
    pub status_summary: Option<String>,
    pub has_latest_calamari: bool,
    pub is_in_process: bool,
}

/// Projects `machines` for display, resolving environment names from `environments`.
pub fn project_machines(
    machines: &[MachineResource],
    environments: &[EnvironmentResource],
) -> Vec<OutputMachine> {
    let environment_names: HashMap<&str, &str> = environments
        .iter()
        .map(|env| (env.id.as_str(), env.name.as_str()))
        .collect();

    machines
        .iter()
        .map(|machine| OutputMachine {
            name: machine.name.clone(),
            id: machine.id.clone(),
            environment_name: machine
                .environment_ids
                .iter()
                .map(|id| {
                    environment_names
                        .get(id.as_str())
                        .map_or_else(|| id.clone(), |name| name.to_string())
                })
                .collect(),
            roles: machine.roles.clone(),
            uri: machine
                .endpoint
                .as_ref()
                .and_then(|e| e.uri.clone())
                .or_else(|| machine.uri.clone()),
            is_disabled: machine.is_disabled,
            communication_style: machine
                .endpoint_kind()
                .map(style_label)
                .unwrap_or_default(),
            status: machine.status.clone(),
            health_status: machine.health_status.clone(),
            status_summary: machine.status_summary.clone(),
            has_latest_calamari: machine.has_latest_calamari,
            is_in_process: machine.is_in_process,
        })
        .collect()
}

fn style_label(kind: &EndpointKind) -> String {
    CommunicationStyle::from_endpoint_kind(kind)
        .map(|style| style.as_str().to_string())
        .unwrap_or_else(|| kind.to_string())
}

/// Renders projected machines as a text table with a count footer.
pub fn render_machine_table(machines: &[OutputMachine]) -> String {
    if machines.is_empty() {
        return "No machines found.\n".to_string();
    }

    let mut table = Table::new([
        "Name",
        "Environments",
        "Style",
        "Status",
        "Health",
        "Disabled",
        "Uri",
    ]);
    for m in machines {
        table.add_row([
            m.name.clone(),
            m.environment_name.join(", "),
            m.communication_style.clone(),
            m.status.clone().unwrap_or_default(),
            m.health_status.clone().unwrap_or_default(),
            if m.is_disabled { "yes" } else { "no" }.to_string(),
            m.uri.clone().unwrap_or_default(),
        ]);
    }
    format!(
        "{}\nFound {} machine(s).\n",
        table.render(),
        machines.len()
    )
}
