//! # octoposh Machine Command
//!
//! File: cli/src/commands/machine/mod.rs
//!
//! ## Overview
//!
//! This module implements `octoposh machine`, which lists the deployment
//! targets registered on an Octopus server. At most one filter can be given:
//!
//! ```bash
//! # Every machine
//! octoposh machine
//!
//! # A single wildcard pattern, or a list of exact names
//! octoposh machine --name "Web*"
//! octoposh machine --name WebServer1 --name Database1
//!
//! # Machines in one or more environments (duplicates kept)
//! octoposh machine --environment Production --environment Staging
//!
//! # Machines using one communication style
//! octoposh machine --mode SSH
//!
//! # Raw API resources as JSON instead of the display projection
//! octoposh machine --name Web* --resource-only
//! ```
//!
//! ## Architecture
//!
//! - `MachineArgs`: clap arguments. The filter flags share an `ArgGroup`, so
//!   clap rejects combinations before anything runs.
//! - `filter`: `MachineFilter` and the dispatcher (`resolve` / `get_machines`).
//! - `output`: the `OutputMachine` projection and its text table.
//!
//! `handle_machine` builds one connection, hands it to the dispatcher, and
//! prints the result.
//!
use crate::common::{octopus, ui};
use crate::core::config::{self, ConnectionOverrides, OutputFormat};
use crate::core::error::Result;
use anyhow::Context;
use clap::{ArgGroup, Parser};
use tracing::info;

/// Filter modes and the dispatcher.
pub mod filter;
/// Display projection of machine resources.
pub mod output;

pub use filter::{get_machines, CommunicationStyle, MachineFilter, MachineListing};

/// # Machine Arguments (`MachineArgs`)
///
/// Defines the arguments accepted by `octoposh machine`. List-valued flags
/// may be repeated or take several space-separated values. Commas are not
/// separators, so `--name "node[1,2]"` stays one pattern.
#[derive(Parser, Debug)]
#[command(
    about = "List machines (deployment targets) on the Octopus server",
    long_about = "Lists machines registered on the Octopus server.\n\
                  Filter by name (one wildcard pattern or exact names), by environment,\n\
                  or by communication style. Only one filter may be used at a time."
)]
#[command(group(
    ArgGroup::new("filter")
        .args(["names", "environments", "urls", "mode"])
        .multiple(false)
))]
pub struct MachineArgs {
    /// Machine names. A single value may contain wildcards (`*`, `?`, `[a-z]`).
    #[arg(
        short = 'n',
        long = "name",
        visible_alias = "machine-name",
        num_args = 1..
    )]
    names: Vec<String>,

    /// Environment names whose machines should be listed.
    #[arg(
        short = 'e',
        long = "environment",
        visible_alias = "environment-name",
        num_args = 1..
    )]
    environments: Vec<String>,

    /// Machine URLs. Accepted, but URL filtering is not implemented and matches nothing.
    #[arg(long = "url", visible_alias = "uri", num_args = 1..)]
    urls: Vec<String>,

    /// Communication style of the machine's endpoint.
    #[arg(
        short = 'm',
        long = "mode",
        visible_alias = "communication-style",
        value_enum,
        ignore_case = true
    )]
    mode: Option<CommunicationStyle>,

    /// Print the raw API resources (always JSON) instead of the display projection.
    #[arg(long)]
    resource_only: bool,

    /// Output format. Defaults to `[output] format` from the config file, then `text`.
    #[arg(short, long, value_enum)]
    output: Option<OutputFormat>,
}

impl MachineArgs {
    /// The single filter mode selected on the command line.
    pub fn filter(&self) -> MachineFilter {
        if !self.names.is_empty() {
            MachineFilter::ByName(self.names.clone())
        } else if !self.environments.is_empty() {
            MachineFilter::ByEnvironment(self.environments.clone())
        } else if !self.urls.is_empty() {
            MachineFilter::ByUrl(self.urls.clone())
        } else if let Some(style) = self.mode {
            MachineFilter::ByCommunicationStyle(style)
        } else {
            MachineFilter::All
        }
    }
}

/// # Handle Machine Command (`handle_machine`)
///
/// Loads configuration, opens one connection to the server, runs the selected
/// filter and prints the result to stdout.
///
/// ## Returns
///
/// * `Err` if configuration is incomplete, the filter values are invalid, or
///   any request to the server fails.
pub async fn handle_machine(args: MachineArgs, overrides: &ConnectionOverrides) -> Result<()> {
    let filter = args.filter();
    info!(
        "Handling machine command (filter: {:?}, resource only: {})",
        filter, args.resource_only
    );

    let cfg = config::load_config().context("Failed to load octoposh configuration")?;
    let settings = config::resolve_server_settings(&cfg, overrides)?;
    let connection = octopus::connect(&settings)?;

    let listing = get_machines(&connection, &filter, args.resource_only).await?;
    let format = args.output.or(cfg.output.format).unwrap_or_default();
    print!("{}", render_listing(&listing, format)?);
    Ok(())
}

/// Formats a listing for stdout. Raw resources are always JSON.
fn render_listing(listing: &MachineListing, format: OutputFormat) -> Result<String> {
    match (listing, format) {
        (MachineListing::Resources(machines), _) => Ok(format!("{}\n", ui::to_json(machines)?)),
        (MachineListing::Projected(records), OutputFormat::Json) => {
            Ok(format!("{}\n", ui::to_json(records)?))
        }
        (MachineListing::Projected(records), OutputFormat::Text) => {
            Ok(output::render_machine_table(records))
        }
    }
}
