//! # octoposh Main Entry Point
//!
//! File: cli/src/main.rs
//!
//! ## Overview
//!
//! Entry point for the octoposh CLI, a shell-friendly way to query an
//! Octopus Deploy server. It handles:
//! - Command-line argument parsing using Clap
//! - Setting up logging based on verbosity flags
//! - Routing execution to the command handlers
//!
//! ## Examples
//!
//! ```bash
//! # Machines whose name starts with "Web"
//! octoposh --server https://octopus.example.com --api-key API-XXXX machine --name "Web*"
//!
//! # Same, with the connection taken from OctopusURL / OctopusAPIKey
//! export OctopusURL=https://octopus.example.com OctopusAPIKey=API-XXXX
//! octoposh -v machine --environment Production --output json
//! ```
//!
//! Command processing flow:
//! 1. Parse command-line args via Clap
//! 2. Configure logging based on verbosity level (`RUST_LOG` wins if set)
//! 3. Route to the command handler
//! 4. Print any error to stderr and exit with status 1
//!
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

mod commands; // Command handlers (machine, environment, ...)
mod common; // Shared utilities (Octopus API client, wildcard, output)
mod core; // Core infrastructure (errors, config)

use crate::core::config::ConnectionOverrides;

/// Defines the top-level command-line arguments structure using Clap's derive macros.
#[derive(Parser, Debug)]
#[command(
    name = "octoposh",
    about = "Query an Octopus Deploy server's machines and environments",
    propagate_version = true,
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    /// Octopus server URL.
    #[arg(long, env = "OctopusURL", global = true)]
    server: Option<String>,
    /// Octopus API key.
    #[arg(long, env = "OctopusAPIKey", hide_env_values = true, global = true)]
    api_key: Option<String>,
}

/// Enum defining all available top-level commands.
#[derive(Parser, Debug)]
enum Commands {
    #[command(alias = "m", alias = "machines")]
    Machine(commands::machine::MachineArgs),
    #[command(alias = "env", alias = "environments")]
    Environment(commands::environment::EnvironmentArgs),
    Styles(commands::styles::StylesArgs),
    Connection(commands::connection::ConnectionArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    tracing::debug!("Parsed command: {:?}", cli.command);

    let overrides = ConnectionOverrides {
        server: cli.server,
        api_key: cli.api_key,
    };

    let command_result = match cli.command {
        Commands::Machine(args) => commands::machine::handle_machine(args, &overrides).await,
        Commands::Environment(args) => {
            commands::environment::handle_environment(args, &overrides).await
        }
        Commands::Styles(args) => commands::styles::handle_styles(args),
        Commands::Connection(args) => {
            commands::connection::handle_connection(args, &overrides).await
        }
    };

    if let Err(e) = command_result {
        tracing::error!("Command execution failed: {:?}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}
