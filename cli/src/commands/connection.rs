//! # octoposh Connection Command
//!
//! File: cli/src/commands/connection.rs
//!
//! ## Overview
//!
//! `octoposh connection` shows which server and API key the other commands
//! would use after configuration files, environment variables and flags are
//! merged. The key is masked. With `--test`, it also calls `GET /api` and
//! reports the server's application name and version.
//!
//! ```bash
//! octoposh connection
//! octoposh --server https://octopus.example.com connection --test
//! ```
//!
use crate::common::octopus;
use crate::core::config::{self, ConnectionOverrides};
use crate::core::error::Result;
use anyhow::Context;
use clap::Parser;
use tracing::info;

#[derive(Parser, Debug)]
#[command(about = "Show the effective Octopus connection settings")]
pub struct ConnectionArgs {
    /// Contact the server and report its version.
    #[arg(long)]
    test: bool,
}

pub async fn handle_connection(args: ConnectionArgs, overrides: &ConnectionOverrides) -> Result<()> {
    info!("Handling connection command (test: {})", args.test);

    let cfg = config::load_config().context("Failed to load octoposh configuration")?;
    let settings = config::resolve_server_settings(&cfg, overrides)?;

    println!("Server:  {}", settings.url);
    println!("API key: {}", config::mask_api_key(&settings.api_key));

    if args.test {
        let connection = octopus::connect(&settings)?;
        let root = connection
            .server_info()
            .await
            .context("Connection test failed")?;
        println!("Connected to {} {}", root.application, root.version);
    }
    Ok(())
}
