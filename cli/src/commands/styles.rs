//! # octoposh Styles Command
//!
//! File: cli/src/commands/styles.rs
//!
//! Prints the communication styles accepted by `octoposh machine --mode` and
//! the endpoint identifier each one corresponds to on the server. Runs
//! offline.
//!
use crate::commands::machine::CommunicationStyle;
use crate::common::ui::{self, table::Table};
use crate::core::config::OutputFormat;
use crate::core::error::Result;
use clap::Parser;
use serde::Serialize;

#[derive(Parser, Debug)]
#[command(about = "List the communication styles machines can be filtered by")]
pub struct StylesArgs {
    /// Output format.
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    output: OutputFormat,
}

#[derive(Serialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
struct StyleRow {
    communication_style: &'static str,
    endpoint: String,
}

fn style_rows() -> Vec<StyleRow> {
    CommunicationStyle::ALL
        .into_iter()
        .map(|style| StyleRow {
            communication_style: style.as_str(),
            endpoint: style.endpoint_kind().to_string(),
        })
        .collect()
}

pub fn handle_styles(args: StylesArgs) -> Result<()> {
    let rows = style_rows();
    match args.output {
        OutputFormat::Json => ui::print_json(&rows)?,
        OutputFormat::Text => {
            let mut table = Table::new(["Style", "Endpoint"]);
            for row in &rows {
                table.add_row([row.communication_style.to_string(), row.endpoint.clone()]);
            }
            print!("{}", table.render());
        }
    }
    Ok(())
}
