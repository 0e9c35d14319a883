//! `recap list`: preview discovery without touching anything.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use recap_detector::{discover, Discovery};
use recap_renderer::Renderer;

use super::ServiceArgs;

/// Arguments for `recap list`.
#[derive(Args, Debug)]
pub struct ListArgs {
    #[command(flatten)]
    pub service: ServiceArgs,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Tabled)]
struct FunctionRow {
    #[tabled(rename = "function")]
    key: String,
    #[tabled(rename = "runtime")]
    runtime: String,
    #[tabled(rename = "handler")]
    handler: String,
    #[tabled(rename = "wrapper")]
    wrapper: String,
}

#[derive(Serialize)]
struct ListJson<'a> {
    handlers_dir: String,
    #[serde(flatten)]
    discovery: &'a Discovery,
}

impl ListArgs {
    pub fn run(self) -> Result<()> {
        let loaded = self.service.load()?;
        let config = loaded.service.run_config()?;
        let discovery = discover(&loaded.service);

        if self.json {
            let payload = ListJson {
                handlers_dir: config.handlers_dir_posix(),
                discovery: &discovery,
            };
            let json = serde_json::to_string_pretty(&payload).context("failed to encode JSON")?;
            println!("{json}");
            return Ok(());
        }

        if config.is_disabled() {
            println!("{} recap.dev is disabled for this service", "!".yellow().bold());
        }

        let renderer = Renderer::new();
        let rows = discovery
            .functions
            .iter()
            .map(|f| -> Result<FunctionRow> {
                Ok(FunctionRow {
                    key: f.key.to_string(),
                    runtime: f.runtime.clone(),
                    handler: f.handler_reference.clone().unwrap_or_default(),
                    wrapper: format!(
                        "{}/{}",
                        config.handlers_dir_posix(),
                        renderer.output_file_name(f)?
                    ),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        if rows.is_empty() {
            println!("No functions to wrap.");
        } else {
            let mut table = Table::new(rows);
            table.with(Style::rounded());
            println!("{table}");
        }

        for s in &discovery.skipped {
            println!("  {}  {} ({})", "·".bright_black(), s.key, s.reason);
        }
        Ok(())
    }
}
