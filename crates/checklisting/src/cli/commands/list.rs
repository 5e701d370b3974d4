//! List command - show configured checklists

use std::path::PathBuf;

use clap::Args;
use console::style;
use serde::Serialize;
use tracing::info;

use checklisting_core::config::{resolve_config, Config};

use crate::cli::output;
use crate::cli::{Cli, OutputFormat};

/// List configured checklists
#[derive(Debug, Args)]
pub struct ListCommand {
    /// Configuration file (default: search the working directory and its parents)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// One configured checklist, as listed
#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct ChecklistEntry {
    pub name: String,
    pub reducer: &'static str,
    pub task_types: Vec<String>,
}

fn entries(config: &Config) -> Vec<ChecklistEntry> {
    config
        .checklists
        .iter()
        .map(|checklist| ChecklistEntry {
            name: checklist.name.clone(),
            reducer: checklist.reducer.as_str(),
            task_types: checklist.tasks.iter().map(|t| t.kind.clone()).collect(),
        })
        .collect()
}

impl ListCommand {
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        let cwd = std::env::current_dir()?;
        let (config, path) = resolve_config(self.config.as_deref(), &cwd)?;
        info!(path = %path.display(), "executing list command");
        let entries = entries(&config);

        match cli.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&entries)?);
            }
            OutputFormat::Text => {
                if !cli.quiet {
                    println!("{}", output::header(&path.display().to_string()));
                }
                for entry in &entries {
                    println!("{}", style(&entry.name).bold());
                    if cli.verbose {
                        println!("{}", output::key_value("reducer", entry.reducer));
                        println!("{}", output::key_value("tasks", &entry.task_types.join(", ")));
                    }
                }
            }
        }

        Ok(())
    }
}
