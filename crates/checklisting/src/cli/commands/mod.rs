//! CLI commands

mod external;
mod list;
mod run;
mod serve;

pub use external::ExternalCommand;
pub use list::ListCommand;
pub use run::RunCommand;
pub use serve::ServeCommand;

use checklisting_core::{JsonSerializer, ResultWriterRegistry, RunSummary, TaskResult};

use crate::cli::output::{self, ConsoleWriter};
use crate::cli::{Cli, OutputFormat};

/// Returned when at least one checklist reduced to FAILURE
#[derive(Debug, thiserror::Error)]
#[error("{failed} checklist(s) failed")]
pub struct ChecklistsFailed {
    pub failed: usize,
}

/// Checks are I/O bound and cooperative, so one thread is enough
fn runtime() -> anyhow::Result<tokio::runtime::Runtime> {
    Ok(tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?)
}

/// Writers for a run: results always go to the log, and to the console in
/// text mode
fn result_writers(cli: &Cli) -> ResultWriterRegistry {
    let mut writers = ResultWriterRegistry::new();
    if cli.format == OutputFormat::Text && !cli.quiet {
        writers.register(ConsoleWriter);
    }
    writers
}

/// Print the run outcome and fail when any checklist failed
fn report(cli: &Cli, results: &[TaskResult]) -> anyhow::Result<()> {
    let summary = RunSummary::from_results(results);

    match cli.format {
        OutputFormat::Json => {
            println!("{}", JsonSerializer.dumps_all(results)?);
        }
        OutputFormat::Text if !cli.quiet => {
            println!();
            if cli.verbose {
                println!("{}", output::header("Summary"));
                println!("{}", output::key_value("success", &summary.success.to_string()));
                println!("{}", output::key_value("warning", &summary.warning.to_string()));
                println!("{}", output::key_value("failure", &summary.failure.to_string()));
                println!("{}", output::key_value("info", &summary.info.to_string()));
                println!("{}", output::key_value("unknown", &summary.unknown.to_string()));
            }
            if summary.warning > 0 || summary.unknown > 0 {
                output::warning(&format!(
                    "{} checklist(s) completed: {} warning, {} unknown",
                    summary.total, summary.warning, summary.unknown
                ));
            } else if !summary.has_failures() {
                output::success(&format!("{} checklist(s) completed", summary.total));
            }
        }
        OutputFormat::Text => {}
    }

    if summary.has_failures() {
        return Err(ChecklistsFailed {
            failed: summary.failure,
        }
        .into());
    }
    Ok(())
}
