//! External command - aggregate the checklists served by other instances

use std::sync::Arc;

use clap::Args;
use tracing::info;

use checklisting_core::{Checklist, ChecklistRunner, StaticChecklistProvider, Task};
use checklisting_tasks::ExternalChecklistTask;

use super::{report, result_writers, runtime};
use crate::cli::Cli;

/// Name of the checklist wrapping the remote sources
const EXTERNAL_CHECKLIST: &str = "external";

/// Aggregate the checklists served by other instances
#[derive(Debug, Args)]
pub struct ExternalCommand {
    /// Instances to query, as URLs or host:port (comma separated)
    #[arg(short, long, value_delimiter = ',', required = true)]
    pub sources: Vec<String>,
}

impl ExternalCommand {
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(sources = self.sources.len(), "executing external command");
        let provider = StaticChecklistProvider::new(vec![self.build_checklist()?]);
        let runner = ChecklistRunner::new(result_writers(cli));

        let results = runtime()?.block_on(runner.run(&provider));
        report(cli, &results)
    }

    fn build_checklist(&self) -> anyhow::Result<Checklist> {
        let tasks = self
            .sources
            .iter()
            .map(|source| {
                ExternalChecklistTask::new(source).map(|task| Arc::new(task) as Arc<dyn Task>)
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Checklist::new(EXTERNAL_CHECKLIST, tasks))
    }
}
