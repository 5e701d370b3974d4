//! Checklist runner: executes every supplied checklist concurrently

use std::time::{Duration, Instant};

use futures::future::join_all;
use serde::Serialize;
use tracing::info;

use crate::output::ResultWriterRegistry;
use crate::provider::{ChecklistPredicate, ChecklistProvider};
use crate::result::TaskResult;
use crate::status::ResultStatus;
use crate::task::{Checklist, Task};

/// Counts of root checklist results by status
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub total: usize,
    pub failure: usize,
    pub warning: usize,
    pub success: usize,
    pub info: usize,
    pub unknown: usize,
}

impl RunSummary {
    pub fn from_results(results: &[TaskResult]) -> Self {
        let mut summary = Self {
            total: results.len(),
            ..Default::default()
        };
        for result in results {
            match result.status() {
                ResultStatus::Failure => summary.failure += 1,
                ResultStatus::Warning => summary.warning += 1,
                ResultStatus::Success => summary.success += 1,
                ResultStatus::Info => summary.info += 1,
                ResultStatus::Unknown => summary.unknown += 1,
            }
        }
        summary
    }

    pub fn has_failures(&self) -> bool {
        self.failure > 0
    }
}

/// Runs checklists from a provider and hands each result to the writers
pub struct ChecklistRunner {
    writers: ResultWriterRegistry,
}

impl ChecklistRunner {
    pub fn new(writers: ResultWriterRegistry) -> Self {
        Self { writers }
    }

    /// Run every checklist the provider supplies
    pub async fn run(&self, provider: &dyn ChecklistProvider) -> Vec<TaskResult> {
        self.execute(provider.get_all()).await
    }

    /// Run the checklists accepted by `predicate`
    pub async fn run_filtered(
        &self,
        provider: &dyn ChecklistProvider,
        predicate: &dyn ChecklistPredicate,
    ) -> Vec<TaskResult> {
        self.execute(provider.get_filtered(predicate)).await
    }

    async fn execute(&self, checklists: Vec<std::sync::Arc<Checklist>>) -> Vec<TaskResult> {
        let start = Instant::now();
        info!(checklists = checklists.len(), "running checklists");

        let results = join_all(checklists.iter().map(|checklist| checklist.execute())).await;
        for result in &results {
            self.writers.broadcast(result);
        }

        let summary = RunSummary::from_results(&results);
        log_summary(&summary, start.elapsed());
        results
    }
}

impl Default for ChecklistRunner {
    fn default() -> Self {
        Self::new(ResultWriterRegistry::new())
    }
}

fn log_summary(summary: &RunSummary, duration: Duration) {
    info!(
        "All checklists complete: {}/{} succeeded, {} warning, {} failed ({:.1}s)",
        summary.success,
        summary.total,
        summary.warning,
        summary.failure,
        duration.as_secs_f64()
    );
}
