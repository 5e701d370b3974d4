//! Run command - execute the configured checklists

use std::path::{Path, PathBuf};

use clap::Args;
use tracing::info;

use checklisting_core::config::resolve_config;
use checklisting_core::{ChecklistError, ChecklistRunner, ConfigError, NameAllowList, TaskResult};
use checklisting_tasks::TaskRegistry;

use super::{report, result_writers, runtime};
use crate::cli::Cli;

/// Run the configured checklists
#[derive(Debug, Args)]
pub struct RunCommand {
    /// Configuration file (default: search the working directory and its parents)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Only run the named checklists
    #[arg(long, value_delimiter = ',')]
    pub only: Option<Vec<String>>,
}

impl RunCommand {
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        let cwd = std::env::current_dir()?;
        let results = runtime()?.block_on(self.run_checklists(cli, &cwd))?;
        report(cli, &results)
    }

    async fn run_checklists(&self, cli: &Cli, dir: &Path) -> anyhow::Result<Vec<TaskResult>> {
        let (config, path) = resolve_config(self.config.as_deref(), dir)?;
        info!(
            path = %path.display(),
            checklists = config.checklists.len(),
            "executing run command"
        );

        if let Some(only) = &self.only {
            if let Some(unknown) = only.iter().find(|name| config.checklist(name).is_none()) {
                return Err(ChecklistError::from(ConfigError::InvalidValue {
                    field: "only".to_string(),
                    message: format!("no checklist named '{}'", unknown),
                })
                .into());
            }
        }

        let provider = TaskRegistry::new().build_provider(&config)?;
        let runner = ChecklistRunner::new(result_writers(cli));

        Ok(match &self.only {
            Some(only) => {
                let predicate = NameAllowList::new(only.iter().cloned());
                runner.run_filtered(&provider, &predicate).await
            }
            None => runner.run(&provider).await,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Commands;
    use checklisting_core::ResultStatus;
    use clap::Parser;
    use tempfile::TempDir;

    const CONFIG: &str = r#"
checklists:
  - name: green
    tasks:
      - type: static
        status: SUCCESS
        message: fine
  - name: red
    reducer: priority
    tasks:
      - type: static
        status: SUCCESS
        message: fine
      - type: static
        status: FAILURE
        message: broken
"#;

    fn setup() -> TempDir {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("checklisting.yaml"), CONFIG).unwrap();
        temp
    }

    async fn run(args: &[&str], dir: &Path) -> anyhow::Result<Vec<TaskResult>> {
        let cli = Cli::try_parse_from(args).unwrap();
        let Commands::Run(cmd) = &cli.command else {
            panic!("expected run command");
        };
        cmd.run_checklists(&cli, dir).await
    }

    #[tokio::test]
    async fn test_runs_all_checklists_in_order() {
        let temp = setup();
        let results = run(&["checklisting", "-q", "run"], temp.path()).await.unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].message(), "Checklist [green]: Task success.");
        assert_eq!(results[1].status(), ResultStatus::Failure);
        assert_eq!(
            results[1].message(),
            "Checklist [red]: Task failure. See subtasks for details."
        );
    }

    #[tokio::test]
    async fn test_only_filters_checklists() {
        let temp = setup();
        let results = run(&["checklisting", "-q", "run", "--only", "green"], temp.path())
            .await
            .unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].status(), ResultStatus::Success);
    }

    #[tokio::test]
    async fn test_only_rejects_unknown_names() {
        let temp = setup();
        let err = run(&["checklisting", "-q", "run", "--only", "blue"], temp.path())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("no checklist named 'blue'"));
    }

    #[tokio::test]
    async fn test_explicit_config_path() {
        let temp = setup();
        let elsewhere = TempDir::new().unwrap();
        let path = temp.path().join("checklisting.yaml");
        let path = path.to_str().unwrap();

        let results = run(
            &["checklisting", "-q", "run", "--config", path],
            elsewhere.path(),
        )
        .await
        .unwrap();
        assert_eq!(results.len(), 2);
    }

    #[tokio::test]
    async fn test_missing_config() {
        let temp = TempDir::new().unwrap();
        let err = run(&["checklisting", "-q", "run"], temp.path())
            .await
            .unwrap_err();
        assert!(err.downcast_ref::<ChecklistError>().is_some());
    }
}
