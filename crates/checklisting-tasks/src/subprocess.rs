//! Subprocess check

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tokio::process::Command;
use tracing::{debug, warn};

use checklisting_core::{Result, ResultStatus, Task, TaskError, TaskResult};

use crate::registry::parse_params;

/// Captured output of a finished process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutput {
    pub command: String,
    pub stdout: String,
    pub stderr: String,
    /// `None` when the process was terminated by a signal
    pub exit_code: Option<i32>,
}

impl ProcessOutput {
    fn describe_failure(&self, error: &dyn std::fmt::Display) -> String {
        let exit_code = self
            .exit_code
            .map(|c| c.to_string())
            .unwrap_or_else(|| "none".to_string());
        format!(
            "Could not parse subprocess result. Details:\n\nstdout:\n{}\n\nstderr:\n{}\n\nexit_code: {}\n\nError:\n{}",
            self.stdout, self.stderr, exit_code, error
        )
    }
}

/// Interprets a process's output
pub trait SubprocessValidator: Send + Sync {
    fn validate(&self, output: &ProcessOutput) -> Result<TaskResult>;
}

/// Succeeds when the process exits with the expected code
#[derive(Debug, Clone, Copy)]
pub struct ExitCodeValidator {
    expected: i32,
}

impl ExitCodeValidator {
    pub fn new(expected: i32) -> Self {
        Self { expected }
    }
}

impl Default for ExitCodeValidator {
    fn default() -> Self {
        Self::new(0)
    }
}

impl SubprocessValidator for ExitCodeValidator {
    fn validate(&self, output: &ProcessOutput) -> Result<TaskResult> {
        let code = output.exit_code.ok_or_else(|| {
            TaskError::Process(format!("[{}] terminated by signal", output.command))
        })?;

        if code == self.expected {
            Ok(TaskResult::success(format!(
                "Command [{}] exited with code [{}]",
                output.command, code
            )))
        } else {
            Ok(TaskResult::failure(format!(
                "Command [{}] exited with code [{}], expected [{}]",
                output.command, code, self.expected
            )))
        }
    }
}

#[derive(Debug, Deserialize)]
struct SubprocessParams {
    command: Vec<String>,
    #[serde(default)]
    expected_exit_code: i32,
}

/// Runs a command and hands its output to a validator
pub struct SubprocessTask {
    program: String,
    args: Vec<String>,
    validator: Box<dyn SubprocessValidator>,
}

impl SubprocessTask {
    pub fn new(
        program: impl Into<String>,
        args: Vec<String>,
        validator: impl SubprocessValidator + 'static,
    ) -> Self {
        Self {
            program: program.into(),
            args,
            validator: Box::new(validator),
        }
    }

    /// Build from `{command: [program, args...], expected_exit_code?}`
    pub fn from_params(params: &Value) -> Result<Self> {
        let params: SubprocessParams = parse_params("subprocess", params)?;
        let mut argv = params.command.into_iter();
        let program = argv
            .next()
            .ok_or_else(|| TaskError::invalid_parameters("subprocess", "command cannot be empty"))?;
        Ok(Self::new(
            program,
            argv.collect(),
            ExitCodeValidator::new(params.expected_exit_code),
        ))
    }

    fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl std::fmt::Debug for SubprocessTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubprocessTask")
            .field("program", &self.program)
            .field("args", &self.args)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Task for SubprocessTask {
    async fn run_check(&self) -> Result<TaskResult> {
        let command = self.command_line();
        debug!(command = %command, "spawning subprocess");

        let output = Command::new(&self.program)
            .args(&self.args)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| TaskError::Process(format!("failed to run [{}]: {}", command, e)))?;

        let output = ProcessOutput {
            command,
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            exit_code: output.status.code(),
        };
        debug!(command = %output.command, exit_code = ?output.exit_code, "subprocess finished");

        Ok(match self.validator.validate(&output) {
            Ok(result) => result,
            Err(e) => {
                warn!(command = %output.command, error = %e, "could not interpret subprocess output");
                TaskResult::new(ResultStatus::Unknown, output.describe_failure(&e))
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sh(script: &str) -> SubprocessTask {
        SubprocessTask::new(
            "sh",
            vec!["-c".to_string(), script.to_string()],
            ExitCodeValidator::default(),
        )
    }

    #[tokio::test]
    async fn test_expected_exit_code() {
        let result = sh("exit 0").execute().await;
        assert_eq!(result, TaskResult::success("Command [sh -c exit 0] exited with code [0]"));
    }

    #[tokio::test]
    async fn test_unexpected_exit_code() {
        let result = sh("exit 3").execute().await;
        assert_eq!(result.status(), ResultStatus::Failure);
        assert!(result.message().ends_with("exited with code [3], expected [0]"));
    }

    #[tokio::test]
    async fn test_validator_error_is_unknown_with_details() {
        let result = sh("echo out; echo err >&2; kill -9 $$").execute().await;
        assert_eq!(result.status(), ResultStatus::Unknown);
        assert!(result.message().starts_with("Could not parse subprocess result."));
        assert!(result.message().contains("stdout:\nout\n"));
        assert!(result.message().contains("stderr:\nerr\n"));
        assert!(result.message().contains("exit_code: none"));
    }

    #[tokio::test]
    async fn test_spawn_failure_is_failure() {
        let task = SubprocessTask::new(
            "checklisting-no-such-binary",
            vec![],
            ExitCodeValidator::default(),
        );
        let result = task.execute().await;
        assert_eq!(result.status(), ResultStatus::Failure);
        assert!(result.message().starts_with("Process error: failed to run"));
    }

    #[tokio::test]
    async fn test_from_params() {
        let task = SubprocessTask::from_params(&json!({
            "command": ["sh", "-c", "exit 2"],
            "expected_exit_code": 2
        }))
        .unwrap();
        assert_eq!(task.execute().await.status(), ResultStatus::Success);

        assert!(SubprocessTask::from_params(&json!({"command": []})).is_err());
    }
}
