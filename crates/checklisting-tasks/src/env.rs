//! Environment variable check

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use checklisting_core::{Result, Task, TaskResult};

use crate::registry::parse_params;

#[derive(Debug, Deserialize)]
struct EnvParams {
    variable: String,
}

/// Succeeds when an environment variable is set, reporting its value
#[derive(Debug, Clone)]
pub struct EnvVarTask {
    variable: String,
}

impl EnvVarTask {
    pub fn new(variable: impl Into<String>) -> Self {
        Self {
            variable: variable.into(),
        }
    }

    pub fn from_params(params: &Value) -> Result<Self> {
        let params: EnvParams = parse_params("env", params)?;
        Ok(Self::new(params.variable))
    }

    pub fn variable(&self) -> &str {
        &self.variable
    }
}

#[async_trait]
impl Task for EnvVarTask {
    async fn run_check(&self) -> Result<TaskResult> {
        debug!(variable = %self.variable, "checking environment variable");
        Ok(match std::env::var(&self.variable) {
            Ok(value) => TaskResult::success(format!(
                "Environment variable [{}] has value [{}]",
                self.variable, value
            )),
            Err(_) => TaskResult::failure(format!(
                "Environment variable [{}] not found.",
                self.variable
            )),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use checklisting_core::ResultStatus;
    use serde_json::json;

    #[tokio::test]
    async fn test_present_variable() {
        std::env::set_var("CHECKLISTING_TEST_ENV_PRESENT", "yes");
        let result = EnvVarTask::new("CHECKLISTING_TEST_ENV_PRESENT")
            .execute()
            .await;
        assert_eq!(
            result,
            TaskResult::success(
                "Environment variable [CHECKLISTING_TEST_ENV_PRESENT] has value [yes]"
            )
        );
    }

    #[tokio::test]
    async fn test_missing_variable() {
        let result = EnvVarTask::new("CHECKLISTING_TEST_ENV_SURELY_UNSET")
            .execute()
            .await;
        assert_eq!(result.status(), ResultStatus::Failure);
        assert_eq!(
            result.message(),
            "Environment variable [CHECKLISTING_TEST_ENV_SURELY_UNSET] not found."
        );
    }

    #[test]
    fn test_from_params() {
        let task = EnvVarTask::from_params(&json!({"variable": "PATH"})).unwrap();
        assert_eq!(task.variable(), "PATH");
        assert!(EnvVarTask::from_params(&json!({})).is_err());
    }
}
