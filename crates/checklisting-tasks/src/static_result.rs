//! Task returning a fixed result

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use checklisting_core::{Result, ResultStatus, Task, TaskResult};

use crate::registry::parse_params;

#[derive(Debug, Deserialize)]
struct StaticParams {
    status: ResultStatus,
    #[serde(default)]
    message: String,
}

/// Always yields the same result. Useful for placeholders and tests.
#[derive(Debug, Clone)]
pub struct StaticResultTask {
    result: TaskResult,
}

impl StaticResultTask {
    pub fn new(result: TaskResult) -> Self {
        Self { result }
    }

    /// Build from `{status, message}` parameters
    pub fn from_params(params: &Value) -> Result<Self> {
        let params: StaticParams = parse_params("static", params)?;
        Ok(Self::new(TaskResult::new(params.status, params.message)))
    }
}

#[async_trait]
impl Task for StaticResultTask {
    async fn run_check(&self) -> Result<TaskResult> {
        Ok(self.result.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_from_params() {
        let task =
            StaticResultTask::from_params(&json!({"status": "WARNING", "message": "low"})).unwrap();
        assert_eq!(task.execute().await, TaskResult::warning("low"));
    }

    #[test]
    fn test_rejects_unknown_status() {
        assert!(StaticResultTask::from_params(&json!({"status": "MAYBE"})).is_err());
    }
}
