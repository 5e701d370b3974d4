//! Task result model

use serde::{Deserialize, Serialize};

use crate::status::ResultStatus;

/// Outcome of a task.
///
/// A leaf result carries only a status and a message. A composite result also
/// carries the ordered results of its children, in submission order. Equality
/// is structural over all three fields.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskResult {
    status: ResultStatus,
    message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    results: Option<Vec<TaskResult>>,
}

impl TaskResult {
    /// Create a leaf result
    pub fn new(status: ResultStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            results: None,
        }
    }

    /// Create a composite result.
    ///
    /// Within the engine composites come from [`crate::ResultBuilder`], which
    /// derives the status from the children. Direct construction is for
    /// decoding results received from elsewhere.
    pub fn composite(
        status: ResultStatus,
        message: impl Into<String>,
        results: Vec<TaskResult>,
    ) -> Self {
        Self {
            status,
            message: message.into(),
            results: Some(results),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(ResultStatus::Success, message)
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(ResultStatus::Failure, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(ResultStatus::Warning, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(ResultStatus::Info, message)
    }

    pub fn status(&self) -> ResultStatus {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Child results, if this is a composite
    pub fn results(&self) -> Option<&[TaskResult]> {
        self.results.as_deref()
    }

    pub fn is_composite(&self) -> bool {
        self.results.is_some()
    }

    /// Number of nodes in this result tree, including this one
    pub fn node_count(&self) -> usize {
        1 + self
            .results
            .iter()
            .flatten()
            .map(TaskResult::node_count)
            .sum::<usize>()
    }
}
