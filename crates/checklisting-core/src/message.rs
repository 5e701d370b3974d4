//! Composite result message strategies

use std::sync::Arc;

use crate::result::TaskResult;
use crate::status::ResultStatus;

/// Trait for building the message of a composite result
pub trait MessageBuilder: Send + Sync {
    /// Build a message from the reduced status and the child messages
    fn build(&self, status: ResultStatus, messages: &[&str]) -> String;

    /// Build a message from the reduced status and the child results
    fn of_results(&self, status: ResultStatus, results: &[TaskResult]) -> String {
        let messages: Vec<&str> = results.iter().map(TaskResult::message).collect();
        self.build(status, &messages)
    }
}

/// Fixed message per status; child messages are ignored
#[derive(Debug, Clone, Copy, Default)]
pub struct StatusAwareMessageBuilder;

impl MessageBuilder for StatusAwareMessageBuilder {
    fn build(&self, status: ResultStatus, _messages: &[&str]) -> String {
        match status {
            ResultStatus::Failure => "Task failure. See subtasks for details.",
            ResultStatus::Warning => "Task error. See subtasks for details.",
            ResultStatus::Success => "Task success.",
            ResultStatus::Unknown => "Task is in unknown state. See subtasks for details.",
            ResultStatus::Info => "Task completed. See subtasks for details.",
        }
        .to_string()
    }
}

/// Prepends a fixed prefix to whatever the inner builder produces
#[derive(Clone)]
pub struct PrefixedMessageBuilder {
    prefix: String,
    inner: Arc<dyn MessageBuilder>,
}

impl PrefixedMessageBuilder {
    /// Prefix the status-aware messages
    pub fn new(prefix: impl Into<String>) -> Self {
        Self::with_inner(prefix, Arc::new(StatusAwareMessageBuilder))
    }

    pub fn with_inner(prefix: impl Into<String>, inner: Arc<dyn MessageBuilder>) -> Self {
        Self {
            prefix: prefix.into(),
            inner,
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

impl std::fmt::Debug for PrefixedMessageBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrefixedMessageBuilder")
            .field("prefix", &self.prefix)
            .finish_non_exhaustive()
    }
}

impl MessageBuilder for PrefixedMessageBuilder {
    fn build(&self, status: ResultStatus, messages: &[&str]) -> String {
        format!("{}{}", self.prefix, self.inner.build(status, messages))
    }
}
