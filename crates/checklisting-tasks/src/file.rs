//! File content check with per-line validation

use std::path::PathBuf;

use async_trait::async_trait;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use checklisting_core::{Result, ResultBuilder, ResultStatus, Task, TaskError, TaskResult};

use crate::registry::parse_params;

/// Maps one trimmed, non-empty line to an optional result.
///
/// `index` counts only the lines that survive trimming, starting at 0.
pub trait LineValidator: Send + Sync {
    fn validate(&self, index: usize, line: &str) -> Option<TaskResult>;
}

/// Reports every line as an `INFO` result
#[derive(Debug, Clone, Copy, Default)]
pub struct InfoLineValidator;

impl LineValidator for InfoLineValidator {
    fn validate(&self, _index: usize, line: &str) -> Option<TaskResult> {
        Some(TaskResult::info(line))
    }
}

/// Lines matching `pattern` get `status`; other lines get `otherwise`, or
/// are skipped when it is unset
#[derive(Debug, Clone)]
pub struct PatternLineValidator {
    pattern: Regex,
    status: ResultStatus,
    otherwise: Option<ResultStatus>,
}

impl PatternLineValidator {
    pub fn new(pattern: Regex, status: ResultStatus) -> Self {
        Self {
            pattern,
            status,
            otherwise: None,
        }
    }

    pub fn otherwise(mut self, status: ResultStatus) -> Self {
        self.otherwise = Some(status);
        self
    }
}

impl LineValidator for PatternLineValidator {
    fn validate(&self, _index: usize, line: &str) -> Option<TaskResult> {
        if self.pattern.is_match(line) {
            Some(TaskResult::new(self.status, line))
        } else {
            self.otherwise.map(|status| TaskResult::new(status, line))
        }
    }
}

/// Apply a line validator to every trimmed, non-empty line
pub(crate) fn validate_lines<'a>(
    validator: &dyn LineValidator,
    lines: impl IntoIterator<Item = &'a str>,
) -> Vec<TaskResult> {
    lines
        .into_iter()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .enumerate()
        .filter_map(|(index, line)| validator.validate(index, line))
        .collect()
}

fn default_match_status() -> ResultStatus {
    ResultStatus::Failure
}

#[derive(Debug, Deserialize)]
struct FileContentParams {
    path: PathBuf,
    pattern: Option<String>,
    #[serde(default = "default_match_status")]
    status: ResultStatus,
    otherwise: Option<ResultStatus>,
}

/// Reads a file and aggregates the per-line results
pub struct FileContentTask {
    path: PathBuf,
    validator: Box<dyn LineValidator>,
    builder: ResultBuilder,
}

impl FileContentTask {
    pub fn new(path: impl Into<PathBuf>, validator: impl LineValidator + 'static) -> Self {
        Self {
            path: path.into(),
            validator: Box::new(validator),
            builder: ResultBuilder::new(),
        }
    }

    pub fn with_builder(mut self, builder: ResultBuilder) -> Self {
        self.builder = builder;
        self
    }

    /// Build from `{path, pattern?, status?, otherwise?}` parameters.
    ///
    /// Without a pattern every line is reported as `INFO`.
    pub fn from_params(params: &Value) -> Result<Self> {
        let params: FileContentParams = parse_params("file_content", params)?;
        let Some(pattern) = params.pattern else {
            return Ok(Self::new(params.path, InfoLineValidator));
        };

        let regex = Regex::new(&pattern)
            .map_err(|e| TaskError::invalid_parameters("file_content", e.to_string()))?;
        let mut validator = PatternLineValidator::new(regex, params.status);
        if let Some(otherwise) = params.otherwise {
            validator = validator.otherwise(otherwise);
        }
        Ok(Self::new(params.path, validator))
    }
}

impl std::fmt::Debug for FileContentTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileContentTask")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Task for FileContentTask {
    async fn run_check(&self) -> Result<TaskResult> {
        if !tokio::fs::try_exists(&self.path).await.unwrap_or(false) {
            return Ok(TaskResult::failure(format!(
                "File [{}] does not exist",
                self.path.display()
            )));
        }

        let content = tokio::fs::read_to_string(&self.path).await?;
        let results = validate_lines(self.validator.as_ref(), content.lines());
        debug!(path = %self.path.display(), results = results.len(), "validated file content");
        Ok(self.builder.build(results))
    }
}
