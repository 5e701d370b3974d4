//! Remote checklist aggregation

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Method, Response, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use checklisting_core::serializer::unrecognized;
use checklisting_core::{
    Decoded, JsonDeserializer, PrefixedMessageBuilder, Result, ResultBuilder, ResultStatus, Task,
    TaskError, TaskResult,
};

use crate::http::{parse_url, HttpTask, ResponseValidator};
use crate::registry::parse_params;

/// Prefix bare hosts with `http://`
pub fn normalize_source(source: &str) -> String {
    if source.starts_with("http") {
        source.to_string()
    } else {
        format!("http://{}", source)
    }
}

/// Flatten decoded items into results; foreign items are reported as
/// `UNKNOWN` so that nothing sent by the peer is silently dropped
fn collect_results(decoded: Decoded, out: &mut Vec<TaskResult>) {
    match decoded {
        Decoded::Result(result) => out.push(result),
        Decoded::List(items) => {
            for item in items {
                collect_results(item, out);
            }
        }
        Decoded::Foreign(value) => {
            warn!(item = %value, "external checklist returned a non-result item");
            out.push(unrecognized(&value));
        }
    }
}

/// Aggregates the results served by another checklisting instance
#[derive(Clone)]
pub struct ExternalChecklistValidator {
    builder: ResultBuilder,
}

impl ExternalChecklistValidator {
    /// Aggregate under the `IP [source] ` message prefix
    pub fn new(source: &str) -> Self {
        let prefix = PrefixedMessageBuilder::new(format!("IP [{}] ", source));
        Self::with_builder(ResultBuilder::new().with_message_builder(Arc::new(prefix)))
    }

    pub fn with_builder(builder: ResultBuilder) -> Self {
        Self { builder }
    }
}

#[async_trait]
impl ResponseValidator for ExternalChecklistValidator {
    async fn validate(&self, response: Response) -> Result<TaskResult> {
        let status = response.status();
        let url = response.url().to_string();
        let body = response
            .text()
            .await
            .map_err(|e| TaskError::Http(e.to_string()))?;

        if status != StatusCode::OK {
            debug!(url = %url, status = %status, "external checklist call failed");
            return Ok(TaskResult::composite(
                ResultStatus::Failure,
                format!(
                    "Call to external checklist [{}] failed. See subtasks for details.",
                    url
                ),
                vec![TaskResult::info(body)],
            ));
        }

        let mut results = Vec::new();
        collect_results(JsonDeserializer.loads(&body)?, &mut results);
        debug!(url = %url, results = results.len(), "decoded external checklist");
        Ok(self.builder.build(results))
    }
}

#[derive(Debug, Deserialize)]
struct ExternalParams {
    url: String,
}

/// Fetches and aggregates a peer's checklist output with a `GET`
#[derive(Debug, Clone)]
pub struct ExternalChecklistTask {
    inner: HttpTask,
}

impl ExternalChecklistTask {
    /// Task for `source`, a URL or a bare `host[:port]`
    pub fn new(source: &str) -> Result<Self> {
        let source = normalize_source(source);
        let url = parse_url("external_checklist", &source)?;
        let validator = Arc::new(ExternalChecklistValidator::new(&source));
        Ok(Self {
            inner: HttpTask::with_validator(Method::GET, url, validator),
        })
    }

    pub fn from_params(params: &Value) -> Result<Self> {
        let params: ExternalParams = parse_params("external_checklist", params)?;
        Self::new(&params.url)
    }

    pub fn url(&self) -> &url::Url {
        self.inner.url()
    }
}

#[async_trait]
impl Task for ExternalChecklistTask {
    async fn run_check(&self) -> Result<TaskResult> {
        self.inner.run_check().await
    }
}
