//! HTTP probe

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, Method, Response, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;
use url::Url;

use checklisting_core::{Result, Task, TaskError, TaskResult};

use crate::registry::parse_params;

/// Turns an HTTP response into a result
#[async_trait]
pub trait ResponseValidator: Send + Sync {
    async fn validate(&self, response: Response) -> Result<TaskResult>;
}

/// `200 OK` is a success, anything else a failure
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleResponseValidator;

#[async_trait]
impl ResponseValidator for SimpleResponseValidator {
    async fn validate(&self, response: Response) -> Result<TaskResult> {
        Ok(if response.status() == StatusCode::OK {
            TaskResult::success(format!("Request to [{}] succeeded", response.url()))
        } else {
            TaskResult::failure(format!("Request to [{}] failed", response.url()))
        })
    }
}

fn default_method() -> String {
    "GET".to_string()
}

#[derive(Debug, Deserialize)]
struct HttpParams {
    url: String,
    #[serde(default = "default_method")]
    method: String,
}

/// Issues one request and validates the response
#[derive(Clone)]
pub struct HttpTask {
    client: Client,
    method: Method,
    url: Url,
    validator: Arc<dyn ResponseValidator>,
}

impl HttpTask {
    /// Request validated by [`SimpleResponseValidator`]
    pub fn new(method: Method, url: Url) -> Self {
        Self::with_validator(method, url, Arc::new(SimpleResponseValidator))
    }

    pub fn with_validator(method: Method, url: Url, validator: Arc<dyn ResponseValidator>) -> Self {
        Self {
            client: Client::new(),
            method,
            url,
            validator,
        }
    }

    /// Build from `{url, method?}`; the method defaults to `GET`
    pub fn from_params(params: &Value) -> Result<Self> {
        let params: HttpParams = parse_params("http", params)?;
        let method = Method::from_bytes(params.method.to_uppercase().as_bytes())
            .map_err(|e| TaskError::invalid_parameters("http", e.to_string()))?;
        let url = parse_url("http", &params.url)?;
        Ok(Self::new(method, url))
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn method(&self) -> &Method {
        &self.method
    }
}

/// Parse a URL, reporting failures against the task type
pub(crate) fn parse_url(task_type: &str, raw: &str) -> Result<Url> {
    Url::parse(raw)
        .map_err(|e| TaskError::invalid_parameters(task_type, format!("{}: {}", raw, e)).into())
}

impl std::fmt::Debug for HttpTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTask")
            .field("method", &self.method)
            .field("url", &self.url.as_str())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Task for HttpTask {
    async fn run_check(&self) -> Result<TaskResult> {
        debug!(method = %self.method, url = %self.url, "sending request");
        let response = self
            .client
            .request(self.method.clone(), self.url.clone())
            .send()
            .await
            .map_err(|e| TaskError::Http(e.to_string()))?;
        debug!(url = %self.url, status = %response.status(), "received response");
        self.validator.validate(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use checklisting_core::ResultStatus;
    use mockito::Server;
    use serde_json::json;

    #[tokio::test]
    async fn test_ok_response_succeeds() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/health")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("{}")
            .create_async()
            .await;
        let url = Url::parse(&format!("{}/health", server.url())).unwrap();

        let result = HttpTask::new(Method::GET, url.clone()).execute().await;

        mock.assert_async().await;
        assert_eq!(
            result,
            TaskResult::success(format!("Request to [{}] succeeded", url))
        );
    }

    #[tokio::test]
    async fn test_error_response_fails() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/health")
            .with_status(500)
            .create_async()
            .await;
        let url = Url::parse(&format!("{}/health", server.url())).unwrap();

        let result = HttpTask::new(Method::GET, url.clone()).execute().await;

        mock.assert_async().await;
        assert_eq!(result, TaskResult::failure(format!("Request to [{}] failed", url)));
    }

    #[tokio::test]
    async fn test_redirect_status_is_not_success() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/health")
            .with_status(304)
            .create_async()
            .await;
        let url = Url::parse(&format!("{}/health", server.url())).unwrap();

        let result = HttpTask::new(Method::GET, url).execute().await;
        assert_eq!(result.status(), ResultStatus::Failure);
    }

    #[tokio::test]
    async fn test_unreachable_host_is_failure() {
        let port = {
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
            listener.local_addr().unwrap().port()
        };
        let url = Url::parse(&format!("http://127.0.0.1:{}/", port)).unwrap();

        let result = HttpTask::new(Method::GET, url).execute().await;
        assert_eq!(result.status(), ResultStatus::Failure);
        assert!(result.message().starts_with("HTTP error:"));
    }

    #[tokio::test]
    async fn test_from_params() {
        let mut server = Server::new_async().await;
        let mock = server.mock("HEAD", "/").with_status(200).create_async().await;

        let task = HttpTask::from_params(&json!({"url": server.url(), "method": "head"})).unwrap();
        assert_eq!(*task.method(), Method::HEAD);

        assert_eq!(task.execute().await.status(), ResultStatus::Success);
        mock.assert_async().await;
    }

    #[test]
    fn test_from_params_rejects_bad_url() {
        let err = HttpTask::from_params(&json!({"url": "not a url"})).unwrap_err();
        assert!(err.to_string().starts_with("Invalid parameters for task 'http'"));
    }
}
