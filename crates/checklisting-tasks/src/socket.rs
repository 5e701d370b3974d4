//! Raw TCP probe

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::debug;

use checklisting_core::{Result, ResultBuilder, Task, TaskError, TaskResult};

use crate::file::{validate_lines, InfoLineValidator, LineValidator};
use crate::registry::parse_params;

/// ZooKeeper client port; four-letter-word probes are the common case
pub const DEFAULT_PORT: u16 = 2181;

fn default_port() -> u16 {
    DEFAULT_PORT
}

#[derive(Debug, Deserialize)]
struct SocketParams {
    host: String,
    #[serde(default = "default_port")]
    port: u16,
    #[serde(default)]
    payload: String,
}

/// Sends a payload over TCP and validates each line of the response
pub struct SocketTask {
    host: String,
    port: u16,
    payload: Vec<u8>,
    validator: Box<dyn LineValidator>,
    builder: ResultBuilder,
}

impl SocketTask {
    /// Probe reporting every response line as `INFO`
    pub fn new(host: impl Into<String>, port: u16, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            host: host.into(),
            port,
            payload: payload.into(),
            validator: Box::new(InfoLineValidator),
            builder: ResultBuilder::new(),
        }
    }

    pub fn with_validator(mut self, validator: impl LineValidator + 'static) -> Self {
        self.validator = Box::new(validator);
        self
    }

    pub fn with_builder(mut self, builder: ResultBuilder) -> Self {
        self.builder = builder;
        self
    }

    pub fn from_params(params: &Value) -> Result<Self> {
        let params: SocketParams = parse_params("socket", params)?;
        Ok(Self::new(params.host, params.port, params.payload))
    }

    async fn exchange(&self) -> std::io::Result<Vec<u8>> {
        debug!(host = %self.host, port = self.port, "opening connection");
        let mut stream = TcpStream::connect((self.host.as_str(), self.port)).await?;

        debug!(bytes = self.payload.len(), "sending payload");
        stream.write_all(&self.payload).await?;
        stream.flush().await?;

        let mut response = Vec::new();
        stream.read_to_end(&mut response).await?;
        debug!(bytes = response.len(), "connection closed by peer");
        Ok(response)
    }
}

impl std::fmt::Debug for SocketTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SocketTask")
            .field("host", &self.host)
            .field("port", &self.port)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Task for SocketTask {
    async fn run_check(&self) -> Result<TaskResult> {
        let response = self.exchange().await.map_err(|e| {
            TaskError::Connection(format!("{}:{}: {}", self.host, self.port, e))
        })?;
        let text = String::from_utf8_lossy(&response);
        let results = validate_lines(self.validator.as_ref(), text.lines());
        Ok(self.builder.build(results))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use checklisting_core::ResultStatus;
    use regex::Regex;
    use serde_json::json;
    use tokio::net::TcpListener;

    use crate::file::PatternLineValidator;

    /// Accept one connection, read the payload, answer with `reply` and close
    async fn serve_once(reply: &'static str) -> (u16, tokio::task::JoinHandle<Vec<u8>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let handle = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 4];
            stream.read_exact(&mut buf).await.unwrap();
            stream.write_all(reply.as_bytes()).await.unwrap();
            stream.shutdown().await.unwrap();
            buf
        });
        (port, handle)
    }

    #[tokio::test]
    async fn test_lines_become_info_results() {
        let (port, server) = serve_once("zk_version\t3.4.14\n\n  zk_server_state\tleader  \n").await;

        let result = SocketTask::new("127.0.0.1", port, "mntr").execute().await;

        assert_eq!(server.await.unwrap(), b"mntr");
        assert_eq!(result.status(), ResultStatus::Info);
        assert_eq!(
            result.results().unwrap(),
            &[
                TaskResult::info("zk_version\t3.4.14"),
                TaskResult::info("zk_server_state\tleader"),
            ]
        );
    }

    #[tokio::test]
    async fn test_custom_line_validator() {
        let (port, _server) = serve_once("imok\n").await;

        let validator = PatternLineValidator::new(Regex::new("^imok$").unwrap(), ResultStatus::Success)
            .otherwise(ResultStatus::Failure);
        let result = SocketTask::new("127.0.0.1", port, "ruok")
            .with_validator(validator)
            .execute()
            .await;

        assert_eq!(result.status(), ResultStatus::Success);
        assert_eq!(result.message(), "Task success.");
    }

    #[tokio::test]
    async fn test_connection_refused_is_failure() {
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            listener.local_addr().unwrap().port()
        };

        let result = SocketTask::new("127.0.0.1", port, "ruok").execute().await;
        assert_eq!(result.status(), ResultStatus::Failure);
        assert!(result.message().starts_with("Connection error: 127.0.0.1:"));
    }

    #[test]
    fn test_from_params_default_port() {
        let task = SocketTask::from_params(&json!({"host": "zk1", "payload": "ruok"})).unwrap();
        assert_eq!(task.port, DEFAULT_PORT);
        assert_eq!(task.payload, b"ruok");
        assert!(SocketTask::from_params(&json!({"port": 1})).is_err());
    }
}
