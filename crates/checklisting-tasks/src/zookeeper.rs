//! ZooKeeper four-letter-word checks

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use checklisting_core::{Result, ResultBuilder, Task, TaskResult};

use crate::file::LineValidator;
use crate::registry::parse_params;
use crate::socket::{SocketTask, DEFAULT_PORT};

const NOT_WHITELISTED: &str = "not in the whitelist";

/// Expects a single `imok` line in answer to `ruok`
#[derive(Debug, Clone, Copy, Default)]
pub struct RuokLineValidator;

impl LineValidator for RuokLineValidator {
    fn validate(&self, index: usize, line: &str) -> Option<TaskResult> {
        match index {
            0 if line == "imok" => Some(TaskResult::success(
                "Received [imok] from Zookeeper for [ruok] command",
            )),
            0 if line.contains(NOT_WHITELISTED) => Some(TaskResult::warning(
                "Please add [ruok] to [4lw.commands.whitelist] property in zookeeper.conf file",
            )),
            0 => Some(TaskResult::warning(format!("Line [{}] is not [imok]", line))),
            1 => Some(TaskResult::warning(
                "Received more than 1 line from Zookeeper for [ruok] command. This was unexpected.",
            )),
            _ => None,
        }
    }
}

/// Reports every `mntr` key/value line as `INFO`
#[derive(Debug, Clone, Copy, Default)]
pub struct MntrLineValidator;

impl LineValidator for MntrLineValidator {
    fn validate(&self, index: usize, line: &str) -> Option<TaskResult> {
        if line.contains(NOT_WHITELISTED) {
            return (index == 0).then(|| {
                TaskResult::warning(
                    "Please add [mntr] to [4lw.commands.whitelist] property in zookeeper.conf file",
                )
            });
        }

        let mut fields = line.split_whitespace();
        let Some(key) = fields.next() else {
            return Some(TaskResult::warning(format!("Line [{}] is not parseable", line)));
        };
        let value = fields.collect::<Vec<_>>().join(" ");
        Some(TaskResult::info(format!("[{}]=[{}]", key, value)))
    }
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

#[derive(Debug, Deserialize)]
struct ZookeeperParams {
    host: String,
    #[serde(default = "default_port")]
    port: u16,
}

/// Runs `ruok` and `mntr` against one server concurrently
#[derive(Debug)]
pub struct ZookeeperTask {
    ruok: SocketTask,
    mntr: SocketTask,
    builder: ResultBuilder,
}

impl ZookeeperTask {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        let host = host.into();
        Self {
            ruok: SocketTask::new(host.clone(), port, "ruok").with_validator(RuokLineValidator),
            mntr: SocketTask::new(host, port, "mntr").with_validator(MntrLineValidator),
            builder: ResultBuilder::new(),
        }
    }

    pub fn with_builder(mut self, builder: ResultBuilder) -> Self {
        self.builder = builder;
        self
    }

    /// Build from `{host, port?}`; the port defaults to 2181
    pub fn from_params(params: &Value) -> Result<Self> {
        let params: ZookeeperParams = parse_params("zookeeper", params)?;
        Ok(Self::new(params.host, params.port))
    }
}

#[async_trait]
impl Task for ZookeeperTask {
    async fn run_check(&self) -> Result<TaskResult> {
        let (ruok, mntr) = tokio::join!(self.ruok.execute(), self.mntr.execute());
        Ok(self.builder.build(vec![ruok, mntr]))
    }
}
