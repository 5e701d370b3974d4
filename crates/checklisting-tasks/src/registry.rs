//! Task registry mapping configured `type` identifiers to task factories

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use checklisting_core::config::{ChecklistConfig, Config, TaskConfig};
use checklisting_core::{
    Checklist, ConfigError, Result, StaticChecklistProvider, Task, TaskError,
};

use crate::env::EnvVarTask;
use crate::external::ExternalChecklistTask;
use crate::file::FileContentTask;
use crate::http::HttpTask;
use crate::path::{DirectoryExistsTask, FileExistsTask};
use crate::socket::SocketTask;
use crate::static_result::StaticResultTask;
use crate::subprocess::SubprocessTask;
use crate::system::{CpuInfoTask, DiskInfoTask, MemoryInfoTask};
use crate::zookeeper::ZookeeperTask;

/// Builds tasks of one type from configuration parameters
pub trait TaskFactory: Send + Sync {
    /// Identifier used as `type` in configuration
    fn task_type(&self) -> &'static str;

    /// Create a task from its parameters
    fn create(&self, params: &Value) -> Result<Arc<dyn Task>>;
}

/// Factory backed by a plain function
pub struct FnTaskFactory {
    task_type: &'static str,
    build: fn(&Value) -> Result<Arc<dyn Task>>,
}

impl FnTaskFactory {
    pub fn new(task_type: &'static str, build: fn(&Value) -> Result<Arc<dyn Task>>) -> Self {
        Self { task_type, build }
    }
}

impl TaskFactory for FnTaskFactory {
    fn task_type(&self) -> &'static str {
        self.task_type
    }

    fn create(&self, params: &Value) -> Result<Arc<dyn Task>> {
        (self.build)(params)
    }
}

/// Registry of available task factories
pub struct TaskRegistry {
    factories: Vec<Arc<dyn TaskFactory>>,
}

impl TaskRegistry {
    /// Create a new registry with all built-in tasks
    pub fn new() -> Self {
        let builtins: Vec<FnTaskFactory> = vec![
            FnTaskFactory::new("static", |p| Ok(Arc::new(StaticResultTask::from_params(p)?))),
            FnTaskFactory::new("env", |p| Ok(Arc::new(EnvVarTask::from_params(p)?))),
            FnTaskFactory::new("file_exists", |p| {
                Ok(Arc::new(FileExistsTask::from_params(p)?))
            }),
            FnTaskFactory::new("directory_exists", |p| {
                Ok(Arc::new(DirectoryExistsTask::from_params(p)?))
            }),
            FnTaskFactory::new("file_content", |p| {
                Ok(Arc::new(FileContentTask::from_params(p)?))
            }),
            FnTaskFactory::new("subprocess", |p| {
                Ok(Arc::new(SubprocessTask::from_params(p)?))
            }),
            FnTaskFactory::new("socket", |p| Ok(Arc::new(SocketTask::from_params(p)?))),
            FnTaskFactory::new("http", |p| Ok(Arc::new(HttpTask::from_params(p)?))),
            FnTaskFactory::new("external_checklist", |p| {
                Ok(Arc::new(ExternalChecklistTask::from_params(p)?))
            }),
            FnTaskFactory::new("zookeeper", |p| Ok(Arc::new(ZookeeperTask::from_params(p)?))),
            FnTaskFactory::new("cpu", |p| Ok(Arc::new(CpuInfoTask::from_params(p)?))),
            FnTaskFactory::new("memory", |p| Ok(Arc::new(MemoryInfoTask::from_params(p)?))),
            FnTaskFactory::new("disk", |p| Ok(Arc::new(DiskInfoTask::from_params(p)?))),
        ];

        Self {
            factories: builtins
                .into_iter()
                .map(|f| Arc::new(f) as Arc<dyn TaskFactory>)
                .collect(),
        }
    }

    /// Create an empty registry
    pub fn empty() -> Self {
        Self {
            factories: Vec::new(),
        }
    }

    /// Register a factory; a later registration shadows an earlier one of the
    /// same type
    pub fn register<F: TaskFactory + 'static>(&mut self, factory: F) {
        self.factories.push(Arc::new(factory));
    }

    /// Get factory by task type
    pub fn get(&self, task_type: &str) -> Option<Arc<dyn TaskFactory>> {
        let result = self
            .factories
            .iter()
            .rev()
            .find(|f| f.task_type() == task_type)
            .cloned();
        debug!(task_type, found = result.is_some(), "task registry lookup");
        result
    }

    /// Get registered task types
    pub fn names(&self) -> Vec<&'static str> {
        self.factories.iter().map(|f| f.task_type()).collect()
    }

    /// Build one task from its configuration
    pub fn create(&self, config: &TaskConfig) -> Result<Arc<dyn Task>> {
        let factory = self
            .get(&config.kind)
            .ok_or_else(|| ConfigError::UnknownTaskType(config.kind.clone()))?;
        factory.create(&config.params_value())
    }

    /// Build a checklist with its configured reducer
    pub fn build_checklist(&self, config: &ChecklistConfig) -> Result<Checklist> {
        let tasks = config
            .tasks
            .iter()
            .map(|task| self.create(task))
            .collect::<Result<Vec<_>>>()?;
        debug!(
            checklist = %config.name,
            tasks = tasks.len(),
            reducer = config.reducer.as_str(),
            "built checklist"
        );
        Ok(Checklist::with_reducer(
            config.name.clone(),
            tasks,
            config.reducer.build(),
        ))
    }

    /// Build a provider over every configured checklist
    pub fn build_provider(&self, config: &Config) -> Result<StaticChecklistProvider> {
        let checklists = config
            .checklists
            .iter()
            .map(|checklist| self.build_checklist(checklist))
            .collect::<Result<Vec<_>>>()?;
        Ok(StaticChecklistProvider::new(checklists))
    }
}

impl Default for TaskRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Deserialize task parameters, reporting failures against the task type
pub(crate) fn parse_params<T: DeserializeOwned>(task_type: &str, params: &Value) -> Result<T> {
    serde_json::from_value(params.clone())
        .map_err(|e| TaskError::invalid_parameters(task_type, e.to_string()).into())
}
