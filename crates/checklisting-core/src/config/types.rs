//! Configuration types

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::reducer::ReducerKind;

use super::defaults::{DEFAULT_SERVER_ADDR, DEFAULT_SERVER_PORT};

/// Main configuration for checklisting
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Checklists to run, in declaration order
    pub checklists: Vec<ChecklistConfig>,

    /// Listener for `checklisting serve`
    pub server: ServerConfig,
}

impl Config {
    /// Look up a checklist by name
    pub fn checklist(&self, name: &str) -> Option<&ChecklistConfig> {
        self.checklists.iter().find(|c| c.name == name)
    }

    pub fn checklist_names(&self) -> Vec<&str> {
        self.checklists.iter().map(|c| c.name.as_str()).collect()
    }
}

/// HTTP listener settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub addr: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: DEFAULT_SERVER_ADDR.to_string(),
            port: DEFAULT_SERVER_PORT,
        }
    }
}

/// One named checklist
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChecklistConfig {
    /// Checklist name, shown in the composite message prefix
    pub name: String,

    /// Status reducer for the checklist's children
    #[serde(default)]
    pub reducer: ReducerKind,

    /// Tasks in the checklist
    #[serde(default)]
    pub tasks: Vec<TaskConfig>,
}

/// One task entry; `type` selects the factory, every other key is a parameter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskConfig {
    #[serde(rename = "type")]
    pub kind: String,

    #[serde(flatten)]
    pub params: Map<String, Value>,
}

impl TaskConfig {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            params: Map::new(),
        }
    }

    /// Add a parameter
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Parameters as a single JSON object, for typed deserialization
    pub fn params_value(&self) -> Value {
        Value::Object(self.params.clone())
    }
}
