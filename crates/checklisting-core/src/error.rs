//! Error types for checklisting

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using ChecklistError
pub type Result<T> = std::result::Result<T, ChecklistError>;

/// Main error type for checklisting operations
#[derive(Debug, Error)]
pub enum ChecklistError {
    /// Configuration-related errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Errors raised by a task's check
    #[error(transparent)]
    Task(#[from] TaskError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding or decoding error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found at {0}")]
    NotFound(PathBuf),

    /// Invalid configuration value
    #[error("Invalid configuration: {field} - {message}")]
    InvalidValue { field: String, message: String },

    /// Missing required field
    #[error("Missing required configuration field: {0}")]
    MissingField(String),

    /// Two checklists share a name
    #[error("Duplicate checklist name: {0}")]
    DuplicateChecklist(String),

    /// No factory registered for a task type
    #[error("Unknown task type: {0}")]
    UnknownTaskType(String),

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// IO error
    #[error("IO error reading config: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors surfaced by the work inside a task
#[derive(Debug, Error)]
pub enum TaskError {
    /// Task parameters could not be interpreted
    #[error("Invalid parameters for task '{task_type}': {message}")]
    InvalidParameters { task_type: String, message: String },

    /// Subprocess could not be spawned or awaited
    #[error("Process error: {0}")]
    Process(String),

    /// Socket connection failed
    #[error("Connection error: {0}")]
    Connection(String),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(String),

    /// Any other check failure
    #[error("{0}")]
    Other(String),
}

impl ChecklistError {
    /// Create a new "other" error with a message
    pub fn other<S: Into<String>>(msg: S) -> Self {
        Self::Other(msg.into())
    }
}

impl TaskError {
    /// Create an invalid-parameters error for a task type
    pub fn invalid_parameters(task_type: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameters {
            task_type: task_type.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_other_displays_bare_message() {
        assert_eq!(ChecklistError::other("boom").to_string(), "boom");
    }

    #[test]
    fn test_task_error_is_transparent() {
        let err: ChecklistError = TaskError::Connection("refused".to_string()).into();
        assert_eq!(err.to_string(), "Connection error: refused");
    }

    #[test]
    fn test_invalid_parameters_message() {
        let err = TaskError::invalid_parameters("env", "missing 'variable'");
        assert_eq!(
            err.to_string(),
            "Invalid parameters for task 'env': missing 'variable'"
        );
    }

    #[test]
    fn test_config_parse_errors_name_their_format() {
        let yaml = serde_yaml::from_str::<serde_yaml::Value>("a: [").unwrap_err();
        let err: ChecklistError = ConfigError::from(yaml).into();
        assert!(err.to_string().starts_with("YAML parsing error:"));

        let toml = toml::from_str::<toml::Value>("a = ").unwrap_err();
        let err: ChecklistError = ConfigError::from(toml).into();
        assert!(err.to_string().starts_with("TOML parsing error:"));
    }
}
