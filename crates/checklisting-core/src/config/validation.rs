//! Configuration validation

use std::collections::HashSet;

use tracing::debug;

use crate::error::{ConfigError, Result};

use super::types::Config;

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    debug!("validating configuration");
    validate_checklists(config)?;
    validate_tasks(config)?;
    debug!("configuration validation passed");
    Ok(())
}

fn validate_checklists(config: &Config) -> Result<()> {
    if config.checklists.is_empty() {
        return Err(ConfigError::MissingField("checklists".to_string()).into());
    }

    let mut seen = HashSet::new();
    for (idx, checklist) in config.checklists.iter().enumerate() {
        if checklist.name.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: format!("checklists[{}].name", idx),
                message: "name cannot be empty".to_string(),
            }
            .into());
        }

        if !seen.insert(checklist.name.as_str()) {
            return Err(ConfigError::DuplicateChecklist(checklist.name.clone()).into());
        }
    }

    Ok(())
}

fn validate_tasks(config: &Config) -> Result<()> {
    for checklist in &config.checklists {
        for (idx, task) in checklist.tasks.iter().enumerate() {
            if task.kind.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: format!("{}.tasks[{}].type", checklist.name, idx),
                    message: "task type cannot be empty".to_string(),
                }
                .into());
            }
        }
    }

    Ok(())
}
