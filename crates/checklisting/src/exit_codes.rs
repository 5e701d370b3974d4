//! Exit codes for the CLI

use checklisting_core::ChecklistError;

use crate::cli::commands::ChecklistsFailed;

/// Success
pub const SUCCESS: i32 = 0;

/// General error
pub const ERROR: i32 = 1;

/// Configuration error
pub const CONFIG_ERROR: i32 = 2;

/// At least one checklist reduced to FAILURE
pub const CHECKS_FAILED: i32 = 3;

/// Map an error returned by a command to its exit code
pub fn for_error(err: &anyhow::Error) -> i32 {
    if err.downcast_ref::<ChecklistsFailed>().is_some() {
        return CHECKS_FAILED;
    }
    match err.downcast_ref::<ChecklistError>() {
        Some(ChecklistError::Config(_) | ChecklistError::Yaml(_) | ChecklistError::Toml(_)) => {
            CONFIG_ERROR
        }
        _ => ERROR,
    }
}
