//! Result status severities

use std::fmt;

use serde::{Deserialize, Serialize};

/// Outcome severity of a task.
///
/// Variants are declared in ascending severity so the derived ordering gives
/// `Failure > Warning > Success > Info > Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ResultStatus {
    /// No definite status could be derived
    Unknown,
    /// Informational outcome
    Info,
    /// Check passed
    Success,
    /// Check passed with problems
    Warning,
    /// Check failed
    Failure,
}

impl ResultStatus {
    /// Canonical priority order used to resolve ties and fallbacks
    pub const PRIORITY: [ResultStatus; 5] = [
        Self::Failure,
        Self::Warning,
        Self::Success,
        Self::Info,
        Self::Unknown,
    ];

    /// Canonical uppercase name, as used on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "UNKNOWN",
            Self::Info => "INFO",
            Self::Success => "SUCCESS",
            Self::Warning => "WARNING",
            Self::Failure => "FAILURE",
        }
    }

    /// Parse a canonical status name; only the exact uppercase form matches
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "UNKNOWN" => Some(Self::Unknown),
            "INFO" => Some(Self::Info),
            "SUCCESS" => Some(Self::Success),
            "WARNING" => Some(Self::Warning),
            "FAILURE" => Some(Self::Failure),
            _ => None,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }
}

impl fmt::Display for ResultStatus {
    // `pad` so width/alignment specifiers like `{:<8}` apply
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_ordering() {
        assert!(ResultStatus::Failure > ResultStatus::Warning);
        assert!(ResultStatus::Warning > ResultStatus::Success);
        assert!(ResultStatus::Success > ResultStatus::Info);
        assert!(ResultStatus::Info > ResultStatus::Unknown);
    }

    #[test]
    fn test_priority_is_descending_severity() {
        let mut sorted = ResultStatus::PRIORITY;
        sorted.sort_by(|a, b| b.cmp(a));
        assert_eq!(sorted, ResultStatus::PRIORITY);
    }

    #[test]
    fn test_display_padding() {
        assert_eq!(format!("{:<8}", ResultStatus::Info), "INFO    ");
        assert_eq!(format!("{:<8}", ResultStatus::Failure), "FAILURE ");
        assert_eq!(ResultStatus::Success.to_string(), "SUCCESS");
    }

    #[test]
    fn test_parse() {
        assert_eq!(ResultStatus::parse("WARNING"), Some(ResultStatus::Warning));
        assert_eq!(ResultStatus::parse("FAILURE"), Some(ResultStatus::Failure));
        assert_eq!(ResultStatus::parse("bogus"), None);
    }

    #[test]
    fn test_parse_is_case_sensitive() {
        assert_eq!(ResultStatus::parse("warning"), None);
        assert_eq!(ResultStatus::parse("Success"), None);
        for status in ResultStatus::PRIORITY {
            assert_eq!(ResultStatus::parse(status.as_str()), Some(status));
        }
    }

    #[test]
    fn test_serde_uses_uppercase_name() {
        let json = serde_json::to_string(&ResultStatus::Warning).unwrap();
        assert_eq!(json, "\"WARNING\"");
        let status: ResultStatus = serde_json::from_str("\"INFO\"").unwrap();
        assert_eq!(status, ResultStatus::Info);
    }
}
