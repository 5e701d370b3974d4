use serde_json::{Map, Value};
use tracing::trace;

use crate::error::Result;
use crate::result::TaskResult;
use crate::status::ResultStatus;

/// Encodes results as `{"status": "...", "message": "...", "results": [...]}`.
///
/// `results` is present only on composites.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSerializer;

impl JsonSerializer {
    pub fn dumps(&self, result: &TaskResult) -> Result<String> {
        Ok(serde_json::to_string(result)?)
    }

    /// Encode several results as a JSON array
    pub fn dumps_all(&self, results: &[TaskResult]) -> Result<String> {
        Ok(serde_json::to_string(results)?)
    }

    pub fn to_value(&self, result: &TaskResult) -> Result<Value> {
        Ok(serde_json::to_value(result)?)
    }
}

/// Outcome of lenient decoding
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded {
    /// An object that looks like a result
    Result(TaskResult),
    /// An array, decoded element by element
    List(Vec<Decoded>),
    /// Anything else, unchanged
    Foreign(Value),
}

impl Decoded {
    pub fn into_result(self) -> Option<TaskResult> {
        match self {
            Self::Result(result) => Some(result),
            _ => None,
        }
    }

    pub fn as_result(&self) -> Option<&TaskResult> {
        match self {
            Self::Result(result) => Some(result),
            _ => None,
        }
    }
}

/// Lenient JSON decoder for result documents.
///
/// Objects carrying `status` and `message` become results (composites when a
/// `results` array is present); everything else passes through unchanged.
/// A composite keeps its recognized children and replaces the others in place
/// with [`unrecognized`] leaves. Only malformed JSON text is an error.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonDeserializer;

impl JsonDeserializer {
    pub fn loads(&self, text: &str) -> Result<Decoded> {
        let value: Value = serde_json::from_str(text)?;
        Ok(self.decode(value))
    }

    pub fn decode(&self, value: Value) -> Decoded {
        match value {
            Value::Array(items) => {
                Decoded::List(items.into_iter().map(|item| self.decode(item)).collect())
            }
            Value::Object(map) => match decode_result(&map) {
                Some(result) => Decoded::Result(result),
                None => {
                    trace!("passing through foreign JSON object");
                    Decoded::Foreign(Value::Object(map))
                }
            },
            other => Decoded::Foreign(other),
        }
    }
}

fn decode_result(map: &Map<String, Value>) -> Option<TaskResult> {
    let status = ResultStatus::parse(map.get("status")?.as_str()?)?;
    let message = map.get("message")?.as_str()?;

    match map.get("results") {
        Some(Value::Array(items)) => {
            let children = items.iter().map(decode_child).collect();
            Some(TaskResult::composite(status, message, children))
        }
        _ => Some(TaskResult::new(status, message)),
    }
}

fn decode_child(item: &Value) -> TaskResult {
    match item {
        Value::Object(child) => decode_result(child).unwrap_or_else(|| unrecognized(item)),
        _ => unrecognized(item),
    }
}

/// `UNKNOWN` placeholder for a value that is not a result
pub fn unrecognized(value: &Value) -> TaskResult {
    trace!(item = %value, "replacing foreign JSON value");
    TaskResult::new(ResultStatus::Unknown, format!("Unrecognized item: {}", value))
}
