//! Result output writers

use std::sync::{Arc, Mutex};

use crate::result::TaskResult;
use crate::serializer::HumanReadableSerializer;

/// Trait for writing finished result trees somewhere
pub trait ResultWriter: Send + Sync {
    fn write(&self, result: &TaskResult);
}

/// Writes each human-readable line through `tracing` under the
/// `checklist.result` target
#[derive(Debug, Default)]
pub struct TracingWriter {
    serializer: HumanReadableSerializer,
}

impl ResultWriter for TracingWriter {
    fn write(&self, result: &TaskResult) {
        for line in self.serializer.get_lines(result) {
            tracing::info!(target: "checklist.result", "{}", line);
        }
    }
}

/// Writer that collects results for later inspection (useful for testing)
#[derive(Debug, Default)]
pub struct CollectingWriter {
    results: Mutex<Vec<TaskResult>>,
}

impl CollectingWriter {
    /// Get all collected results
    pub fn results(&self) -> Vec<TaskResult> {
        self.results
            .lock()
            .map(|results| results.clone())
            .unwrap_or_default()
    }
}

impl ResultWriter for CollectingWriter {
    fn write(&self, result: &TaskResult) {
        if let Ok(mut results) = self.results.lock() {
            results.push(result.clone());
        }
    }
}

/// Registry of result writers
pub struct ResultWriterRegistry {
    writers: Vec<Arc<dyn ResultWriter>>,
}

impl ResultWriterRegistry {
    /// Registry with a [`TracingWriter`]
    pub fn new() -> Self {
        Self {
            writers: vec![Arc::new(TracingWriter::default())],
        }
    }

    pub fn empty() -> Self {
        Self {
            writers: Vec::new(),
        }
    }

    pub fn register<W: ResultWriter + 'static>(&mut self, writer: W) {
        self.writers.push(Arc::new(writer));
    }

    /// Register a writer the caller keeps a handle to
    pub fn register_shared(&mut self, writer: Arc<dyn ResultWriter>) {
        self.writers.push(writer);
    }

    pub fn all(&self) -> &[Arc<dyn ResultWriter>] {
        &self.writers
    }

    /// Send a result to every registered writer
    pub fn broadcast(&self, result: &TaskResult) {
        for writer in &self.writers {
            writer.write(result);
        }
    }
}

impl Default for ResultWriterRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::ResultStatus;

    #[test]
    fn test_collecting_writer() {
        let writer = CollectingWriter::default();
        writer.write(&TaskResult::success("a"));
        writer.write(&TaskResult::failure("b"));

        let results = writer.results();
        assert_eq!(results.len(), 2);
        assert_eq!(results[1].status(), ResultStatus::Failure);
    }

    #[test]
    fn test_tracing_writer() {
        let writer = TracingWriter::default();
        let tree = TaskResult::composite(
            ResultStatus::Success,
            "parent",
            vec![TaskResult::success("child")],
        );

        // Just verify it doesn't panic
        writer.write(&tree);
    }

    #[test]
    fn test_empty_registry() {
        let registry = ResultWriterRegistry::empty();
        assert!(registry.all().is_empty());
    }

    #[test]
    fn test_default_registry_traces() {
        assert_eq!(ResultWriterRegistry::new().all().len(), 1);
    }

    #[test]
    fn test_broadcast() {
        let collecting = Arc::new(CollectingWriter::default());
        let mut registry = ResultWriterRegistry::empty();
        registry.register_shared(collecting.clone());
        registry.register(CollectingWriter::default());

        registry.broadcast(&TaskResult::info("hello"));

        assert_eq!(registry.all().len(), 2);
        assert_eq!(collecting.results(), vec![TaskResult::info("hello")]);
    }
}
