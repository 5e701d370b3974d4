//! Task abstraction, composite execution and checklists

use std::any::Any;
use std::fmt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use futures::future::join_all;
use futures::FutureExt;
use tracing::{debug, info, warn};

use crate::builder::ResultBuilder;
use crate::error::Result;
use crate::message::PrefixedMessageBuilder;
use crate::reducer::{DefaultReducer, StatusReducer};
use crate::result::TaskResult;

/// A unit of work producing one [`TaskResult`].
///
/// Implementers supply [`Task::run_check`], which may perform I/O and may
/// fail. Callers use [`Task::execute`], which never fails: an error or a
/// panic inside the check becomes a `FAILURE` result. Dropping the future
/// returned by `execute` cancels the check; cancellation is never turned
/// into a result.
#[async_trait]
pub trait Task: Send + Sync {
    /// Perform the check
    async fn run_check(&self) -> Result<TaskResult>;

    /// Perform the check, converting any failure into a `FAILURE` result
    async fn execute(&self) -> TaskResult {
        match AssertUnwindSafe(self.run_check()).catch_unwind().await {
            Ok(Ok(result)) => result,
            Ok(Err(err)) => {
                debug!(error = %err, "task check failed");
                TaskResult::failure(err.to_string())
            }
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                warn!(panic = %message, "task check panicked");
                TaskResult::failure(format!("Task panicked: {}", message))
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Runs a group of tasks concurrently and aggregates their results
#[derive(Clone)]
pub struct CompositeTask {
    tasks: Vec<Arc<dyn Task>>,
    builder: ResultBuilder,
}

impl CompositeTask {
    /// Create a composite using the default [`ResultBuilder`]
    pub fn new(tasks: Vec<Arc<dyn Task>>) -> Self {
        Self::with_builder(tasks, ResultBuilder::new())
    }

    pub fn with_builder(tasks: Vec<Arc<dyn Task>>, builder: ResultBuilder) -> Self {
        Self { tasks, builder }
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

impl fmt::Debug for CompositeTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeTask")
            .field("tasks", &self.tasks.len())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Task for CompositeTask {
    async fn run_check(&self) -> Result<TaskResult> {
        // join_all yields results in submission order, whatever order the
        // children finish in
        let results = join_all(self.tasks.iter().map(|task| task.execute())).await;
        Ok(self.builder.build(results))
    }
}

/// A named composite task.
///
/// With the default builder the composite message is prefixed with
/// `Checklist [name]: `.
#[derive(Clone)]
pub struct Checklist {
    name: String,
    inner: CompositeTask,
}

impl Checklist {
    pub fn new(name: impl Into<String>, tasks: Vec<Arc<dyn Task>>) -> Self {
        Self::with_reducer(name, tasks, Arc::new(DefaultReducer::new()))
    }

    /// Create a prefixed checklist that reduces child statuses with `reducer`
    pub fn with_reducer(
        name: impl Into<String>,
        tasks: Vec<Arc<dyn Task>>,
        reducer: Arc<dyn StatusReducer>,
    ) -> Self {
        let name = name.into();
        let builder = ResultBuilder::new()
            .with_reducer(reducer)
            .with_message_builder(Arc::new(PrefixedMessageBuilder::new(format!(
                "Checklist [{}]: ",
                name
            ))));
        Self {
            inner: CompositeTask::with_builder(tasks, builder),
            name,
        }
    }

    /// Create a checklist with a caller-supplied builder; no prefix is added
    pub fn with_builder(
        name: impl Into<String>,
        tasks: Vec<Arc<dyn Task>>,
        builder: ResultBuilder,
    ) -> Self {
        Self {
            name: name.into(),
            inner: CompositeTask::with_builder(tasks, builder),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of direct child tasks
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl fmt::Debug for Checklist {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Checklist")
            .field("name", &self.name)
            .field("tasks", &self.inner.len())
            .finish()
    }
}

#[async_trait]
impl Task for Checklist {
    async fn run_check(&self) -> Result<TaskResult> {
        let start = Instant::now();
        info!(checklist = %self.name, tasks = self.inner.len(), "executing checklist");
        let result = self.inner.run_check().await?;
        info!(
            checklist = %self.name,
            status = %result.status(),
            "checklist completed in {:.1}s",
            start.elapsed().as_secs_f64()
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use crate::error::ChecklistError;
    use crate::status::ResultStatus;

    struct Fixed(TaskResult);

    #[async_trait]
    impl Task for Fixed {
        async fn run_check(&self) -> Result<TaskResult> {
            Ok(self.0.clone())
        }
    }

    struct Failing(&'static str);

    #[async_trait]
    impl Task for Failing {
        async fn run_check(&self) -> Result<TaskResult> {
            Err(ChecklistError::other(self.0))
        }
    }

    struct Panicking;

    #[async_trait]
    impl Task for Panicking {
        async fn run_check(&self) -> Result<TaskResult> {
            panic!("kaboom");
        }
    }

    struct Delayed {
        delay: Duration,
        result: TaskResult,
        finished: Arc<AtomicUsize>,
        order: Arc<std::sync::Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl Task for Delayed {
        async fn run_check(&self) -> Result<TaskResult> {
            tokio::time::sleep(self.delay).await;
            self.finished.fetch_add(1, Ordering::SeqCst);
            self.order
                .lock()
                .unwrap()
                .push(self.result.message().to_string());
            Ok(self.result.clone())
        }
    }

    struct Counting(Arc<AtomicUsize>);

    #[async_trait]
    impl Task for Counting {
        async fn run_check(&self) -> Result<TaskResult> {
            let n = self.0.fetch_add(1, Ordering::SeqCst) + 1;
            Ok(TaskResult::info(format!("run {}", n)))
        }
    }

    fn arc<T: Task + 'static>(task: T) -> Arc<dyn Task> {
        Arc::new(task)
    }

    #[tokio::test]
    async fn test_execute_converts_error_to_failure() {
        let result = Failing("boom").execute().await;
        assert_eq!(result, TaskResult::failure("boom"));
    }

    #[tokio::test]
    async fn test_execute_converts_panic_to_failure() {
        let result = Panicking.execute().await;
        assert_eq!(result.status(), ResultStatus::Failure);
        assert_eq!(result.message(), "Task panicked: kaboom");
    }

    #[tokio::test]
    async fn test_composite_isolates_failures() {
        let composite = CompositeTask::new(vec![
            arc(Failing("boom")),
            arc(Fixed(TaskResult::success("ok"))),
        ]);

        let result = composite.execute().await;

        assert_eq!(result.status(), ResultStatus::Failure);
        assert_eq!(result.message(), "Task failure. See subtasks for details.");
        assert_eq!(
            result.results().unwrap(),
            &[TaskResult::failure("boom"), TaskResult::success("ok")]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_composite_preserves_submission_order() {
        let finished = Arc::new(AtomicUsize::new(0));
        let order = Arc::new(std::sync::Mutex::new(Vec::new()));
        let slow = Delayed {
            delay: Duration::from_millis(300),
            result: TaskResult::success("slow"),
            finished: finished.clone(),
            order: order.clone(),
        };
        let fast = Delayed {
            delay: Duration::from_millis(10),
            result: TaskResult::warning("fast"),
            finished: finished.clone(),
            order: order.clone(),
        };

        let result = CompositeTask::new(vec![arc(slow), arc(fast)]).execute().await;

        assert_eq!(finished.load(Ordering::SeqCst), 2);
        assert_eq!(*order.lock().unwrap(), vec!["fast", "slow"]);
        let messages: Vec<&str> = result
            .results()
            .unwrap()
            .iter()
            .map(TaskResult::message)
            .collect();
        assert_eq!(messages, vec!["slow", "fast"]);
        assert_eq!(result.status(), ResultStatus::Warning);
    }

    #[tokio::test(start_paused = true)]
    async fn test_children_run_concurrently() {
        let finished = Arc::new(AtomicUsize::new(0));
        let order = Arc::new(std::sync::Mutex::new(Vec::new()));
        let tasks: Vec<Arc<dyn Task>> = (0..5)
            .map(|i| {
                arc(Delayed {
                    delay: Duration::from_secs(1),
                    result: TaskResult::success(format!("t{}", i)),
                    finished: finished.clone(),
                    order: order.clone(),
                })
            })
            .collect();

        let start = tokio::time::Instant::now();
        CompositeTask::new(tasks).execute().await;

        assert_eq!(finished.load(Ordering::SeqCst), 5);
        assert!(start.elapsed() < Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancellation_propagates() {
        let finished = Arc::new(AtomicUsize::new(0));
        let order = Arc::new(std::sync::Mutex::new(Vec::new()));
        let checklist = Checklist::new(
            "slow",
            vec![
                arc(Fixed(TaskResult::success("quick"))),
                arc(Delayed {
                    delay: Duration::from_secs(60),
                    result: TaskResult::success("never"),
                    finished: finished.clone(),
                    order,
                }),
            ],
        );

        let outcome = tokio::time::timeout(Duration::from_secs(1), checklist.execute()).await;

        assert!(outcome.is_err());
        assert_eq!(finished.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_checklist_prefixes_message() {
        let checklist = Checklist::new(
            "disk",
            vec![
                arc(Fixed(TaskResult::success("a"))),
                arc(Fixed(TaskResult::success("b"))),
            ],
        );

        let result = checklist.execute().await;

        assert_eq!(checklist.name(), "disk");
        assert_eq!(checklist.len(), 2);
        assert_eq!(result.status(), ResultStatus::Success);
        assert_eq!(result.message(), "Checklist [disk]: Task success.");
    }

    #[tokio::test]
    async fn test_checklist_with_custom_builder_has_no_prefix() {
        let checklist = Checklist::with_builder(
            "disk",
            vec![arc(Fixed(TaskResult::info("a")))],
            ResultBuilder::new(),
        );
        let result = checklist.execute().await;
        assert_eq!(result.message(), "Task completed. See subtasks for details.");
    }

    #[tokio::test]
    async fn test_checklist_with_reducer() {
        let checklist = Checklist::with_reducer(
            "votes",
            vec![
                arc(Fixed(TaskResult::info("a"))),
                arc(Fixed(TaskResult::info("b"))),
                arc(Fixed(TaskResult::failure("c"))),
            ],
            Arc::new(crate::reducer::MostCommonReducer),
        );
        let result = checklist.execute().await;
        assert_eq!(result.status(), ResultStatus::Info);
        assert_eq!(
            result.message(),
            "Checklist [votes]: Task completed. See subtasks for details."
        );
    }

    #[tokio::test]
    async fn test_nested_composites() {
        let inner = CompositeTask::new(vec![
            arc(Fixed(TaskResult::info("i1"))),
            arc(Fixed(TaskResult::info("i2"))),
        ]);
        let outer = Checklist::new(
            "nested",
            vec![arc(inner), arc(Fixed(TaskResult::success("s")))],
        );

        let result = outer.execute().await;

        assert_eq!(result.status(), ResultStatus::Success);
        let children = result.results().unwrap();
        assert_eq!(children[0].status(), ResultStatus::Info);
        assert_eq!(children[0].results().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_empty_checklist_is_unknown() {
        let result = Checklist::new("empty", vec![]).execute().await;
        assert_eq!(result.status(), ResultStatus::Unknown);
        assert_eq!(
            result.message(),
            "Checklist [empty]: Task is in unknown state. See subtasks for details."
        );
    }

    #[tokio::test]
    async fn test_repeat_execution_reruns() {
        let counter = Arc::new(AtomicUsize::new(0));
        let checklist = Checklist::new("again", vec![arc(Counting(counter.clone()))]);

        let first = checklist.execute().await;
        let second = checklist.execute().await;

        assert_eq!(counter.load(Ordering::SeqCst), 2);
        assert_ne!(first, second);
    }
}
