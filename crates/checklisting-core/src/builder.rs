//! Composite result construction

use std::fmt;
use std::sync::Arc;

use crate::message::{MessageBuilder, StatusAwareMessageBuilder};
use crate::reducer::{DefaultReducer, StatusReducer};
use crate::result::TaskResult;
use crate::status::ResultStatus;

/// Combines a status reducer with a message builder to turn ordered child
/// results into one composite result
#[derive(Clone)]
pub struct ResultBuilder {
    reducer: Arc<dyn StatusReducer>,
    message_builder: Arc<dyn MessageBuilder>,
}

impl ResultBuilder {
    /// Create a builder using [`DefaultReducer`] and [`StatusAwareMessageBuilder`]
    pub fn new() -> Self {
        Self {
            reducer: Arc::new(DefaultReducer::new()),
            message_builder: Arc::new(StatusAwareMessageBuilder),
        }
    }

    /// Replace the status reducer
    pub fn with_reducer(mut self, reducer: Arc<dyn StatusReducer>) -> Self {
        self.reducer = reducer;
        self
    }

    /// Replace the message builder
    pub fn with_message_builder(mut self, message_builder: Arc<dyn MessageBuilder>) -> Self {
        self.message_builder = message_builder;
        self
    }

    /// Build a composite result from ordered child results.
    ///
    /// The children are kept whole, in the order given.
    pub fn build(&self, results: Vec<TaskResult>) -> TaskResult {
        let statuses: Vec<ResultStatus> = results.iter().map(TaskResult::status).collect();
        let status = self.reducer.reduce(&statuses);
        let message = self.message_builder.of_results(status, &results);
        TaskResult::composite(status, message, results)
    }
}

impl Default for ResultBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ResultBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResultBuilder").finish_non_exhaustive()
    }
}
