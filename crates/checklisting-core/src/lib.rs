//! Checklisting Core - Task execution and result aggregation engine
//!
//! This crate provides the task abstraction, concurrent checklist execution
//! with per-task failure isolation, the hierarchical result model, the
//! status-reduction strategies, and the result serializers.

pub mod builder;
pub mod config;
pub mod error;
pub mod message;
pub mod output;
pub mod provider;
pub mod reducer;
pub mod result;
pub mod runner;
pub mod serializer;
pub mod status;
pub mod task;

pub use builder::ResultBuilder;
pub use error::{ChecklistError, ConfigError, Result, TaskError};
pub use message::{MessageBuilder, PrefixedMessageBuilder, StatusAwareMessageBuilder};
pub use output::{CollectingWriter, ResultWriter, ResultWriterRegistry, TracingWriter};
pub use provider::{
    AllowAll, ChecklistPredicate, ChecklistProvider, NameAllowList, StaticChecklistProvider,
};
pub use reducer::{
    AggregatedReducer, AllSameReducer, AvailableStatusReducer, DefaultReducer, FallbackReducer,
    MostCommonReducer, PriorityReducer, ReducerKind, StatusReducer,
};
pub use result::TaskResult;
pub use runner::{ChecklistRunner, RunSummary};
pub use serializer::{Decoded, HumanReadableSerializer, JsonDeserializer, JsonSerializer};
pub use status::ResultStatus;
pub use task::{Checklist, CompositeTask, Task};
