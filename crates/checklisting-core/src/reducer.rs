//! Status reduction strategies
//!
//! A reducer collapses the statuses of many child results into one parent
//! status. Every reducer is pure and total: empty input yields
//! [`ResultStatus::Unknown`], and `Unknown` is the "no verdict" answer that
//! lets reducers be chained.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::status::ResultStatus;

/// Trait for status reduction strategies
pub trait StatusReducer: Send + Sync {
    /// Reduce an ordered sequence of statuses to one status
    fn reduce(&self, statuses: &[ResultStatus]) -> ResultStatus;
}

impl<F> StatusReducer for F
where
    F: Fn(&[ResultStatus]) -> ResultStatus + Send + Sync,
{
    fn reduce(&self, statuses: &[ResultStatus]) -> ResultStatus {
        self(statuses)
    }
}

/// Yields the common status when every input agrees
#[derive(Debug, Clone, Copy, Default)]
pub struct AllSameReducer;

impl StatusReducer for AllSameReducer {
    fn reduce(&self, statuses: &[ResultStatus]) -> ResultStatus {
        match statuses.split_first() {
            Some((first, rest)) if rest.iter().all(|s| s == first) => *first,
            _ => ResultStatus::Unknown,
        }
    }
}

/// Yields `target` when it appears anywhere in the input
#[derive(Debug, Clone, Copy)]
pub struct AvailableStatusReducer {
    target: ResultStatus,
}

impl AvailableStatusReducer {
    pub fn new(target: ResultStatus) -> Self {
        Self { target }
    }

    pub fn target(&self) -> ResultStatus {
        self.target
    }
}

impl StatusReducer for AvailableStatusReducer {
    fn reduce(&self, statuses: &[ResultStatus]) -> ResultStatus {
        if statuses.contains(&self.target) {
            self.target
        } else {
            ResultStatus::Unknown
        }
    }
}

/// Yields the most frequent status, or `Unknown` when the top two tie
#[derive(Debug, Clone, Copy, Default)]
pub struct MostCommonReducer;

impl StatusReducer for MostCommonReducer {
    fn reduce(&self, statuses: &[ResultStatus]) -> ResultStatus {
        let mut counts: HashMap<ResultStatus, usize> = HashMap::new();
        for status in statuses {
            *counts.entry(*status).or_default() += 1;
        }

        let mut ranked: Vec<(ResultStatus, usize)> = counts.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));

        match ranked.as_slice() {
            [] => ResultStatus::Unknown,
            [(only, _)] => *only,
            [(first, top), (_, second), ..] => {
                if top == second {
                    ResultStatus::Unknown
                } else {
                    *first
                }
            }
        }
    }
}

/// Runs reducers in order and yields the first non-`Unknown` answer
#[derive(Clone, Default)]
pub struct AggregatedReducer {
    reducers: Vec<Arc<dyn StatusReducer>>,
}

impl AggregatedReducer {
    pub fn new(reducers: Vec<Arc<dyn StatusReducer>>) -> Self {
        Self { reducers }
    }

    /// Append a reducer to the chain
    pub fn with<R: StatusReducer + 'static>(mut self, reducer: R) -> Self {
        self.reducers.push(Arc::new(reducer));
        self
    }

    pub fn len(&self) -> usize {
        self.reducers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reducers.is_empty()
    }
}

impl fmt::Debug for AggregatedReducer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AggregatedReducer")
            .field("reducers", &self.reducers.len())
            .finish()
    }
}

impl StatusReducer for AggregatedReducer {
    fn reduce(&self, statuses: &[ResultStatus]) -> ResultStatus {
        self.reducers
            .iter()
            .map(|reducer| reducer.reduce(statuses))
            .find(|status| !status.is_unknown())
            .unwrap_or(ResultStatus::Unknown)
    }
}

/// Collapses to the highest-priority status present.
///
/// Equivalent to an [`AggregatedReducer`] of [`AvailableStatusReducer`]s in
/// [`ResultStatus::PRIORITY`] order.
#[derive(Debug, Clone)]
pub struct PriorityReducer {
    inner: AggregatedReducer,
}

impl PriorityReducer {
    pub fn new() -> Self {
        let inner = ResultStatus::PRIORITY
            .iter()
            .fold(AggregatedReducer::default(), |chain, status| {
                chain.with(AvailableStatusReducer::new(*status))
            });
        Self { inner }
    }
}

impl Default for PriorityReducer {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusReducer for PriorityReducer {
    fn reduce(&self, statuses: &[ResultStatus]) -> ResultStatus {
        self.inner.reduce(statuses)
    }
}

/// Runs `primary`, and calls the fallback supplier when it yields `Unknown`
pub struct FallbackReducer {
    primary: Arc<dyn StatusReducer>,
    fallback: Box<dyn Fn() -> ResultStatus + Send + Sync>,
}

impl FallbackReducer {
    pub fn new<R, F>(primary: R, fallback: F) -> Self
    where
        R: StatusReducer + 'static,
        F: Fn() -> ResultStatus + Send + Sync + 'static,
    {
        Self {
            primary: Arc::new(primary),
            fallback: Box::new(fallback),
        }
    }
}

impl fmt::Debug for FallbackReducer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FallbackReducer").finish_non_exhaustive()
    }
}

impl StatusReducer for FallbackReducer {
    fn reduce(&self, statuses: &[ResultStatus]) -> ResultStatus {
        match self.primary.reduce(statuses) {
            ResultStatus::Unknown => (self.fallback)(),
            status => status,
        }
    }
}

/// System-wide default: agreement first, then priority collapsing
#[derive(Debug, Clone)]
pub struct DefaultReducer {
    inner: AggregatedReducer,
}

impl DefaultReducer {
    pub fn new() -> Self {
        Self {
            inner: AggregatedReducer::default()
                .with(AllSameReducer)
                .with(PriorityReducer::new()),
        }
    }
}

impl Default for DefaultReducer {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusReducer for DefaultReducer {
    fn reduce(&self, statuses: &[ResultStatus]) -> ResultStatus {
        self.inner.reduce(statuses)
    }
}

/// Reducer selectable by name from configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReducerKind {
    #[default]
    Default,
    Priority,
    AllSame,
    MostCommon,
}

impl ReducerKind {
    /// Instantiate the reducer this kind names
    pub fn build(&self) -> Arc<dyn StatusReducer> {
        match self {
            Self::Default => Arc::new(DefaultReducer::new()),
            Self::Priority => Arc::new(PriorityReducer::new()),
            Self::AllSame => Arc::new(AllSameReducer),
            Self::MostCommon => Arc::new(MostCommonReducer),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Priority => "priority",
            Self::AllSame => "all_same",
            Self::MostCommon => "most_common",
        }
    }
}
