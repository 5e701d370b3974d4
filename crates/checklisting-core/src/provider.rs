//! Checklist supply and filtering

use std::collections::HashSet;
use std::sync::Arc;

use crate::task::Checklist;

/// Predicate over checklists, used to select a subset to run
pub trait ChecklistPredicate: Send + Sync {
    fn matches(&self, checklist: &Checklist) -> bool;
}

impl<F> ChecklistPredicate for F
where
    F: Fn(&Checklist) -> bool + Send + Sync,
{
    fn matches(&self, checklist: &Checklist) -> bool {
        self(checklist)
    }
}

/// Accepts every checklist
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

impl ChecklistPredicate for AllowAll {
    fn matches(&self, _checklist: &Checklist) -> bool {
        true
    }
}

/// Accepts checklists whose name is in the list
#[derive(Debug, Clone, Default)]
pub struct NameAllowList {
    names: HashSet<String>,
}

impl NameAllowList {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }
}

impl ChecklistPredicate for NameAllowList {
    fn matches(&self, checklist: &Checklist) -> bool {
        self.names.contains(checklist.name())
    }
}

/// Supplies checklists to a runner
pub trait ChecklistProvider: Send + Sync {
    /// All checklists, in declaration order
    fn get_all(&self) -> Vec<Arc<Checklist>>;

    /// Checklists accepted by `predicate`, in declaration order
    fn get_filtered(&self, predicate: &dyn ChecklistPredicate) -> Vec<Arc<Checklist>> {
        self.get_all()
            .into_iter()
            .filter(|checklist| predicate.matches(checklist))
            .collect()
    }
}

/// Provider over a fixed list of checklists
#[derive(Debug, Clone, Default)]
pub struct StaticChecklistProvider {
    checklists: Vec<Arc<Checklist>>,
}

impl StaticChecklistProvider {
    pub fn new(checklists: Vec<Checklist>) -> Self {
        Self {
            checklists: checklists.into_iter().map(Arc::new).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.checklists.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checklists.is_empty()
    }

    /// Names of the provided checklists
    pub fn names(&self) -> Vec<&str> {
        self.checklists.iter().map(|c| c.name()).collect()
    }
}

impl ChecklistProvider for StaticChecklistProvider {
    fn get_all(&self) -> Vec<Arc<Checklist>> {
        self.checklists.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> StaticChecklistProvider {
        StaticChecklistProvider::new(vec![
            Checklist::new("disk", vec![]),
            Checklist::new("network", vec![]),
            Checklist::new("env", vec![]),
        ])
    }

    fn names(checklists: &[Arc<Checklist>]) -> Vec<&str> {
        checklists.iter().map(|c| c.name()).collect()
    }

    #[test]
    fn test_get_all_keeps_order() {
        let p = provider();
        assert_eq!(names(&p.get_all()), vec!["disk", "network", "env"]);
        assert_eq!(p.len(), 3);
    }

    #[test]
    fn test_allow_all() {
        let p = provider();
        assert_eq!(p.get_filtered(&AllowAll).len(), 3);
    }

    #[test]
    fn test_name_allow_list() {
        let p = provider();
        let filtered = p.get_filtered(&NameAllowList::new(["env", "disk", "missing"]));
        assert_eq!(names(&filtered), vec!["disk", "env"]);
    }

    #[test]
    fn test_closure_predicate() {
        let p = provider();
        let filtered = p.get_filtered(&|c: &Checklist| c.name().starts_with('n'));
        assert_eq!(names(&filtered), vec!["network"]);
    }

    #[test]
    fn test_empty_provider() {
        let p = StaticChecklistProvider::default();
        assert!(p.is_empty());
        assert!(p.get_all().is_empty());
        assert!(p.names().is_empty());
    }
}
