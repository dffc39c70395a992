//! Fingerprint-keyed resource sets and diff statistics

use crate::planner::ReconciliationPlan;
use crate::resource::Resource;
use std::collections::HashSet;

/// An insertion-ordered set of resources keyed by [`Resource::id`]
///
/// Membership is decided by id alone. Inserting a resource whose id is
/// already present keeps the first one.
#[derive(Debug, Clone)]
pub struct ResourceSet<R> {
    items: Vec<R>,
    ids: HashSet<String>,
}

impl<R: Resource> ResourceSet<R> {
    /// Create an empty set
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            ids: HashSet::new(),
        }
    }

    /// Insert a resource, returning false if its id was already present
    pub fn insert(&mut self, resource: R) -> bool {
        if !self.ids.insert(resource.id().to_string()) {
            return false;
        }
        self.items.push(resource);
        true
    }

    /// Check whether a resource with this id is in the set
    pub fn contains_id(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Check whether a resource with the same id is in the set
    pub fn contains(&self, resource: &R) -> bool {
        self.contains_id(resource.id())
    }

    /// Iterate in insertion order
    pub fn iter(&self) -> std::slice::Iter<'_, R> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<R: Resource> Default for ResourceSet<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Resource> FromIterator<R> for ResourceSet<R> {
    fn from_iter<I: IntoIterator<Item = R>>(iter: I) -> Self {
        let mut set = Self::new();
        for resource in iter {
            set.insert(resource);
        }
        set
    }
}

impl<'a, R> IntoIterator for &'a ResourceSet<R> {
    type Item = &'a R;
    type IntoIter = std::slice::Iter<'a, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Diff summary statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffSummary {
    /// Number of resources to add
    pub additions: usize,
    /// Number of resources to remove
    pub removals: usize,
    /// Number of resources left as they are
    pub unchanged: usize,
}

impl DiffSummary {
    /// Create a summary from a plan
    pub fn from_plan<R>(plan: &ReconciliationPlan<R>) -> Self {
        Self {
            additions: plan.to_add.len(),
            removals: plan.to_remove.len(),
            unchanged: plan.unchanged.len(),
        }
    }
}
