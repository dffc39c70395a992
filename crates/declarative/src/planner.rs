//! Reconciliation planner - partitions desired and actual resources

use crate::diff::ResourceSet;
use crate::resource::Resource;

/// The outcome of comparing a desired set against an actual set
///
/// The three lists are pairwise disjoint by id, and together they cover
/// every id found on either side.
#[derive(Debug, Clone)]
pub struct ReconciliationPlan<R> {
    /// In the actual set but not desired
    pub to_remove: Vec<R>,
    /// Desired but not in the actual set
    pub to_add: Vec<R>,
    /// On both sides (taken from the actual set)
    pub unchanged: Vec<R>,
}

impl<R> ReconciliationPlan<R> {
    /// Number of removals plus additions
    pub fn total_changes(&self) -> usize {
        self.to_remove.len() + self.to_add.len()
    }

    /// Check if applying the plan would change anything
    pub fn is_empty(&self) -> bool {
        self.total_changes() == 0
    }
}

impl<R> Default for ReconciliationPlan<R> {
    fn default() -> Self {
        Self {
            to_remove: Vec::new(),
            to_add: Vec::new(),
            unchanged: Vec::new(),
        }
    }
}

/// Compute the remove / add / unchanged partition of two sets
///
/// Items keep the insertion order of the set they came from.
pub fn reconcile<R: Resource + Clone>(
    desired: &ResourceSet<R>,
    actual: &ResourceSet<R>,
) -> ReconciliationPlan<R> {
    let mut plan = ReconciliationPlan::default();

    for resource in actual {
        if desired.contains(resource) {
            plan.unchanged.push(resource.clone());
        } else {
            plan.to_remove.push(resource.clone());
        }
    }

    plan.to_add = desired
        .iter()
        .filter(|resource| !actual.contains(resource))
        .cloned()
        .collect();

    plan
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[derive(Debug, Clone, PartialEq)]
    struct Item(String);

    impl Resource for Item {
        fn id(&self) -> &str {
            &self.0
        }

        fn description(&self) -> String {
            self.0.clone()
        }
    }

    fn set(ids: &[&str]) -> ResourceSet<Item> {
        ids.iter().map(|id| Item((*id).to_string())).collect()
    }

    fn ids(items: &[Item]) -> Vec<&str> {
        items.iter().map(Resource::id).collect()
    }

    #[test]
    fn test_reconcile_empty_actual() {
        let plan = reconcile(&set(&["a", "b"]), &set(&[]));
        assert_eq!(ids(&plan.to_add), vec!["a", "b"]);
        assert!(plan.to_remove.is_empty());
        assert!(plan.unchanged.is_empty());
    }

    #[test]
    fn test_reconcile_identical_sets_is_empty() {
        let plan = reconcile(&set(&["a", "b"]), &set(&["b", "a"]));
        assert!(plan.is_empty());
        assert_eq!(ids(&plan.unchanged), vec!["b", "a"]);
    }

    #[test]
    fn test_reconcile_partition() {
        let desired = set(&["keep", "new1", "new2"]);
        let actual = set(&["old", "keep"]);
        let plan = reconcile(&desired, &actual);

        assert_eq!(ids(&plan.to_remove), vec!["old"]);
        assert_eq!(ids(&plan.to_add), vec!["new1", "new2"]);
        assert_eq!(ids(&plan.unchanged), vec!["keep"]);
        assert_eq!(plan.total_changes(), 3);
    }

    #[test]
    fn test_partition_is_disjoint_and_complete() {
        let desired = set(&["a", "b", "c", "d"]);
        let actual = set(&["c", "d", "e", "f", "g"]);
        let plan = reconcile(&desired, &actual);

        let remove: HashSet<&str> = ids(&plan.to_remove).into_iter().collect();
        let add: HashSet<&str> = ids(&plan.to_add).into_iter().collect();
        let keep: HashSet<&str> = ids(&plan.unchanged).into_iter().collect();

        assert!(remove.is_disjoint(&add));
        assert!(remove.is_disjoint(&keep));
        assert!(add.is_disjoint(&keep));

        let union: HashSet<&str> = remove.union(&add).chain(keep.iter()).copied().collect();
        let expected: HashSet<&str> = ["a", "b", "c", "d", "e", "f", "g"].into_iter().collect();
        assert_eq!(union, expected);
    }

    #[test]
    fn test_second_run_after_apply_is_idempotent() {
        let desired = set(&["x", "y"]);
        let first = reconcile(&desired, &set(&["w"]));

        // Simulate applying the first plan
        let applied: ResourceSet<Item> = first
            .unchanged
            .iter()
            .chain(first.to_add.iter())
            .cloned()
            .collect();

        let second = reconcile(&desired, &applied);
        assert!(second.is_empty());
        assert_eq!(second.unchanged.len(), 2);
    }
}
