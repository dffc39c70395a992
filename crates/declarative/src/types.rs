//! Core types for declarative reconciliation

use serde::{Deserialize, Serialize};
use std::fmt;

/// What the executor is doing with a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Present on both sides, left alone
    Keep,
    /// Present only in the actual set
    Remove,
    /// Present only in the desired set
    Add,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Keep => "keep",
            Self::Remove => "remove",
            Self::Add => "add",
        };
        f.write_str(label)
    }
}

/// Result of processing a single resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApplyResult {
    /// No changes needed
    NoChange,
    /// Resource was added
    Added,
    /// Resource was removed
    Removed,
    /// Apply was skipped
    Skipped { reason: String },
}

/// Summary of execution results
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecuteSummary {
    pub added: usize,
    pub removed: usize,
    pub skipped: usize,
    pub no_change: usize,
}

impl ExecuteSummary {
    /// Total number of actual changes made
    pub fn total_changes(&self) -> usize {
        self.added + self.removed
    }

    /// Total number of resources processed
    pub fn total(&self) -> usize {
        self.added + self.removed + self.skipped + self.no_change
    }

    /// Add a result to the summary
    pub fn add_result(&mut self, result: &ApplyResult) {
        match result {
            ApplyResult::NoChange => self.no_change += 1,
            ApplyResult::Added => self.added += 1,
            ApplyResult::Removed => self.removed += 1,
            ApplyResult::Skipped { .. } => self.skipped += 1,
        }
    }
}

/// Options for execution
#[derive(Debug, Clone, Default)]
pub struct ExecuteOptions {
    /// Don't make changes, just report what would happen
    pub dry_run: bool,
}
