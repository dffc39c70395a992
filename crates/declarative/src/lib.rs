//! # Declarative
//!
//! A small framework for fingerprint-keyed reconciliation.
//!
//! This crate provides the core abstractions for comparing a desired set of
//! resources against the set that actually exists, and converging the actual
//! set to the desired one with the fewest possible operations.
//!
//! ## Core Concepts
//!
//! - **Resource**: Something with a stable content fingerprint (its identity)
//! - **ResourceSet**: An insertion-ordered set of resources keyed by fingerprint
//! - **ReconciliationPlan**: The remove / add / unchanged partition of two sets
//! - **Executor**: Applies a plan in a fixed order, removals before additions
//!
//! Because identity is the fingerprint and the fingerprint covers every
//! semantic field, a changed resource shows up as one removal plus one
//! addition. There is no update case.
//!
//! ## Example
//!
//! ```ignore
//! use declarative::{
//!     Applier, ExecuteOptions, NoProgress, Resource, ResourceSet, execute, reconcile,
//! };
//!
//! #[derive(Debug, Clone)]
//! struct Row { key: String }
//!
//! impl Resource for Row {
//!     fn id(&self) -> &str { &self.key }
//!     fn description(&self) -> String { format!("row {}", self.key) }
//! }
//!
//! let desired: ResourceSet<Row> = vec![Row { key: "a".into() }].into_iter().collect();
//! let actual: ResourceSet<Row> = vec![Row { key: "b".into() }].into_iter().collect();
//!
//! let plan = reconcile(&desired, &actual);
//! assert_eq!(plan.to_remove.len(), 1);
//! assert_eq!(plan.to_add.len(), 1);
//!
//! let summary = execute(&plan, &ExecuteOptions::default(), &mut my_applier, &mut NoProgress)?;
//! ```
//!
//! ## Provider Traits
//!
//! The crate uses traits for dependency injection:
//!
//! - [`Applier`]: Performs the actual removal and addition of resources
//! - [`ProgressCallback`]: Receives a report for every processed resource
//!
//! This keeps the engine free of any particular storage backend or UI.

pub mod context;
pub mod diff;
pub mod executor;
pub mod planner;
pub mod resource;
pub mod types;

// Re-export main types at crate root
pub use context::{Applier, NoProgress, ProgressCallback};
pub use diff::{DiffSummary, ResourceSet};
pub use executor::execute;
pub use planner::{ReconciliationPlan, reconcile};
pub use resource::Resource;
pub use types::{Action, ApplyResult, ExecuteOptions, ExecuteSummary};
