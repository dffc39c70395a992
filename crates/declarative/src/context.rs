//! Provider traits for the executor
//!
//! These traits allow the declarative crate to be used without
//! depending on a specific storage backend or output format.

use crate::resource::Resource;
use crate::types::{Action, ApplyResult, ExecuteSummary};
use anyhow::Result;

/// Provider that performs the effectful side of a plan
///
/// Implement this trait to connect the executor to a real store.
/// Any error aborts the remaining plan.
pub trait Applier<R: Resource> {
    /// Remove a resource that is no longer desired
    fn remove(&mut self, resource: &R) -> Result<()>;

    /// Add a resource that does not exist yet
    fn add(&mut self, resource: &R) -> Result<()>;

    /// Called once after a plan that changed at least one resource,
    /// including a plan aborted part way through
    fn finish(&mut self, _summary: &ExecuteSummary) -> Result<()> {
        Ok(())
    }
}

/// Progress callback for execution operations
///
/// Implement this trait to receive a report for every processed resource.
pub trait ProgressCallback {
    /// Called before a resource is processed
    ///
    /// An error aborts the plan before the resource is touched.
    fn on_resource_start(&mut self, action: Action, description: &str) -> Result<()>;

    /// Called after a resource was processed successfully
    fn on_resource_complete(&mut self, action: Action, result: &ApplyResult);
}

/// No-op progress callback
pub struct NoProgress;

impl ProgressCallback for NoProgress {
    fn on_resource_start(&mut self, _action: Action, _description: &str) -> Result<()> {
        Ok(())
    }

    fn on_resource_complete(&mut self, _action: Action, _result: &ApplyResult) {}
}
