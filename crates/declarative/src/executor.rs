//! Execution engine - applies a plan in a fixed, sequential order

use crate::context::{Applier, ProgressCallback};
use crate::planner::ReconciliationPlan;
use crate::resource::Resource;
use crate::types::{Action, ApplyResult, ExecuteOptions, ExecuteSummary};
use anyhow::{Context, Result};

/// Execute a plan with the given options and callbacks
///
/// Order is fixed: every unchanged resource is reported first, then all
/// removals are applied, then all additions. Removals go first so a
/// resource whose content changed never exists twice under two ids.
///
/// The first applier or progress error aborts the rest of the plan.
/// Nothing that was already applied is rolled back, but `finish` still
/// runs when at least one change went through.
///
/// # Type Parameters
/// * `R` - Resource type
/// * `A` - Applier type
/// * `P` - Progress callback type
///
/// # Returns
/// Summary of execution results
pub fn execute<R, A, P>(
    plan: &ReconciliationPlan<R>,
    opts: &ExecuteOptions,
    applier: &mut A,
    progress: &mut P,
) -> Result<ExecuteSummary>
where
    R: Resource,
    A: Applier<R>,
    P: ProgressCallback,
{
    let mut summary = ExecuteSummary::default();
    let outcome = apply_plan(plan, opts, applier, progress, &mut summary);

    if summary.total_changes() > 0 {
        let finished = applier.finish(&summary);
        match (outcome, finished) {
            (Err(err), Err(finish_err)) => {
                return Err(err.context(format!(
                    "Finishing after {} change(s) also failed: {finish_err:#}",
                    summary.total_changes()
                )));
            }
            (Err(err), Ok(())) | (Ok(()), Err(err)) => return Err(err),
            (Ok(()), Ok(())) => {}
        }
    } else {
        outcome?;
    }

    Ok(summary)
}

/// Walk the plan in order, recording every result in `summary`
fn apply_plan<R, A, P>(
    plan: &ReconciliationPlan<R>,
    opts: &ExecuteOptions,
    applier: &mut A,
    progress: &mut P,
    summary: &mut ExecuteSummary,
) -> Result<()>
where
    R: Resource,
    A: Applier<R>,
    P: ProgressCallback,
{
    for resource in &plan.unchanged {
        progress.on_resource_start(Action::Keep, &resource.description())?;
        let result = ApplyResult::NoChange;
        progress.on_resource_complete(Action::Keep, &result);
        summary.add_result(&result);
    }

    for resource in &plan.to_remove {
        let result = apply_resource(Action::Remove, resource, opts, applier, progress)?;
        summary.add_result(&result);
    }

    for resource in &plan.to_add {
        let result = apply_resource(Action::Add, resource, opts, applier, progress)?;
        summary.add_result(&result);
    }

    Ok(())
}

/// Apply a single resource
fn apply_resource<R, A, P>(
    action: Action,
    resource: &R,
    opts: &ExecuteOptions,
    applier: &mut A,
    progress: &mut P,
) -> Result<ApplyResult>
where
    R: Resource,
    A: Applier<R>,
    P: ProgressCallback,
{
    let description = resource.description();
    progress.on_resource_start(action, &description)?;

    let result = if opts.dry_run {
        ApplyResult::Skipped {
            reason: "Dry run".into(),
        }
    } else {
        match action {
            Action::Remove => {
                applier
                    .remove(resource)
                    .with_context(|| format!("Failed to remove {description}"))?;
                ApplyResult::Removed
            }
            Action::Add => {
                applier
                    .add(resource)
                    .with_context(|| format!("Failed to add {description}"))?;
                ApplyResult::Added
            }
            Action::Keep => ApplyResult::NoChange,
        }
    };

    progress.on_resource_complete(action, &result);
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::NoProgress;
    use crate::diff::ResourceSet;
    use crate::planner::reconcile;

    #[derive(Debug, Clone)]
    struct TestResource {
        id: String,
    }

    impl Resource for TestResource {
        fn id(&self) -> &str {
            &self.id
        }

        fn description(&self) -> String {
            format!("Test resource {}", self.id)
        }
    }

    /// Records every call, optionally failing on one id
    #[derive(Default)]
    struct RecordingApplier {
        calls: Vec<String>,
        fail_on: Option<String>,
        finished: usize,
    }

    impl Applier<TestResource> for RecordingApplier {
        fn remove(&mut self, resource: &TestResource) -> Result<()> {
            if self.fail_on.as_deref() == Some(resource.id.as_str()) {
                anyhow::bail!("boom");
            }
            self.calls.push(format!("remove {}", resource.id));
            Ok(())
        }

        fn add(&mut self, resource: &TestResource) -> Result<()> {
            if self.fail_on.as_deref() == Some(resource.id.as_str()) {
                anyhow::bail!("boom");
            }
            self.calls.push(format!("add {}", resource.id));
            Ok(())
        }

        fn finish(&mut self, _summary: &ExecuteSummary) -> Result<()> {
            self.finished += 1;
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingProgress {
        started: Vec<(Action, String)>,
        fail_on_start: Option<Action>,
    }

    impl ProgressCallback for RecordingProgress {
        fn on_resource_start(&mut self, action: Action, description: &str) -> Result<()> {
            self.started.push((action, description.to_string()));
            if self.fail_on_start == Some(action) {
                anyhow::bail!("report closed");
            }
            Ok(())
        }

        fn on_resource_complete(&mut self, _action: Action, _result: &ApplyResult) {}
    }

    fn set(ids: &[&str]) -> ResourceSet<TestResource> {
        ids.iter()
            .map(|id| TestResource { id: (*id).to_string() })
            .collect()
    }

    #[test]
    fn test_execute_empty_plan() {
        let plan: ReconciliationPlan<TestResource> = ReconciliationPlan::default();
        let mut applier = RecordingApplier::default();
        let result = execute(&plan, &ExecuteOptions::default(), &mut applier, &mut NoProgress)
            .unwrap();

        assert_eq!(result.total(), 0);
        assert_eq!(applier.finished, 0);
    }

    #[test]
    fn test_execute_no_changes_does_not_finish() {
        let plan = reconcile(&set(&["a"]), &set(&["a"]));
        let mut applier = RecordingApplier::default();
        let result = execute(&plan, &ExecuteOptions::default(), &mut applier, &mut NoProgress)
            .unwrap();

        assert_eq!(result.no_change, 1);
        assert!(applier.calls.is_empty());
        assert_eq!(applier.finished, 0);
    }

    #[test]
    fn test_removals_run_before_additions() {
        let plan = reconcile(&set(&["new1", "keep", "new2"]), &set(&["keep", "old"]));
        let mut applier = RecordingApplier::default();
        let mut progress = RecordingProgress::default();
        let result =
            execute(&plan, &ExecuteOptions::default(), &mut applier, &mut progress).unwrap();

        assert_eq!(applier.calls, vec!["remove old", "add new1", "add new2"]);
        assert_eq!(result.added, 2);
        assert_eq!(result.removed, 1);
        assert_eq!(result.no_change, 1);
        assert_eq!(applier.finished, 1);

        let actions: Vec<Action> = progress.started.iter().map(|(a, _)| *a).collect();
        assert_eq!(
            actions,
            vec![Action::Keep, Action::Remove, Action::Add, Action::Add]
        );
    }

    #[test]
    fn test_failure_aborts_remaining_plan() {
        let plan = reconcile(&set(&["a", "b"]), &set(&["x", "y"]));
        let mut applier = RecordingApplier {
            fail_on: Some("y".into()),
            ..Default::default()
        };

        let err = execute(&plan, &ExecuteOptions::default(), &mut applier, &mut NoProgress)
            .unwrap_err();

        assert!(err.to_string().contains("Test resource y"));
        // x was removed and still gets finished, nothing after y was attempted
        assert_eq!(applier.calls, vec!["remove x"]);
        assert_eq!(applier.finished, 1);
    }

    #[test]
    fn test_failure_before_any_change_does_not_finish() {
        let plan = reconcile(&set(&["a"]), &set(&["x"]));
        let mut applier = RecordingApplier {
            fail_on: Some("x".into()),
            ..Default::default()
        };

        execute(&plan, &ExecuteOptions::default(), &mut applier, &mut NoProgress).unwrap_err();

        assert!(applier.calls.is_empty());
        assert_eq!(applier.finished, 0);
    }

    #[test]
    fn test_progress_error_aborts_before_apply() {
        let plan = reconcile(&set(&["a", "b"]), &set(&["x"]));
        let mut applier = RecordingApplier::default();
        let mut progress = RecordingProgress {
            fail_on_start: Some(Action::Add),
            ..Default::default()
        };

        let err = execute(&plan, &ExecuteOptions::default(), &mut applier, &mut progress)
            .unwrap_err();

        assert!(err.to_string().contains("report closed"));
        assert_eq!(applier.calls, vec!["remove x"]);
        assert_eq!(progress.started.len(), 2);
        assert_eq!(applier.finished, 1);
    }

    #[test]
    fn test_dry_run_applies_nothing() {
        let plan = reconcile(&set(&["a"]), &set(&["b"]));
        let mut applier = RecordingApplier::default();
        let mut progress = RecordingProgress::default();
        let opts = ExecuteOptions { dry_run: true };
        let result = execute(&plan, &opts, &mut applier, &mut progress).unwrap();

        assert!(applier.calls.is_empty());
        assert_eq!(result.skipped, 2);
        assert_eq!(applier.finished, 0);
        assert_eq!(progress.started.len(), 2);
    }
}
