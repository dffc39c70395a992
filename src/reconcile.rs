//! Converge `mysql.user` to the declared state
//!
//! Builds the desired and actual grant sets, lets the declarative engine
//! partition them, and applies the result through a [`GrantStore`].

use crate::grant::Grant;
use crate::input::DesiredUserState;
use crate::statement::{FINGERPRINT_COLUMN, Statement};
use crate::store::GrantStore;
use anyhow::{Context, Result};
use declarative::{
    Action, Applier, ApplyResult, DiffSummary, ExecuteOptions, ExecuteSummary, ProgressCallback,
    ResourceSet,
};
use std::io::{self, Write};

/// One grant per declared user
pub fn desired_grants(states: &[DesiredUserState]) -> ResourceSet<Grant> {
    states.iter().map(Grant::from_desired).collect()
}

/// Every grant currently managed in the store
pub fn actual_grants<S: GrantStore>(store: &mut S) -> Result<ResourceSet<Grant>> {
    let grants = store
        .fetch_actual_grants()
        .context("Failed to read current grants")?;
    Ok(grants.into_iter().collect())
}

/// Migrate, diff and apply
///
/// Writes one line per grant to `out`. The first failing statement aborts
/// the run; statements already executed stay applied. A dry run alters
/// nothing, the schema included.
pub fn apply_configuration<S, W>(
    store: &mut S,
    desired: &[DesiredUserState],
    opts: &ExecuteOptions,
    out: W,
) -> Result<ExecuteSummary>
where
    S: GrantStore,
    W: Write,
{
    let mut report = Report::new(out);

    let missing = store.ensure_schema(opts.dry_run)?;
    let verb = if opts.dry_run { "Would add" } else { "Adding" };
    for table in &missing {
        report
            .emit(&format!(
                "{verb} '{FINGERPRINT_COLUMN}' column to '{table}' table"
            ))
            .context("Failed to write report")?;
    }

    let desired = desired_grants(desired);
    // Without the column no row can be managed yet
    let actual = if opts.dry_run && missing.contains(&"user") {
        log::debug!("'user' has no '{FINGERPRINT_COLUMN}' column, nothing managed yet");
        ResourceSet::new()
    } else {
        actual_grants(store)?
    };
    let plan = declarative::reconcile(&desired, &actual);

    let diff = DiffSummary::from_plan(&plan);
    log::info!(
        "{} to remove, {} to add, {} unchanged",
        diff.removals,
        diff.additions,
        diff.unchanged
    );

    let mut applier = StoreApplier { store };
    declarative::execute(&plan, opts, &mut applier, &mut report)
}

/// Runs statements for the executor
struct StoreApplier<'a, S> {
    store: &'a mut S,
}

impl<S: GrantStore> Applier<Grant> for StoreApplier<'_, S> {
    fn remove(&mut self, grant: &Grant) -> Result<()> {
        self.store.execute(&Statement::revoke(grant))?;
        Ok(())
    }

    fn add(&mut self, grant: &Grant) -> Result<()> {
        self.store.execute(&Statement::grant(grant))?;
        Ok(())
    }

    fn finish(&mut self, _summary: &ExecuteSummary) -> Result<()> {
        self.store
            .flush_privileges()
            .context("Failed to flush privileges")
    }
}

/// Operator-facing report, one line per grant
struct Report<W> {
    out: W,
}

impl<W: Write> Report<W> {
    fn new(out: W) -> Self {
        Self { out }
    }

    fn emit(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.out, "{line}")
    }
}

impl<W: Write> ProgressCallback for Report<W> {
    fn on_resource_start(&mut self, action: Action, description: &str) -> Result<()> {
        let prefix = match action {
            Action::Keep => "- Not touching",
            Action::Remove => "- Removing",
            Action::Add => "- Adding  ",
        };
        self.emit(&format!("{prefix} {description}"))
            .context("Failed to write report")
    }

    fn on_resource_complete(&mut self, action: Action, result: &ApplyResult) {
        log::trace!("{action}: {result:?}");
    }
}
