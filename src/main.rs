mod cli;
mod config;
mod error;
mod grant;
mod input;
mod reconcile;
mod statement;
mod store;
mod ui;

use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;
use config::Credentials;
use declarative::ExecuteOptions;
use std::io;
use std::process::ExitCode;
use store::MysqlStore;

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let log_level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(if cli.quiet {
            log::LevelFilter::Error
        } else {
            log_level
        })
        .format_timestamp(None)
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            ui::error(&format!("{e:#}"));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    // Read the whole input before touching the database
    let desired = input::read_desired_state(io::stdin().lock())
        .context("Failed to read desired state from stdin")?;
    log::info!("Declared {} user(s)", desired.len());

    if cli.host.is_some() && cli.socket.is_some() {
        ui::warn("--socket is ignored when --host is given");
    }
    let credentials = Credentials::from_cli(cli);
    let mut store = MysqlStore::connect(&credentials)?;

    let opts = ExecuteOptions {
        dry_run: cli.dry_run,
    };
    let summary = reconcile::apply_configuration(&mut store, &desired, &opts, io::stdout().lock())?;

    if cli.quiet {
        return Ok(());
    }
    if opts.dry_run {
        ui::info(&format!(
            "Dry run - {} change(s) not applied",
            summary.skipped
        ));
    } else if summary.total_changes() > 0 {
        ui::success(&format!(
            "Applied {} change(s): {} removed, {} added",
            summary.total_changes(),
            summary.removed,
            summary.added
        ));
    } else {
        ui::success("No changes needed");
    }

    Ok(())
}
