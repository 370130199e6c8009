//! jokeworker - logs a joke every few seconds
//!
//! Run without arguments for the tray icon, with `--console` for a console
//! window, or with `--service` when started by the Service Control Manager.

// No console window unless --console asks for one
#![windows_subsystem = "windows"]

use anyhow::{Context, Result};
use clap::Parser;
use std::process::ExitCode;
use tracing::{error, info};

use jokeworker::config::{Args, RunMode, WorkerConfig};
use jokeworker::host;
use jokeworker::logging::{self, LogOptions};

fn main() -> Result<ExitCode> {
    let args = Args::parse();
    let mode = args.run_mode();

    // The console has to exist before logging binds stdout
    let console = match mode {
        RunMode::Console => Some(host::console::ensure_console()?),
        _ => None,
    };

    let config =
        WorkerConfig::load_from(args.config.as_deref()).context("Failed to load configuration")?;

    let logger = logging::init(&LogOptions::resolve(&args, &config, mode))
        .context("Failed to initialize logging")?;

    if let Some(kind) = console {
        logger.scope(|| info!("Using {} console", kind));
    }

    let outcome = host::run(mode, &config, &logger)?;
    if outcome.is_faulted() {
        logger.scope(|| error!("Exiting with code {}", outcome.exit_status()));
    }

    Ok(outcome.exit_code())
}
