//! Console mode shell

use crate::logging::Logger;
use crate::worker::{CancellationToken, PeriodicTask, TaskOutcome};
use anyhow::{Context, Result};
use std::fmt;
use tracing::info;

/// How the process got its console
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleKind {
    /// Attached to the console of the parent process
    Attached,
    /// Allocated a fresh console window
    Allocated,
    /// Already had standard streams (non-Windows builds)
    Inherited,
}

impl fmt::Display for ConsoleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConsoleKind::Attached => write!(f, "parent"),
            ConsoleKind::Allocated => write!(f, "newly allocated"),
            ConsoleKind::Inherited => write!(f, "inherited"),
        }
    }
}

/// Make sure output is visible: reuse the parent console or open a new one
///
/// Must run before logging is set up so stdout points at the console.
#[cfg(windows)]
pub fn ensure_console() -> Result<ConsoleKind> {
    use windows::Win32::System::Console::{AllocConsole, AttachConsole, ATTACH_PARENT_PROCESS};

    unsafe {
        if AttachConsole(ATTACH_PARENT_PROCESS).is_ok() {
            return Ok(ConsoleKind::Attached);
        }
        AllocConsole().context("Failed to allocate a console window")?;
    }
    Ok(ConsoleKind::Allocated)
}

#[cfg(not(windows))]
pub fn ensure_console() -> Result<ConsoleKind> {
    Ok(ConsoleKind::Inherited)
}

/// Run the worker on this thread until Ctrl+C
pub fn run(task: PeriodicTask, logger: &Logger) -> Result<TaskOutcome> {
    let cancel = CancellationToken::new();
    install_interrupt_handler(&cancel, logger)?;
    Ok(run_until_cancelled(task, &cancel, logger))
}

/// Cancel `cancel` when the user presses Ctrl+C
///
/// The handler is process-wide and can only be installed once.
fn install_interrupt_handler(cancel: &CancellationToken, logger: &Logger) -> Result<()> {
    let handler_token = cancel.clone();
    let handler_logger = logger.clone();

    ctrlc::set_handler(move || {
        if handler_token.cancel() {
            handler_logger.scope(|| info!("Received Ctrl+C, stopping..."));
        }
    })
    .context("Failed to install Ctrl+C handler")
}

/// Run the worker on this thread until `cancel` fires or the worker faults
pub fn run_until_cancelled(
    task: PeriodicTask,
    cancel: &CancellationToken,
    logger: &Logger,
) -> TaskOutcome {
    logger.scope(|| info!("Press Ctrl+C to stop"));
    task.run(cancel)
}
