//! System tray shell
//!
//! Shows a tray icon with a single "Exit" action while the worker runs on a
//! background thread. The Win32 message loop owns the main thread.

#[cfg(all(windows, feature = "tray"))]
mod app;
#[cfg(all(windows, feature = "tray"))]
mod icon;
#[cfg(all(windows, feature = "tray"))]
mod menu;

#[cfg(all(windows, feature = "tray"))]
pub use app::TrayApp;

use crate::config::WorkerConfig;
use crate::logging::Logger;
use crate::worker::{PeriodicTask, TaskOutcome};
use anyhow::Result;

/// Tooltip shown when hovering the tray icon
pub const TRAY_TOOLTIP: &str = "JokeWorker";

/// Run the worker behind a tray icon until "Exit" is chosen or the worker faults
#[cfg(all(windows, feature = "tray"))]
pub fn run(task: PeriodicTask, config: &WorkerConfig, logger: &Logger) -> Result<TaskOutcome> {
    logger.scope(|| TrayApp::new(config)?.run(task))
}

#[cfg(not(all(windows, feature = "tray")))]
pub fn run(_task: PeriodicTask, _config: &WorkerConfig, _logger: &Logger) -> Result<TaskOutcome> {
    anyhow::bail!(
        "{} tray mode requires Windows and the 'tray' feature, use --console instead",
        TRAY_TOOLTIP
    )
}
