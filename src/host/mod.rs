//! Run mode shells
//!
//! Each shell owns the worker lifecycle for one [`RunMode`]: console and
//! service run it on the calling thread, the tray runs it in the background.

pub mod console;
pub mod service;
pub mod tray;

use crate::config::{RunMode, WorkerConfig};
use crate::logging::Logger;
use crate::worker::{JokeService, PeriodicTask, TaskOutcome};
use anyhow::{Context, Result};
use tracing::info;

/// Build the worker from `config` and run it under the shell for `mode`
pub fn run(mode: RunMode, config: &WorkerConfig, logger: &Logger) -> Result<TaskOutcome> {
    let provider = JokeService::from_config(config.jokes_file().as_deref())
        .context("Failed to load jokes")?;
    let task = PeriodicTask::new(provider, config.interval(), logger.clone());

    logger.scope(|| info!("=== in {} Mode ===", mode));

    match mode {
        RunMode::Console => console::run(task, logger),
        RunMode::Service => service::run(task, logger),
        RunMode::Tray => tray::run(task, config, logger),
    }
}

#[cfg(all(test, not(windows)))]
mod tests {
    use super::*;
    use crate::logging::testing::CapturedLogs;

    #[test]
    fn test_windows_only_modes_fail_setup() {
        let logs = CapturedLogs::default();
        let config = WorkerConfig::default();

        let err = run(RunMode::Service, &config, &logs.logger()).unwrap_err();
        assert!(err.to_string().contains("Service mode requires Windows"));

        let err = run(RunMode::Tray, &config, &logs.logger()).unwrap_err();
        assert!(err.to_string().contains("tray mode requires Windows"));

        // Setup failed before any joke was produced
        assert!(logs.lines_at("WARN").is_empty());
        assert!(logs.contents().contains("=== in Service Mode ==="));
        assert!(logs.contents().contains("=== in TrayIcon Mode ==="));
    }

    #[test]
    fn test_bad_jokes_file_fails_setup() {
        let dir = tempfile::tempdir().unwrap();
        let config = WorkerConfig {
            jokes_file: dir.path().join("missing.txt").to_string_lossy().to_string(),
            ..WorkerConfig::default()
        };

        let err = run(RunMode::Console, &config, &Logger::disabled()).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to load jokes"));
    }
}
