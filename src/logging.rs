//! Logging setup
//!
//! Every component receives a [`Logger`] and runs its work inside
//! [`Logger::scope`], so the `tracing` macros inside reach the configured
//! sinks without a process-wide subscriber being installed.

use crate::config::{Args, RunMode, WorkerConfig};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::Dispatch;
use tracing_appender::rolling::{InitError, RollingFileAppender, Rotation};
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// File name prefix of the daily log files
const LOG_FILE_PREFIX: &str = "jokeworker";

/// Injected logging capability
#[derive(Clone, Debug)]
pub struct Logger {
    dispatch: Dispatch,
}

impl Logger {
    /// Wrap an existing dispatcher
    pub fn new(dispatch: Dispatch) -> Self {
        Self { dispatch }
    }

    /// Logger that drops every record
    pub fn disabled() -> Self {
        Self::new(Dispatch::none())
    }

    /// Run `f` with this logger as the current `tracing` dispatcher
    pub fn scope<T>(&self, f: impl FnOnce() -> T) -> T {
        tracing::dispatcher::with_default(&self.dispatch, f)
    }
}

/// File sink for log records
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogFile {
    /// Append to a single file across runs
    Append(PathBuf),
    /// One `jokeworker.YYYY-MM-DD.log` per day in this directory
    Daily(PathBuf),
}

/// Where and how much to log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogOptions {
    /// Level filter directive, used when `RUST_LOG` is not set
    pub level: String,
    /// File sink, if any
    pub file: Option<LogFile>,
    /// Write records to stdout
    pub console: bool,
}

impl LogOptions {
    /// Combine command line overrides with the configuration file
    ///
    /// An explicit log file wins. Otherwise records go to daily files, so
    /// service and tray runs, which have no console, still leave a trace.
    pub fn resolve(args: &Args, config: &WorkerConfig, mode: RunMode) -> Self {
        let level = args
            .log_level()
            .map(|level| level.to_string().to_lowercase())
            .unwrap_or_else(|| config.log_level.clone());

        let file = match args.log.clone().or_else(|| config.log_file()) {
            Some(path) => LogFile::Append(path),
            None => LogFile::Daily(config.log_dir().unwrap_or_else(default_log_dir)),
        };

        Self {
            level,
            file: Some(file),
            console: mode != RunMode::Service,
        }
    }
}

/// Directory for daily log files when none is configured
///
/// `%PROGRAMDATA%\jokeworker\logs`, then the user's local data dir,
/// then `logs` next to the executable.
pub fn default_log_dir() -> PathBuf {
    if let Ok(program_data) = std::env::var("PROGRAMDATA") {
        return Path::new(&program_data).join("jokeworker").join("logs");
    }

    if let Some(data_dir) = dirs::data_local_dir() {
        return data_dir.join("jokeworker").join("logs");
    }

    std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|dir| dir.join("logs")))
        .unwrap_or_else(|| PathBuf::from("logs"))
}

/// Logging setup errors
#[derive(Error, Debug)]
pub enum LoggingError {
    /// Log file could not be opened for appending
    #[error("Failed to open log file '{path}': {source}")]
    OpenFile {
        path: String,
        source: std::io::Error,
    },

    /// Log directory could not be created
    #[error("Failed to create log directory '{path}': {source}")]
    CreateDir {
        path: String,
        source: std::io::Error,
    },

    /// Daily log file appender could not be created
    #[error("Failed to create daily log file in '{path}': {source}")]
    Rolling { path: String, source: InitError },
}

/// Build the logger described by `options`
pub fn init(options: &LogOptions) -> Result<Logger, LoggingError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&options.level));

    let file_writer = match &options.file {
        Some(LogFile::Append(path)) => Some(BoxMakeWriter::new(Arc::new(open_log_file(path)?))),
        Some(LogFile::Daily(dir)) => Some(BoxMakeWriter::new(daily_appender(dir)?)),
        None => None,
    };

    let console_layer = options.console.then(|| fmt::layer().with_target(false));
    let file_layer = file_writer.map(|writer| {
        fmt::layer()
            .with_writer(writer)
            .with_ansi(false)
            .with_target(false)
    });

    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer);

    Ok(Logger::new(Dispatch::new(subscriber)))
}

fn open_log_file(path: &Path) -> Result<std::fs::File, LoggingError> {
    let open_error = |source| LoggingError::OpenFile {
        path: path.to_string_lossy().to_string(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(open_error)?;
    }

    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(open_error)
}

fn daily_appender(dir: &Path) -> Result<RollingFileAppender, LoggingError> {
    let path = dir.to_string_lossy().to_string();

    std::fs::create_dir_all(dir).map_err(|source| LoggingError::CreateDir {
        path: path.clone(),
        source,
    })?;

    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_FILE_PREFIX)
        .filename_suffix("log")
        .build(dir)
        .map_err(|source| LoggingError::Rolling { path, source })
}


#[cfg(test)]
mod tests {
    use super::testing::CapturedLogs;
    use super::*;
    use clap::Parser;
    use tracing::{info, warn};

    #[test]
    fn test_scope_routes_records_to_logger() {
        let logs = CapturedLogs::default();
        let logger = logs.logger();

        logger.scope(|| warn!("knock knock"));
        info!("outside any scope");

        assert_eq!(logs.lines_at("WARN").len(), 1);
        assert!(logs.contents().contains("knock knock"));
        assert!(!logs.contents().contains("outside any scope"));
    }

    #[test]
    fn test_scope_works_across_threads() {
        let logs = CapturedLogs::default();
        let logger = logs.logger();

        let handles: Vec<_> = (0..4)
            .map(|i| {
                let logger = logger.clone();
                std::thread::spawn(move || logger.scope(|| info!("thread {}", i)))
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(logs.lines_at("INFO").len(), 4);
    }

    #[test]
    fn test_file_sink_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("jokeworker.log");
        let options = LogOptions {
            level: "info".to_string(),
            file: Some(LogFile::Append(path.clone())),
            console: false,
        };

        init(&options).unwrap().scope(|| info!("first run"));
        init(&options).unwrap().scope(|| info!("second run"));

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("first run"));
        assert!(content.contains("second run"));
        assert!(!content.contains('\u{1b}'));
    }

    #[test]
    fn test_resolve_options() {
        let config = WorkerConfig {
            log_file: "from-config.log".to_string(),
            log_level: "warn".to_string(),
            ..WorkerConfig::default()
        };

        let args = Args::try_parse_from(["jokeworker", "--service"]).unwrap();
        let options = LogOptions::resolve(&args, &config, args.run_mode());
        assert_eq!(options.level, "warn");
        assert_eq!(
            options.file,
            Some(LogFile::Append(PathBuf::from("from-config.log")))
        );
        assert!(!options.console);

        let args =
            Args::try_parse_from(["jokeworker", "--console", "-v", "--log", "cli.log"]).unwrap();
        let options = LogOptions::resolve(&args, &config, args.run_mode());
        assert_eq!(options.level, "debug");
        assert_eq!(options.file, Some(LogFile::Append(PathBuf::from("cli.log"))));
        assert!(options.console);
    }

    #[test]
    fn test_service_defaults_log_to_daily_files() {
        let config = WorkerConfig::default();
        let args = Args::try_parse_from(["jokeworker", "--service"]).unwrap();
        let options = LogOptions::resolve(&args, &config, args.run_mode());

        assert!(!options.console);
        assert_eq!(options.file, Some(LogFile::Daily(default_log_dir())));

        let config = WorkerConfig {
            log_dir: "D:\\logs".to_string(),
            ..WorkerConfig::default()
        };
        let options = LogOptions::resolve(&args, &config, args.run_mode());
        assert_eq!(options.file, Some(LogFile::Daily(PathBuf::from("D:\\logs"))));
    }

    #[test]
    fn test_daily_sink_writes_dated_file() {
        let dir = tempfile::tempdir().unwrap();
        let log_dir = dir.path().join("logs");
        let options = LogOptions {
            level: "info".to_string(),
            file: Some(LogFile::Daily(log_dir.clone())),
            console: false,
        };

        init(&options).unwrap().scope(|| warn!("daily joke"));

        let entries: Vec<_> = std::fs::read_dir(&log_dir)
            .unwrap()
            .map(|entry| entry.unwrap().path())
            .collect();
        assert_eq!(entries.len(), 1);

        let name = entries[0].file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("jokeworker."), "unexpected name {}", name);
        assert!(name.ends_with(".log"), "unexpected name {}", name);

        let content = std::fs::read_to_string(&entries[0]).unwrap();
        assert!(content.contains("daily joke"));
    }
}
