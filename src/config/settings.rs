//! Worker configuration file support

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Interval between two jokes when nothing is configured
pub const DEFAULT_INTERVAL_SECS: u64 = 10;

/// Longest accepted interval, one day
pub const MAX_INTERVAL_SECS: u64 = 24 * 60 * 60;

/// Config file name looked up next to the executable
const EXE_CONFIG_NAME: &str = "jokeworker.toml";

/// Worker configuration loaded from TOML file
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct WorkerConfig {
    /// Seconds between two logged jokes
    pub interval_secs: u64,

    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,

    /// Single log file appended to (empty = daily files in `log_dir`)
    pub log_file: String,

    /// Directory for daily rolling log files (empty = default log directory)
    pub log_dir: String,

    /// Text file with one joke per line (empty = built-in jokes)
    pub jokes_file: String,

    /// PNG used for the tray icon (empty = bundled asset or generated icon)
    pub tray_icon: String,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            interval_secs: DEFAULT_INTERVAL_SECS,
            log_level: "info".to_string(),
            log_file: String::new(),
            log_dir: String::new(),
            jokes_file: String::new(),
            tray_icon: String::new(),
        }
    }
}

impl WorkerConfig {
    /// Load configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path_str = path.as_ref().to_string_lossy().to_string();
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io {
            path: path_str.clone(),
            source: e,
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path_str,
            source: e,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from default locations
    ///
    /// Searches in order:
    /// 1. Same directory as executable: jokeworker.toml
    /// 2. %PROGRAMDATA%\jokeworker\config.toml
    /// 3. User config dir: jokeworker/config.toml
    pub fn load_default() -> Result<Self, ConfigError> {
        match Self::default_locations().into_iter().find(|p| p.exists()) {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Load from an explicit path when given, otherwise from default locations
    pub fn load_from(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => Self::load_default(),
        }
    }

    fn default_locations() -> Vec<PathBuf> {
        let mut locations = Vec::new();

        if let Some(exe_dir) = std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(Path::to_path_buf))
        {
            locations.push(exe_dir.join(EXE_CONFIG_NAME));
        }

        if let Ok(program_data) = std::env::var("PROGRAMDATA") {
            locations.push(
                Path::new(&program_data)
                    .join("jokeworker")
                    .join("config.toml"),
            );
        }

        if let Some(config_dir) = dirs::config_dir() {
            locations.push(config_dir.join("jokeworker").join("config.toml"));
        }

        locations
    }

    /// Reject values the worker cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_INTERVAL_SECS).contains(&self.interval_secs) {
            return Err(ConfigError::Invalid(format!(
                "interval_secs must be between 1 and {}, got {}",
                MAX_INTERVAL_SECS, self.interval_secs
            )));
        }
        Ok(())
    }

    /// Interval between two jokes
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    /// Configured log file, if any
    pub fn log_file(&self) -> Option<PathBuf> {
        non_empty_path(&self.log_file)
    }

    /// Configured rolling log directory, if any
    pub fn log_dir(&self) -> Option<PathBuf> {
        non_empty_path(&self.log_dir)
    }

    /// Configured joke file, if any
    pub fn jokes_file(&self) -> Option<PathBuf> {
        non_empty_path(&self.jokes_file)
    }

    /// Configured tray icon, if any
    pub fn tray_icon(&self) -> Option<PathBuf> {
        non_empty_path(&self.tray_icon)
    }

    /// Generate a sample configuration file content
    pub fn sample_config() -> String {
        r#"# jokeworker configuration

# Seconds between two logged jokes (default: 10)
interval_secs = 10

# Log level: trace, debug, info, warn, error (default: info)
log_level = "info"

# Single log file, appended to across runs (empty = daily files in log_dir)
# Example: log_file = "C:\\ProgramData\\jokeworker\\jokeworker.log"
log_file = ""

# Directory for daily log files jokeworker.YYYY-MM-DD.log
# (empty = %PROGRAMDATA%\\jokeworker\\logs, or the local data dir)
log_dir = ""

# Text file with one joke per line, '#' starts a comment (empty = built-in jokes)
jokes_file = ""

# PNG image for the tray icon (empty = bundled asset or generated icon)
tray_icon = ""
"#
        .to_string()
    }
}

fn non_empty_path(value: &str) -> Option<PathBuf> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| PathBuf::from(trimmed))
}

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    /// IO error reading config file
    #[error("Failed to read config file '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    /// Error parsing TOML
    #[error("Failed to parse config file '{path}': {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },

    /// Value out of range
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
