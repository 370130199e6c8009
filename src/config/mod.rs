//! Command line and configuration file handling

mod args;
mod settings;

pub use args::{Args, RunMode};
pub use settings::{ConfigError, WorkerConfig, DEFAULT_INTERVAL_SECS, MAX_INTERVAL_SECS};
