//! jokeworker - periodic joke logger
//!
//! Logs a joke on a fixed interval while running as a console app, a
//! Windows service, or a system tray application.

pub mod config;
pub mod error;
pub mod host;
pub mod logging;
pub mod worker;

pub use error::{JokeError, Result};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
