//! Windows Service shell
//!
//! Registers the process with the Service Control Manager and runs the
//! worker until the SCM asks the service to stop.

#[cfg(all(windows, feature = "service"))]
mod runner;

#[cfg(all(windows, feature = "service"))]
pub use runner::run;

/// Service name used for registration
pub const SERVICE_NAME: &str = "JokeWorkerService";

/// Service display name shown in services.msc
pub const SERVICE_DISPLAY_NAME: &str = "Joke Worker Service";

#[cfg(not(all(windows, feature = "service")))]
pub fn run(
    _task: crate::worker::PeriodicTask,
    _logger: &crate::logging::Logger,
) -> anyhow::Result<crate::worker::TaskOutcome> {
    anyhow::bail!("Service mode requires Windows and the 'service' feature")
}
