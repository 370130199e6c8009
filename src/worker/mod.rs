//! The periodic joke worker
//!
//! A [`PeriodicTask`] pulls jokes from a [`JokeProvider`] and logs each one,
//! waiting on a [`CancellationToken`] between ticks.

mod cancel;
mod provider;
mod task;

pub use cancel::{CancellationToken, WaitOutcome};
pub use provider::{JokeProvider, JokeService};
pub use task::{PeriodicTask, TaskHandle, TaskOutcome, FAULT_EXIT_CODE};
