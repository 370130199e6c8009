//! Periodic joke logging loop

use crate::error::{JokeError, Result};
use crate::logging::Logger;
use crate::worker::cancel::{CancellationToken, WaitOutcome};
use crate::worker::provider::JokeProvider;
use crossbeam_channel::{bounded, Receiver, TryRecvError};
use std::panic::{self, AssertUnwindSafe};
use std::process::ExitCode;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{error, info, warn};

/// Process exit status reported after a worker fault
pub const FAULT_EXIT_CODE: u8 = 1;

/// How the worker loop ended
#[derive(Debug, Clone)]
pub enum TaskOutcome {
    /// Cancellation was observed, a clean shutdown
    Cancelled,
    /// An unrecoverable error ended the loop
    Faulted(Arc<JokeError>),
}

impl TaskOutcome {
    pub fn is_faulted(&self) -> bool {
        matches!(self, TaskOutcome::Faulted(_))
    }

    /// Raw process exit status for this outcome
    pub fn exit_status(&self) -> u8 {
        match self {
            TaskOutcome::Cancelled => 0,
            TaskOutcome::Faulted(_) => FAULT_EXIT_CODE,
        }
    }

    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from(self.exit_status())
    }

    fn lost() -> Self {
        TaskOutcome::Faulted(Arc::new(JokeError::WorkerLost))
    }
}

/// Logs a joke every interval until cancelled
pub struct PeriodicTask {
    provider: Box<dyn JokeProvider>,
    interval: Duration,
    logger: Logger,
}

impl PeriodicTask {
    pub fn new(provider: impl JokeProvider + 'static, interval: Duration, logger: Logger) -> Self {
        Self {
            provider: Box::new(provider),
            interval,
            logger,
        }
    }

    /// Run the loop on the current thread until cancelled or faulted
    pub fn run(mut self, cancel: &CancellationToken) -> TaskOutcome {
        let logger = self.logger.clone();
        logger.scope(|| {
            info!("Joke worker started");
            let outcome = self.run_loop(cancel);
            match &outcome {
                TaskOutcome::Cancelled => info!("Joke worker stopped"),
                TaskOutcome::Faulted(_) => info!("Joke worker stopped after a fault"),
            }
            outcome
        })
    }

    /// Run the loop on a background thread
    pub fn spawn(self, cancel: CancellationToken) -> std::io::Result<TaskHandle> {
        let (outcome_tx, outcome_rx) = bounded(1);
        let logger = self.logger.clone();
        let token = cancel.clone();

        let thread = thread::Builder::new()
            .name("joke-worker".to_string())
            .spawn(move || {
                let outcome = self.run(&token);
                let _ = outcome_tx.send(outcome);
            })?;

        Ok(TaskHandle {
            cancel,
            outcome_rx,
            thread: Some(thread),
            outcome: None,
            logger,
        })
    }

    fn run_loop(&mut self, cancel: &CancellationToken) -> TaskOutcome {
        loop {
            if cancel.is_cancelled() {
                return TaskOutcome::Cancelled;
            }

            match self.next_joke() {
                Ok(joke) => warn!("{}", joke),
                Err(e) if e.is_recoverable() => {
                    error!(error = %e, "Failed to fetch joke, retrying next interval");
                }
                Err(e) => {
                    error!(error = %e, detail = ?e, "Joke worker faulted");
                    return TaskOutcome::Faulted(Arc::new(e));
                }
            }

            if cancel.wait_timeout(self.interval) == WaitOutcome::Cancelled {
                return TaskOutcome::Cancelled;
            }
        }
    }

    fn next_joke(&mut self) -> Result<String> {
        let provider = &mut *self.provider;
        panic::catch_unwind(AssertUnwindSafe(|| provider.next_joke()))
            .unwrap_or_else(|panic| Err(JokeError::Panicked(panic_message(panic))))
    }
}

fn panic_message(panic: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

/// Handle to a worker running on a background thread
///
/// Dropping the handle stops the worker and waits for it.
pub struct TaskHandle {
    cancel: CancellationToken,
    outcome_rx: Receiver<TaskOutcome>,
    thread: Option<JoinHandle<()>>,
    outcome: Option<TaskOutcome>,
    logger: Logger,
}

impl TaskHandle {
    /// Outcome of the worker if it already finished, without blocking
    pub fn try_outcome(&mut self) -> Option<TaskOutcome> {
        if self.outcome.is_none() {
            match self.outcome_rx.try_recv() {
                Ok(outcome) => self.finish(outcome),
                Err(TryRecvError::Empty) => return None,
                Err(TryRecvError::Disconnected) => self.finish(TaskOutcome::lost()),
            }
        }
        self.outcome.clone()
    }

    /// Request cancellation and wait for the worker to finish
    ///
    /// Later calls return the same outcome without side effects.
    pub fn stop(&mut self) -> TaskOutcome {
        if let Some(outcome) = self.try_outcome() {
            return outcome;
        }

        if self.cancel.cancel() {
            self.logger.scope(|| info!("Stop requested, waiting for joke worker"));
        }

        let outcome = self
            .outcome_rx
            .recv()
            .unwrap_or_else(|_| TaskOutcome::lost());
        self.finish(outcome.clone());
        outcome
    }

    /// Token shared with the worker
    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    fn finish(&mut self, outcome: TaskOutcome) {
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
        self.outcome = Some(outcome);
    }
}

impl Drop for TaskHandle {
    fn drop(&mut self) {
        self.stop();
    }
}
