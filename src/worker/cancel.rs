//! One-shot cancellation token with an interruptible wait

use parking_lot::{Condvar, Mutex};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Result of waiting on a [`CancellationToken`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    /// The full interval elapsed
    Completed,
    /// Cancellation was requested before or during the wait
    Cancelled,
}

#[derive(Default)]
struct Inner {
    cancelled: Mutex<bool>,
    condvar: Condvar,
}

/// Shared shutdown request flag
///
/// Clones observe the same flag. Once cancelled it stays cancelled.
#[derive(Clone, Default)]
pub struct CancellationToken {
    inner: Arc<Inner>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation and wake every waiter
    ///
    /// Returns `true` only for the call that actually flipped the flag.
    pub fn cancel(&self) -> bool {
        let mut cancelled = self.inner.cancelled.lock();
        if *cancelled {
            return false;
        }
        *cancelled = true;
        self.inner.condvar.notify_all();
        true
    }

    pub fn is_cancelled(&self) -> bool {
        *self.inner.cancelled.lock()
    }

    /// Block for `timeout`, returning early if cancellation is requested
    pub fn wait_timeout(&self, timeout: Duration) -> WaitOutcome {
        let mut cancelled = self.inner.cancelled.lock();

        // Loops guard against spurious wakeups
        match Instant::now().checked_add(timeout) {
            Some(deadline) => {
                while !*cancelled {
                    if self
                        .inner
                        .condvar
                        .wait_until(&mut cancelled, deadline)
                        .timed_out()
                    {
                        break;
                    }
                }
            }
            // Deadline not representable, only cancellation ends the wait
            None => {
                while !*cancelled {
                    self.inner.condvar.wait(&mut cancelled);
                }
            }
        }

        if *cancelled {
            WaitOutcome::Cancelled
        } else {
            WaitOutcome::Completed
        }
    }
}

impl std::fmt::Debug for CancellationToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CancellationToken")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_cancel_is_one_shot() {
        let token = CancellationToken::new();
        assert!(!token.is_cancelled());
        assert!(token.cancel());
        assert!(!token.cancel());
        assert!(token.is_cancelled());
        assert!(token.clone().is_cancelled());
    }

    #[test]
    fn test_wait_completes_without_cancel() {
        let token = CancellationToken::new();
        let start = Instant::now();
        assert_eq!(
            token.wait_timeout(Duration::from_millis(30)),
            WaitOutcome::Completed
        );
        assert!(start.elapsed() >= Duration::from_millis(30));
    }

    #[test]
    fn test_wait_returns_immediately_when_already_cancelled() {
        let token = CancellationToken::new();
        token.cancel();
        let start = Instant::now();
        assert_eq!(
            token.wait_timeout(Duration::from_secs(10)),
            WaitOutcome::Cancelled
        );
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn test_cancel_interrupts_wait() {
        let token = CancellationToken::new();
        let waiter = token.clone();
        let start = Instant::now();

        let handle = thread::spawn(move || waiter.wait_timeout(Duration::from_secs(10)));
        thread::sleep(Duration::from_millis(50));
        token.cancel();

        assert_eq!(handle.join().unwrap(), WaitOutcome::Cancelled);
        assert!(start.elapsed() < Duration::from_secs(2));
    }

    #[test]
    fn test_huge_timeout_waits_for_cancel() {
        let token = CancellationToken::new();
        let waiter = token.clone();

        let handle = thread::spawn(move || waiter.wait_timeout(Duration::MAX));
        thread::sleep(Duration::from_millis(50));
        token.cancel();

        assert_eq!(handle.join().unwrap(), WaitOutcome::Cancelled);
    }
}
