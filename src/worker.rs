use std::sync::{ Arc, atomic::{ AtomicBool, Ordering } };
use std::time::Duration;
use tokio::{ sync::Notify, time::Instant };
use tracing::debug;

use crate::error::LoadError;
use crate::transport::{ Attempt, Transport };

/// Cooperative cancellation shared by the coordinator and every worker.
///
/// Raised at most once; clones observe the same signal.
#[derive(Debug, Clone, Default)]
pub struct StopSignal {
    inner: Arc<StopInner>,
}

#[derive(Debug, Default)]
struct StopInner {
    stopped: AtomicBool,
    notify: Notify,
}

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise the signal and wake every task waiting in [`StopSignal::stopped`].
    pub fn stop(&self) {
        if !self.inner.stopped.swap(true, Ordering::SeqCst) {
            self.inner.notify.notify_waiters();
        }
    }

    pub fn is_stopped(&self) -> bool {
        self.inner.stopped.load(Ordering::SeqCst)
    }

    /// Resolves once the signal has been raised.
    pub async fn stopped(&self) {
        let notified = self.inner.notify.notified();
        tokio::pin!(notified);
        // register before checking the flag so a concurrent stop() is not missed
        notified.as_mut().enable();
        if self.is_stopped() {
            return;
        }
        notified.await;
    }
}

/// Outcomes collected by one worker, handed to the coordinator at join.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct WorkerTally {
    pub successes: u64,
    pub failures: u64,
    /// One entry per attempt that got a response, 2xx or not.
    pub latencies: Vec<Duration>,
}

impl WorkerTally {
    pub fn attempts(&self) -> u64 {
        self.successes + self.failures
    }
}

/// Closed loop: send, record, repeat until `stop` is raised.
///
/// The signal is only checked between requests, so a request in flight always
/// completes and is counted. A fatal transport error raises `stop` for every
/// other worker and is returned.
pub async fn run_worker<T: Transport>(
    id: usize,
    transport: T,
    stop: StopSignal,
    verbose: bool
) -> Result<WorkerTally, LoadError> {
    debug!(worker = id, "worker started");
    let mut tally = WorkerTally::default();

    while !stop.is_stopped() {
        let start = Instant::now();

        let attempt = match transport.send().await {
            Ok(attempt) => attempt,
            Err(err) => {
                stop.stop();
                return Err(err);
            }
        };

        // transport failures have no latency sample
        let elapsed = match &attempt {
            Attempt::Response { received, .. } => {
                let elapsed = received.saturating_duration_since(start);
                tally.latencies.push(elapsed);
                Some(elapsed)
            }
            Attempt::Failed(_) => None,
        };

        if attempt.is_success() {
            tally.successes += 1;
        } else {
            tally.failures += 1;
        }

        if verbose {
            println!("{}", request_line(&attempt, elapsed.unwrap_or_default()));
        }
    }

    debug!(
        worker = id,
        attempts = tally.attempts(),
        successes = tally.successes,
        failures = tally.failures,
        "worker stopped"
    );
    Ok(tally)
}

/// One line of verbose output for a finished attempt.
pub fn request_line(attempt: &Attempt, elapsed: Duration) -> String {
    match attempt {
        Attempt::Failed(err) => format!("failed to send request: {}", err),
        Attempt::Response { status, version, .. } => {
            let label = if attempt.is_success() { "success" } else { "fail" };
            format!(
                "{:<8} status={} version={:?} duration={}ms",
                label,
                status.as_u16(),
                version,
                elapsed.as_millis()
            )
        }
    }
}
