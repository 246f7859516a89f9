//! Readiness polling
//!
//! Retries a predicate on a fixed interval until it yields a value or a
//! deadline passes. Each retry awaits a timer; nothing spins.

use std::time::{Duration, Instant};

use smol::Timer;

const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Interval and deadline of a poll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    pub timeout: Duration,
}

impl PollPolicy {
    pub fn new(interval: Duration, timeout: Duration) -> Self {
        Self { interval, timeout }
    }

    pub fn from_millis(interval_ms: u64, timeout_ms: u64) -> Self {
        Self::new(Duration::from_millis(interval_ms), Duration::from_millis(timeout_ms))
    }
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self::from_millis(50, 5000)
    }
}

/// Call `predicate` now and then every `policy.interval` until it returns
/// `Some` or `policy.timeout` has elapsed.
///
/// A timeout yields `None`. The final wait is clamped to the deadline, so
/// the call returns within `timeout + interval`.
pub async fn poll_until<T, F>(mut predicate: F, policy: PollPolicy) -> Option<T>
where
    F: FnMut() -> Option<T>,
{
    let started = Instant::now();
    let deadline = started + policy.timeout;
    let interval = policy.interval.max(MIN_INTERVAL);
    let mut attempts = 0u32;

    loop {
        attempts += 1;
        if let Some(found) = predicate() {
            tracing::trace!(attempts, elapsed_ms = started.elapsed().as_millis() as u64, "poll satisfied");
            return Some(found);
        }

        let now = Instant::now();
        if now >= deadline {
            tracing::debug!(attempts, waited_ms = policy.timeout.as_millis() as u64, "poll timed out");
            return None;
        }

        tracing::trace!(attempts, "poll pending");
        Timer::after(interval.min(deadline - now)).await;
    }
}

/// Suspend the current task for `duration`
pub async fn sleep(duration: Duration) {
    if !duration.is_zero() {
        Timer::after(duration).await;
    }
}
