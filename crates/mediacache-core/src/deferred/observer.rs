//! Attempt observation and logging
//!
//! This module provides the `AttemptObserver` trait for monitoring the
//! attempts of a `RetryableDeferred` and a `TracingObserver` implementation
//! that logs using the `tracing` crate.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Observer trait for attempt lifecycle events
///
/// Callbacks run on the task driving the attempt, so implementations should
/// be cheap and must not block.
///
/// # Example
///
/// ```rust
/// use mediacache_core::deferred::AttemptObserver;
/// use std::fmt;
/// use std::time::Duration;
///
/// struct SegmentMetrics;
///
/// impl AttemptObserver for SegmentMetrics {
///     fn on_attempt_start(&self, attempt: u64) {
///         // Record attempt start
///     }
///
///     fn on_fulfilled(&self, attempt: u64, elapsed: Duration) {
///         // Record latency
///     }
///
///     fn on_rejected(&self, attempt: u64, error: &dyn fmt::Display, elapsed: Duration) {
///         // Record failure
///     }
/// }
/// ```
pub trait AttemptObserver: Send + Sync {
    /// Called when the producer has been invoked for a new attempt
    ///
    /// # Arguments
    ///
    /// * `attempt` - The attempt number (1-indexed)
    fn on_attempt_start(&self, attempt: u64);

    /// Called when an attempt settles successfully
    ///
    /// # Arguments
    ///
    /// * `attempt` - The attempt number that succeeded (1-indexed)
    /// * `elapsed` - Time from attempt start to settlement
    fn on_fulfilled(&self, attempt: u64, elapsed: Duration);

    /// Called when an attempt settles with a failure
    ///
    /// The failure is still delivered unchanged to every observer bound to
    /// the attempt; this callback only sees it.
    ///
    /// # Arguments
    ///
    /// * `attempt` - The attempt number that failed (1-indexed)
    /// * `error` - The producer's failure
    /// * `elapsed` - Time from attempt start to settlement
    fn on_rejected(&self, attempt: u64, error: &dyn fmt::Display, elapsed: Duration);

    /// Called when an attempt's future panicked
    fn on_panicked(&self, attempt: u64) {
        let _ = attempt;
    }
}

/// A no-op observer that does nothing
///
/// This is the observer used by `RetryableDeferred::new`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpObserver;

impl AttemptObserver for NoOpObserver {
    fn on_attempt_start(&self, _attempt: u64) {}

    fn on_fulfilled(&self, _attempt: u64, _elapsed: Duration) {}

    fn on_rejected(&self, _attempt: u64, _error: &dyn fmt::Display, _elapsed: Duration) {}
}

/// An observer that logs attempt events using the `tracing` crate
///
/// # Log Levels
///
/// - `on_attempt_start`: DEBUG (first attempt) or INFO (retry)
/// - `on_fulfilled`: INFO (after a retry) or DEBUG (first attempt)
/// - `on_rejected`: WARN
/// - `on_panicked`: ERROR
///
/// # Example
///
/// ```rust
/// use mediacache_core::deferred::TracingObserver;
///
/// let observer = TracingObserver::new("segment-download");
/// assert_eq!(observer.operation(), "segment-download");
/// ```
#[derive(Debug, Clone)]
pub struct TracingObserver {
    /// Name of the deferred operation (for log context)
    operation: String,
}

impl TracingObserver {
    /// Create a new tracing observer
    ///
    /// # Arguments
    ///
    /// * `operation` - A descriptive name for the deferred operation
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
        }
    }

    /// Get the operation name
    pub fn operation(&self) -> &str {
        &self.operation
    }
}

impl Default for TracingObserver {
    fn default() -> Self {
        Self::new("deferred")
    }
}

impl AttemptObserver for TracingObserver {
    fn on_attempt_start(&self, attempt: u64) {
        if attempt > 1 {
            tracing::info!(
                operation = %self.operation,
                attempt = attempt,
                "restarting after failed attempt"
            );
        } else {
            tracing::debug!(
                operation = %self.operation,
                attempt = attempt,
                "starting attempt"
            );
        }
    }

    fn on_fulfilled(&self, attempt: u64, elapsed: Duration) {
        if attempt > 1 {
            tracing::info!(
                operation = %self.operation,
                attempt = attempt,
                elapsed_ms = elapsed.as_millis() as u64,
                "fulfilled after retry"
            );
        } else {
            tracing::debug!(
                operation = %self.operation,
                elapsed_ms = elapsed.as_millis() as u64,
                "fulfilled on first attempt"
            );
        }
    }

    fn on_rejected(&self, attempt: u64, error: &dyn fmt::Display, elapsed: Duration) {
        tracing::warn!(
            operation = %self.operation,
            attempt = attempt,
            error = %error,
            elapsed_ms = elapsed.as_millis() as u64,
            "attempt rejected, next observer will retry"
        );
    }

    fn on_panicked(&self, attempt: u64) {
        tracing::error!(
            operation = %self.operation,
            attempt = attempt,
            "attempt panicked"
        );
    }
}

/// An observer that counts attempt events
///
/// Useful for testing and metrics collection.
#[derive(Debug, Default)]
pub struct StatsObserver {
    attempt_starts: AtomicU64,
    fulfilled: AtomicU64,
    rejected: AtomicU64,
    panicked: AtomicU64,
}

impl StatsObserver {
    /// Create a new stats observer
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of attempts started
    pub fn attempt_starts(&self) -> u64 {
        self.attempt_starts.load(Ordering::SeqCst)
    }

    /// Get the number of fulfilled attempts
    pub fn fulfilled(&self) -> u64 {
        self.fulfilled.load(Ordering::SeqCst)
    }

    /// Get the number of rejected attempts
    pub fn rejected(&self) -> u64 {
        self.rejected.load(Ordering::SeqCst)
    }

    /// Get the number of attempts whose future panicked
    pub fn panicked(&self) -> u64 {
        self.panicked.load(Ordering::SeqCst)
    }
}

impl AttemptObserver for StatsObserver {
    fn on_attempt_start(&self, _attempt: u64) {
        self.attempt_starts.fetch_add(1, Ordering::SeqCst);
    }

    fn on_fulfilled(&self, _attempt: u64, _elapsed: Duration) {
        self.fulfilled.fetch_add(1, Ordering::SeqCst);
    }

    fn on_rejected(&self, _attempt: u64, _error: &dyn fmt::Display, _elapsed: Duration) {
        self.rejected.fetch_add(1, Ordering::SeqCst);
    }

    fn on_panicked(&self, _attempt: u64) {
        self.panicked.fetch_add(1, Ordering::SeqCst);
    }
}

impl<T: AttemptObserver + ?Sized> AttemptObserver for Arc<T> {
    fn on_attempt_start(&self, attempt: u64) {
        (**self).on_attempt_start(attempt)
    }

    fn on_fulfilled(&self, attempt: u64, elapsed: Duration) {
        (**self).on_fulfilled(attempt, elapsed)
    }

    fn on_rejected(&self, attempt: u64, error: &dyn fmt::Display, elapsed: Duration) {
        (**self).on_rejected(attempt, error, elapsed)
    }

    fn on_panicked(&self, attempt: u64) {
        (**self).on_panicked(attempt)
    }
}

impl<T: AttemptObserver + ?Sized> AttemptObserver for Box<T> {
    fn on_attempt_start(&self, attempt: u64) {
        (**self).on_attempt_start(attempt)
    }

    fn on_fulfilled(&self, attempt: u64, elapsed: Duration) {
        (**self).on_fulfilled(attempt, elapsed)
    }

    fn on_rejected(&self, attempt: u64, error: &dyn fmt::Display, elapsed: Duration) {
        (**self).on_rejected(attempt, error, elapsed)
    }

    fn on_panicked(&self, attempt: u64) {
        (**self).on_panicked(attempt)
    }
}
