//! Retryable deferred values
//!
//! A `RetryableDeferred` wraps a producer of asynchronous results. It shares
//! one in-flight or completed attempt among all observers and starts a new
//! attempt only when someone observes it after a failure. There is no timer,
//! backoff or attempt limit: retrying is driven entirely by demand.
//!
//! # Features
//!
//! - First attempt starts at construction, fire-and-forget
//! - One producer invocation per attempt, however many observers attach
//! - Terminal success: the producer is dropped and the value is shared forever
//! - Observers of a failed attempt keep its failure; later observers get the retry
//! - Observable attempt lifecycle via the `AttemptObserver` trait
//! - Built-in `TracingObserver` for logging
//! - Thread-safe with Send + Sync bounds
//!
//! # Example
//!
//! ```rust,no_run
//! use mediacache_core::deferred::RetryableDeferred;
//!
//! async fn example() {
//!     let key = RetryableDeferred::new(|| async {
//!         // Your fallible operation here
//!         Ok::<_, String>("0123abcd".to_string())
//!     });
//!
//!     let upper = key.map_ok(|k| k.to_uppercase()).await;
//!     assert_eq!(upper.as_deref(), Ok("0123ABCD"));
//! }
//! ```

mod observer;
mod retryable;
mod state;

pub use observer::{AttemptObserver, NoOpObserver, StatsObserver, TracingObserver};
pub use retryable::{Attempt, RetryableDeferred, RetryableDeferredBuilder};
pub use state::DeferredState;
