//! # mediacache-core
//!
//! Core library for the media cache providing:
//! - `RetryableDeferred`, a shared asynchronous value that restarts its
//!   producer for the next observer after a failed attempt
//! - Observable attempt lifecycle via the `AttemptObserver` trait
//! - Cache-key hashing, byte buffer and string helpers
//! - Conversions between key-value objects, records and maps

pub mod deferred;
pub mod error;
pub mod utils;

pub use deferred::{Attempt, DeferredState, RetryableDeferred, RetryableDeferredBuilder};
pub use error::{Error, Result};
pub use utils::cache_key;
