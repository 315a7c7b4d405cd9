//! Common test infrastructure for mediacache-core tests
//!
//! # Usage
//!
//! In your test file, add:
//! ```ignore
//! mod common;
//! use common::*;
//! ```

#![allow(dead_code)]

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

pub const ORIGIN: &str = "https://origin.example.com/live";

/// Build the URL of a numbered media segment
pub fn segment_url(index: u32) -> String {
    format!("{}/seg-{:05}.ts", ORIGIN, index)
}

/// In-memory origin that fails a fixed number of requests before serving
#[derive(Debug)]
pub struct FlakyOrigin {
    failures_left: AtomicU32,
    requests: AtomicU32,
    latency: Duration,
}

impl FlakyOrigin {
    pub fn new(failures: u32) -> Arc<Self> {
        Self::with_latency(failures, Duration::ZERO)
    }

    pub fn with_latency(failures: u32, latency: Duration) -> Arc<Self> {
        Arc::new(Self {
            failures_left: AtomicU32::new(failures),
            requests: AtomicU32::new(0),
            latency,
        })
    }

    /// Fetch a segment body; the body is the URL bytes
    pub async fn fetch(&self, url: &str) -> Result<Vec<u8>, String> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let failing = self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
            .is_ok();
        if failing {
            Err(format!("503 Service Unavailable: {}", url))
        } else {
            Ok(url.as_bytes().to_vec())
        }
    }

    pub fn requests(&self) -> u32 {
        self.requests.load(Ordering::SeqCst)
    }
}
