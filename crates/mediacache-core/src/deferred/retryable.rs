//! Retryable deferred value
//!
//! `RetryableDeferred` runs each attempt of its producer as a spawned task
//! and hands every observer a cloneable `Attempt` bound to that task's
//! settlement.

use std::fmt;
use std::future::{Future, IntoFuture};
use std::panic::{self, AssertUnwindSafe};
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::task::{Context, Poll};
use std::time::Instant;

use futures::future::{BoxFuture, Shared};
use futures::{FutureExt, TryFutureExt};

use super::observer::{AttemptObserver, NoOpObserver};
use super::state::DeferredState;

type Producer<T, E> = Box<dyn FnMut() -> BoxFuture<'static, Result<T, E>> + Send>;

/// A deferred value that restarts its producer for the next observer after a
/// failed attempt
///
/// Construction immediately starts attempt #1. Observers attached while an
/// attempt is in flight, or after one succeeded, all share that attempt and
/// its settlement. Once an attempt has failed, the next call to
/// [`observe`](Self::observe) (or any derived operation) invokes the producer
/// again; observers bound to the failed attempt keep seeing its failure.
///
/// Failures are never retried automatically, never wrapped and never
/// swallowed. Clones share the same state.
///
/// # Example
///
/// ```rust,no_run
/// use mediacache_core::RetryableDeferred;
///
/// # async fn fetch_playlist() -> Result<String, String> { Ok(String::new()) }
/// async fn example() {
///     let playlist = RetryableDeferred::new(|| fetch_playlist());
///
///     match (&playlist).await {
///         Ok(body) => println!("{} bytes", body.len()),
///         // The next observation fetches again
///         Err(err) => eprintln!("fetch failed: {}", err),
///     }
/// }
/// ```
pub struct RetryableDeferred<T, E> {
    inner: Arc<Inner<T, E>>,
}

struct Inner<T, E> {
    core: Mutex<Core<T, E>>,
    observer: Arc<dyn AttemptObserver>,
}

enum Core<T, E> {
    /// New attempts can still be started
    Retryable {
        producer: Producer<T, E>,
        attempt: u64,
        // None only until the constructor launches attempt #1
        current: Option<Attempt<T, E>>,
        rejected: bool,
    },

    /// Terminal success; the producer has been dropped
    Fulfilled { current: Attempt<T, E> },
}

impl<T, E> Core<T, E> {
    fn state(&self) -> DeferredState {
        match self {
            Core::Fulfilled { .. } => DeferredState::Fulfilled,
            Core::Retryable { rejected: true, .. } => DeferredState::Rejected,
            Core::Retryable { .. } => DeferredState::Pending,
        }
    }
}

impl<T, E> Inner<T, E> {
    fn lock(&self) -> MutexGuard<'_, Core<T, E>> {
        self.core.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record the outcome of `attempt`; outcomes of superseded attempts are ignored.
    fn settle(&self, attempt: u64, fulfilled: bool) {
        let mut core = self.lock();
        let Core::Retryable {
            attempt: latest,
            current,
            rejected,
            ..
        } = &mut *core
        else {
            return;
        };
        if *latest != attempt {
            return;
        }
        if !fulfilled {
            *rejected = true;
            return;
        }
        if let Some(current) = current.take() {
            *core = Core::Fulfilled { current };
        }
    }
}

impl<T, E> RetryableDeferred<T, E>
where
    T: Clone + Send + Sync + 'static,
    E: Clone + fmt::Display + Send + Sync + 'static,
{
    /// Create a deferred value and start its first attempt
    ///
    /// # Panics
    ///
    /// Panics if called outside of a Tokio runtime.
    pub fn new<F, Fut>(producer: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        RetryableDeferredBuilder::new().build(producer)
    }

    fn from_parts(producer: Producer<T, E>, observer: Arc<dyn AttemptObserver>) -> Self {
        let deferred = Self {
            inner: Arc::new(Inner {
                core: Mutex::new(Core::Retryable {
                    producer,
                    attempt: 0,
                    current: None,
                    rejected: false,
                }),
                observer,
            }),
        };
        // Starts attempt #1
        let _ = deferred.observe();
        deferred
    }

    /// Get the attempt to attach to
    ///
    /// Returns the in-flight or fulfilled attempt unchanged. If the latest
    /// attempt was rejected, invokes the producer once and returns the new
    /// attempt. The check and the restart are one atomic step, so concurrent
    /// late observers share a single retry.
    pub fn observe(&self) -> Attempt<T, E> {
        let mut core = self.inner.lock();
        match &mut *core {
            Core::Fulfilled { current } => current.clone(),
            Core::Retryable {
                current: Some(current),
                rejected: false,
                ..
            } => current.clone(),
            Core::Retryable {
                producer,
                attempt,
                current,
                rejected,
            } => {
                *attempt += 1;
                *rejected = false;
                let next = launch(
                    Arc::downgrade(&self.inner),
                    Arc::clone(&self.inner.observer),
                    *attempt,
                    (*producer)(),
                );
                *current = Some(next.clone());
                next
            }
        }
    }

    /// Get the state of the latest attempt
    pub fn state(&self) -> DeferredState {
        self.inner.lock().state()
    }

    /// Observe and map the success value
    pub fn map_ok<U, F>(&self, f: F) -> impl Future<Output = Result<U, E>>
    where
        F: FnOnce(T) -> U,
    {
        self.observe().map_ok(f)
    }

    /// Observe and map the failure
    pub fn map_err<E2, F>(&self, f: F) -> impl Future<Output = Result<T, E2>>
    where
        F: FnOnce(E) -> E2,
    {
        self.observe().map_err(f)
    }

    /// Observe and chain a further fallible computation on success
    pub fn and_then<U, F, Fut>(&self, f: F) -> impl Future<Output = Result<U, E>>
    where
        F: FnOnce(T) -> Fut,
        Fut: Future<Output = Result<U, E>>,
    {
        self.observe().and_then(f)
    }

    /// Observe and run `f` once the bound attempt settles, whatever the outcome
    ///
    /// `f` also runs if the attempt panicked or the returned future is
    /// dropped before completion.
    pub fn finally<F>(&self, f: F) -> impl Future<Output = Result<T, E>>
    where
        F: FnOnce(),
    {
        let attempt = self.observe();
        async move {
            let _cleanup = Cleanup(Some(f));
            attempt.await
        }
    }
}

/// Runs its closure when dropped, including during unwinding
struct Cleanup<F: FnOnce()>(Option<F>);

impl<F: FnOnce()> Drop for Cleanup<F> {
    fn drop(&mut self) {
        if let Some(f) = self.0.take() {
            f();
        }
    }
}

impl<T, E> Clone for RetryableDeferred<T, E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T, E> fmt::Debug for RetryableDeferred<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryableDeferred")
            .field("state", &self.inner.lock().state())
            .finish_non_exhaustive()
    }
}

impl<T, E> IntoFuture for &RetryableDeferred<T, E>
where
    T: Clone + Send + Sync + 'static,
    E: Clone + fmt::Display + Send + Sync + 'static,
{
    type Output = Result<T, E>;
    type IntoFuture = Attempt<T, E>;

    fn into_future(self) -> Self::IntoFuture {
        self.observe()
    }
}

/// Spawn one attempt and return the shared handle to its settlement.
///
/// The owner's state is updated before the task completes, so anyone who has
/// seen the settlement also sees the new state.
fn launch<T, E>(
    owner: Weak<Inner<T, E>>,
    observer: Arc<dyn AttemptObserver>,
    attempt: u64,
    future: BoxFuture<'static, Result<T, E>>,
) -> Attempt<T, E>
where
    T: Clone + Send + Sync + 'static,
    E: Clone + fmt::Display + Send + Sync + 'static,
{
    observer.on_attempt_start(attempt);

    let task = tokio::spawn(async move {
        let started = Instant::now();
        let outcome = AssertUnwindSafe(future).catch_unwind().await;

        if let Some(owner) = owner.upgrade() {
            owner.settle(attempt, matches!(outcome, Ok(Ok(_))));
        }

        match outcome {
            Ok(Ok(value)) => {
                observer.on_fulfilled(attempt, started.elapsed());
                Ok(value)
            }
            Ok(Err(error)) => {
                observer.on_rejected(attempt, &error, started.elapsed());
                Err(error)
            }
            Err(payload) => {
                observer.on_panicked(attempt);
                panic::resume_unwind(payload)
            }
        }
    });

    let settlement = async move {
        match task.await {
            Ok(result) => result,
            Err(err) => match err.try_into_panic() {
                Ok(payload) => panic::resume_unwind(payload),
                Err(err) => panic!("attempt {} did not run to completion: {}", attempt, err),
            },
        }
    };

    Attempt {
        shared: settlement.boxed().shared(),
    }
}

/// Handle to one attempt of a `RetryableDeferred`
///
/// Awaiting resolves to the attempt's settlement. Clones are bound to the
/// same attempt and resolve to identical results; the attempt itself runs to
/// completion whether or not any handle is still alive.
///
/// # Panics
///
/// If the producer's future panicked, the panic is resumed in the task
/// awaiting the handle. Awaiting also panics if the Tokio runtime shuts down
/// before the attempt's task has completed.
pub struct Attempt<T, E> {
    shared: Shared<BoxFuture<'static, Result<T, E>>>,
}

impl<T, E> Attempt<T, E>
where
    T: Clone,
    E: Clone,
{
    /// Whether both handles are bound to the same underlying attempt
    ///
    /// A handle that has already been awaited to completion compares unequal
    /// to every other handle.
    pub fn is_same_attempt(&self, other: &Self) -> bool {
        self.shared.ptr_eq(&other.shared)
    }

    /// The attempt's settlement, without awaiting
    ///
    /// Returns `None` until some handle bound to this attempt has been
    /// polled to completion, even if the attempt's task already finished.
    pub fn peek(&self) -> Option<&Result<T, E>> {
        self.shared.peek()
    }
}

impl<T, E> Clone for Attempt<T, E> {
    fn clone(&self) -> Self {
        Self {
            shared: self.shared.clone(),
        }
    }
}

impl<T, E> fmt::Debug for Attempt<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attempt").finish_non_exhaustive()
    }
}

impl<T, E> Future for Attempt<T, E>
where
    T: Clone,
    E: Clone,
{
    type Output = Result<T, E>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.shared.poll_unpin(cx)
    }
}

/// Builder for configuring a `RetryableDeferred`
///
/// # Example
///
/// ```rust,no_run
/// use mediacache_core::deferred::{RetryableDeferredBuilder, TracingObserver};
///
/// # async fn example() {
/// let segment = RetryableDeferredBuilder::new()
///     .with_observer(TracingObserver::new("segment-download"))
///     .build(|| async { Ok::<_, String>(vec![0u8; 188]) });
/// # }
/// ```
pub struct RetryableDeferredBuilder<O = NoOpObserver> {
    observer: O,
}

impl Default for RetryableDeferredBuilder<NoOpObserver> {
    fn default() -> Self {
        Self::new()
    }
}

impl RetryableDeferredBuilder<NoOpObserver> {
    /// Create a new builder with default settings
    pub fn new() -> Self {
        Self {
            observer: NoOpObserver,
        }
    }
}

impl<O> RetryableDeferredBuilder<O> {
    /// Set the observer
    ///
    /// The observer receives a callback for every attempt start and
    /// settlement.
    pub fn with_observer<O2>(self, observer: O2) -> RetryableDeferredBuilder<O2> {
        RetryableDeferredBuilder { observer }
    }
}

impl<O> RetryableDeferredBuilder<O>
where
    O: AttemptObserver + 'static,
{
    /// Build the deferred value and start its first attempt
    ///
    /// # Panics
    ///
    /// Panics if called outside of a Tokio runtime.
    pub fn build<T, E, F, Fut>(self, mut producer: F) -> RetryableDeferred<T, E>
    where
        T: Clone + Send + Sync + 'static,
        E: Clone + fmt::Display + Send + Sync + 'static,
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        RetryableDeferred::from_parts(
            Box::new(move || producer().boxed()),
            Arc::new(self.observer),
        )
    }
}
