//! Trailing-edge debounce: a cancelable delayed invocation.
//!
//! `schedule` arms a timer; scheduling again before it elapses supersedes the
//! earlier call, so only the last call of a burst runs. A call whose delay has
//! already elapsed is running and is never interrupted.
//!
//! Must be used from within a Tokio runtime.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Cancels one scheduled call if it has not started yet.
#[derive(Debug, Clone)]
pub struct Canceller {
    generation: Arc<AtomicU64>,
    ticket: u64,
}

impl Canceller {
    /// Returns `true` if the call was still pending and is now cancelled.
    pub fn cancel(&self) -> bool {
        self.generation
            .compare_exchange(
                self.ticket,
                self.ticket + 1,
                Ordering::SeqCst,
                Ordering::SeqCst,
            )
            .is_ok()
    }

    /// Whether this call is still the armed one.
    pub fn is_current(&self) -> bool {
        self.generation.load(Ordering::SeqCst) == self.ticket
    }
}

#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    generation: Arc<AtomicU64>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedule `task` after the default delay, superseding any pending call.
    pub fn schedule<F, Fut>(&self, task: F) -> Canceller
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.schedule_in(self.delay, task)
    }

    /// Schedule `task` after `delay`, superseding any pending call.
    pub fn schedule_in<F, Fut>(&self, delay: Duration, task: F) -> Canceller
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let ticket = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let generation = self.generation.clone();

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // Claim the slot; a later schedule or a cancel has moved the counter on.
            if generation
                .compare_exchange(ticket, ticket + 1, Ordering::SeqCst, Ordering::SeqCst)
                .is_ok()
            {
                task().await;
            }
        });

        Canceller {
            generation: self.generation.clone(),
            ticket,
        }
    }

    /// Drop whatever is pending.
    pub fn cancel(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }
}
