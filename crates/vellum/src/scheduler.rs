//! Trailing-edge debounce timer.
//!
//! [`DebounceScheduler`] turns a burst of "input changed" events into a
//! single delayed call. Every [`schedule`](DebounceScheduler::schedule)
//! disarms the previously armed timer and arms a new one, so only the last
//! call in a burst ever fires.

use std::{
    sync::{Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use log::trace;
use tokio::{task::JoinHandle, time};

/// A single re-armable timer running on the Tokio runtime.
///
/// The callback runs on the timer task once the delay elapses. Dropping the
/// scheduler disarms any pending timer.
#[derive(Debug, Default)]
pub struct DebounceScheduler {
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl DebounceScheduler {
    /// Create a scheduler with no timer armed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm a timer that calls `f` after `delay`, replacing any armed timer.
    ///
    /// The replaced timer's callback is dropped without running. A timer that
    /// already fired is unaffected. The delay is fixed at arming time; later
    /// calls with a different delay do not reschedule timers that are
    /// already armed, they replace them.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a Tokio runtime.
    pub fn schedule<F>(&self, f: F, delay: Duration)
    where
        F: FnOnce() + Send + 'static,
    {
        let timer = tokio::spawn(async move {
            time::sleep(delay).await;
            f();
        });

        let replaced = self.lock().replace(timer);
        if let Some(replaced) = replaced {
            replaced.abort();
        }

        trace!(delay:?; "Debounce timer armed");
    }

    /// Disarm the pending timer, if any.
    pub fn cancel(&self) {
        if let Some(pending) = self.lock().take() {
            if !pending.is_finished() {
                trace!("Debounce timer cancelled");
            }
            pending.abort();
        }
    }

    /// Returns `true` if a timer is armed and has not fired yet.
    pub fn is_armed(&self) -> bool {
        self.lock()
            .as_ref()
            .is_some_and(|pending| !pending.is_finished())
    }

    fn lock(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for DebounceScheduler {
    fn drop(&mut self) {
        let pending = self
            .pending
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(pending) = pending {
            pending.abort();
        }
    }
}
