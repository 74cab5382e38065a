//! # Loading Indicator
//!
//! A shared "something is in flight" flag that stays correct when several
//! async operations overlap.
//!
//! ```text
//!   login() ──── guard A ─────────────┐
//!   fetch_products() ── guard B ──────┼──┐
//!                                     │  │
//!   count:   0 ─► 1 ─► 2 ──────────► 1 ─► 0
//!   loading: false  true ───────────────► false
//! ```
//!
//! Each operation holds a [`LoadingGuard`]; dropping it (on success, error or
//! cancellation) decrements the count.

use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::watch;

#[derive(Debug)]
struct Inner {
    /// The flag is published while this lock is held so updates stay ordered.
    in_flight: Mutex<usize>,
    tx: watch::Sender<bool>,
}

impl Inner {
    fn count(&self) -> MutexGuard<'_, usize> {
        self.in_flight.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Reference-counted loading flag.
#[derive(Debug, Clone)]
pub struct LoadingTracker {
    inner: Arc<Inner>,
}

impl LoadingTracker {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        LoadingTracker {
            inner: Arc::new(Inner {
                in_flight: Mutex::new(0),
                tx,
            }),
        }
    }

    /// Marks one operation as started.
    pub fn begin(&self) -> LoadingGuard {
        let mut count = self.inner.count();
        *count += 1;
        if *count == 1 {
            self.inner.tx.send_replace(true);
        }
        drop(count);
        LoadingGuard {
            inner: self.inner.clone(),
        }
    }

    pub fn is_loading(&self) -> bool {
        *self.inner.tx.borrow()
    }

    pub fn in_flight(&self) -> usize {
        *self.inner.count()
    }

    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.inner.tx.subscribe()
    }
}

impl Default for LoadingTracker {
    fn default() -> Self {
        Self::new()
    }
}

/// Held for the duration of one operation.
#[derive(Debug)]
#[must_use = "loading ends as soon as the guard is dropped"]
pub struct LoadingGuard {
    inner: Arc<Inner>,
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        let mut count = self.inner.count();
        *count = count.saturating_sub(1);
        if *count == 0 {
            self.inner.tx.send_replace(false);
        }
    }
}
