//! Last-request-wins coalescing for bursts of requests.
//!
//! ## Learning: Atomics as tickets
//!
//! Every submission takes a ticket from a shared `AtomicU64` and sleeps for
//! the window. When it wakes, a ticket that is no longer the latest means a
//! newer request arrived in the meantime, so the stale one returns `None`
//! without running. No lock is held across the `.await`.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::trace;

/// Coalesces rapid requests so only the newest one in a window runs.
///
/// Clones share the same ticket counter.
#[derive(Debug, Clone)]
pub struct Debouncer {
    window: Duration,
    generation: Arc<AtomicU64>,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Waits out the window, then runs `request` unless a newer submission
    /// arrived. Superseded requests resolve to `None`.
    pub async fn submit<T, F>(&self, request: F) -> Option<T>
    where
        F: FnOnce() -> T,
    {
        let ticket = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        if !self.window.is_zero() {
            tokio::time::sleep(self.window).await;
        }

        let latest = self.generation.load(Ordering::SeqCst);
        if latest != ticket {
            trace!(ticket, latest, "Request superseded");
            return None;
        }
        Some(request())
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(Duration::from_millis(150))
    }
}
