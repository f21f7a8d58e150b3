//! Single-slot coalescing notification between two tasks
//!
//! One producer signals, one consumer drains. The slot only distinguishes
//! "nothing pending" from "something pending": any number of signals
//! before a drain are observed as one.

use core::future::poll_fn;
use core::sync::atomic::{AtomicU32, Ordering};
use core::task::Poll;

use embassy_sync::waitqueue::AtomicWaker;

pub struct Notification {
    pending: AtomicU32,
    waker: AtomicWaker,
}

impl Notification {
    pub const fn new() -> Self {
        Self {
            pending: AtomicU32::new(0),
            waker: AtomicWaker::new(),
        }
    }

    /// Mark the slot pending and wake the consumer, if any
    ///
    /// Never blocks. With no consumer waiting the signal stays pending.
    pub fn signal(&self) {
        // Saturating so a long burst can't wrap back to zero
        let _ = self
            .pending
            .fetch_update(Ordering::Release, Ordering::Relaxed, |count| {
                Some(count.saturating_add(1))
            });

        self.waker.wake();
    }

    /// Wait until the slot is pending, then drain it
    ///
    /// Only returns once a pending signal was taken, so there is nothing to
    /// report. Every signal raised before the return is consumed with it.
    pub async fn wait(&self) {
        poll_fn(|cx| {
            self.waker.register(cx.waker());

            if self.try_take() {
                Poll::Ready(())
            } else {
                Poll::Pending
            }
        })
        .await
    }

    /// Drain the slot without waiting; `true` if anything was pending
    pub fn try_take(&self) -> bool {
        self.pending.swap(0, Ordering::Acquire) > 0
    }

    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::Relaxed) > 0
    }
}

impl Default for Notification {
    fn default() -> Self {
        Self::new()
    }
}
