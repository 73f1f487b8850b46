//! Removal scheduler: purges dismissed toasts after a grace period
//!
//! Dismissal only hides a toast. Its record stays in the store for
//! [`REMOVE_DELAY`] so a view can play its exit animation, then a REMOVE is
//! dispatched for it. At most one timer is pending per id; scheduling again
//! while one is pending does nothing.

use std::collections::HashMap;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::AbortHandle;

use crate::id::ToastId;
use crate::timer::{spawn_timer, TimerEvent};

/// Grace period between dismissal and removal.
pub const REMOVE_DELAY: Duration = Duration::from_millis(1000);

struct PendingRemoval {
    ticket: u64,
    handle: AbortHandle,
}

/// Pending-removal timers keyed by toast id.
pub struct RemovalScheduler {
    pending: HashMap<ToastId, PendingRemoval>,
    next_ticket: u64,
    timer_tx: mpsc::UnboundedSender<TimerEvent>,
}

impl RemovalScheduler {
    /// Create a scheduler reporting expiries on `timer_tx`.
    pub fn new(timer_tx: mpsc::UnboundedSender<TimerEvent>) -> Self {
        Self {
            pending: HashMap::new(),
            next_ticket: 0,
            timer_tx,
        }
    }

    /// Arm the grace timer for `id`.
    ///
    /// Returns `false` if a timer for `id` is already pending.
    pub fn schedule(&mut self, id: ToastId) -> bool {
        if self.pending.contains_key(&id) {
            return false;
        }

        self.next_ticket += 1;
        let ticket = self.next_ticket;
        let handle = spawn_timer(
            REMOVE_DELAY,
            TimerEvent::RemovalDue {
                id: id.clone(),
                ticket,
            },
            self.timer_tx.clone(),
        );
        tracing::trace!(toast = %id, ticket, "Removal scheduled");
        self.pending.insert(id, PendingRemoval { ticket, handle });
        true
    }

    /// Cancel the pending timer for `id`, if any.
    pub fn cancel(&mut self, id: &ToastId) -> bool {
        match self.pending.remove(id) {
            Some(pending) => {
                pending.handle.abort();
                tracing::trace!(toast = %id, "Removal cancelled");
                true
            }
            None => false,
        }
    }

    /// Accept a fired timer.
    ///
    /// Clears the handle and returns `true` only if `ticket` is the timer
    /// currently pending for `id`.
    pub fn claim(&mut self, id: &ToastId, ticket: u64) -> bool {
        match self.pending.get(id) {
            Some(pending) if pending.ticket == ticket => {
                self.pending.remove(id);
                true
            }
            _ => false,
        }
    }

    pub fn is_pending(&self, id: &ToastId) -> bool {
        self.pending.contains_key(id)
    }

    /// Cancel all pending timers.
    pub fn cancel_all(&mut self) {
        for (_, pending) in self.pending.drain() {
            pending.handle.abort();
        }
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl Drop for RemovalScheduler {
    fn drop(&mut self) {
        self.cancel_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::Instant;

    #[tokio::test(start_paused = true)]
    async fn test_fires_after_delay() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut scheduler = RemovalScheduler::new(tx);
        let id = ToastId::from("1");

        let start = Instant::now();
        assert!(scheduler.schedule(id.clone()));

        let event = rx.recv().await.unwrap();
        let elapsed = start.elapsed();
        assert!(elapsed >= REMOVE_DELAY && elapsed < REMOVE_DELAY + Duration::from_millis(5));

        let (fired, ticket) = match event {
            TimerEvent::RemovalDue { id, ticket } => (id, ticket),
            other => panic!("unexpected event {other:?}"),
        };
        assert_eq!(fired, id);
        assert!(scheduler.claim(&id, ticket));
        assert!(!scheduler.is_pending(&id));
    }

    #[tokio::test(start_paused = true)]
    async fn test_schedule_is_idempotent() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut scheduler = RemovalScheduler::new(tx);
        let id = ToastId::from("1");

        assert!(scheduler.schedule(id.clone()));
        assert!(!scheduler.schedule(id.clone()));
        assert_eq!(scheduler.len(), 1);

        rx.recv().await.unwrap();
        let second = tokio::time::timeout(Duration::from_secs(10), rx.recv()).await;
        assert!(second.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_suppresses_event() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut scheduler = RemovalScheduler::new(tx);
        let id = ToastId::from("1");

        scheduler.schedule(id.clone());
        assert!(scheduler.cancel(&id));
        assert!(!scheduler.cancel(&id));
        assert!(scheduler.is_empty());

        let result = tokio::time::timeout(Duration::from_secs(10), rx.recv()).await;
        assert!(result.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_ticket_is_rejected() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut scheduler = RemovalScheduler::new(tx);
        let id = ToastId::from("1");

        scheduler.schedule(id.clone());
        scheduler.cancel(&id);
        scheduler.schedule(id.clone());

        // Ticket 1 belonged to the cancelled timer
        assert!(!scheduler.claim(&id, 1));
        assert!(scheduler.is_pending(&id));
        assert!(scheduler.claim(&id, 2));
    }
}
