//! Auto-dismiss coordinator
//!
//! Every time the toast list or the pause state changes, all auto-dismiss
//! timers are dropped and re-armed from scratch against the current clock:
//!
//! ```text
//! left = duration + pause_duration - (now - created_at)
//! ```
//!
//! Toasts that already overstayed are reported back for immediate dismissal
//! when still visible. Nothing is armed while the clock is paused.

use std::collections::HashMap;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::AbortHandle;
use tokio::time::Instant;

use crate::id::ToastId;
use crate::timer::{spawn_timer, TimerEvent};
use crate::toast::Toast;

/// Where a toast stands relative to its time-to-live.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Expiry {
    /// Time left before the toast should be dismissed.
    Remaining(Duration),
    /// The toast has outlived its duration.
    Overdue,
}

/// Expiry of `toast` at `now`, or `None` when it never auto-dismisses.
///
/// `toast` is expected to carry its resolved duration (see
/// [`DefaultToastOptions::merge`](crate::DefaultToastOptions::merge)).
pub fn expiry(toast: &Toast, now: Instant) -> Option<Expiry> {
    if !toast.auto_closes() {
        return None;
    }
    let duration = toast.effective_duration().as_finite()?;

    let budget = duration + toast.pause_duration;
    let elapsed = now.saturating_duration_since(toast.created_at);
    Some(match budget.checked_sub(elapsed) {
        Some(left) => Expiry::Remaining(left),
        None => Expiry::Overdue,
    })
}

/// Auto-dismiss timers keyed by toast id.
pub struct AutoDismissCoordinator {
    timers: HashMap<ToastId, AbortHandle>,
    generation: u64,
    timer_tx: mpsc::UnboundedSender<TimerEvent>,
}

impl AutoDismissCoordinator {
    pub fn new(timer_tx: mpsc::UnboundedSender<TimerEvent>) -> Self {
        Self {
            timers: HashMap::new(),
            generation: 0,
            timer_tx,
        }
    }

    /// Drop every timer and re-arm them for `toasts`.
    ///
    /// Returns the visible toasts that are already overdue; the caller
    /// dismisses them.
    pub fn sync(&mut self, toasts: &[Toast], paused: bool, now: Instant) -> Vec<ToastId> {
        self.cancel_all();
        self.generation += 1;

        if paused {
            tracing::trace!("Clock paused, no auto-dismiss timers armed");
            return Vec::new();
        }

        let mut overdue = Vec::new();
        for toast in toasts {
            match expiry(toast, now) {
                None => {}
                Some(Expiry::Overdue) => {
                    if toast.visible {
                        overdue.push(toast.id.clone());
                    }
                }
                Some(Expiry::Remaining(left)) => {
                    let handle = spawn_timer(
                        left,
                        TimerEvent::DismissDue {
                            id: toast.id.clone(),
                            generation: self.generation,
                        },
                        self.timer_tx.clone(),
                    );
                    self.timers.insert(toast.id.clone(), handle);
                }
            }
        }

        tracing::trace!(
            armed = self.timers.len(),
            overdue = overdue.len(),
            generation = self.generation,
            "Auto-dismiss timers re-armed"
        );
        overdue
    }

    /// Accept a fired timer if it belongs to the current generation.
    pub fn claim(&mut self, id: &ToastId, generation: u64) -> bool {
        generation == self.generation && self.timers.remove(id).is_some()
    }

    pub fn is_armed(&self, id: &ToastId) -> bool {
        self.timers.contains_key(id)
    }

    pub fn cancel_all(&mut self) {
        for (_, handle) in self.timers.drain() {
            handle.abort();
        }
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }
}

impl Drop for AutoDismissCoordinator {
    fn drop(&mut self) {
        self.cancel_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::IdGenerator;
    use crate::toast::{create_toast, ToastDuration, ToastOptions, ToastType};

    fn toast_with(ids: &IdGenerator, kind: ToastType, options: ToastOptions) -> Toast {
        create_toast("x", kind, options, ids)
    }

    #[tokio::test(start_paused = true)]
    async fn test_expiry_accounts_for_pause() {
        let ids = IdGenerator::new();
        let mut toast = toast_with(
            &ids,
            ToastType::Success,
            ToastOptions::default().with_duration(ToastDuration::from_millis(1000)),
        );
        let created = toast.created_at;

        assert_eq!(
            expiry(&toast, created + Duration::from_millis(400)),
            Some(Expiry::Remaining(Duration::from_millis(600)))
        );

        toast.pause_duration = Duration::from_millis(500);
        assert_eq!(
            expiry(&toast, created + Duration::from_millis(1200)),
            Some(Expiry::Remaining(Duration::from_millis(300)))
        );
        assert_eq!(
            expiry(&toast, created + Duration::from_millis(1500)),
            Some(Expiry::Remaining(Duration::ZERO))
        );
        assert_eq!(
            expiry(&toast, created + Duration::from_millis(1501)),
            Some(Expiry::Overdue)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_expiry_skips_infinite_and_manual() {
        let ids = IdGenerator::new();
        let now = Instant::now();

        let loading = toast_with(&ids, ToastType::Loading, ToastOptions::default());
        assert_eq!(expiry(&loading, now), None);

        let manual = toast_with(
            &ids,
            ToastType::Success,
            ToastOptions::default().with_auto_close(false),
        );
        assert_eq!(expiry(&manual, now), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sync_arms_and_fires() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut coordinator = AutoDismissCoordinator::new(tx);
        let ids = IdGenerator::new();
        let toast = toast_with(
            &ids,
            ToastType::Error,
            ToastOptions::default().with_duration(ToastDuration::from_millis(250)),
        );

        let start = Instant::now();
        let overdue = coordinator.sync(std::slice::from_ref(&toast), false, start);
        assert!(overdue.is_empty());
        assert!(coordinator.is_armed(&toast.id));

        let event = rx.recv().await.unwrap();
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(250) && elapsed < Duration::from_millis(255));

        let (id, generation) = match event {
            TimerEvent::DismissDue { id, generation } => (id, generation),
            other => panic!("unexpected event {other:?}"),
        };
        assert!(coordinator.claim(&id, generation));
        assert!(!coordinator.claim(&id, generation));
    }

    #[tokio::test(start_paused = true)]
    async fn test_sync_while_paused_arms_nothing() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut coordinator = AutoDismissCoordinator::new(tx);
        let ids = IdGenerator::new();
        let toast = toast_with(&ids, ToastType::Success, ToastOptions::default());

        coordinator.sync(std::slice::from_ref(&toast), false, Instant::now());
        assert_eq!(coordinator.len(), 1);

        let overdue = coordinator.sync(std::slice::from_ref(&toast), true, Instant::now());
        assert!(overdue.is_empty());
        assert!(coordinator.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_resync_invalidates_previous_generation() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut coordinator = AutoDismissCoordinator::new(tx);
        let ids = IdGenerator::new();
        let toast = toast_with(&ids, ToastType::Success, ToastOptions::default());
        let toasts = std::slice::from_ref(&toast);

        coordinator.sync(toasts, false, Instant::now());
        coordinator.sync(toasts, false, Instant::now());

        assert!(!coordinator.claim(&toast.id, 1));
        assert!(coordinator.claim(&toast.id, 2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_overdue_reports_only_visible() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut coordinator = AutoDismissCoordinator::new(tx);
        let ids = IdGenerator::new();
        let short = ToastOptions::default().with_duration(ToastDuration::from_millis(10));

        let visible = toast_with(&ids, ToastType::Success, short.clone());
        let mut hidden = toast_with(&ids, ToastType::Success, short);
        hidden.visible = false;

        let later = Instant::now() + Duration::from_millis(50);
        let overdue = coordinator.sync(&[visible.clone(), hidden], false, later);

        assert_eq!(overdue, vec![visible.id]);
        assert!(coordinator.is_empty());
    }
}
