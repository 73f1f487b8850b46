//! Test utilities for toast engines
//!
//! [`RecordingMiddleware`] captures every action a store dispatches so tests
//! can assert on timer-driven dispatches (dismissals, removals) that never
//! pass through a caller. The assertion macros work on any slice of actions.
//!
//! With the `testing-time` feature, [`pause_time`], [`advance_time`] and
//! [`resume_time`] drive tokio's simulated clock.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::action::Action;
use crate::store::Middleware;

/// Middleware that records every dispatched action.
///
/// Clones share the same log, so a test can keep one handle while the
/// runtime owns the other.
///
/// # Example
///
/// ```
/// use toast_dispatch_core::testing::RecordingMiddleware;
/// use toast_dispatch_core::{ToastAction, ToastStore};
///
/// let recorder = RecordingMiddleware::new();
/// let mut store = ToastStore::with_middleware(recorder.clone());
/// store.dispatch(ToastAction::Dismiss(None));
///
/// assert_eq!(recorder.actions().len(), 1);
/// ```
#[derive(Debug)]
pub struct RecordingMiddleware<A> {
    log: Arc<Mutex<Vec<Recorded<A>>>>,
}

/// One dispatched action together with whether it changed the state.
#[derive(Clone, Debug)]
pub struct Recorded<A> {
    pub action: A,
    pub changed: bool,
}

impl<A> Clone for RecordingMiddleware<A> {
    fn clone(&self) -> Self {
        Self {
            log: Arc::clone(&self.log),
        }
    }
}

impl<A> Default for RecordingMiddleware<A> {
    fn default() -> Self {
        Self {
            log: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl<A: Clone> RecordingMiddleware<A> {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Recorded<A>>> {
        self.log.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Actions dispatched so far, in dispatch order.
    pub fn actions(&self) -> Vec<A> {
        self.lock().iter().map(|r| r.action.clone()).collect()
    }

    /// Actions that changed the state.
    pub fn changes(&self) -> Vec<A> {
        self.lock()
            .iter()
            .filter(|r| r.changed)
            .map(|r| r.action.clone())
            .collect()
    }

    /// Take every recorded entry, leaving the log empty.
    pub fn drain(&self) -> Vec<Recorded<A>> {
        std::mem::take(&mut *self.lock())
    }

    pub fn clear(&self) {
        self.lock().clear();
    }
}

impl<A: Action> Middleware<A> for RecordingMiddleware<A> {
    fn after(&mut self, action: &A, state_changed: bool) {
        self.lock().push(Recorded {
            action: action.clone(),
            changed: state_changed,
        });
    }
}

/// Assert that an action matching a pattern was dispatched.
///
/// # Example
///
/// ```
/// use toast_dispatch_core::{assert_dispatched, ToastAction};
///
/// let actions = vec![ToastAction::Dismiss(None)];
/// assert_dispatched!(actions, ToastAction::Dismiss(None));
/// ```
#[macro_export]
macro_rules! assert_dispatched {
    ($actions:expr, $pattern:pat $(if $guard:expr)?) => {
        assert!(
            $actions.iter().any(|a| matches!(a, $pattern $(if $guard)?)),
            "Expected action matching `{}` to be dispatched, but got: {:?}",
            stringify!($pattern),
            $actions
        );
    };
}

/// Assert that no action matching a pattern was dispatched.
#[macro_export]
macro_rules! assert_not_dispatched {
    ($actions:expr, $pattern:pat $(if $guard:expr)?) => {
        assert!(
            !$actions.iter().any(|a| matches!(a, $pattern $(if $guard)?)),
            "Expected action matching `{}` NOT to be dispatched, but it was: {:?}",
            stringify!($pattern),
            $actions
        );
    };
}

/// Count how many dispatched actions match a pattern.
///
/// # Example
///
/// ```
/// use toast_dispatch_core::{count_dispatched, ToastAction};
///
/// let actions = vec![ToastAction::Remove(None), ToastAction::Dismiss(None)];
/// assert_eq!(count_dispatched!(actions, ToastAction::Remove(_)), 1);
/// ```
#[macro_export]
macro_rules! count_dispatched {
    ($actions:expr, $pattern:pat $(if $guard:expr)?) => {
        $actions.iter().filter(|a| matches!(a, $pattern $(if $guard)?)).count()
    };
}

/// Freeze tokio's clock. Must run inside a current-thread runtime.
#[cfg(feature = "testing-time")]
pub fn pause_time() {
    tokio::time::pause();
}

/// Move the frozen clock forward, firing every timer that comes due.
#[cfg(feature = "testing-time")]
pub async fn advance_time(duration: std::time::Duration) {
    tokio::time::advance(duration).await;
}

#[cfg(feature = "testing-time")]
pub fn resume_time() {
    tokio::time::resume();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::ToastAction;
    use crate::id::ToastId;
    use crate::store::ToastStore;

    #[test]
    fn test_recorder_shares_log_between_clones() {
        let recorder = RecordingMiddleware::new();
        let mut store = ToastStore::with_middleware(recorder.clone());

        store.dispatch(ToastAction::Remove(Some(ToastId::from("1"))));
        store.dispatch(ToastAction::Dismiss(None));

        let actions = recorder.actions();
        assert_eq!(actions.len(), 2);
        assert_dispatched!(actions, ToastAction::Remove(Some(_)));
        assert_not_dispatched!(actions, ToastAction::Add(_));
        assert!(recorder.changes().is_empty());
    }

    #[test]
    fn test_drain_empties_log() {
        let recorder = RecordingMiddleware::new();
        let mut store = ToastStore::with_middleware(recorder.clone());

        store.dispatch(ToastAction::Dismiss(None));
        let drained = recorder.drain();

        assert_eq!(drained.len(), 1);
        assert!(!drained[0].changed);
        assert!(recorder.actions().is_empty());
    }

    #[test]
    fn test_count_dispatched() {
        let actions = vec![
            ToastAction::Remove(Some(ToastId::from("1"))),
            ToastAction::Remove(Some(ToastId::from("2"))),
            ToastAction::Dismiss(None),
        ];
        assert_eq!(count_dispatched!(actions, ToastAction::Remove(_)), 2);
        assert_eq!(
            count_dispatched!(actions, ToastAction::Remove(Some(id)) if id.as_str() == "2"),
            1
        );
    }
}
