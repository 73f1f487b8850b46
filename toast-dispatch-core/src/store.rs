//! Toast store: reducer, middleware and subscribers

use std::collections::BTreeMap;

use crate::action::{Action, ToastAction};
use crate::effect::{DispatchResult, ToastEffect};
use crate::reducer::{reducer, ToastState};

/// Callback invoked with the new state after every dispatch.
pub type Subscriber = Box<dyn FnMut(&ToastState) + Send>;

/// Handle returned by [`ToastStore::subscribe`], used to unsubscribe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

/// Centralized toast state with Redux-like dispatch
///
/// All mutation goes through [`dispatch`](Self::dispatch), which runs the
/// middleware, applies the reducer and then calls every subscriber in
/// subscription order. The store does no timer work itself; it hands the
/// reducer's effects back to the caller.
///
/// # Example
/// ```
/// use toast_dispatch_core::{create_toast, IdGenerator, ToastAction, ToastOptions, ToastStore, ToastType};
///
/// let ids = IdGenerator::new();
/// let mut store = ToastStore::new();
/// let toast = create_toast("Saved", ToastType::Success, ToastOptions::default(), &ids);
///
/// let result = store.dispatch(ToastAction::Upsert(toast));
/// assert!(result.changed);
/// assert_eq!(store.state().toasts.len(), 1);
/// ```
pub struct ToastStore<M: Middleware<ToastAction> = NoopMiddleware> {
    state: ToastState,
    middleware: M,
    subscribers: BTreeMap<SubscriptionId, Subscriber>,
    next_subscription: u64,
}

impl ToastStore<NoopMiddleware> {
    /// Create an empty store without middleware
    pub fn new() -> Self {
        Self::with_middleware(NoopMiddleware)
    }
}

impl Default for ToastStore<NoopMiddleware> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: Middleware<ToastAction>> ToastStore<M> {
    /// Create an empty store with middleware
    pub fn with_middleware(middleware: M) -> Self {
        Self {
            state: ToastState::default(),
            middleware,
            subscribers: BTreeMap::new(),
            next_subscription: 0,
        }
    }

    /// Dispatch an action through middleware, reducer and subscribers
    pub fn dispatch(&mut self, action: ToastAction) -> DispatchResult<ToastEffect> {
        self.middleware.before(&action);
        let result = reducer(&mut self.state, action.clone());
        self.middleware.after(&action, result.changed);

        for subscriber in self.subscribers.values_mut() {
            subscriber(&self.state);
        }
        result
    }

    /// Get a reference to the current state
    pub fn state(&self) -> &ToastState {
        &self.state
    }

    /// Register a callback for state changes
    pub fn subscribe<F>(&mut self, subscriber: F) -> SubscriptionId
    where
        F: FnMut(&ToastState) + Send + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.insert(id, Box::new(subscriber));
        id
    }

    /// Remove a subscriber. Returns `false` if the handle was unknown.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.remove(&id).is_some()
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Get a reference to the middleware
    pub fn middleware(&self) -> &M {
        &self.middleware
    }

    /// Get a mutable reference to the middleware
    pub fn middleware_mut(&mut self) -> &mut M {
        &mut self.middleware
    }
}

/// Hook around every dispatch.
///
/// `after` sees the action together with whether the reducer changed the
/// state. Runs on the runtime's task, so keep it cheap.
pub trait Middleware<A: Action> {
    fn before(&mut self, _action: &A) {}

    fn after(&mut self, action: &A, state_changed: bool);
}

/// Middleware that ignores every action.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopMiddleware;

impl<A: Action> Middleware<A> for NoopMiddleware {
    fn after(&mut self, _action: &A, _state_changed: bool) {}
}

/// Logs each applied toast action at debug level, tagged with the toast it
/// targets.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingMiddleware;

impl Middleware<ToastAction> for LoggingMiddleware {
    fn after(&mut self, action: &ToastAction, state_changed: bool) {
        match action.target() {
            Some(id) => tracing::debug!(
                action = action.name(),
                toast = %id,
                state_changed,
                "Toast action applied"
            ),
            None => tracing::debug!(action = action.name(), state_changed, "Toast action applied"),
        }
    }
}
