//! Toast runtime: the single owner of the store and its timers
//!
//! [`ToastRuntime`] wires the pieces together. Commands from [`Toaster`]
//! handles and expiries from the timer tasks arrive on two channels and are
//! applied one at a time. After each dispatch the runtime executes the
//! reducer's effects on the [`RemovalScheduler`] and, if the state changed,
//! re-arms the auto-dismiss timers.
//!
//! The runtime spawns timer tasks, so it must be driven from inside a tokio
//! runtime.
//!
//! # Example
//!
//! ```no_run
//! use toast_dispatch_core::{DefaultToastOptions, ToastOptions, ToastRuntime};
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn demo() {
//! let mut runtime = ToastRuntime::new(DefaultToastOptions::default());
//! let toaster = runtime.toaster();
//! let cancel = CancellationToken::new();
//!
//! toaster.success("Saved", ToastOptions::default());
//! runtime.run(cancel).await;
//! # }
//! ```

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::action::ToastAction;
use crate::auto_dismiss::AutoDismissCoordinator;
use crate::effect::ToastEffect;
use crate::id::{IdGenerator, ToastId};
use crate::options::DefaultToastOptions;
use crate::reducer::ToastState;
use crate::removal::RemovalScheduler;
use crate::store::{LoggingMiddleware, Middleware, SubscriptionId, ToastStore};
use crate::timer::TimerEvent;
use crate::toast::Toast;
use crate::toaster::Toaster;
use crate::view::ToasterView;

enum Incoming {
    Command(ToastAction),
    Timer(TimerEvent),
}

/// Owns the toast store, the removal scheduler and the auto-dismiss timers.
pub struct ToastRuntime<M: Middleware<ToastAction> = LoggingMiddleware> {
    store: ToastStore<M>,
    options: DefaultToastOptions,
    removals: RemovalScheduler,
    auto_dismiss: AutoDismissCoordinator,
    command_tx: mpsc::UnboundedSender<ToastAction>,
    command_rx: mpsc::UnboundedReceiver<ToastAction>,
    timer_rx: mpsc::UnboundedReceiver<TimerEvent>,
    ids: Arc<IdGenerator>,
}

impl ToastRuntime<LoggingMiddleware> {
    /// Create a runtime that logs every action at debug level.
    pub fn new(options: DefaultToastOptions) -> Self {
        Self::with_middleware(options, LoggingMiddleware)
    }
}

impl<M: Middleware<ToastAction>> ToastRuntime<M> {
    pub fn with_middleware(options: DefaultToastOptions, middleware: M) -> Self {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (timer_tx, timer_rx) = mpsc::unbounded_channel();

        Self {
            store: ToastStore::with_middleware(middleware),
            options,
            removals: RemovalScheduler::new(timer_tx.clone()),
            auto_dismiss: AutoDismissCoordinator::new(timer_tx),
            command_tx,
            command_rx,
            timer_rx,
            ids: Arc::new(IdGenerator::new()),
        }
    }

    /// A new handle for raising toasts on this runtime.
    pub fn toaster(&self) -> Toaster {
        Toaster::new(self.command_tx.clone(), Arc::clone(&self.ids))
    }

    pub fn state(&self) -> &ToastState {
        self.store.state()
    }

    /// Register a callback invoked after every dispatch.
    pub fn subscribe<F>(&mut self, subscriber: F) -> SubscriptionId
    where
        F: FnMut(&ToastState) + Send + 'static,
    {
        self.store.subscribe(subscriber)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.store.unsubscribe(id)
    }

    pub fn middleware(&self) -> &M {
        self.store.middleware()
    }

    pub fn options(&self) -> &DefaultToastOptions {
        &self.options
    }

    /// Replace the defaults. Running countdowns are re-armed under the new
    /// durations.
    pub fn set_options(&mut self, options: DefaultToastOptions) {
        self.options = options;
        self.resync();
    }

    /// Current toasts with every default applied, newest first.
    pub fn snapshot(&self) -> Vec<Toast> {
        self.store
            .state()
            .toasts
            .iter()
            .map(|toast| self.options.merge(toast))
            .collect()
    }

    /// Snapshot for a view, bundled with handlers that talk back to this
    /// runtime.
    pub fn view(&self) -> ToasterView {
        ToasterView::new(self.snapshot(), self.store.state().paused_at, self.toaster())
    }

    /// Dispatch `action` and carry out its effects.
    ///
    /// Returns whether the state changed.
    pub fn dispatch(&mut self, action: ToastAction) -> bool {
        let result = self.store.dispatch(action);

        for effect in result.effects {
            match effect {
                ToastEffect::ScheduleRemoval(id) => {
                    self.removals.schedule(id);
                }
                ToastEffect::CancelRemoval(id) => {
                    self.removals.cancel(&id);
                }
            }
        }

        if result.changed {
            self.resync();
        }
        result.changed
    }

    fn resync(&mut self) {
        let state = self.store.state();
        let merged: Vec<Toast> = state
            .toasts
            .iter()
            .map(|toast| self.options.merge(toast))
            .collect();
        let overdue = self
            .auto_dismiss
            .sync(&merged, state.is_paused(), Instant::now());

        for id in overdue {
            tracing::debug!(toast = %id, "Toast overstayed its duration, dismissing");
            self.dispatch(ToastAction::Dismiss(Some(id)));
        }
    }

    fn handle_timer(&mut self, event: TimerEvent) {
        match event {
            TimerEvent::RemovalDue { id, ticket } => {
                if self.removals.claim(&id, ticket) {
                    self.dispatch(ToastAction::Remove(Some(id)));
                } else {
                    tracing::trace!(toast = %id, ticket, "Ignoring stale removal timer");
                }
            }
            TimerEvent::DismissDue { id, generation } => {
                if self.auto_dismiss.claim(&id, generation) {
                    self.dispatch(ToastAction::Dismiss(Some(id)));
                } else {
                    tracing::trace!(toast = %id, generation, "Ignoring stale auto-dismiss timer");
                }
            }
        }
    }

    fn handle(&mut self, incoming: Incoming) {
        match incoming {
            Incoming::Command(action) => {
                self.dispatch(action);
            }
            Incoming::Timer(event) => self.handle_timer(event),
        }
    }

    /// Apply every command and timer event that is already queued.
    ///
    /// Returns how many were handled.
    pub fn process_pending(&mut self) -> usize {
        let mut handled = 0;
        loop {
            let incoming = if let Ok(action) = self.command_rx.try_recv() {
                Incoming::Command(action)
            } else if let Ok(event) = self.timer_rx.try_recv() {
                Incoming::Timer(event)
            } else {
                return handled;
            };
            self.handle(incoming);
            handled += 1;
        }
    }

    /// Wait for the next command or timer event and apply it.
    ///
    /// Cancel safe: dropping the future before it resolves loses nothing.
    /// Returns `false` once both channels are closed.
    pub async fn next(&mut self) -> bool {
        let incoming = tokio::select! {
            biased;
            Some(action) = self.command_rx.recv() => Incoming::Command(action),
            Some(event) = self.timer_rx.recv() => Incoming::Timer(event),
            else => return false,
        };
        self.handle(incoming);
        true
    }

    /// Drive the runtime until `deadline`, then apply whatever is queued.
    pub async fn run_until(&mut self, deadline: Instant) {
        let sleep = tokio::time::sleep_until(deadline);
        tokio::pin!(sleep);
        loop {
            tokio::select! {
                _ = &mut sleep => break,
                more = self.next() => {
                    if !more {
                        break;
                    }
                }
            }
        }
        self.process_pending();
    }

    /// Drive the runtime until `cancel` fires.
    pub async fn run(&mut self, cancel: CancellationToken) {
        tracing::debug!("Toast runtime started");
        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                more = self.next() => {
                    if !more {
                        break;
                    }
                }
            }
        }
        tracing::debug!(toasts = self.store.state().len(), "Toast runtime stopped");
    }

    /// Whether a removal timer is pending for `id`.
    pub fn removal_pending(&self, id: &ToastId) -> bool {
        self.removals.is_pending(id)
    }

    /// Whether an auto-dismiss timer is armed for `id`.
    pub fn auto_dismiss_armed(&self, id: &ToastId) -> bool {
        self.auto_dismiss.is_armed(id)
    }

    /// Number of live timers of both kinds.
    pub fn live_timers(&self) -> usize {
        self.removals.len() + self.auto_dismiss.len()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::store::NoopMiddleware;
    use crate::toast::{ToastDuration, ToastOptions};

    fn runtime() -> ToastRuntime<NoopMiddleware> {
        ToastRuntime::with_middleware(DefaultToastOptions::default(), NoopMiddleware)
    }

    #[tokio::test(start_paused = true)]
    async fn test_process_pending_applies_commands() {
        let mut runtime = runtime();
        let toaster = runtime.toaster();

        let id = toaster.success("Saved", ToastOptions::default());
        toaster.info("Heads up", ToastOptions::default());

        assert_eq!(runtime.process_pending(), 2);
        assert_eq!(runtime.state().len(), 2);
        assert!(runtime.auto_dismiss_armed(&id));
        assert_eq!(runtime.process_pending(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dismiss_schedules_removal() {
        let mut runtime = runtime();
        let toaster = runtime.toaster();

        let id = toaster.success("Saved", ToastOptions::default());
        toaster.dismiss(&id);
        runtime.process_pending();

        assert!(!runtime.state().toasts[0].visible);
        assert!(runtime.removal_pending(&id));
        assert!(!runtime.auto_dismiss_armed(&id));
    }

    #[tokio::test(start_paused = true)]
    async fn test_pause_disarms_timers() {
        let mut runtime = runtime();
        let toaster = runtime.toaster();

        toaster.success("a", ToastOptions::default());
        toaster.start_pause();
        runtime.process_pending();
        assert_eq!(runtime.live_timers(), 0);

        toaster.end_pause();
        runtime.process_pending();
        assert_eq!(runtime.live_timers(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_overdue_toast_dismissed_on_resync() {
        let mut runtime = runtime();
        let toaster = runtime.toaster();

        let id = toaster.success("Saved", ToastOptions::default());
        runtime.process_pending();

        // The clock moves on without the runtime handling anything, then the
        // duration is shortened below the time already spent
        tokio::time::advance(Duration::from_millis(3000)).await;
        runtime.set_options(DefaultToastOptions::default().with_global(
            ToastOptions::default().with_duration(ToastDuration::from_millis(1000)),
        ));

        assert!(!runtime.state().get(&id).unwrap().visible);
        assert!(runtime.removal_pending(&id));
        assert!(!runtime.auto_dismiss_armed(&id));
    }

    #[tokio::test(start_paused = true)]
    async fn test_set_options_rearms_timers() {
        let mut runtime = runtime();
        let toaster = runtime.toaster();

        let id = toaster.loading("Working", ToastOptions::default());
        runtime.process_pending();
        assert!(!runtime.auto_dismiss_armed(&id));

        runtime.set_options(DefaultToastOptions::default().with_type(
            crate::toast::ToastType::Loading,
            ToastOptions::default().with_duration(ToastDuration::from_millis(2000)),
        ));
        assert!(runtime.auto_dismiss_armed(&id));
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_until_fires_timers() {
        let mut runtime = runtime();
        let toaster = runtime.toaster();

        let id = toaster.success("Saved", ToastOptions::default());
        let start = Instant::now();
        runtime.run_until(start + Duration::from_millis(4500)).await;

        let toast = runtime.state().get(&id).unwrap();
        assert!(!toast.visible);
        assert!(runtime.removal_pending(&id));

        runtime.run_until(start + Duration::from_millis(5500)).await;
        assert!(runtime.state().is_empty());
        assert_eq!(runtime.live_timers(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_stops_on_cancel() {
        let mut runtime = runtime();
        let cancel = CancellationToken::new();
        cancel.cancel();
        runtime.run(cancel).await;
        assert!(runtime.state().is_empty());
    }
}
