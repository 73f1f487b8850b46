//! Cloneable handle for creating and controlling toasts
//!
//! A [`Toaster`] never touches the store. Each call becomes a
//! [`ToastAction`] on the runtime's command channel, so requests from any
//! task are applied one at a time in the order they were sent.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::time::Instant;

use crate::action::{Action, ToastAction};
use crate::id::{IdGenerator, ToastId};
use crate::toast::{create_toast, Message, Renderable, ToastOptions, ToastPatch, ToastType};

/// Handle used by application code to raise and control toasts.
///
/// Obtained from [`ToastRuntime::toaster`](crate::ToastRuntime::toaster).
/// Creation calls return the toast's id right away; the toast itself appears
/// once the runtime processes the command.
#[derive(Clone, Debug)]
pub struct Toaster {
    command_tx: mpsc::UnboundedSender<ToastAction>,
    ids: Arc<IdGenerator>,
}

impl Toaster {
    pub(crate) fn new(command_tx: mpsc::UnboundedSender<ToastAction>, ids: Arc<IdGenerator>) -> Self {
        Self { command_tx, ids }
    }

    /// Raise a toast of `kind`.
    ///
    /// Text messages are trimmed. If `options` names the id of an existing
    /// toast, that toast is updated in place.
    pub fn create(
        &self,
        kind: ToastType,
        message: impl Into<Message>,
        options: ToastOptions,
    ) -> ToastId {
        let toast = create_toast(message.into().trimmed(), kind, options, &self.ids);
        let id = toast.id.clone();
        self.send(ToastAction::Upsert(toast));
        id
    }

    /// Raise a plain toast.
    pub fn notify(&self, message: impl Into<Message>, options: ToastOptions) -> ToastId {
        self.create(ToastType::Blank, message, options)
    }

    pub fn success(&self, message: impl Into<Message>, options: ToastOptions) -> ToastId {
        self.create(ToastType::Success, message, options)
    }

    pub fn error(&self, message: impl Into<Message>, options: ToastOptions) -> ToastId {
        self.create(ToastType::Error, message, options)
    }

    pub fn info(&self, message: impl Into<Message>, options: ToastOptions) -> ToastId {
        self.create(ToastType::Info, message, options)
    }

    pub fn warning(&self, message: impl Into<Message>, options: ToastOptions) -> ToastId {
        self.create(ToastType::Warning, message, options)
    }

    /// Raise a loading toast. It stays until updated or dismissed.
    pub fn loading(&self, message: impl Into<Message>, options: ToastOptions) -> ToastId {
        self.create(ToastType::Loading, message, options)
    }

    pub fn custom(&self, message: impl Into<Message>, options: ToastOptions) -> ToastId {
        self.create(ToastType::Custom, message, options)
    }

    /// Hide a toast; it is removed after the grace period.
    pub fn dismiss(&self, id: &ToastId) {
        self.send(ToastAction::Dismiss(Some(id.clone())));
    }

    pub fn dismiss_all(&self) {
        self.send(ToastAction::Dismiss(None));
    }

    /// Delete a toast immediately, skipping the exit grace period.
    pub fn remove(&self, id: &ToastId) {
        self.send(ToastAction::Remove(Some(id.clone())));
    }

    pub fn remove_all(&self) {
        self.send(ToastAction::Remove(None));
    }

    /// Merge `patch` into the toast with the same id.
    pub fn update(&self, patch: ToastPatch) {
        self.send(ToastAction::Update(patch));
    }

    /// Record the rendered height of a toast.
    pub fn update_height(&self, id: &ToastId, height: u32) {
        self.update(ToastPatch::new(id.clone()).with_height(height));
    }

    /// Freeze every auto-dismiss countdown.
    pub fn start_pause(&self) {
        self.send(ToastAction::StartPause(Instant::now()));
    }

    /// Resume the countdowns, extending each toast by the paused span.
    pub fn end_pause(&self) {
        self.send(ToastAction::EndPause(Instant::now()));
    }

    /// Track a fallible future with a single toast.
    ///
    /// A loading toast is raised immediately. When the returned future
    /// completes, the same toast turns into a success or error toast and the
    /// original result is handed back unchanged. Dropping the returned future
    /// before it completes leaves the loading toast in place.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # async fn demo(toaster: toast_dispatch_core::Toaster) {
    /// use toast_dispatch_core::{MessageResolver, PromiseMessages, PromiseOptions};
    ///
    /// let upload = async { Ok::<_, String>(3) };
    /// let files = toaster
    ///     .promise(
    ///         upload,
    ///         PromiseMessages::new(
    ///             "Uploading...",
    ///             MessageResolver::from_fn(|n: &u32| format!("Uploaded {n} files")),
    ///             MessageResolver::from_fn(|e: &String| format!("Upload failed: {e}")),
    ///         ),
    ///         PromiseOptions::default(),
    ///     )
    ///     .await;
    /// # }
    /// ```
    pub fn promise<T, E, F>(
        &self,
        future: F,
        messages: PromiseMessages<T, E>,
        options: PromiseOptions,
    ) -> impl Future<Output = Result<T, E>>
    where
        F: Future<Output = Result<T, E>>,
    {
        let PromiseMessages {
            loading,
            success,
            error,
        } = messages;
        let id = self.create(ToastType::Loading, loading, options.phase(ToastType::Loading));
        let toaster = self.clone();

        async move {
            let result = future.await;
            match &result {
                Ok(value) => {
                    toaster.create(
                        ToastType::Success,
                        success.resolve(value),
                        options.phase(ToastType::Success).with_id(id),
                    );
                }
                Err(err) => {
                    toaster.create(
                        ToastType::Error,
                        error.resolve(err),
                        options.phase(ToastType::Error).with_id(id),
                    );
                }
            }
            result
        }
    }

    fn send(&self, action: ToastAction) {
        if let Err(err) = self.command_tx.send(action) {
            tracing::warn!(
                action = %err.0.summary(),
                "Toast runtime is gone, dropping command"
            );
        }
    }
}

/// Message for a settled promise: fixed text, or derived from the outcome.
pub enum MessageResolver<A> {
    Text(Renderable),
    Resolver(Box<dyn FnOnce(&A) -> Renderable + Send>),
}

impl<A> MessageResolver<A> {
    /// Derive the message from the settled value.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: FnOnce(&A) -> Renderable + Send + 'static,
    {
        MessageResolver::Resolver(Box::new(f))
    }

    pub fn resolve(self, value: &A) -> Renderable {
        match self {
            MessageResolver::Text(text) => text,
            MessageResolver::Resolver(f) => f(value),
        }
    }
}

impl<A> std::fmt::Debug for MessageResolver<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MessageResolver::Text(text) => f.debug_tuple("Text").field(text).finish(),
            MessageResolver::Resolver(_) => f.write_str("Resolver(..)"),
        }
    }
}

impl<A> From<&str> for MessageResolver<A> {
    fn from(text: &str) -> Self {
        MessageResolver::Text(text.to_string())
    }
}

impl<A> From<String> for MessageResolver<A> {
    fn from(text: String) -> Self {
        MessageResolver::Text(text)
    }
}

/// Messages for the three phases of [`Toaster::promise`].
#[derive(Debug)]
pub struct PromiseMessages<T, E> {
    pub loading: Message,
    pub success: MessageResolver<T>,
    pub error: MessageResolver<E>,
}

impl<T, E> PromiseMessages<T, E> {
    pub fn new(
        loading: impl Into<Message>,
        success: impl Into<MessageResolver<T>>,
        error: impl Into<MessageResolver<E>>,
    ) -> Self {
        Self {
            loading: loading.into(),
            success: success.into(),
            error: error.into(),
        }
    }
}

/// Options for [`Toaster::promise`]: shared values plus per-phase overrides.
#[derive(Clone, Debug, Default)]
pub struct PromiseOptions {
    pub shared: ToastOptions,
    pub loading: Option<ToastOptions>,
    pub success: Option<ToastOptions>,
    pub error: Option<ToastOptions>,
}

impl PromiseOptions {
    pub fn new(shared: ToastOptions) -> Self {
        Self {
            shared,
            ..Self::default()
        }
    }

    pub fn with_phase(mut self, kind: ToastType, options: ToastOptions) -> Self {
        match kind {
            ToastType::Loading => self.loading = Some(options),
            ToastType::Success => self.success = Some(options),
            ToastType::Error => self.error = Some(options),
            _ => {}
        }
        self
    }

    /// Options for one phase: its overrides layered over the shared options.
    pub fn phase(&self, kind: ToastType) -> ToastOptions {
        let overrides = match kind {
            ToastType::Loading => self.loading.as_ref(),
            ToastType::Success => self.success.as_ref(),
            ToastType::Error => self.error.as_ref(),
            _ => None,
        };
        overrides.map_or_else(|| self.shared.clone(), |o| o.layered_over(&self.shared))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::toast::ToastDuration;

    fn toaster() -> (Toaster, mpsc::UnboundedReceiver<ToastAction>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Toaster::new(tx, Arc::new(IdGenerator::new())), rx)
    }

    fn upserted(rx: &mut mpsc::UnboundedReceiver<ToastAction>) -> crate::toast::Toast {
        match rx.try_recv() {
            Ok(ToastAction::Upsert(toast)) => toast,
            other => panic!("expected upsert, got {other:?}"),
        }
    }

    #[test]
    fn test_typed_calls_send_upserts() {
        let (toaster, mut rx) = toaster();

        let id = toaster.success("  Saved  ", ToastOptions::default());
        let toast = upserted(&mut rx);
        assert_eq!(toast.id, id);
        assert_eq!(toast.kind, ToastType::Success);
        assert_eq!(toast.resolved_message(), "Saved");

        toaster.warning("careful", ToastOptions::default());
        assert_eq!(upserted(&mut rx).kind, ToastType::Warning);

        toaster.notify("plain", ToastOptions::default());
        assert_eq!(upserted(&mut rx).kind, ToastType::Blank);
    }

    #[test]
    fn test_explicit_id_is_reused() {
        let (toaster, mut rx) = toaster();

        let id = toaster.loading("Working", ToastOptions::default().with_id("job"));
        assert_eq!(id.as_str(), "job");
        upserted(&mut rx);

        let again = toaster.success("Done", ToastOptions::default().with_id("job"));
        assert_eq!(again, id);
    }

    #[test]
    fn test_control_calls() {
        let (toaster, mut rx) = toaster();
        let id = ToastId::from("7");

        toaster.dismiss(&id);
        toaster.dismiss_all();
        toaster.remove(&id);
        toaster.remove_all();
        toaster.update_height(&id, 42);
        toaster.start_pause();
        toaster.end_pause();

        let actions: Vec<_> = std::iter::from_fn(|| rx.try_recv().ok()).collect();
        assert_eq!(actions.len(), 7);
        crate::assert_dispatched!(actions, ToastAction::Dismiss(Some(d)) if d.as_str() == "7");
        crate::assert_dispatched!(actions, ToastAction::Dismiss(None));
        crate::assert_dispatched!(actions, ToastAction::Remove(None));
        crate::assert_dispatched!(
            actions,
            ToastAction::Update(patch) if patch.height == Some(42) && patch.message.is_none()
        );
        crate::assert_dispatched!(actions, ToastAction::StartPause(_));
        crate::assert_dispatched!(actions, ToastAction::EndPause(_));
    }

    #[test]
    fn test_send_after_runtime_dropped_is_silent() {
        let (toaster, rx) = toaster();
        drop(rx);
        let id = toaster.error("lost", ToastOptions::default());
        assert_eq!(id.as_str(), "1");
    }

    #[tokio::test]
    async fn test_promise_success_reuses_loading_id() {
        let (toaster, mut rx) = toaster();

        let pending = toaster.promise(
            async { Ok::<u32, String>(3) },
            PromiseMessages::new(
                "Loading",
                MessageResolver::from_fn(|n: &u32| format!("Got {n}")),
                "Failed",
            ),
            PromiseOptions::default(),
        );

        let loading = upserted(&mut rx);
        assert_eq!(loading.kind, ToastType::Loading);
        assert!(rx.try_recv().is_err());

        assert_eq!(pending.await, Ok(3));

        let done = upserted(&mut rx);
        assert_eq!(done.id, loading.id);
        assert_eq!(done.kind, ToastType::Success);
        assert_eq!(done.resolved_message(), "Got 3");
    }

    #[tokio::test]
    async fn test_promise_error_passes_failure_through() {
        let (toaster, mut rx) = toaster();

        let result = toaster
            .promise(
                async { Err::<(), _>("disk full".to_string()) },
                PromiseMessages::new(
                    "Saving",
                    "Saved",
                    MessageResolver::from_fn(|e: &String| format!("Error: {e}")),
                ),
                PromiseOptions::default(),
            )
            .await;
        assert_eq!(result, Err("disk full".to_string()));

        let loading = upserted(&mut rx);
        let failed = upserted(&mut rx);
        assert_eq!(failed.id, loading.id);
        assert_eq!(failed.kind, ToastType::Error);
        assert_eq!(failed.resolved_message(), "Error: disk full");
    }

    #[tokio::test]
    async fn test_promise_phase_options() {
        let (toaster, mut rx) = toaster();
        let options = PromiseOptions::new(ToastOptions::default().with_icon("*"))
            .with_phase(
                ToastType::Success,
                ToastOptions::default().with_duration(ToastDuration::from_millis(900)),
            );

        toaster
            .promise(
                async { Ok::<_, ()>(()) },
                PromiseMessages::new("a", "b", "c"),
                options,
            )
            .await
            .unwrap();

        let loading = upserted(&mut rx);
        assert_eq!(loading.icon.as_deref(), Some("*"));
        assert_eq!(loading.duration, None);

        let done = upserted(&mut rx);
        assert_eq!(done.icon.as_deref(), Some("*"));
        assert_eq!(done.duration, Some(ToastDuration::from_millis(900)));
    }
}
