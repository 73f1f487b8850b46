//! Actions that mutate the toast store

use std::fmt::Debug;

use tokio::time::Instant;

use crate::id::ToastId;
use crate::toast::{Toast, ToastPatch};

/// Marker trait for actions that can be dispatched to a store
///
/// Actions represent intents to change state. They should be:
/// - Clone: Actions may be logged or recorded by middleware
/// - Debug: For debugging and logging
/// - Send + 'static: Actions cross the command channel from any task
pub trait Action: Clone + Debug + Send + 'static {
    /// Get the action name for logging and filtering
    fn name(&self) -> &'static str;

    /// One-line description for logs. Defaults to the action name.
    fn summary(&self) -> String {
        self.name().to_string()
    }
}

/// The full action protocol of the toast store.
#[derive(Clone, Debug)]
pub enum ToastAction {
    /// Prepend a toast, dropping the oldest beyond the store limit.
    Add(Toast),
    /// Merge fields into the toast with the patch's id.
    Update(ToastPatch),
    /// Update when the id exists, add otherwise.
    Upsert(Toast),
    /// Mark one toast (or all with `None`) invisible and schedule removal.
    Dismiss(Option<ToastId>),
    /// Delete one toast (or all with `None`) immediately.
    Remove(Option<ToastId>),
    /// Freeze the auto-dismiss clock at the given time.
    StartPause(Instant),
    /// Resume the clock, crediting the paused span to every toast.
    EndPause(Instant),
}

impl ToastAction {
    /// The toast this action targets, if it targets exactly one.
    pub fn target(&self) -> Option<&ToastId> {
        match self {
            ToastAction::Add(toast) | ToastAction::Upsert(toast) => Some(&toast.id),
            ToastAction::Update(patch) => Some(&patch.id),
            ToastAction::Dismiss(id) | ToastAction::Remove(id) => id.as_ref(),
            ToastAction::StartPause(_) | ToastAction::EndPause(_) => None,
        }
    }
}

impl Action for ToastAction {
    fn name(&self) -> &'static str {
        match self {
            ToastAction::Add(_) => "Add",
            ToastAction::Update(_) => "Update",
            ToastAction::Upsert(_) => "Upsert",
            ToastAction::Dismiss(_) => "Dismiss",
            ToastAction::Remove(_) => "Remove",
            ToastAction::StartPause(_) => "StartPause",
            ToastAction::EndPause(_) => "EndPause",
        }
    }

    fn summary(&self) -> String {
        match self {
            ToastAction::Add(toast) | ToastAction::Upsert(toast) => {
                format!("{} {} ({})", self.name(), toast.id, toast.kind.as_str())
            }
            ToastAction::Dismiss(None) | ToastAction::Remove(None) => {
                format!("{} all", self.name())
            }
            _ => match self.target() {
                Some(id) => format!("{} {}", self.name(), id),
                None => self.name().to_string(),
            },
        }
    }
}
