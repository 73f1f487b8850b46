//! Toast state and the reducer that applies [`ToastAction`]s to it

use tokio::time::Instant;

use crate::action::ToastAction;
use crate::effect::{DispatchResult, ToastEffect};
use crate::id::ToastId;
use crate::toast::{Toast, ToastPatch};

/// Maximum number of toasts kept in the store.
pub const TOAST_LIMIT: usize = 20;

/// Authoritative toast list plus pause state.
#[derive(Clone, Debug, Default)]
pub struct ToastState {
    /// Newest first, at most [`TOAST_LIMIT`] entries, unique ids.
    pub toasts: Vec<Toast>,
    /// Set while the auto-dismiss clock is paused.
    pub paused_at: Option<Instant>,
}

impl ToastState {
    pub fn get(&self, id: &ToastId) -> Option<&Toast> {
        self.toasts.iter().find(|t| &t.id == id)
    }

    pub fn contains(&self, id: &ToastId) -> bool {
        self.get(id).is_some()
    }

    pub fn is_paused(&self) -> bool {
        self.paused_at.is_some()
    }

    pub fn len(&self) -> usize {
        self.toasts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }
}

/// Apply `action` to `state`.
///
/// Pure apart from mutating `state`: timer work is returned as effects.
pub fn reducer(state: &mut ToastState, action: ToastAction) -> DispatchResult<ToastEffect> {
    match action {
        ToastAction::Add(toast) => add(state, toast),
        ToastAction::Update(patch) => update(state, patch),
        ToastAction::Upsert(toast) => {
            if state.contains(&toast.id) {
                update(state, ToastPatch::from(toast))
            } else {
                add(state, toast)
            }
        }
        ToastAction::Dismiss(Some(id)) => {
            let Some(toast) = state.toasts.iter_mut().find(|t| t.id == id) else {
                return DispatchResult::unchanged();
            };
            let was_visible = std::mem::replace(&mut toast.visible, false);
            DispatchResult::effect(ToastEffect::ScheduleRemoval(id)).mark_changed(was_visible)
        }
        ToastAction::Dismiss(None) => {
            let mut result = DispatchResult::unchanged();
            for toast in &mut state.toasts {
                let was_visible = std::mem::replace(&mut toast.visible, false);
                result = result
                    .with(ToastEffect::ScheduleRemoval(toast.id.clone()))
                    .mark_changed(was_visible);
            }
            result
        }
        ToastAction::Remove(Some(id)) => {
            let before = state.toasts.len();
            state.toasts.retain(|t| t.id != id);
            DispatchResult::effect(ToastEffect::CancelRemoval(id))
                .mark_changed(state.toasts.len() != before)
        }
        ToastAction::Remove(None) => {
            let mut result = DispatchResult::unchanged().mark_changed(!state.toasts.is_empty());
            for toast in state.toasts.drain(..) {
                result = result.with(ToastEffect::CancelRemoval(toast.id));
            }
            result
        }
        ToastAction::StartPause(time) => {
            let previous = state.paused_at.replace(time);
            DispatchResult::unchanged().mark_changed(previous != Some(time))
        }
        ToastAction::EndPause(time) => {
            let Some(paused_at) = state.paused_at.take() else {
                return DispatchResult::unchanged();
            };
            let diff = time.saturating_duration_since(paused_at);
            for toast in &mut state.toasts {
                toast.pause_duration += diff;
            }
            DispatchResult::changed()
        }
    }
}

fn add(state: &mut ToastState, toast: Toast) -> DispatchResult<ToastEffect> {
    let mut result = DispatchResult::changed();

    // A direct Add for a known id replaces the old entry to keep ids unique
    if let Some(index) = state.toasts.iter().position(|t| t.id == toast.id) {
        let replaced = state.toasts.remove(index);
        result = result.with(ToastEffect::CancelRemoval(replaced.id));
    }

    state.toasts.insert(0, toast);
    if state.toasts.len() > TOAST_LIMIT {
        for dropped in state.toasts.drain(TOAST_LIMIT..) {
            result = result.with(ToastEffect::CancelRemoval(dropped.id));
        }
    }
    result
}

fn update(state: &mut ToastState, patch: ToastPatch) -> DispatchResult<ToastEffect> {
    let id = patch.id.clone();
    let result = DispatchResult::effect(ToastEffect::CancelRemoval(id.clone()));

    let Some(toast) = state.toasts.iter_mut().find(|t| t.id == id) else {
        return result;
    };
    patch.apply(toast);

    // Still dismissed: restart the grace period instead of orphaning it
    if toast.visible {
        result.mark_changed(true)
    } else {
        result
            .with(ToastEffect::ScheduleRemoval(id))
            .mark_changed(true)
    }
}
