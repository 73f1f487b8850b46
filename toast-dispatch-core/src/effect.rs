//! Declarative side effects returned by the reducer
//!
//! The reducer never touches timers. It reports the timer work an action
//! implies as [`ToastEffect`]s, and the runtime carries them out after the
//! state change has been applied.

use crate::id::ToastId;

/// Timer work requested by a state transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToastEffect {
    /// Start the removal grace timer for a dismissed toast (no-op if running).
    ScheduleRemoval(ToastId),
    /// Drop the pending removal timer for a toast, if any.
    CancelRemoval(ToastId),
}

/// Result of dispatching an action.
///
/// Contains both the state change indicator and any effects to be processed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchResult<E> {
    /// Whether the state was modified by this action.
    pub changed: bool,
    /// Effects to be processed after dispatch.
    pub effects: Vec<E>,
}

impl<E> Default for DispatchResult<E> {
    fn default() -> Self {
        Self::unchanged()
    }
}

impl<E> DispatchResult<E> {
    /// No state change and no effects.
    #[inline]
    pub fn unchanged() -> Self {
        Self {
            changed: false,
            effects: vec![],
        }
    }

    /// State changed, no effects.
    #[inline]
    pub fn changed() -> Self {
        Self {
            changed: true,
            effects: vec![],
        }
    }

    /// A single effect without a state change.
    #[inline]
    pub fn effect(effect: E) -> Self {
        Self {
            changed: false,
            effects: vec![effect],
        }
    }

    /// Add an effect to this result.
    #[inline]
    pub fn with(mut self, effect: E) -> Self {
        self.effects.push(effect);
        self
    }

    /// Mark the result changed if `changed` is set; never clears the flag.
    #[inline]
    pub fn mark_changed(mut self, changed: bool) -> Self {
        self.changed |= changed;
        self
    }

    #[inline]
    pub fn has_effects(&self) -> bool {
        !self.effects.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builders() {
        let r: DispatchResult<ToastEffect> = DispatchResult::unchanged();
        assert!(!r.changed);
        assert!(!r.has_effects());

        let r: DispatchResult<ToastEffect> = DispatchResult::changed();
        assert!(r.changed);

        let id = ToastId::from("1");
        let r = DispatchResult::effect(ToastEffect::CancelRemoval(id.clone()))
            .with(ToastEffect::ScheduleRemoval(id.clone()))
            .mark_changed(true);
        assert!(r.changed);
        assert_eq!(
            r.effects,
            vec![ToastEffect::CancelRemoval(id.clone()), ToastEffect::ScheduleRemoval(id)]
        );
    }

    #[test]
    fn test_mark_changed_is_sticky() {
        let r: DispatchResult<ToastEffect> = DispatchResult::changed().mark_changed(false);
        assert!(r.changed);
    }
}
