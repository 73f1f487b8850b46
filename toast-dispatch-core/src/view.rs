//! Render-side snapshot of the toast store

use tokio::time::Instant;

use crate::id::ToastId;
use crate::layout::{calculate_offset, OffsetOptions};
use crate::toast::{Toast, ToastPosition};
use crate::toaster::Toaster;

/// What a view needs to paint toasts and report back.
///
/// `toasts` carry every default already applied. The handler methods send
/// commands to the runtime that produced the snapshot.
#[derive(Clone, Debug)]
pub struct ToasterView {
    pub toasts: Vec<Toast>,
    pub paused_at: Option<Instant>,
    toaster: Toaster,
}

impl ToasterView {
    pub(crate) fn new(toasts: Vec<Toast>, paused_at: Option<Instant>, toaster: Toaster) -> Self {
        Self {
            toasts,
            paused_at,
            toaster,
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused_at.is_some()
    }

    /// Toasts still on screen, newest first.
    pub fn visible(&self) -> impl Iterator<Item = &Toast> {
        self.toasts.iter().filter(|t| t.visible)
    }

    /// Toasts anchored at `position`, newest first.
    pub fn at<'a>(
        &'a self,
        position: &'a ToastPosition,
        default: &'a ToastPosition,
    ) -> impl Iterator<Item = &'a Toast> {
        self.toasts
            .iter()
            .filter(move |t| t.effective_position(default) == position)
    }

    /// Report the rendered height of a toast.
    pub fn update_height(&self, id: &ToastId, height: u32) {
        self.toaster.update_height(id, height);
    }

    pub fn start_pause(&self) {
        self.toaster.start_pause();
    }

    /// Resume the clock. Does nothing unless this snapshot was taken while
    /// paused.
    pub fn end_pause(&self) {
        if self.is_paused() {
            self.toaster.end_pause();
        }
    }

    /// Offset of `toast` within its position's stack in this snapshot.
    pub fn calculate_offset(&self, toast: &Toast, options: &OffsetOptions) -> u32 {
        calculate_offset(&self.toasts, toast, options)
    }

    pub fn toaster(&self) -> &Toaster {
        &self.toaster
    }
}
