//! Stacking offsets for toasts sharing a screen position

use serde::Deserialize;

use crate::toast::{Toast, ToastPosition};

/// Default spacing between stacked toasts.
pub const DEFAULT_GUTTER: u32 = 8;

/// Default distance between the toast container and the screen edge.
pub const DEFAULT_EDGE_OFFSET: u32 = 16;

/// Options for [`calculate_offset`].
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OffsetOptions {
    /// Stack from the oldest toast instead of the newest.
    pub reverse_order: bool,
    /// Space inserted after every stacked toast.
    pub gutter: u32,
    /// Position used by toasts without one of their own.
    pub default_position: ToastPosition,
}

impl Default for OffsetOptions {
    fn default() -> Self {
        Self {
            reverse_order: false,
            gutter: DEFAULT_GUTTER,
            default_position: ToastPosition::default(),
        }
    }
}

/// Offset of `toast` from the anchor edge of its position.
///
/// Only visible toasts at the same position with a measured height take up
/// space. `toasts` must be in store order (newest first). A toast that has
/// not reported its height yet is positioned relative to its measured peers
/// and moves once the others report theirs.
pub fn calculate_offset(toasts: &[Toast], toast: &Toast, options: &OffsetOptions) -> u32 {
    let position = toast.effective_position(&options.default_position);
    let relevant: Vec<&Toast> = toasts
        .iter()
        .filter(|t| {
            t.effective_position(&options.default_position) == position
                && matches!(t.height, Some(h) if h > 0)
        })
        .collect();

    let toasts_before = relevant
        .iter()
        .position(|t| t.id == toast.id)
        .map_or(0, |index| relevant[..index].iter().filter(|t| t.visible).count());

    let stride = |t: &&Toast| t.height.unwrap_or(0) + options.gutter;
    let visible = relevant.iter().filter(|t| t.visible);
    if options.reverse_order {
        visible.skip(toasts_before + 1).map(stride).sum()
    } else {
        visible.take(toasts_before).map(stride).sum()
    }
}
