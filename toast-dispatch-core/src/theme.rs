//! Theme colors for toast backgrounds and text

use serde::{Deserialize, Serialize};

use crate::toast::{StyleMap, ToastType};

/// Style key for the toast background.
pub const BACKGROUND_KEY: &str = "background-color";
/// Style key for the toast text color.
pub const COLOR_KEY: &str = "color";

const PLAIN_BACKGROUND: &str = "#fff";
const DARK_TEXT: &str = "#262626";
const LIGHT_TEXT: &str = "#fff";

/// Color scheme applied to a toast.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Background tinted by toast type.
    #[default]
    Coloured,
    /// White background, dark text.
    Light,
}

/// Tint associated with a toast type.
pub fn type_color(kind: ToastType) -> &'static str {
    match kind {
        ToastType::Info => "rgba(50, 50, 50, 1)",
        ToastType::Success => "rgba(46, 125, 50, 1)",
        ToastType::Error => "rgba(211, 47, 47, 1)",
        ToastType::Warning => "rgba(237, 108, 2, 1)",
        _ => PLAIN_BACKGROUND,
    }
}

/// Background color for a toast of `kind` under `theme`.
pub fn background_color(theme: Theme, kind: ToastType) -> &'static str {
    match theme {
        Theme::Coloured => type_color(kind),
        Theme::Light => PLAIN_BACKGROUND,
    }
}

/// Text color for a toast of `kind` under `theme`.
pub fn text_color(theme: Theme, kind: ToastType) -> &'static str {
    match (theme, kind) {
        (Theme::Coloured, ToastType::Blank) => DARK_TEXT,
        (Theme::Coloured, _) => LIGHT_TEXT,
        (Theme::Light, _) => DARK_TEXT,
    }
}

/// Color of the progress bar drawn under a toast.
pub fn progressbar_color(theme: Theme, kind: ToastType) -> &'static str {
    match theme {
        Theme::Coloured => LIGHT_TEXT,
        Theme::Light => type_color(kind),
    }
}

/// Fill in background and text colors that `style` does not set already.
pub fn apply_theme(theme: Theme, kind: ToastType, style: &mut StyleMap) {
    style
        .entry(BACKGROUND_KEY.to_string())
        .or_insert_with(|| background_color(theme, kind).to_string());
    style
        .entry(COLOR_KEY.to_string())
        .or_insert_with(|| text_color(theme, kind).to_string());
}
