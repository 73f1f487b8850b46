//! Toast records and the factory that builds them

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::Instant;

use crate::id::{IdGenerator, ToastId};
use crate::options::default_duration;
use crate::theme::Theme;

/// Content a view knows how to paint.
pub type Renderable = String;

/// Opaque style entries passed through to the view (e.g. `"color" => "#fff"`).
pub type StyleMap = BTreeMap<String, String>;

/// Kind of toast. Drives default duration and presentation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastType {
    Success,
    Error,
    Info,
    Warning,
    Loading,
    #[default]
    Blank,
    Custom,
}

impl ToastType {
    /// Every toast type, in declaration order.
    pub const ALL: [ToastType; 7] = [
        ToastType::Success,
        ToastType::Error,
        ToastType::Info,
        ToastType::Warning,
        ToastType::Loading,
        ToastType::Blank,
        ToastType::Custom,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ToastType::Success => "success",
            ToastType::Error => "error",
            ToastType::Info => "info",
            ToastType::Warning => "warning",
            ToastType::Loading => "loading",
            ToastType::Blank => "blank",
            ToastType::Custom => "custom",
        }
    }
}

/// Horizontal placement of a toast within its row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HorizontalAlign {
    Left,
    Center,
    Right,
}

/// Screen placement of a toast.
///
/// Unknown names are kept as [`ToastPosition::Custom`]; their anchor is
/// derived from whether the name mentions `top`, `center` or `right`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ToastPosition {
    TopLeft,
    #[default]
    TopCenter,
    TopRight,
    BottomLeft,
    BottomCenter,
    BottomRight,
    Custom(String),
}

impl ToastPosition {
    pub fn as_str(&self) -> &str {
        match self {
            ToastPosition::TopLeft => "top-left",
            ToastPosition::TopCenter => "top-center",
            ToastPosition::TopRight => "top-right",
            ToastPosition::BottomLeft => "bottom-left",
            ToastPosition::BottomCenter => "bottom-center",
            ToastPosition::BottomRight => "bottom-right",
            ToastPosition::Custom(name) => name,
        }
    }

    /// Whether toasts at this position stack downward from the top edge.
    pub fn is_top(&self) -> bool {
        self.as_str().contains("top")
    }

    pub fn alignment(&self) -> HorizontalAlign {
        let name = self.as_str();
        if name.contains("center") {
            HorizontalAlign::Center
        } else if name.contains("right") {
            HorizontalAlign::Right
        } else {
            HorizontalAlign::Left
        }
    }
}

impl From<String> for ToastPosition {
    fn from(name: String) -> Self {
        match name.as_str() {
            "top-left" => ToastPosition::TopLeft,
            "top-center" => ToastPosition::TopCenter,
            "top-right" => ToastPosition::TopRight,
            "bottom-left" => ToastPosition::BottomLeft,
            "bottom-center" => ToastPosition::BottomCenter,
            "bottom-right" => ToastPosition::BottomRight,
            _ => ToastPosition::Custom(name),
        }
    }
}

impl From<&str> for ToastPosition {
    fn from(name: &str) -> Self {
        Self::from(name.to_string())
    }
}

impl From<ToastPosition> for String {
    fn from(position: ToastPosition) -> Self {
        match position {
            ToastPosition::Custom(name) => name,
            other => other.as_str().to_string(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AriaRole {
    #[default]
    Status,
    Alert,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AriaLive {
    Assertive,
    Off,
    #[default]
    Polite,
}

/// Accessibility attributes forwarded to the rendered toast.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AriaProps {
    pub role: AriaRole,
    #[serde(rename = "aria-live")]
    pub live: AriaLive,
}

/// How long a toast stays visible before it is dismissed automatically.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(try_from = "DurationRepr")]
pub enum ToastDuration {
    Finite(Duration),
    Infinite,
}

impl ToastDuration {
    pub fn from_millis(millis: u64) -> Self {
        ToastDuration::Finite(Duration::from_millis(millis))
    }

    /// The finite time-to-live, or `None` for toasts that never expire.
    pub fn as_finite(self) -> Option<Duration> {
        match self {
            ToastDuration::Finite(duration) => Some(duration),
            ToastDuration::Infinite => None,
        }
    }
}

impl From<Duration> for ToastDuration {
    fn from(duration: Duration) -> Self {
        ToastDuration::Finite(duration)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DurationRepr {
    Millis(u64),
    Keyword(String),
}

impl TryFrom<DurationRepr> for ToastDuration {
    type Error = String;

    fn try_from(repr: DurationRepr) -> Result<Self, Self::Error> {
        match repr {
            DurationRepr::Millis(millis) => Ok(ToastDuration::from_millis(millis)),
            DurationRepr::Keyword(word) if word.eq_ignore_ascii_case("infinite") => {
                Ok(ToastDuration::Infinite)
            }
            DurationRepr::Keyword(word) => Err(format!(
                "invalid toast duration {word:?}, expected milliseconds or \"infinite\""
            )),
        }
    }
}

/// Toast message: literal content, or a function of the toast itself.
///
/// Resolvers are evaluated at render time against the current toast, so
/// they can reflect live state such as visibility or accumulated pause time.
#[derive(Clone)]
pub enum Message {
    Text(Renderable),
    Resolver(Arc<dyn Fn(&Toast) -> Renderable + Send + Sync>),
}

impl Message {
    pub fn resolver<F>(f: F) -> Self
    where
        F: Fn(&Toast) -> Renderable + Send + Sync + 'static,
    {
        Message::Resolver(Arc::new(f))
    }

    /// Produce the content to paint for `toast`.
    pub fn resolve(&self, toast: &Toast) -> Renderable {
        match self {
            Message::Text(text) => text.clone(),
            Message::Resolver(f) => f(toast),
        }
    }

    pub(crate) fn trimmed(self) -> Self {
        match self {
            Message::Text(text) => Message::Text(text.trim().to_string()),
            resolver => resolver,
        }
    }
}

impl fmt::Debug for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Message::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Message::Resolver(_) => f.write_str("Resolver(..)"),
        }
    }
}

impl From<&str> for Message {
    fn from(text: &str) -> Self {
        Message::Text(text.to_string())
    }
}

impl From<String> for Message {
    fn from(text: String) -> Self {
        Message::Text(text)
    }
}

/// A single notification record.
///
/// Optional presentation fields hold per-toast overrides; unset fields are
/// filled from [`DefaultToastOptions`](crate::DefaultToastOptions) when the
/// runtime builds a view snapshot.
#[derive(Clone, Debug)]
pub struct Toast {
    pub id: ToastId,
    pub kind: ToastType,
    pub message: Message,
    pub created_at: Instant,
    /// Cleared once on dismissal, never set again.
    pub visible: bool,
    /// Time the clock spent paused since this toast was created.
    pub pause_duration: Duration,
    pub duration: Option<ToastDuration>,
    /// Measured size reported by the view.
    pub height: Option<u32>,
    pub position: Option<ToastPosition>,
    pub aria_props: AriaProps,
    pub icon: Option<String>,
    pub icon_color: Option<String>,
    pub class_name: Option<String>,
    pub style: StyleMap,
    pub theme: Option<Theme>,
    pub progressbar: Option<bool>,
    pub auto_close: Option<bool>,
    pub close_button: Option<String>,
}

impl Toast {
    pub fn resolved_message(&self) -> Renderable {
        self.message.resolve(self)
    }

    /// Duration after applying the built-in default for this toast's type.
    pub fn effective_duration(&self) -> ToastDuration {
        self.duration.unwrap_or_else(|| default_duration(self.kind))
    }

    /// Whether the auto-dismiss clock applies to this toast.
    pub fn auto_closes(&self) -> bool {
        self.auto_close.unwrap_or(true)
    }

    pub fn effective_position<'a>(&'a self, default: &'a ToastPosition) -> &'a ToastPosition {
        self.position.as_ref().unwrap_or(default)
    }
}

/// Per-call overrides accepted by the toast creation API.
///
/// The same shape is used for per-type and global defaults in
/// [`DefaultToastOptions`](crate::DefaultToastOptions).
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ToastOptions {
    pub id: Option<ToastId>,
    pub icon: Option<String>,
    pub duration: Option<ToastDuration>,
    pub aria_props: Option<AriaProps>,
    pub class_name: Option<String>,
    pub style: StyleMap,
    pub position: Option<ToastPosition>,
    pub theme: Option<Theme>,
    pub progressbar: Option<bool>,
    pub icon_color: Option<String>,
    pub auto_close: Option<bool>,
    pub close_button: Option<String>,
}

impl ToastOptions {
    pub fn with_id(mut self, id: impl Into<ToastId>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_duration(mut self, duration: impl Into<ToastDuration>) -> Self {
        self.duration = Some(duration.into());
        self
    }

    pub fn with_position(mut self, position: impl Into<ToastPosition>) -> Self {
        self.position = Some(position.into());
        self
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = Some(theme);
        self
    }

    pub fn with_auto_close(mut self, auto_close: bool) -> Self {
        self.auto_close = Some(auto_close);
        self
    }

    pub fn with_aria(mut self, aria_props: AriaProps) -> Self {
        self.aria_props = Some(aria_props);
        self
    }

    pub fn with_style(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.style.insert(key.into(), value.into());
        self
    }

    /// Layer `self` over `base`: fields set here win, style entries merge.
    pub fn layered_over(&self, base: &ToastOptions) -> ToastOptions {
        let mut style = base.style.clone();
        style.extend(self.style.clone());
        ToastOptions {
            id: self.id.clone().or_else(|| base.id.clone()),
            icon: self.icon.clone().or_else(|| base.icon.clone()),
            duration: self.duration.or(base.duration),
            aria_props: self.aria_props.or(base.aria_props),
            class_name: self.class_name.clone().or_else(|| base.class_name.clone()),
            style,
            position: self.position.clone().or_else(|| base.position.clone()),
            theme: self.theme.or(base.theme),
            progressbar: self.progressbar.or(base.progressbar),
            icon_color: self.icon_color.clone().or_else(|| base.icon_color.clone()),
            auto_close: self.auto_close.or(base.auto_close),
            close_button: self
                .close_button
                .clone()
                .or_else(|| base.close_button.clone()),
        }
    }
}

/// Build a fresh toast record.
///
/// The toast starts visible with no accumulated pause time. The id comes
/// from `options` when one is given, otherwise from `ids`.
pub fn create_toast(
    message: impl Into<Message>,
    kind: ToastType,
    options: ToastOptions,
    ids: &IdGenerator,
) -> Toast {
    let ToastOptions {
        id,
        icon,
        duration,
        aria_props,
        class_name,
        style,
        position,
        theme,
        progressbar,
        icon_color,
        auto_close,
        close_button,
    } = options;

    Toast {
        id: id
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| ids.next_id()),
        kind,
        message: message.into(),
        created_at: Instant::now(),
        visible: true,
        pause_duration: Duration::ZERO,
        duration,
        height: None,
        position,
        aria_props: aria_props.unwrap_or_default(),
        icon,
        icon_color,
        class_name,
        style,
        theme,
        progressbar,
        auto_close,
        close_button,
    }
}

/// Partial update applied to the toast with a matching id.
///
/// Fields left as `None` keep their current value. `visible` can only be
/// lowered: a patch never makes a dismissed toast visible again.
#[derive(Clone, Debug)]
pub struct ToastPatch {
    pub id: ToastId,
    pub kind: Option<ToastType>,
    pub message: Option<Message>,
    pub created_at: Option<Instant>,
    pub visible: Option<bool>,
    pub pause_duration: Option<Duration>,
    pub duration: Option<ToastDuration>,
    pub height: Option<u32>,
    pub position: Option<ToastPosition>,
    pub aria_props: Option<AriaProps>,
    pub icon: Option<String>,
    pub icon_color: Option<String>,
    pub class_name: Option<String>,
    pub style: Option<StyleMap>,
    pub theme: Option<Theme>,
    pub progressbar: Option<bool>,
    pub auto_close: Option<bool>,
    pub close_button: Option<String>,
}

impl ToastPatch {
    /// An empty patch targeting `id`.
    pub fn new(id: ToastId) -> Self {
        Self {
            id,
            kind: None,
            message: None,
            created_at: None,
            visible: None,
            pause_duration: None,
            duration: None,
            height: None,
            position: None,
            aria_props: None,
            icon: None,
            icon_color: None,
            class_name: None,
            style: None,
            theme: None,
            progressbar: None,
            auto_close: None,
            close_button: None,
        }
    }

    pub fn with_height(mut self, height: u32) -> Self {
        self.height = Some(height);
        self
    }

    pub fn with_message(mut self, message: impl Into<Message>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_duration(mut self, duration: impl Into<ToastDuration>) -> Self {
        self.duration = Some(duration.into());
        self
    }

    pub fn with_kind(mut self, kind: ToastType) -> Self {
        self.kind = Some(kind);
        self
    }

    pub(crate) fn apply(self, toast: &mut Toast) {
        fn set<T>(slot: &mut T, value: Option<T>) {
            if let Some(value) = value {
                *slot = value;
            }
        }
        fn set_opt<T>(slot: &mut Option<T>, value: Option<T>) {
            if value.is_some() {
                *slot = value;
            }
        }

        set(&mut toast.kind, self.kind);
        set(&mut toast.message, self.message);
        set(&mut toast.created_at, self.created_at);
        set(&mut toast.pause_duration, self.pause_duration);
        set(&mut toast.aria_props, self.aria_props);
        set(&mut toast.style, self.style);
        if let Some(visible) = self.visible {
            toast.visible &= visible;
        }
        set_opt(&mut toast.duration, self.duration);
        set_opt(&mut toast.height, self.height);
        set_opt(&mut toast.position, self.position);
        set_opt(&mut toast.icon, self.icon);
        set_opt(&mut toast.icon_color, self.icon_color);
        set_opt(&mut toast.class_name, self.class_name);
        set_opt(&mut toast.theme, self.theme);
        set_opt(&mut toast.progressbar, self.progressbar);
        set_opt(&mut toast.auto_close, self.auto_close);
        set_opt(&mut toast.close_button, self.close_button);
    }
}

impl From<Toast> for ToastPatch {
    fn from(toast: Toast) -> Self {
        Self {
            id: toast.id,
            kind: Some(toast.kind),
            message: Some(toast.message),
            created_at: Some(toast.created_at),
            visible: Some(toast.visible),
            pause_duration: Some(toast.pause_duration),
            duration: toast.duration,
            height: toast.height,
            position: toast.position,
            aria_props: Some(toast.aria_props),
            icon: toast.icon,
            icon_color: toast.icon_color,
            class_name: toast.class_name,
            style: Some(toast.style),
            theme: toast.theme,
            progressbar: toast.progressbar,
            auto_close: toast.auto_close,
            close_button: toast.close_button,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_toast_defaults() {
        let ids = IdGenerator::new();
        let toast = create_toast("hello", ToastType::Blank, ToastOptions::default(), &ids);

        assert_eq!(toast.id.as_str(), "1");
        assert!(toast.visible);
        assert_eq!(toast.pause_duration, Duration::ZERO);
        assert_eq!(toast.aria_props.role, AriaRole::Status);
        assert_eq!(toast.aria_props.live, AriaLive::Polite);
        assert!(toast.height.is_none());
        assert_eq!(toast.resolved_message(), "hello");
    }

    #[test]
    fn test_create_toast_honors_explicit_id() {
        let ids = IdGenerator::new();
        let toast = create_toast(
            "x",
            ToastType::Success,
            ToastOptions::default().with_id("upload"),
            &ids,
        );
        assert_eq!(toast.id.as_str(), "upload");

        // The generator was not consumed
        assert_eq!(ids.next_id().as_str(), "1");
    }

    #[test]
    fn test_create_toast_fills_empty_id() {
        let ids = IdGenerator::new();
        let toast = create_toast(
            "x",
            ToastType::Blank,
            ToastOptions::default().with_id(""),
            &ids,
        );
        assert_eq!(toast.id.as_str(), "1");
    }

    #[test]
    fn test_create_toast_applies_overrides() {
        let ids = IdGenerator::new();
        let aria = AriaProps {
            role: AriaRole::Alert,
            live: AriaLive::Assertive,
        };
        let toast = create_toast(
            "x",
            ToastType::Error,
            ToastOptions::default()
                .with_aria(aria)
                .with_duration(ToastDuration::Infinite)
                .with_position(ToastPosition::BottomLeft)
                .with_icon("!"),
            &ids,
        );

        assert_eq!(toast.aria_props, aria);
        assert_eq!(toast.duration, Some(ToastDuration::Infinite));
        assert_eq!(toast.position, Some(ToastPosition::BottomLeft));
        assert_eq!(toast.icon.as_deref(), Some("!"));
    }

    #[test]
    fn test_message_resolver_sees_toast_state() {
        let ids = IdGenerator::new();
        let mut toast = create_toast(
            Message::resolver(|t: &Toast| format!("{} visible={}", t.id, t.visible)),
            ToastType::Custom,
            ToastOptions::default(),
            &ids,
        );
        assert_eq!(toast.resolved_message(), "1 visible=true");

        toast.visible = false;
        assert_eq!(toast.resolved_message(), "1 visible=false");
    }

    #[test]
    fn test_patch_never_restores_visibility() {
        let ids = IdGenerator::new();
        let mut toast = create_toast("x", ToastType::Blank, ToastOptions::default(), &ids);
        toast.visible = false;

        let replacement = create_toast(
            "y",
            ToastType::Success,
            ToastOptions::default().with_id(toast.id.clone()),
            &ids,
        );
        ToastPatch::from(replacement).apply(&mut toast);

        assert!(!toast.visible);
        assert_eq!(toast.kind, ToastType::Success);
        assert_eq!(toast.resolved_message(), "y");
    }

    #[test]
    fn test_patch_keeps_unset_fields() {
        let ids = IdGenerator::new();
        let mut toast = create_toast(
            "x",
            ToastType::Blank,
            ToastOptions::default().with_icon("*"),
            &ids,
        );
        toast.height = Some(12);

        ToastPatch::new(toast.id.clone())
            .with_message("updated")
            .apply(&mut toast);

        assert_eq!(toast.height, Some(12));
        assert_eq!(toast.icon.as_deref(), Some("*"));
        assert_eq!(toast.resolved_message(), "updated");
    }

    #[test]
    fn test_position_parsing() {
        assert_eq!(ToastPosition::from("bottom-right"), ToastPosition::BottomRight);
        assert_eq!(
            ToastPosition::from("sidebar-top"),
            ToastPosition::Custom("sidebar-top".into())
        );
        assert!(ToastPosition::TopRight.is_top());
        assert!(!ToastPosition::BottomCenter.is_top());
        assert_eq!(ToastPosition::BottomCenter.alignment(), HorizontalAlign::Center);
        assert_eq!(ToastPosition::TopRight.alignment(), HorizontalAlign::Right);
        assert_eq!(ToastPosition::TopLeft.alignment(), HorizontalAlign::Left);
    }

    #[test]
    fn test_layered_options() {
        let base = ToastOptions::default()
            .with_icon("base")
            .with_duration(ToastDuration::from_millis(100))
            .with_style("color", "red");
        let top = ToastOptions::default()
            .with_icon("top")
            .with_style("border", "1px");

        let merged = top.layered_over(&base);
        assert_eq!(merged.icon.as_deref(), Some("top"));
        assert_eq!(merged.duration, Some(ToastDuration::from_millis(100)));
        assert_eq!(merged.style.len(), 2);
    }
}
