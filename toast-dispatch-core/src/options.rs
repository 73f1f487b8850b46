//! Default toast options and the precedence chain used to resolve them
//!
//! Every effective value is looked up in four layers, first defined wins:
//!
//! 1. the toast's own (call-level) value
//! 2. the configured default for the toast's type
//! 3. the configured global default
//! 4. the built-in constant
//!
//! Defaults can be written in code or loaded from JSON:
//!
//! ```
//! use toast_dispatch_core::{DefaultToastOptions, ToastDuration, ToastType};
//!
//! let options = DefaultToastOptions::from_json(
//!     r#"{ "duration": 3000, "loading": { "duration": "infinite" } }"#,
//! )
//! .unwrap();
//!
//! assert_eq!(options.global.duration, Some(ToastDuration::from_millis(3000)));
//! assert_eq!(
//!     options.for_type(ToastType::Loading).and_then(|o| o.duration),
//!     Some(ToastDuration::Infinite)
//! );
//! ```

use std::time::Duration;

use serde::Deserialize;

use crate::theme::{apply_theme, Theme};
use crate::toast::{Toast, ToastDuration, ToastOptions, ToastType};

/// Built-in lifetime for toasts without a configured duration.
pub const DEFAULT_DURATION: Duration = Duration::from_millis(4000);

/// Built-in duration for a toast type. Loading toasts never expire.
pub fn default_duration(kind: ToastType) -> ToastDuration {
    match kind {
        ToastType::Loading => ToastDuration::Infinite,
        _ => ToastDuration::Finite(DEFAULT_DURATION),
    }
}

/// Return the first defined value of the precedence chain.
pub fn resolve_layered<T>(
    explicit: Option<T>,
    per_type: Option<T>,
    global: Option<T>,
    builtin: T,
) -> T {
    explicit.or(per_type).or(global).unwrap_or(builtin)
}

/// Global and per-type defaults applied to toasts at read time.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct DefaultToastOptions {
    #[serde(flatten)]
    pub global: ToastOptions,
    pub success: Option<ToastOptions>,
    pub error: Option<ToastOptions>,
    pub info: Option<ToastOptions>,
    pub warning: Option<ToastOptions>,
    pub loading: Option<ToastOptions>,
    pub blank: Option<ToastOptions>,
    pub custom: Option<ToastOptions>,
}

impl DefaultToastOptions {
    /// Parse defaults from a JSON document.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Set the global defaults.
    pub fn with_global(mut self, options: ToastOptions) -> Self {
        self.global = options;
        self
    }

    /// Set the defaults for one toast type.
    pub fn with_type(mut self, kind: ToastType, options: ToastOptions) -> Self {
        *self.slot_mut(kind) = Some(options);
        self
    }

    pub fn for_type(&self, kind: ToastType) -> Option<&ToastOptions> {
        match kind {
            ToastType::Success => self.success.as_ref(),
            ToastType::Error => self.error.as_ref(),
            ToastType::Info => self.info.as_ref(),
            ToastType::Warning => self.warning.as_ref(),
            ToastType::Loading => self.loading.as_ref(),
            ToastType::Blank => self.blank.as_ref(),
            ToastType::Custom => self.custom.as_ref(),
        }
    }

    fn slot_mut(&mut self, kind: ToastType) -> &mut Option<ToastOptions> {
        match kind {
            ToastType::Success => &mut self.success,
            ToastType::Error => &mut self.error,
            ToastType::Info => &mut self.info,
            ToastType::Warning => &mut self.warning,
            ToastType::Loading => &mut self.loading,
            ToastType::Blank => &mut self.blank,
            ToastType::Custom => &mut self.custom,
        }
    }

    /// Effective duration of `toast` under these defaults.
    pub fn duration_for(&self, toast: &Toast) -> ToastDuration {
        resolve_layered(
            toast.duration,
            self.for_type(toast.kind).and_then(|o| o.duration),
            self.global.duration,
            default_duration(toast.kind),
        )
    }

    /// Copy of `toast` with every resolvable field filled in.
    ///
    /// Style entries merge global < type < toast, then the resolved theme
    /// supplies background and text colors that are still missing.
    pub fn merge(&self, toast: &Toast) -> Toast {
        let typed = self.for_type(toast.kind);
        let global = &self.global;

        macro_rules! layered {
            ($field:ident) => {
                toast
                    .$field
                    .clone()
                    .or_else(|| typed.and_then(|o| o.$field.clone()))
                    .or_else(|| global.$field.clone())
            };
        }

        let theme = resolve_layered(
            toast.theme,
            typed.and_then(|o| o.theme),
            global.theme,
            Theme::default(),
        );
        let auto_close = resolve_layered(
            toast.auto_close,
            typed.and_then(|o| o.auto_close),
            global.auto_close,
            true,
        );

        let mut style = global.style.clone();
        if let Some(typed) = typed {
            style.extend(typed.style.clone());
        }
        style.extend(toast.style.clone());
        apply_theme(theme, toast.kind, &mut style);

        Toast {
            duration: Some(self.duration_for(toast)),
            position: layered!(position),
            icon: layered!(icon),
            icon_color: layered!(icon_color),
            class_name: layered!(class_name),
            progressbar: layered!(progressbar),
            close_button: layered!(close_button),
            theme: Some(theme),
            auto_close: Some(auto_close),
            style,
            ..toast.clone()
        }
    }
}
