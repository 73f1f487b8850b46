//! Core engine for toast-dispatch
//!
//! This crate holds the state machine behind transient "toast" notifications:
//! the toast list, its lifecycle timers and the layout math a view needs to
//! stack toasts. It does not render anything.
//!
//! # Core Concepts
//!
//! - **Toast**: a notification record with a type, a message and presentation
//!   overrides
//! - **ToastAction**: every change to the toast list goes through the
//!   [`reducer`] as one of these
//! - **ToastStore**: holds the state, runs middleware and notifies subscribers
//! - **ToastRuntime**: owns the store and the removal and auto-dismiss timers
//! - **Toaster**: cloneable handle used by application code
//!
//! # Lifecycle
//!
//! A toast is visible until its duration runs out or it is dismissed. Pausing
//! freezes every countdown; the paused span is credited to each toast when the
//! pause ends. A dismissed toast stays in the list, invisible, for
//! [`REMOVE_DELAY`] so the view can animate it out, then it is removed.
//!
//! # Basic Example
//!
//! ```no_run
//! use toast_dispatch_core::prelude::*;
//!
//! # async fn demo() {
//! let mut runtime = ToastRuntime::new(DefaultToastOptions::default());
//! let toaster = runtime.toaster();
//!
//! let id = toaster.success("Profile saved", ToastOptions::default());
//! runtime.process_pending();
//!
//! let view = runtime.view();
//! for toast in view.visible() {
//!     let offset = view.calculate_offset(toast, &OffsetOptions::default());
//!     println!("{} at {offset}: {}", toast.id, toast.resolved_message());
//! }
//! toaster.dismiss(&id);
//! # }
//! ```

pub mod action;
pub mod auto_dismiss;
pub mod effect;
pub mod id;
pub mod layout;
pub mod options;
pub mod reducer;
pub mod removal;
pub mod runtime;
pub mod store;
pub mod testing;
pub mod theme;
pub mod timer;
pub mod toast;
pub mod toaster;
pub mod view;

// Records and the factory
pub use id::{IdGenerator, ToastId};
pub use toast::{
    create_toast, AriaLive, AriaProps, AriaRole, HorizontalAlign, Message, Renderable, StyleMap,
    Toast, ToastDuration, ToastOptions, ToastPatch, ToastPosition, ToastType,
};

// Configuration
pub use options::{default_duration, resolve_layered, DefaultToastOptions, DEFAULT_DURATION};
pub use theme::Theme;

// Store exports
pub use action::{Action, ToastAction};
pub use effect::{DispatchResult, ToastEffect};
pub use reducer::{reducer, ToastState, TOAST_LIMIT};
pub use store::{
    LoggingMiddleware, Middleware, NoopMiddleware, Subscriber, SubscriptionId, ToastStore,
};

// Timers
pub use auto_dismiss::{expiry, AutoDismissCoordinator, Expiry};
pub use removal::{RemovalScheduler, REMOVE_DELAY};
pub use timer::TimerEvent;

// Runtime and handles
pub use layout::{calculate_offset, OffsetOptions, DEFAULT_EDGE_OFFSET, DEFAULT_GUTTER};
pub use runtime::ToastRuntime;
pub use toaster::{MessageResolver, PromiseMessages, PromiseOptions, Toaster};
pub use view::ToasterView;

// Testing exports
pub use testing::{Recorded, RecordingMiddleware};

#[cfg(feature = "testing-time")]
pub use testing::{advance_time, pause_time, resume_time};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::action::{Action, ToastAction};
    pub use crate::id::ToastId;
    pub use crate::layout::{calculate_offset, OffsetOptions};
    pub use crate::options::DefaultToastOptions;
    pub use crate::runtime::ToastRuntime;
    pub use crate::store::{LoggingMiddleware, Middleware, NoopMiddleware};
    pub use crate::theme::Theme;
    pub use crate::toast::{
        Message, Toast, ToastDuration, ToastOptions, ToastPosition, ToastType,
    };
    pub use crate::toaster::{MessageResolver, PromiseMessages, PromiseOptions, Toaster};
    pub use crate::view::ToasterView;
}
