//! toast-dispatch: transient notifications with a single source of truth
//!
//! Toasts live in one store and change only through dispatched actions.
//! The runtime owns the removal and auto-dismiss timers, pauses every
//! countdown on demand and hands views a merged snapshot plus the offsets
//! needed to stack toasts per screen position.
//!
//! # Example
//! ```no_run
//! use toast_dispatch::prelude::*;
//!
//! # async fn demo() -> Result<(), String> {
//! let mut runtime = ToastRuntime::new(DefaultToastOptions::default());
//! let toaster = runtime.toaster();
//!
//! let save = async { Ok::<_, String>("draft.md") };
//! let pending = toaster.promise(
//!     save,
//!     PromiseMessages::new(
//!         "Saving...",
//!         MessageResolver::from_fn(|name: &&str| format!("Saved {name}")),
//!         "Could not save",
//!     ),
//!     PromiseOptions::default(),
//! );
//! pending.await?;
//! runtime.process_pending();
//! # Ok(())
//! # }
//! ```

// Re-export everything from core
pub use toast_dispatch_core::*;

/// Prelude for convenient imports
pub mod prelude {
    pub use toast_dispatch_core::prelude::*;

    // Testing
    pub use toast_dispatch_core::{
        assert_dispatched, assert_not_dispatched, count_dispatched, RecordingMiddleware,
    };
}
