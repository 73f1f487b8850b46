//! Toast identifiers

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Identifies a toast within a store.
///
/// Ids are either generated by an [`IdGenerator`] or supplied by the caller.
/// Supplying an existing id turns toast creation into an in-place update,
/// e.g. turning a loading toast into a success toast.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ToastId(String);

impl ToastId {
    /// Create an id from any string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ToastId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ToastId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ToastId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Counter-backed id source.
///
/// The counter is incremented before it is stringified, so the first id is
/// `"1"`. Every id handed out by one generator is distinct, including across
/// threads.
#[derive(Debug, Default)]
pub struct IdGenerator {
    count: AtomicU64,
}

impl IdGenerator {
    /// Create a generator starting at zero.
    pub const fn new() -> Self {
        Self {
            count: AtomicU64::new(0),
        }
    }

    /// Produce the next id.
    pub fn next_id(&self) -> ToastId {
        let next = self.count.fetch_add(1, Ordering::Relaxed) + 1;
        ToastId(next.to_string())
    }
}
