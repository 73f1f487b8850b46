//! One-shot timers that report back to the runtime

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::AbortHandle;
use tokio::time::Instant;

use crate::id::ToastId;

/// Timer expiry reported to the runtime.
///
/// Each event carries the ticket it was armed with. The runtime only acts on
/// it if the owning scheduler still holds that ticket, so a timer that was
/// cancelled after its event was queued is ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerEvent {
    /// The removal grace period of a dismissed toast elapsed.
    RemovalDue { id: ToastId, ticket: u64 },
    /// A toast's time-to-live elapsed.
    DismissDue { id: ToastId, generation: u64 },
}

/// Spawn a task that sends `event` after `delay`.
///
/// The deadline is fixed at the call, not when the task first runs.
/// Aborting the returned handle before the delay elapses suppresses the event.
pub(crate) fn spawn_timer(
    delay: Duration,
    event: TimerEvent,
    timer_tx: mpsc::UnboundedSender<TimerEvent>,
) -> AbortHandle {
    let deadline = Instant::now() + delay;
    tokio::spawn(async move {
        tokio::time::sleep_until(deadline).await;
        let _ = timer_tx.send(event);
    })
    .abort_handle()
}
