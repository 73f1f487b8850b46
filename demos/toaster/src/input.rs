//! Terminal input polling

use std::time::Duration;

use crossterm::event::{self, Event, KeyEvent, KeyEventKind, MouseEventKind};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Input the demo reacts to.
#[derive(Debug, Clone, Copy)]
pub enum Input {
    Key(KeyEvent),
    /// Pointer position after any mouse movement or click.
    Pointer { column: u16, row: u16 },
    Resize,
}

/// Spawn a task that forwards crossterm events to `tx` until cancelled.
pub fn spawn_event_poller(
    tx: mpsc::UnboundedSender<Input>,
    poll_timeout: Duration,
    loop_sleep: Duration,
    cancel_token: CancellationToken,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        const MAX_EVENTS_PER_BATCH: usize = 20;

        loop {
            tokio::select! {
                _ = cancel_token.cancelled() => {
                    tracing::info!("Event poller cancelled, draining buffer");
                    while event::poll(Duration::ZERO).unwrap_or(false) {
                        let _ = event::read();
                    }
                    break;
                }
                _ = tokio::time::sleep(loop_sleep) => {
                    let mut events_processed = 0;
                    while events_processed < MAX_EVENTS_PER_BATCH
                        && event::poll(poll_timeout).unwrap_or(false)
                    {
                        events_processed += 1;
                        let Ok(evt) = event::read() else {
                            continue;
                        };
                        let input = match evt {
                            Event::Key(key) if key.kind == KeyEventKind::Press => Input::Key(key),
                            Event::Mouse(mouse) => match mouse.kind {
                                MouseEventKind::Moved
                                | MouseEventKind::Down(_)
                                | MouseEventKind::Drag(_) => Input::Pointer {
                                    column: mouse.column,
                                    row: mouse.row,
                                },
                                _ => continue,
                            },
                            Event::Resize(_, _) => Input::Resize,
                            _ => continue,
                        };
                        if tx.send(input).is_err() {
                            tracing::debug!("Input channel closed, stopping poller");
                            return;
                        }
                    }
                }
            }
        }
    })
}
