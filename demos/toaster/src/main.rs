//! Toaster - terminal demo for toast-dispatch
//!
//! Raises toasts from the keyboard and stacks them the way a browser toaster
//! would. Hovering the mouse over a toast pauses every countdown until the
//! pointer leaves again.
//!
//! Keys:
//!   s/e/i/w  success, error, info, warning toast
//!   l        loading toast (never expires)
//!   c        custom toast whose text tracks its pause time
//!   p/f      promise that succeeds/fails after two seconds
//!   d        dismiss the newest toast
//!   x        dismiss all, r remove all
//!   t        toggle theme, o cycle position
//!   q/Esc    quit
//!
//! Defaults can be loaded from a JSON file passed as the first argument:
//!
//! ```sh
//! cargo run -p toaster -- toasts.json
//! ```

mod input;
mod render;

use std::io;
use std::time::Duration;

use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Layout, Position},
    style::{Color, Style},
    widgets::Paragraph,
    Terminal,
};
use toast_dispatch::prelude::*;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::input::{spawn_event_poller, Input};
use crate::render::{draw_toasts, toast_height, Placed};

const POSITIONS: [ToastPosition; 6] = [
    ToastPosition::TopCenter,
    ToastPosition::TopRight,
    ToastPosition::BottomRight,
    ToastPosition::BottomCenter,
    ToastPosition::BottomLeft,
    ToastPosition::TopLeft,
];

#[tokio::main]
async fn main() -> io::Result<()> {
    let defaults = match std::env::args().nth(1) {
        Some(path) => {
            let json = std::fs::read_to_string(path)?;
            DefaultToastOptions::from_json(&json).map_err(io::Error::other)?
        }
        None => DefaultToastOptions::default(),
    };

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, defaults).await;

    // Cleanup
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    defaults: DefaultToastOptions,
) -> io::Result<()> {
    let mut runtime = ToastRuntime::new(defaults);
    let toaster = runtime.toaster();
    let mut offsets = OffsetOptions {
        gutter: 0,
        default_position: runtime
            .options()
            .global
            .position
            .clone()
            .unwrap_or_default(),
        ..OffsetOptions::default()
    };

    let (input_tx, mut input_rx) = mpsc::unbounded_channel::<Input>();
    let cancel_token = CancellationToken::new();
    let _handle = spawn_event_poller(
        input_tx,
        Duration::from_millis(10),
        Duration::from_millis(16),
        cancel_token.clone(),
    );

    // Spinner and countdown bars animate between state changes
    let mut frame_tick = tokio::time::interval(Duration::from_millis(120));
    let mut placed: Vec<Placed> = Vec::new();
    let mut hovering = false;
    let mut promises = 0u32;

    loop {
        let view = runtime.view();
        terminal.draw(|frame| {
            placed = draw_toasts(frame, &view, &offsets, Instant::now());

            let [_, help_area] =
                Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(frame.area());
            let status = if view.is_paused() { "paused" } else { "running" };
            let help = Paragraph::new(format!(
                "s/e/i/w/l/c: toast  p/f: promise  d/x/r: dismiss/all/remove  \
                 t: theme  o: position  q: quit  [{status}]"
            ))
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray));
            frame.render_widget(help, help_area);
        })?;

        // Report sizes so the stack can be laid out
        for toast in view.visible() {
            let height = toast_height(toast);
            if toast.height != Some(height) {
                view.update_height(&toast.id, height);
            }
        }

        tokio::select! {
            Some(input) = input_rx.recv() => match input {
                Input::Key(key) => match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => break,
                    KeyCode::Char('s') => {
                        toaster.success("Settings saved", ToastOptions::default());
                    }
                    KeyCode::Char('e') => {
                        toaster.error("Could not reach the server", ToastOptions::default());
                    }
                    KeyCode::Char('i') => {
                        toaster.info("A new version is available", ToastOptions::default());
                    }
                    KeyCode::Char('w') => {
                        toaster.warning("Disk space is running low", ToastOptions::default());
                    }
                    KeyCode::Char('l') => {
                        toaster.loading("Indexing files...", ToastOptions::default());
                    }
                    KeyCode::Char('c') => {
                        toaster.custom(
                            Message::resolver(|t: &Toast| {
                                format!("Held for {:.1}s so far", t.pause_duration.as_secs_f32())
                            }),
                            ToastOptions::default().with_icon("★"),
                        );
                    }
                    KeyCode::Char(c @ ('p' | 'f')) => {
                        promises += 1;
                        spawn_upload(&toaster, promises, c == 'f');
                    }
                    KeyCode::Char('d') => {
                        if let Some(newest) = view.visible().next() {
                            toaster.dismiss(&newest.id);
                        }
                    }
                    KeyCode::Char('x') => toaster.dismiss_all(),
                    KeyCode::Char('r') => toaster.remove_all(),
                    KeyCode::Char('t') => {
                        let mut options = runtime.options().clone();
                        options.global.theme = match options.global.theme {
                            Some(Theme::Light) => Some(Theme::Coloured),
                            _ => Some(Theme::Light),
                        };
                        runtime.set_options(options);
                    }
                    KeyCode::Char('o') => {
                        let current = POSITIONS
                            .iter()
                            .position(|p| *p == offsets.default_position)
                            .unwrap_or(0);
                        let next = POSITIONS[(current + 1) % POSITIONS.len()].clone();
                        let mut options = runtime.options().clone();
                        options.global.position = Some(next.clone());
                        runtime.set_options(options);
                        offsets.default_position = next;
                    }
                    _ => {}
                },
                Input::Pointer { column, row } => {
                    let over = placed
                        .iter()
                        .any(|p| p.area.contains(Position::new(column, row)));
                    if over != hovering {
                        hovering = over;
                        if over {
                            toaster.start_pause();
                        } else {
                            toaster.end_pause();
                        }
                    }
                }
                Input::Resize => {}
            },

            _ = runtime.next() => {}

            _ = frame_tick.tick() => {}
        }
    }

    cancel_token.cancel();
    Ok(())
}

/// Simulate an upload tracked by a promise toast.
fn spawn_upload(toaster: &Toaster, n: u32, fail: bool) {
    let upload = async move {
        tokio::time::sleep(Duration::from_secs(2)).await;
        if fail {
            Err(format!("upload #{n} was rejected"))
        } else {
            Ok(n * 3)
        }
    };
    let pending = toaster.promise(
        upload,
        PromiseMessages::new(
            format!("Uploading batch #{n}..."),
            MessageResolver::from_fn(|pages: &u32| format!("Uploaded {pages} pages")),
            MessageResolver::from_fn(|e: &String| format!("Failed: {e}")),
        ),
        PromiseOptions::default(),
    );
    tokio::spawn(async move {
        if let Err(err) = pending.await {
            tracing::debug!(error = %err, "Upload failed");
        }
    });
}
