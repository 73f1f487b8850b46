//! Painting toast stacks onto the terminal

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use toast_dispatch::theme::{progressbar_color, BACKGROUND_KEY, COLOR_KEY};
use toast_dispatch::{
    expiry, Expiry, HorizontalAlign, OffsetOptions, Toast, ToastId, ToastType, ToasterView,
    DEFAULT_EDGE_OFFSET,
};
use tokio::time::Instant;

/// Columns taken by every toast.
pub const TOAST_WIDTH: u16 = 38;

// A terminal cell is taken as 8x16 pixels.
const CELL_WIDTH_PX: u32 = 8;
const CELL_HEIGHT_PX: u32 = 16;

/// Rows between the screen edge and the first toast.
const EDGE_ROWS: u16 = (DEFAULT_EDGE_OFFSET / CELL_HEIGHT_PX) as u16;

/// Columns between the screen edge and a side-aligned toast.
const EDGE_COLUMNS: u16 = (DEFAULT_EDGE_OFFSET / CELL_WIDTH_PX) as u16;

const SPINNER: [&str; 4] = ["◐", "◓", "◑", "◒"];

/// Where a toast ended up on screen.
#[derive(Debug, Clone)]
pub struct Placed {
    pub id: ToastId,
    pub area: Rect,
}

/// Rows a toast needs: its wrapped message plus the border.
pub fn toast_height(toast: &Toast) -> u32 {
    wrap(&toast.resolved_message(), inner_width()).len() as u32 + 2
}

/// Draw every visible toast of `view` and report where each one landed.
pub fn draw_toasts(
    frame: &mut Frame,
    view: &ToasterView,
    options: &OffsetOptions,
    now: Instant,
) -> Vec<Placed> {
    let area = frame.area();
    let mut placed = Vec::new();

    for toast in view.visible() {
        let height = toast_height(toast) as u16;
        let offset = view.calculate_offset(toast, options) as u16;
        let position = toast.effective_position(&options.default_position);

        let y = if position.is_top() {
            area.y.saturating_add(EDGE_ROWS).saturating_add(offset)
        } else {
            area.bottom()
                .saturating_sub(EDGE_ROWS)
                .saturating_sub(offset)
                .saturating_sub(height)
        };
        let x = match position.alignment() {
            HorizontalAlign::Left => area.x + EDGE_COLUMNS,
            HorizontalAlign::Center => area.x + area.width.saturating_sub(TOAST_WIDTH) / 2,
            HorizontalAlign::Right => area
                .right()
                .saturating_sub(TOAST_WIDTH)
                .saturating_sub(EDGE_COLUMNS),
        };

        let rect = Rect::new(x, y, TOAST_WIDTH, height).intersection(area);
        if rect.is_empty() {
            continue;
        }

        draw_toast(frame, toast, rect, view.paused_at.unwrap_or(now));
        placed.push(Placed {
            id: toast.id.clone(),
            area: rect,
        });
    }
    placed
}

fn draw_toast(frame: &mut Frame, toast: &Toast, area: Rect, now: Instant) {
    let background = style_color(toast, BACKGROUND_KEY).unwrap_or(Color::White);
    let foreground = style_color(toast, COLOR_KEY).unwrap_or(Color::Black);
    let style = Style::default().bg(background).fg(foreground);

    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_style(style)
        .style(style);
    if let Some(bar) = countdown_bar(toast, now, area.width.saturating_sub(2)) {
        let theme = toast.theme.unwrap_or_default();
        let bar_color =
            parse_color(progressbar_color(theme, toast.kind)).unwrap_or(foreground);
        block = block.title_bottom(Line::from(Span::styled(bar, style.fg(bar_color))));
    }

    let lines: Vec<Line> = wrap(&toast.resolved_message(), inner_width())
        .into_iter()
        .enumerate()
        .map(|(i, chunk)| {
            if i == 0 {
                let icon = format!(" {} ", icon(toast, now));
                Line::from(vec![
                    Span::styled(icon, style.add_modifier(Modifier::BOLD)),
                    Span::raw(chunk),
                ])
            } else {
                Line::from(format!("   {chunk}"))
            }
        })
        .collect();

    frame.render_widget(Clear, area);
    frame.render_widget(Paragraph::new(Text::from(lines)).block(block), area);
}

fn icon(toast: &Toast, now: Instant) -> String {
    if let Some(icon) = &toast.icon {
        return icon.clone();
    }
    let icon = match toast.kind {
        ToastType::Success => "✔",
        ToastType::Error => "✖",
        ToastType::Info => "ℹ",
        ToastType::Warning => "⚠",
        ToastType::Loading => {
            let frame = now.saturating_duration_since(toast.created_at).as_millis() / 120;
            SPINNER[frame as usize % SPINNER.len()]
        }
        ToastType::Blank | ToastType::Custom => "•",
    };
    icon.to_string()
}

/// Remaining lifetime drawn as a shrinking bar.
fn countdown_bar(toast: &Toast, now: Instant, width: u16) -> Option<String> {
    if toast.progressbar == Some(false) {
        return None;
    }
    let total = toast.effective_duration().as_finite()?;
    let left = match expiry(toast, now)? {
        Expiry::Remaining(left) => left,
        Expiry::Overdue => return None,
    };
    let budget = total + toast.pause_duration;
    let filled = (left.as_secs_f64() / budget.as_secs_f64().max(f64::EPSILON) * f64::from(width))
        .round() as usize;
    Some("━".repeat(filled.min(width as usize)))
}

fn inner_width() -> usize {
    // Border, icon column and padding
    usize::from(TOAST_WIDTH) - 2 - 3 - 1
}

fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let len = current.chars().count();
        if len > 0 && len + 1 + word.chars().count() > width {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

fn style_color(toast: &Toast, key: &str) -> Option<Color> {
    parse_color(toast.style.get(key)?)
}

/// Parse `#rgb`, `#rrggbb` and `rgba(r, g, b, a)` values.
fn parse_color(value: &str) -> Option<Color> {
    let value = value.trim();
    if let Some(hex) = value.strip_prefix('#') {
        if !hex.is_ascii() {
            return None;
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).ok();
        return match hex.len() {
            3 => {
                let mut digits = hex.chars().map(|c| c.to_digit(16).map(|d| (d * 17) as u8));
                Some(Color::Rgb(digits.next()??, digits.next()??, digits.next()??))
            }
            6 => Some(Color::Rgb(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            )),
            _ => None,
        };
    }

    let inner = value
        .strip_prefix("rgba(")
        .or_else(|| value.strip_prefix("rgb("))?
        .strip_suffix(')')?;
    let mut parts = inner.split(',').map(|p| p.trim().parse::<u8>().ok());
    Some(Color::Rgb(parts.next()??, parts.next()??, parts.next()??))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_color() {
        assert_eq!(parse_color("#fff"), Some(Color::Rgb(255, 255, 255)));
        assert_eq!(parse_color("#262626"), Some(Color::Rgb(38, 38, 38)));
        assert_eq!(
            parse_color("rgba(46, 125, 50, 1)"),
            Some(Color::Rgb(46, 125, 50))
        );
        assert_eq!(parse_color("navy"), None);
    }

    #[test]
    fn test_edge_offset_in_cells() {
        assert_eq!(EDGE_ROWS, 1);
        assert_eq!(EDGE_COLUMNS, 2);
    }

    #[test]
    fn test_wrap() {
        assert_eq!(wrap("", 10), vec![String::new()]);
        assert_eq!(wrap("one two three", 7), vec!["one two", "three"]);
        assert_eq!(wrap("averyveryverylongword", 5), vec!["averyveryverylongword"]);
    }
}
