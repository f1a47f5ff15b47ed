//! Thin line progress bar for the status pane.

use std::time::Duration;

use ratatui::layout::Rect;

use crate::screen::Screen;
use crate::theme::{style_accent, style_muted};

/// Draw a one-row bar across `area`: elapsed part in the accent color, the
/// remainder muted. Unknown duration draws an empty bar.
pub fn draw_progress(screen: &mut Screen, area: Rect, elapsed: Duration, duration: Duration) {
    if area.width == 0 || area.height == 0 {
        return;
    }
    let width = usize::from(area.width);
    let filled = filled_cells(width, elapsed, duration);

    let x = screen.put(area.x, area.y, &"─".repeat(filled), area.width, style_accent());
    let rest = area.right().saturating_sub(x);
    screen.put(x, area.y, &"─".repeat(width - filled), rest, style_muted());
}

pub fn filled_cells(width: usize, elapsed: Duration, duration: Duration) -> usize {
    if duration.is_zero() {
        return 0;
    }
    let progress = (elapsed.as_secs_f64() / duration.as_secs_f64()).clamp(0.0, 1.0);
    (progress * width as f64) as usize
}

pub fn fmt_time(secs: f64) -> String {
    if secs < 0.0 {
        return "0:00".to_string();
    }
    let s = secs as u64;
    let h = s / 3600;
    let m = (s % 3600) / 60;
    let s = s % 60;
    if h > 0 {
        format!("{}:{:02}:{:02}", h, m, s)
    } else {
        format!("{}:{:02}", m, s)
    }
}
