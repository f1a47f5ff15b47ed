//! Heavy box frame drawn around bordered panes.

use ratatui::layout::Rect;

use crate::screen::Screen;
use crate::theme::{style_focused_border, style_secondary, style_unfocused_border};
use crate::widgets::fit;

pub fn draw_border(screen: &mut Screen, frame: Rect, title: Option<&str>, focused: bool) {
    if frame.width < 2 || frame.height < 2 {
        return;
    }
    let style = if focused {
        style_focused_border()
    } else {
        style_unfocused_border()
    };
    let inner = usize::from(frame.width - 2);
    let bottom = frame.bottom() - 1;
    let right = frame.right() - 1;

    screen.put(frame.x, frame.y, &format!("┏{}┓", "━".repeat(inner)), frame.width, style);
    for y in frame.y + 1..bottom {
        screen.put(frame.x, y, "┃", 1, style);
        screen.put(right, y, "┃", 1, style);
    }
    screen.put(frame.x, bottom, &format!("┗{}┛", "━".repeat(inner)), frame.width, style);

    if let Some(title) = title.filter(|t| !t.is_empty()) {
        if inner > 4 {
            let label = format!(" {} ", fit::truncate(title, inner - 4));
            let title_style = if focused { style } else { style_secondary() };
            screen.put(frame.x + 2, frame.y, &label, frame.width - 3, title_style);
        }
    }
}
