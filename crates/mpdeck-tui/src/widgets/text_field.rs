//! Single-line editable text on top of tui-input.
//!
//! Only appends and backspaces are exposed; once the text plus the caret no
//! longer fits, the view scrolls so the end of the text stays visible.

use ratatui::{layout::Rect, style::Modifier};
use tui_input::{Input, InputRequest};

use crate::screen::Screen;
use crate::theme::{style_default, style_filter};
use crate::widgets::fit;

#[derive(Debug, Default, Clone)]
pub struct TextField {
    input: Input,
}

impl TextField {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            input: Input::new(value.into()),
        }
    }

    pub fn value(&self) -> &str {
        self.input.value()
    }

    pub fn push(&mut self, c: char) {
        self.input.handle(InputRequest::GoToEnd);
        self.input.handle(InputRequest::InsertChar(c));
    }

    pub fn backspace(&mut self) {
        self.input.handle(InputRequest::GoToEnd);
        self.input.handle(InputRequest::DeletePrevChar);
    }

    /// Display columns hidden off the left edge for a given width.
    pub fn scroll(&self, width: u16, focused: bool) -> usize {
        let caret = usize::from(focused);
        self.input
            .visual_scroll(usize::from(width).saturating_sub(caret).max(1))
    }

    /// One row: the visible tail of the text, a `|` caret and inverse colors
    /// while focused.
    pub fn draw(&self, screen: &mut Screen, area: Rect, focused: bool) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let row = Rect::new(area.x, area.y, area.width, 1);
        screen.blank(row);
        let visible = fit::skip_columns(self.value(), self.scroll(area.width, focused));
        if focused {
            let style = style_filter().add_modifier(Modifier::REVERSED);
            screen.restyle(row, style);
            screen.put(row.x, row.y, &format!("{visible}|"), row.width, style);
        } else {
            screen.put(row.x, row.y, visible, row.width, style_default());
        }
    }
}
