//! The retained cell grid every widget paints into.
//!
//! Widgets only ever write here. Once per loop iteration the whole grid is
//! handed to `ratatui::Terminal::draw`, whose buffer diff sends just the
//! cells that changed since the previous flush.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    widgets::Widget,
};

pub struct Screen {
    buffer: Buffer,
}

impl Screen {
    pub fn new(area: Rect) -> Self {
        Self {
            buffer: Buffer::empty(area),
        }
    }

    pub fn area(&self) -> Rect {
        self.buffer.area
    }

    /// Resize and wipe. Callers repaint everything afterwards.
    pub fn resize(&mut self, area: Rect) {
        self.buffer.resize(area);
        self.clear();
    }

    pub fn clear(&mut self) {
        self.buffer.reset();
    }

    /// Write `text` at (x, y), never past `max_width` cells or the screen edge.
    /// Returns the column after the last cell written.
    pub fn put(&mut self, x: u16, y: u16, text: &str, max_width: u16, style: Style) -> u16 {
        let area = self.buffer.area;
        if x >= area.right() || y >= area.bottom() || x < area.x || y < area.y {
            return x;
        }
        let room = (area.right() - x).min(max_width);
        let (end, _) = self.buffer.set_stringn(x, y, text, usize::from(room), style);
        end
    }

    /// Reset every cell of `rect` to a blank.
    pub fn blank(&mut self, rect: Rect) {
        let rect = rect.intersection(self.buffer.area);
        for y in rect.top()..rect.bottom() {
            for x in rect.left()..rect.right() {
                if let Some(cell) = self.buffer.cell_mut((x, y)) {
                    cell.reset();
                }
            }
        }
    }

    /// Apply `style` to every cell of `rect` without touching symbols.
    pub fn restyle(&mut self, rect: Rect, style: Style) {
        self.buffer.set_style(rect.intersection(self.buffer.area), style);
    }

    /// The symbols of row `y`, for inspection.
    pub fn row(&self, y: u16) -> String {
        let area = self.buffer.area;
        (area.left()..area.right())
            .filter_map(|x| self.buffer.cell((x, y)))
            .map(|cell| cell.symbol())
            .collect()
    }

    pub fn style_at(&self, x: u16, y: u16) -> Option<Style> {
        self.buffer.cell((x, y)).map(|cell| cell.style())
    }
}

impl Widget for &Screen {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let area = area.intersection(self.buffer.area);
        for y in area.top()..area.bottom() {
            for x in area.left()..area.right() {
                if let (Some(src), Some(dst)) = (self.buffer.cell((x, y)), buf.cell_mut((x, y))) {
                    *dst = src.clone();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, style::Color, Terminal};

    #[test]
    fn put_clips_at_edges() {
        let mut screen = Screen::new(Rect::new(0, 0, 8, 2));
        let end = screen.put(5, 0, "abcdef", 10, Style::default());
        assert_eq!(end, 8);
        assert_eq!(screen.row(0), "     abc");
        // Off-screen writes are dropped instead of panicking.
        assert_eq!(screen.put(0, 5, "x", 1, Style::default()), 0);
    }

    #[test]
    fn blank_resets_cells() {
        let mut screen = Screen::new(Rect::new(0, 0, 4, 1));
        screen.put(0, 0, "abcd", 4, Style::default().fg(Color::Red));
        screen.blank(Rect::new(1, 0, 2, 1));
        assert_eq!(screen.row(0), "a  d");
        assert_eq!(screen.style_at(1, 0).and_then(|s| s.fg), Some(Color::Reset));
        assert_eq!(screen.style_at(0, 0).and_then(|s| s.fg), Some(Color::Red));
    }

    #[test]
    fn renders_through_terminal() {
        let mut screen = Screen::new(Rect::new(0, 0, 6, 1));
        screen.put(0, 0, "mpdeck", 6, Style::default());
        let mut terminal = Terminal::new(TestBackend::new(6, 1)).unwrap();
        terminal
            .draw(|f| f.render_widget(&screen, f.area()))
            .unwrap();
        let buffer = terminal.backend().buffer();
        assert_eq!(buffer.cell((0, 0)).map(|c| c.symbol()), Some("m"));
        assert_eq!(buffer.cell((5, 0)).map(|c| c.symbol()), Some("k"));
    }
}
