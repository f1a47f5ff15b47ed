//! Scrollable, cursor-addressed, multi-select list view.
//!
//! Backed by a `KeyedList` that is replaced wholesale on every refresh.
//! Cursor and scroll are kept consistent on every assignment:
//!
//! * an empty list pins cursor and scroll to 0;
//! * otherwise the cursor is clamped to `[0, len-1]` and the scroll offset
//!   moves the least distance that keeps the cursor inside the window.
//!
//! The multi-select set is dropped whenever the backing list is replaced,
//! since its indices no longer mean anything.

use std::collections::BTreeSet;

use mpdeck_proto::{KeyedList, KeyedListError, PlaylistInfo, Song};
use ratatui::{layout::Rect, style::Style};

use crate::keys::Key;
use crate::screen::Screen;
use crate::theme::{style_cursor, style_marked};
use crate::widget::Outcome;
use crate::widgets::fit::{self, Align};

/// Anything a list row can be rendered from.
pub trait Row {
    fn field(&self, name: &str) -> String;

    /// Queue id, for highlighting the row that is playing.
    fn queue_id(&self) -> Option<u32> {
        None
    }
}

impl Row for Song {
    fn field(&self, name: &str) -> String {
        Song::field(self, name)
    }

    fn queue_id(&self) -> Option<u32> {
        self.id
    }
}

impl Row for PlaylistInfo {
    fn field(&self, name: &str) -> String {
        match name {
            "name" => self.name.clone(),
            "modified" => self.last_modified.clone().unwrap_or_default(),
            _ => String::new(),
        }
    }
}

/// One column of a row: `{field}` template, style, alignment and share of
/// the row width. The last segment of a row takes whatever width is left.
#[derive(Debug, Clone)]
pub struct Segment {
    pub template: &'static str,
    pub style: Style,
    pub align: Align,
    pub fraction: f32,
}

impl Segment {
    pub fn new(template: &'static str, style: Style, align: Align, fraction: f32) -> Self {
        Self {
            template,
            style,
            align,
            fraction,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RowFormat {
    pub normal: Vec<Segment>,
    pub playing: Vec<Segment>,
}

/// Expand `{name}` placeholders from the row's fields.
pub fn expand(template: &str, row: &dyn Row) -> String {
    let mut out = String::new();
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find('}') {
            Some(close) => {
                out.push_str(&row.field(&after[..close]));
                rest = &after[close + 1..];
            }
            None => {
                out.push_str(&rest[open..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

/// Lay the segments out across `width` columns with one blank between them.
pub fn layout_row(segments: &[Segment], row: &dyn Row, width: usize) -> Vec<(String, Style)> {
    let mut cells = Vec::with_capacity(segments.len());
    let mut used = 0usize;
    for (i, seg) in segments.iter().enumerate() {
        let last = i + 1 == segments.len();
        let columns = if last {
            width.saturating_sub(used)
        } else {
            ((seg.fraction * width as f32) as usize).min(width.saturating_sub(used))
        };
        cells.push((fit::align(&expand(seg.template, row), columns, seg.align), seg.style));
        used += columns;
        if !last && used < width {
            cells.push((" ".to_string(), Style::default()));
            used += 1;
        }
    }
    cells
}

/// Navigation shared by every list pane, object-safe so the controller can
/// drive any pane's list without knowing its row type.
pub trait ListView {
    fn len(&self) -> usize;
    fn cursor(&self) -> usize;
    fn set_cursor(&mut self, index: usize);
    fn next(&mut self);
    fn prev(&mut self);
    fn select(&mut self);
    fn has_selection(&self) -> bool;
    fn clear_selection(&mut self);
    fn set_viewport(&mut self, height: usize);

    /// Default list keys: move, mark-and-advance, and Esc to drop a
    /// multi-selection.
    fn navigate(&mut self, key: Key) -> Outcome {
        match key {
            Key::Down => {
                self.next();
                Outcome::Redraw
            }
            Key::Up => {
                self.prev();
                Outcome::Redraw
            }
            Key::ShiftDown => {
                self.select();
                self.next();
                Outcome::Redraw
            }
            Key::Esc if self.has_selection() => {
                self.clear_selection();
                Outcome::Redraw
            }
            _ => Outcome::Unhandled,
        }
    }
}

pub struct Selection<V> {
    items: KeyedList<String, V>,
    cursor: usize,
    scroll: usize,
    selected: BTreeSet<usize>,
    height: usize,
    format: RowFormat,
}

impl<V: Row> Selection<V> {
    pub fn new(format: RowFormat) -> Self {
        Self {
            items: KeyedList::new(),
            cursor: 0,
            scroll: 0,
            selected: BTreeSet::new(),
            height: 0,
            format,
        }
    }

    pub fn items(&self) -> &KeyedList<String, V> {
        &self.items
    }

    pub fn set_items(&mut self, items: KeyedList<String, V>) {
        self.items = items;
        self.selected.clear();
        self.set_cursor(self.cursor);
    }

    pub fn scroll(&self) -> usize {
        self.scroll
    }

    pub fn current(&self) -> Option<&V> {
        self.items.get_at(self.cursor).ok()
    }

    pub fn selected(&self) -> impl Iterator<Item = usize> + '_ {
        self.selected.iter().copied()
    }

    /// Indices an action applies to: the multi-selection in ascending order,
    /// or the cursor row alone.
    pub fn targets(&self) -> Vec<usize> {
        if self.selected.is_empty() {
            if self.items.is_empty() {
                Vec::new()
            } else {
                vec![self.cursor]
            }
        } else {
            self.selected
                .iter()
                .copied()
                .filter(|&i| i < self.items.len())
                .collect()
        }
    }

    pub fn target_values(&self) -> Vec<&V> {
        self.targets()
            .into_iter()
            .filter_map(|i| self.items.get_at(i).ok())
            .collect()
    }

    pub fn remove_at(&mut self, index: usize) -> Result<(), KeyedListError> {
        self.items.remove_at(index)?;
        self.set_cursor(self.cursor);
        Ok(())
    }

    /// Paint visible rows into `area`, blanking rows past the end of data.
    pub fn draw(&mut self, screen: &mut Screen, area: Rect, now_playing: Option<u32>) {
        self.set_viewport(usize::from(area.height));
        let width = usize::from(area.width);
        for line in 0..area.height {
            let index = self.scroll + usize::from(line);
            let y = area.y + line;
            screen.blank(Rect::new(area.x, y, area.width, 1));
            let Ok(row) = self.items.get_at(index) else {
                continue;
            };
            let playing = row.queue_id().is_some() && row.queue_id() == now_playing;
            let segments = if playing {
                &self.format.playing
            } else {
                &self.format.normal
            };
            let mut extra = Style::default();
            if index == self.cursor {
                extra = extra.patch(style_cursor());
            }
            if self.selected.contains(&index) {
                extra = extra.patch(style_marked());
            }
            let mut x = area.x;
            for (text, style) in layout_row(segments, row, width) {
                x = screen.put(x, y, &text, area.right() - x, style.patch(extra));
            }
        }
    }
}

impl<V: Row> ListView for Selection<V> {
    fn len(&self) -> usize {
        self.items.len()
    }

    fn cursor(&self) -> usize {
        self.cursor
    }

    fn set_cursor(&mut self, index: usize) {
        let len = self.items.len();
        if len == 0 {
            self.cursor = 0;
            self.scroll = 0;
            return;
        }
        self.cursor = index.min(len - 1);
        if self.height == 0 {
            self.scroll = self.cursor;
        } else if self.cursor >= self.scroll + self.height {
            self.scroll = self.cursor + 1 - self.height;
        } else if self.cursor < self.scroll {
            self.scroll = self.cursor;
        }
    }

    fn next(&mut self) {
        let len = self.items.len();
        if len == 0 {
            return;
        }
        self.set_cursor((self.cursor + 1) % len);
    }

    fn prev(&mut self) {
        let len = self.items.len();
        if len == 0 {
            return;
        }
        self.set_cursor((self.cursor + len - 1) % len);
    }

    fn select(&mut self) {
        if !self.items.is_empty() {
            self.selected.insert(self.cursor);
        }
    }

    fn has_selection(&self) -> bool {
        !self.selected.is_empty()
    }

    fn clear_selection(&mut self) {
        self.selected.clear();
    }

    fn set_viewport(&mut self, height: usize) {
        self.height = height;
        self.set_cursor(self.cursor);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::{style_accent, style_default};

    fn format() -> RowFormat {
        RowFormat {
            normal: vec![
                Segment::new("{title}", style_default(), Align::Left, 0.5),
                Segment::new("{artist}", style_default(), Align::Right, 0.5),
            ],
            playing: vec![
                Segment::new("> {title}", style_accent(), Align::Left, 0.5),
                Segment::new("{artist}", style_accent(), Align::Right, 0.5),
            ],
        }
    }

    fn songs(n: usize) -> KeyedList<String, Song> {
        (0..n)
            .map(|i| {
                let mut song = Song::new(format!("{i}.flac"));
                song.title = Some(format!("Song {i}"));
                song.artist = Some("Band".into());
                song.id = Some(i as u32);
                (i.to_string(), song)
            })
            .collect()
    }

    fn selection(n: usize, height: usize) -> Selection<Song> {
        let mut sel = Selection::new(format());
        sel.set_viewport(height);
        sel.set_items(songs(n));
        sel
    }

    #[test]
    fn cursor_and_scroll_stay_in_window() {
        let mut sel = selection(17, 5);
        let mut seed: u32 = 7;
        for _ in 0..500 {
            seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            if (seed >> 16) % 3 == 0 {
                sel.prev();
            } else {
                sel.next();
            }
            assert!(sel.cursor() < sel.len());
            assert!(sel.scroll() <= sel.cursor());
            assert!(sel.cursor() < sel.scroll() + 5);
        }
    }

    #[test]
    fn wraps_both_ways() {
        let mut sel = selection(3, 10);
        sel.prev();
        assert_eq!(sel.cursor(), 2);
        sel.next();
        assert_eq!(sel.cursor(), 0);
    }

    #[test]
    fn empty_list_is_a_no_op() {
        let mut sel = selection(0, 5);
        sel.next();
        sel.prev();
        sel.select();
        sel.set_cursor(9);
        assert_eq!((sel.cursor(), sel.scroll()), (0, 0));
        assert!(!sel.has_selection());
        assert!(sel.targets().is_empty());
        assert_eq!(sel.navigate(Key::Down), Outcome::Redraw);
        assert_eq!(sel.navigate(Key::Esc), Outcome::Unhandled);
    }

    #[test]
    fn replacing_items_drops_selection_and_clamps() {
        let mut sel = selection(10, 4);
        sel.set_cursor(9);
        sel.select();
        sel.set_items(songs(3));
        assert!(!sel.has_selection());
        assert_eq!(sel.cursor(), 2);
    }

    #[test]
    fn targets_are_ascending_selection_or_cursor() {
        let mut sel = selection(6, 6);
        sel.set_cursor(4);
        assert_eq!(sel.targets(), [4]);
        sel.navigate(Key::ShiftDown);
        sel.set_cursor(1);
        sel.navigate(Key::ShiftDown);
        assert_eq!(sel.targets(), [1, 4]);
        assert_eq!(sel.navigate(Key::Esc), Outcome::Redraw);
        assert_eq!(sel.targets(), [2]);
    }

    #[test]
    fn shrinking_viewport_reclamps_on_draw() {
        let mut sel = selection(20, 20);
        sel.set_cursor(15);
        let mut screen = Screen::new(Rect::new(0, 0, 20, 4));
        sel.draw(&mut screen, Rect::new(0, 0, 20, 4), None);
        assert_eq!(sel.scroll(), 12);
        assert!(screen.row(3).starts_with("Song 15"));
    }

    #[test]
    fn draws_segments_and_blanks_tail() {
        let mut sel = selection(2, 4);
        let mut screen = Screen::new(Rect::new(0, 0, 21, 4));
        screen.put(0, 3, "stale stale stale", 21, Style::default());
        sel.draw(&mut screen, Rect::new(0, 0, 21, 4), Some(1));
        assert_eq!(screen.row(0), "Song 0           Band");
        assert_eq!(screen.row(1), "> Song 1         Band");
        assert_eq!(screen.row(3).trim(), "");
    }

    #[test]
    fn long_fields_are_truncated() {
        let mut sel: Selection<Song> = Selection::new(format());
        let mut song = Song::new("x.flac");
        song.title = Some("An Extremely Long Title".into());
        song.artist = Some("Someone".into());
        sel.set_items([("x".to_string(), song)].into_iter().collect());
        let mut screen = Screen::new(Rect::new(0, 0, 20, 1));
        sel.draw(&mut screen, Rect::new(0, 0, 20, 1), None);
        assert_eq!(screen.row(0), "An Extrem…   Someone");
    }

    #[test]
    fn templates_expand_fields() {
        let mut song = Song::new("a/b.ogg");
        song.track = Some("3".into());
        assert_eq!(expand("#{track} {title}", &song), "#3 b.ogg");
        assert_eq!(expand("{unclosed", &song), "{unclosed");
    }
}
