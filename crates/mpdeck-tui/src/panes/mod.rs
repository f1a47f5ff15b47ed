//! The concrete panes and where they sit.
//!
//! ```text
//! Queue mode          Playlists mode                 Editing a playlist
//! ┌──────────────┐    ┏━━━━━━━━━━┓┏━━━━━━━━━━┓       ┏━━━━━━━━━━┓┏━━━━━━━━━━┓
//! │ queue        │    ┃ catalog  ┃┃ editor   ┃       ┃ editor   ┃┃ filter   ┃
//! │              │    ┃          ┃┃          ┃       ┃          ┃┣━━━━━━━━━━┫
//! │              │    ┃          ┃┃          ┃       ┃          ┃┃ results  ┃
//! ├──────────────┤    ┗━━━━━━━━━━┛┗━━━━━━━━━━┛       ┗━━━━━━━━━━┛┗━━━━━━━━━━┛
//! │ status       │     status                         status
//! ```
//!
//! The editor is a child of the catalog and slides to the left half while it
//! has focus; the filter field and the search results are its children and
//! are coupled to each other.

pub mod catalog;
pub mod queue;
pub mod search;
pub mod status;

use crate::layout::{LayoutError, Placement};
use crate::theme::{style_accent, style_default, style_playing, style_secondary};
use crate::widget::{Kind, Node, Tree, WidgetId};
use crate::widgets::fit::Align;
use crate::widgets::selection::{RowFormat, Segment, Selection};
use crate::widgets::text_field::TextField;

use search::SearchPane;
use status::StatusPane;

/// Placements that change at runtime, parsed once up front.
#[derive(Debug, Clone, Copy)]
pub struct Layouts {
    pub status_compact: Placement,
    pub status_enlarged: Placement,
    pub editor_right: Placement,
    pub editor_left: Placement,
    pub dialogue: Placement,
}

impl Layouts {
    pub fn parse() -> Result<Self, LayoutError> {
        Ok(Self {
            status_compact: Placement::new("0.0+0;1.0-2", "1.0+0;0.0+2", false)?,
            status_enlarged: Placement::new("0.1+0;0.7+0", "0.8+0;1.0+0", false)?,
            editor_right: Placement::new("0.5+0;0.0+0", "0.5+0;1.0-2", true)?,
            editor_left: Placement::new("0.0+0;0.0+0", "0.5+0;1.0-2", true)?,
            dialogue: Placement::new("0.25+0;0.5-3", "0.5+0;0.0+6", true)?,
        })
    }
}

/// Ids of the long-lived panes.
#[derive(Debug, Clone, Copy)]
pub struct Panes {
    pub queue: WidgetId,
    pub catalog: WidgetId,
    pub editor: WidgetId,
    pub filter: WidgetId,
    pub search: WidgetId,
    pub status: WidgetId,
}

impl Panes {
    pub fn build(tree: &mut Tree, layouts: &Layouts) -> Result<Self, LayoutError> {
        let queue = tree.insert(Node::new(
            Placement::new("0.0+0;0.0+0", "1.0+0;1.0-2", false)?,
            Kind::Queue(Selection::new(queue_format())),
        ));

        let catalog = tree.insert(
            Node::new(
                Placement::new("0.0+0;0.0+0", "0.5+0;1.0-2", true)?,
                Kind::Catalog(Selection::new(catalog_format())),
            )
            .titled("playlists"),
        );
        let editor = tree.add_child(
            catalog,
            Node::new(layouts.editor_right, Kind::Editor(Selection::new(song_format()))),
        );
        let filter = tree.add_child(
            editor,
            Node::new(
                Placement::new("0.5+0;0.0+0", "0.5+0;0.0+3", true)?,
                Kind::Filter(TextField::default()),
            )
            .titled("search"),
        );
        let search = tree.add_child(
            editor,
            Node::new(
                Placement::new("0.5+0;0.0+3", "0.5+0;1.0-5", true)?,
                Kind::Search(SearchPane::new(song_format())),
            )
            .titled("results"),
        );
        tree.couple(filter, search);

        let status = tree.insert(Node::new(
            layouts.status_compact,
            Kind::Status(StatusPane::default()),
        ));

        Ok(Self {
            queue,
            catalog,
            editor,
            filter,
            search,
            status,
        })
    }
}

// ── Row formats ───────────────────────────────────────────────────────────────

fn queue_format() -> RowFormat {
    RowFormat {
        normal: vec![
            Segment::new("{title}", style_default(), Align::Right, 0.5),
            Segment::new("{artist}", style_secondary(), Align::Left, 0.5),
        ],
        playing: vec![
            Segment::new("{title}", style_accent(), Align::Right, 0.5),
            Segment::new("{artist}", style_playing(), Align::Left, 0.5),
        ],
    }
}

fn catalog_format() -> RowFormat {
    let row = vec![Segment::new("{name}", style_accent(), Align::Left, 1.0)];
    RowFormat {
        normal: row.clone(),
        playing: row,
    }
}

fn song_format() -> RowFormat {
    RowFormat {
        normal: vec![
            Segment::new("{title}", style_accent(), Align::Left, 0.5),
            Segment::new("{artist}", style_secondary(), Align::Right, 0.5),
        ],
        playing: vec![
            Segment::new("{title}", style_playing(), Align::Left, 0.5),
            Segment::new("{artist}", style_playing(), Align::Right, 0.5),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::layout::Rect;

    #[test]
    fn built_tree_has_expected_shape() {
        let layouts = Layouts::parse().unwrap();
        let mut tree = Tree::new();
        let panes = Panes::build(&mut tree, &layouts).unwrap();
        assert_eq!(tree.parent(panes.editor), Some(panes.catalog));
        assert_eq!(tree.parent(panes.filter), Some(panes.editor));
        assert_eq!(tree.pair(panes.filter), Some(panes.search));
        assert_eq!(tree.pair(panes.search), Some(panes.filter));
        assert_eq!(tree.parent(panes.queue), None);
        assert_eq!(tree.len(), 6);
    }

    #[test]
    fn editor_halves_tile_the_screen() {
        let layouts = Layouts::parse().unwrap();
        let screen = Rect::new(0, 0, 80, 24);
        assert_eq!(layouts.editor_left.frame(screen), Some(Rect::new(0, 0, 40, 22)));
        assert_eq!(layouts.editor_right.frame(screen), Some(Rect::new(40, 0, 40, 22)));
        assert_eq!(layouts.status_compact.content(screen), Rect::new(0, 22, 80, 2));
        assert_eq!(layouts.dialogue.frame(screen), Some(Rect::new(20, 9, 40, 6)));
    }
}
