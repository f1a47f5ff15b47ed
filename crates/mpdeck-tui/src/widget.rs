//! Widget arena.
//!
//! Widgets live in a `SlotMap` and refer to each other by `WidgetId`: a
//! parent owns its children (removing a node drops its subtree), while the
//! parent back-link and the symmetric pair link are plain ids. Lookups on a
//! removed id simply miss, which is how focus code tolerates a widget that
//! was torn down underneath it.

use mpdeck_proto::{PlaylistInfo, Song};
use ratatui::layout::Rect;
use slotmap::{new_key_type, SlotMap};

use crate::layout::Placement;
use crate::panes::search::SearchPane;
use crate::panes::status::StatusPane;
use crate::screen::Screen;
use crate::widgets::dialogue::Dialogue;
use crate::widgets::notice::Notice;
use crate::widgets::selection::{ListView, Selection};
use crate::widgets::text_field::TextField;

new_key_type! {
    pub struct WidgetId;
}

/// Result of offering a key to a widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Consumed; the handler painted whatever it changed.
    Handled,
    /// Consumed; repaint the widget that handled it.
    Redraw,
    /// Not for this widget; keep bubbling.
    Unhandled,
    /// Leave the application.
    Exit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Catalog,
    Editor,
    Search,
    Queue,
    Filter,
    Dialogue,
    Status,
}

pub enum Kind {
    /// Stored playlists.
    Catalog(Selection<PlaylistInfo>),
    /// Songs of the current stored playlist.
    Editor(Selection<Song>),
    Search(SearchPane),
    Queue(Selection<Song>),
    /// Search query input, paired with the search results.
    Filter(TextField),
    Dialogue(Dialogue),
    Status(StatusPane),
}

/// Shared state a widget may need while painting.
pub struct PaintContext<'a> {
    pub now_playing: Option<u32>,
    pub notice: Option<&'a Notice>,
}

impl Kind {
    pub fn role(&self) -> Role {
        match self {
            Kind::Catalog(_) => Role::Catalog,
            Kind::Editor(_) => Role::Editor,
            Kind::Search(_) => Role::Search,
            Kind::Queue(_) => Role::Queue,
            Kind::Filter(_) => Role::Filter,
            Kind::Dialogue(_) => Role::Dialogue,
            Kind::Status(_) => Role::Status,
        }
    }

    pub fn list_mut(&mut self) -> Option<&mut dyn ListView> {
        match self {
            Kind::Catalog(sel) => Some(sel),
            Kind::Editor(sel) | Kind::Queue(sel) => Some(sel),
            Kind::Search(pane) => Some(&mut pane.results),
            _ => None,
        }
    }

    pub fn songs(&self) -> Option<&Selection<Song>> {
        match self {
            Kind::Editor(sel) | Kind::Queue(sel) => Some(sel),
            Kind::Search(pane) => Some(&pane.results),
            _ => None,
        }
    }

    pub fn songs_mut(&mut self) -> Option<&mut Selection<Song>> {
        match self {
            Kind::Editor(sel) | Kind::Queue(sel) => Some(sel),
            Kind::Search(pane) => Some(&mut pane.results),
            _ => None,
        }
    }

    pub fn draw(&mut self, screen: &mut Screen, area: Rect, focused: bool, ctx: &PaintContext<'_>) {
        match self {
            Kind::Catalog(sel) => sel.draw(screen, area, ctx.now_playing),
            Kind::Editor(sel) | Kind::Queue(sel) => sel.draw(screen, area, ctx.now_playing),
            Kind::Search(pane) => pane.results.draw(screen, area, ctx.now_playing),
            Kind::Filter(field) => field.draw(screen, area, focused),
            Kind::Dialogue(dialogue) => dialogue.draw(screen, area),
            Kind::Status(status) => status.draw(screen, area, ctx.notice),
        }
    }
}

pub struct Node {
    pub placement: Placement,
    pub title: Option<String>,
    pub focused: bool,
    pub parent: Option<WidgetId>,
    pub children: Vec<WidgetId>,
    pub pair: Option<WidgetId>,
    pub kind: Kind,
}

impl Node {
    pub fn new(placement: Placement, kind: Kind) -> Self {
        Self {
            placement,
            title: None,
            focused: false,
            parent: None,
            children: Vec::new(),
            pair: None,
            kind,
        }
    }

    pub fn titled(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn role(&self) -> Role {
        self.kind.role()
    }
}

#[derive(Default)]
pub struct Tree {
    nodes: SlotMap<WidgetId, Node>,
}

impl Tree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, node: Node) -> WidgetId {
        self.nodes.insert(node)
    }

    /// Insert `node` as the last child of `parent`.
    pub fn add_child(&mut self, parent: WidgetId, mut node: Node) -> WidgetId {
        node.parent = Some(parent);
        let id = self.nodes.insert(node);
        if let Some(p) = self.nodes.get_mut(parent) {
            p.children.push(id);
        }
        id
    }

    pub fn couple(&mut self, a: WidgetId, b: WidgetId) {
        if let Some(node) = self.nodes.get_mut(a) {
            node.pair = Some(b);
        }
        if let Some(node) = self.nodes.get_mut(b) {
            node.pair = Some(a);
        }
    }

    /// Detach `id` from its parent and drop it with its whole subtree.
    pub fn remove(&mut self, id: WidgetId) -> Option<Node> {
        let node = self.nodes.remove(id)?;
        if let Some(parent) = node.parent.and_then(|p| self.nodes.get_mut(p)) {
            parent.children.retain(|&c| c != id);
        }
        if let Some(pair) = node.pair.and_then(|p| self.nodes.get_mut(p)) {
            if pair.pair == Some(id) {
                pair.pair = None;
            }
        }
        for &child in &node.children {
            self.remove(child);
        }
        Some(node)
    }

    pub fn get(&self, id: WidgetId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn get_mut(&mut self, id: WidgetId) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    pub fn contains(&self, id: WidgetId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn parent(&self, id: WidgetId) -> Option<WidgetId> {
        self.nodes.get(id).and_then(|n| n.parent)
    }

    pub fn pair(&self, id: WidgetId) -> Option<WidgetId> {
        self.nodes.get(id).and_then(|n| n.pair)
    }

    pub fn role(&self, id: WidgetId) -> Option<Role> {
        self.nodes.get(id).map(Node::role)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node() -> Node {
        let placement = Placement::new("0.0+0;0.0+0", "0.5+0;0.5+0", true).unwrap();
        Node::new(placement, Kind::Filter(TextField::default()))
    }

    #[test]
    fn children_link_back_to_parent() {
        let mut tree = Tree::new();
        let root = tree.insert(node());
        let child = tree.add_child(root, node());
        assert_eq!(tree.parent(child), Some(root));
        assert_eq!(tree.get(root).map(|n| n.children.clone()), Some(vec![child]));
        assert_eq!(tree.parent(root), None);
    }

    #[test]
    fn couple_is_symmetric_and_cleared_on_remove() {
        let mut tree = Tree::new();
        let a = tree.insert(node());
        let b = tree.insert(node());
        tree.couple(a, b);
        assert_eq!((tree.pair(a), tree.pair(b)), (Some(b), Some(a)));
        tree.remove(b);
        assert_eq!(tree.pair(a), None);
    }

    #[test]
    fn remove_drops_subtree_and_detaches() {
        let mut tree = Tree::new();
        let root = tree.insert(node());
        let mid = tree.add_child(root, node());
        let leaf = tree.add_child(mid, node());
        let dialogue = tree.add_child(
            root,
            Node::new(node().placement, Kind::Dialogue(Dialogue::notice("hi"))),
        );
        assert_eq!(tree.role(dialogue), Some(Role::Dialogue));

        tree.remove(mid);
        assert!(!tree.contains(mid));
        assert!(!tree.contains(leaf));
        assert_eq!(tree.get(root).map(|n| n.children.clone()), Some(vec![dialogue]));
        assert_eq!(tree.len(), 2);
        assert!(tree.remove(mid).is_none());
    }
}
