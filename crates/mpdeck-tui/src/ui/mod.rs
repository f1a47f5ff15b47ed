//! The UI controller.
//!
//! Owns the widget tree, the screen and the playback service. Everything the
//! user does arrives through [`Ui::dispatch`]; everything the server does is
//! noticed through [`Ui::tick`]. Widgets never talk to each other directly:
//! handlers run here with the controller borrowed mutably, and the only
//! "shared" state is the focus, the active registry and the mode.
//!
//! Routing rules:
//!
//! * Ctrl-C always exits.
//! * The focused widget sees every key first.
//! * An unhandled Esc falls to the default rule: focus the parent, or exit
//!   when there is none. It never bubbles.
//! * Any other unhandled key bubbles through the ancestors, then reaches the
//!   global keymap.
//!   Child panes swallow keys that would fire an ancestor's own actions.
//! * Service failures are logged, shown as a notice and swallowed.

use std::path::PathBuf;

use mpdeck_proto::{KeyedList, PlaybackService, ServiceError, ServiceResult, Song};
use ratatui::layout::Rect;
use tracing::{debug, warn};

use crate::action::{global_command, GlobalCommand, Mode};
use crate::artwork::{ArtworkChange, DEFAULT_CELL_PX};
use crate::keys::Key;
use crate::layout::{LayoutError, Placement};
use crate::panes::search::plural;
use crate::panes::{Layouts, Panes};
use crate::screen::Screen;
use crate::widget::{Kind, Node, Outcome, PaintContext, Role, Tree, WidgetId};
use crate::widgets::border::draw_border;
use crate::widgets::dialogue::{Dialogue, DialogueCommand, DialogueEvent};
use crate::widgets::notice::Notices;
use crate::widgets::selection::{ListView, Selection};


pub struct Ui<S> {
    pub(crate) service: S,
    pub screen: Screen,
    pub(crate) tree: Tree,
    /// Widgets currently on screen, in paint order.
    pub(crate) active: Vec<WidgetId>,
    pub(crate) focused: Option<WidgetId>,
    pub(crate) mode: Option<Mode>,
    pub(crate) panes: Panes,
    layouts: Layouts,
    /// Stored playlist the editor shows.
    pub(crate) current_playlist: Option<String>,
    /// Queue id of the song that was playing at the last poll.
    pub(crate) now_playing: Option<u32>,
    pub(crate) notices: Notices,
    pub(crate) placeholder: Option<PathBuf>,
    /// Artwork update waiting for the terminal.
    pub(crate) artwork: Option<ArtworkChange>,
    pub(crate) cell_px: (u16, u16),
}

impl<S: PlaybackService> Ui<S> {
    pub fn new(service: S, area: Rect, placeholder: Option<PathBuf>) -> Result<Self, LayoutError> {
        let layouts = Layouts::parse()?;
        let mut tree = Tree::new();
        let panes = Panes::build(&mut tree, &layouts)?;
        Ok(Self {
            service,
            screen: Screen::new(area),
            tree,
            active: Vec::new(),
            focused: None,
            mode: None,
            panes,
            layouts,
            current_playlist: None,
            now_playing: None,
            notices: Notices::new(),
            placeholder,
            artwork: None,
            cell_px: DEFAULT_CELL_PX,
        })
    }

    // ── Accessors ────────────────────────────────────────────────────────────

    pub fn set_cell_pixels(&mut self, cell_px: (u16, u16)) {
        if cell_px.0 > 0 && cell_px.1 > 0 {
            self.cell_px = cell_px;
        }
    }

    /// Pending artwork change for the terminal, if any.
    pub fn take_artwork(&mut self) -> Option<ArtworkChange> {
        self.artwork.take()
    }

    pub(crate) fn kind_mut(&mut self, id: WidgetId) -> Option<&mut Kind> {
        self.tree.get_mut(id).map(|n| &mut n.kind)
    }

    pub(crate) fn list_mut(&mut self, id: WidgetId) -> Option<&mut dyn ListView> {
        self.tree.get_mut(id).and_then(|n| n.kind.list_mut())
    }

    pub(crate) fn list_len(&mut self, id: WidgetId) -> usize {
        self.list_mut(id).map_or(0, |l| l.len())
    }

    pub(crate) fn songs(&self, id: WidgetId) -> Option<&Selection<Song>> {
        self.tree.get(id).and_then(|n| n.kind.songs())
    }

    pub(crate) fn songs_mut(&mut self, id: WidgetId) -> Option<&mut Selection<Song>> {
        self.tree.get_mut(id).and_then(|n| n.kind.songs_mut())
    }

    // ── Lifecycle ────────────────────────────────────────────────────────────

    /// Load the initial data and show the queue.
    pub async fn launch(&mut self) {
        let catalog = self.panes.catalog;
        if let Err(err) = self.update(catalog).await {
            self.report(err);
        }
        if let Err(err) = self.refresh_status().await {
            self.report(err);
        }
        self.set_mode(Mode::Queue).await;
    }

    /// Periodic work: expire notices and poll the server.
    pub async fn tick(&mut self) {
        if self.notices.tick() {
            self.paint(self.panes.status);
        }
        if let Err(err) = self.refresh_status().await {
            self.report(err);
        }
    }

    pub fn resize(&mut self, area: Rect) {
        if area == self.screen.area() {
            return;
        }
        debug!(width = area.width, height = area.height, "resize");
        self.screen.resize(area);
        self.repaint_all();
        if self.mode == Some(Mode::NowPlaying) {
            self.place_artwork();
        }
    }

    pub async fn set_mode(&mut self, mode: Mode) {
        if self.mode == Some(mode) {
            return;
        }
        let leaving_now_playing = self.mode == Some(Mode::NowPlaying);
        self.mode = Some(mode);
        debug!(?mode, "mode");

        let enlarged = mode == Mode::NowPlaying;
        let placement = if enlarged {
            self.layouts.status_enlarged
        } else {
            self.layouts.status_compact
        };
        if let Some(node) = self.tree.get_mut(self.panes.status) {
            node.placement = placement;
            if let Kind::Status(pane) = &mut node.kind {
                pane.enlarged = enlarged;
            }
        }
        self.screen.clear();
        if leaving_now_playing {
            self.artwork = Some(ArtworkChange::Hide);
        }

        let primary = match mode {
            Mode::Queue => self.panes.queue,
            Mode::NowPlaying => self.panes.status,
            Mode::Playlists => self.panes.catalog,
        };
        self.focus(primary).await;
        if enlarged {
            self.refresh_artwork().await;
        }
        self.repaint_all();
    }

    // ── Focus and registry ───────────────────────────────────────────────────

    pub async fn focus(&mut self, id: WidgetId) {
        if !self.tree.contains(id) {
            return;
        }
        let previous = self.focused.replace(id).filter(|&p| p != id);
        if let Some(node) = previous.and_then(|p| self.tree.get_mut(p)) {
            node.focused = false;
        }
        if let Some(node) = self.tree.get_mut(id) {
            node.focused = true;
        }

        let revealed = self.apply_registry(id);
        if let Err(err) = self.update(id).await {
            self.report(err);
        }
        for other in revealed {
            if let Err(err) = self.update(other).await {
                self.report(err);
            }
            self.paint(other);
        }
        if let Some(previous) = previous {
            self.paint(previous);
        }
        self.paint(id);
    }

    pub(crate) async fn focus_parent(&mut self, id: WidgetId) {
        if let Some(parent) = self.tree.parent(id) {
            self.focus(parent).await;
        }
    }

    /// Set the active registry for a newly focused widget and return the
    /// widgets that just became visible besides it.
    fn apply_registry(&mut self, id: WidgetId) -> Vec<WidgetId> {
        let panes = self.panes;
        let next = match self.tree.role(id) {
            Some(Role::Queue) => vec![panes.queue],
            Some(Role::Catalog) => {
                self.place(panes.editor, self.layouts.editor_right);
                vec![panes.catalog, panes.editor]
            }
            Some(Role::Editor) => {
                self.place(panes.editor, self.layouts.editor_left);
                vec![panes.editor, panes.filter, panes.search]
            }
            Some(Role::Status) => Vec::new(),
            Some(Role::Filter | Role::Search | Role::Dialogue) | None => return Vec::new(),
        };
        let revealed = next
            .iter()
            .copied()
            .filter(|&w| w != id && !self.active.contains(&w))
            .collect();
        self.active = next;
        revealed
    }

    fn place(&mut self, id: WidgetId, placement: Placement) {
        if let Some(node) = self.tree.get_mut(id) {
            node.placement = placement;
        }
    }

    // ── Painting ─────────────────────────────────────────────────────────────

    fn visible(&self, id: WidgetId) -> bool {
        id == self.panes.status || self.active.contains(&id) || self.focused == Some(id)
    }

    /// Draw one widget's frame and content into the screen buffer.
    pub fn paint(&mut self, id: WidgetId) {
        if !self.visible(id) {
            return;
        }
        let screen_area = self.screen.area();
        let ctx = PaintContext {
            now_playing: self.now_playing,
            notice: self.notices.latest(),
        };
        let Some(node) = self.tree.get_mut(id) else {
            return;
        };
        if let Some(frame) = node.placement.frame(screen_area) {
            draw_border(&mut self.screen, frame, node.title.as_deref(), node.focused);
        }
        let area = node.placement.content(screen_area);
        node.kind.draw(&mut self.screen, area, node.focused, &ctx);
    }

    /// Paint a widget and then everything registered after it, so an open
    /// dialogue stays on top.
    pub(crate) fn paint_stacked(&mut self, id: WidgetId) {
        self.paint(id);
        let above: Vec<WidgetId> = self
            .active
            .iter()
            .skip_while(|&&w| w != id)
            .skip(1)
            .copied()
            .collect();
        for other in above {
            self.paint(other);
        }
    }

    pub fn repaint_all(&mut self) {
        for id in self.active.clone() {
            self.paint(id);
        }
        self.paint(self.panes.status);
    }

    // ── Data ─────────────────────────────────────────────────────────────────

    /// Re-fetch whatever a widget shows from the service.
    pub(crate) async fn update(&mut self, id: WidgetId) -> ServiceResult<()> {
        match self.tree.role(id) {
            Some(Role::Catalog) => {
                let playlists = self.service.list_playlists().await?;
                if let Some(Kind::Catalog(sel)) = self.tree.get_mut(id).map(|n| &mut n.kind) {
                    // Keep the cursor on the playlist being edited if it survived.
                    let keep = self
                        .current_playlist
                        .as_ref()
                        .and_then(|name| playlists.keys().position(|k| k == name));
                    sel.set_items(playlists);
                    if let Some(index) = keep {
                        sel.set_cursor(index);
                    }
                    self.current_playlist = sel.current().map(|p| p.name.clone());
                }
            }
            Some(Role::Editor) => {
                let items = match self.current_playlist.clone() {
                    None => KeyedList::new(),
                    Some(name) => match self.service.list_playlist_items(&name).await {
                        Ok(items) => items,
                        Err(ServiceError::NotFound(_)) => KeyedList::new(),
                        Err(err) => return Err(err),
                    },
                };
                let title = self.current_playlist.clone();
                if let Some(node) = self.tree.get_mut(id) {
                    node.title = title;
                    if let Kind::Editor(sel) = &mut node.kind {
                        sel.set_items(items);
                    }
                }
            }
            Some(Role::Search) => {
                let query = match self.kind_mut(id) {
                    Some(Kind::Search(pane)) => pane.query.clone(),
                    _ => return Ok(()),
                };
                let results = self.service.search(&query).await?;
                if let Some(Kind::Search(pane)) = self.kind_mut(id) {
                    pane.results.set_items(results);
                }
            }
            Some(Role::Queue) => {
                let queue = self.service.list_queue().await?;
                if let Some(sel) = self.songs_mut(id) {
                    sel.set_items(queue);
                }
            }
            // The status pane is refreshed on every tick.
            Some(Role::Status | Role::Filter | Role::Dialogue) | None => {}
        }
        Ok(())
    }

    pub(crate) fn navigate(&mut self, id: WidgetId, key: Key) -> Outcome {
        self.list_mut(id)
            .map_or(Outcome::Unhandled, |list| list.navigate(key))
    }

    pub(crate) fn target_files(&self, id: WidgetId) -> Vec<String> {
        self.songs(id)
            .map(|s| s.target_values().into_iter().map(|song| song.file.clone()).collect())
            .unwrap_or_default()
    }

    /// Append the targeted songs to the play queue.
    pub(crate) async fn enqueue_targets(&mut self, id: WidgetId) -> ServiceResult<()> {
        let files = self.target_files(id);
        for file in &files {
            self.service.enqueue(file).await?;
        }
        if let Some(songs) = self.songs_mut(id) {
            songs.clear_selection();
        }
        if !files.is_empty() {
            self.notices.info(format!("Queued {}", plural(files.len())));
            self.paint(self.panes.status);
        }
        Ok(())
    }

    /// Targeted rows of a song list, with its multi-selection dropped.
    pub(crate) fn take_targets(&mut self, id: WidgetId) -> Vec<usize> {
        self.songs_mut(id).map_or_else(Vec::new, |songs| {
            let targets = songs.targets();
            songs.clear_selection();
            targets
        })
    }

    /// Drop row `index` locally after the server removed it. Returns false
    /// when the local copy no longer lines up with the server.
    pub(crate) fn drop_row(&mut self, id: WidgetId, index: usize) -> bool {
        match self.songs_mut(id).map(|songs| songs.remove_at(index)) {
            Some(Ok(())) => true,
            Some(Err(err)) => {
                debug!(index, "local row already gone: {}", err);
                false
            }
            None => false,
        }
    }

    /// Reload a list whose local copy may have drifted from the server.
    pub(crate) async fn resync(&mut self, id: WidgetId) {
        if let Err(err) = self.update(id).await {
            warn!("resync failed: {}", err);
        }
        self.paint(id);
    }

    pub(crate) fn report(&mut self, err: ServiceError) {
        warn!("{}", err);
        self.notices.error(err.to_string());
        self.paint(self.panes.status);
    }

    // ── Dialogues ────────────────────────────────────────────────────────────

    pub(crate) async fn open_dialogue(&mut self, owner: WidgetId, dialogue: Dialogue) -> WidgetId {
        let node = Node::new(self.layouts.dialogue, Kind::Dialogue(dialogue));
        let id = self.tree.add_child(owner, node);
        self.active.push(id);
        self.focus(id).await;
        id
    }

    /// Tear a dialogue down and hand focus back to its owner.
    pub(crate) async fn close_dialogue(&mut self, id: WidgetId) {
        let owner = self.tree.parent(id);
        self.active.retain(|&w| w != id);
        self.tree.remove(id);
        self.screen.clear();
        if let Some(owner) = owner {
            self.focus(owner).await;
        }
        self.repaint_all();
    }

    async fn dialogue_key(&mut self, id: WidgetId, key: Key) -> ServiceResult<Outcome> {
        let Some(Kind::Dialogue(dialogue)) = self.kind_mut(id) else {
            return Ok(Outcome::Unhandled);
        };
        match dialogue.handle_key(key) {
            DialogueEvent::Redraw => Ok(Outcome::Redraw),
            DialogueEvent::Ignored => Ok(Outcome::Handled),
            DialogueEvent::Cancelled => {
                self.close_dialogue(id).await;
                Ok(Outcome::Handled)
            }
            DialogueEvent::Confirmed { option } => {
                let command = dialogue.command_for(option);
                let text = dialogue.text().unwrap_or_default().to_string();
                self.close_dialogue(id).await;
                if let Some(command) = command {
                    self.run_dialogue_command(command, &text).await?;
                }
                Ok(Outcome::Handled)
            }
        }
    }

    async fn run_dialogue_command(&mut self, command: DialogueCommand, text: &str) -> ServiceResult<()> {
        debug!(?command, "dialogue confirmed");
        match command {
            DialogueCommand::DeletePlaylist(name) => {
                self.service.delete_playlist(&name).await?;
                self.notices.info(format!("Deleted playlist {name}"));
                self.reload_catalog().await?;
            }
            DialogueCommand::CreatePlaylist => {
                let name = text.trim();
                if name.is_empty() {
                    return Ok(());
                }
                match self.service.create_playlist(name).await {
                    Ok(()) => {
                        self.current_playlist = Some(name.to_string());
                        self.reload_catalog().await?;
                    }
                    Err(ServiceError::DuplicateName(_)) => {
                        let catalog = self.panes.catalog;
                        self.open_dialogue(catalog, Dialogue::notice("Duplicate playlist name!"))
                            .await;
                    }
                    Err(err) => return Err(err),
                }
            }
            DialogueCommand::ClearQueue => {
                self.service.clear_queue().await?;
                let queue = self.panes.queue;
                self.update(queue).await?;
                self.paint(queue);
            }
        }
        Ok(())
    }

    // ── Input ────────────────────────────────────────────────────────────────

    pub async fn dispatch(&mut self, key: Key) -> Outcome {
        if key == Key::Interrupt {
            return Outcome::Exit;
        }
        match self.route(key).await {
            Ok(outcome) => outcome,
            Err(err) => {
                self.report(err);
                Outcome::Handled
            }
        }
    }

    async fn route(&mut self, key: Key) -> ServiceResult<Outcome> {
        let Some(focused) = self.focused else {
            return self.global(key).await;
        };
        let mut outcome = self.offer(focused, key).await?;
        if outcome != Outcome::Unhandled {
            return Ok(outcome);
        }
        if key == Key::Esc {
            return Ok(match self.tree.parent(focused) {
                Some(parent) => {
                    // focus() has already repainted both widgets.
                    self.focus(parent).await;
                    Outcome::Redraw
                }
                None => Outcome::Exit,
            });
        }

        let mut ancestor = self.tree.parent(focused);
        while let Some(id) = ancestor {
            outcome = self.offer(id, key).await?;
            if outcome != Outcome::Unhandled {
                return Ok(outcome);
            }
            ancestor = self.tree.parent(id);
        }
        self.global(key).await
    }

    /// Run one widget's key handler, repainting it if asked to.
    async fn offer(&mut self, id: WidgetId, key: Key) -> ServiceResult<Outcome> {
        let outcome = match self.tree.role(id) {
            Some(Role::Catalog) => self.catalog_key(id, key).await?,
            Some(Role::Editor) => self.editor_key(id, key).await?,
            Some(Role::Search) => self.search_key(id, key).await?,
            Some(Role::Filter) => self.filter_key(id, key).await?,
            Some(Role::Queue) => self.queue_key(id, key).await?,
            Some(Role::Dialogue) => self.dialogue_key(id, key).await?,
            Some(Role::Status) | None => Outcome::Unhandled,
        };
        if outcome == Outcome::Redraw {
            self.paint(id);
        }
        Ok(outcome)
    }

    async fn global(&mut self, key: Key) -> ServiceResult<Outcome> {
        let Some(command) = global_command(key) else {
            return Ok(Outcome::Unhandled);
        };
        match command {
            GlobalCommand::SetMode(mode) => {
                self.set_mode(mode).await;
                return Ok(Outcome::Handled);
            }
            GlobalCommand::TogglePause => self.service.pause().await?,
            GlobalCommand::Skip => self.service.skip().await?,
            GlobalCommand::ToggleRandom => self.service.toggle_random().await?,
            GlobalCommand::ToggleRepeat => self.service.toggle_repeat().await?,
            GlobalCommand::Quit => return Ok(Outcome::Exit),
        }
        self.refresh_status().await?;
        Ok(Outcome::Handled)
    }
}

#[cfg(test)]
impl<S: PlaybackService> Ui<S> {
    pub fn mode(&self) -> Option<Mode> {
        self.mode
    }

    pub fn focused(&self) -> Option<WidgetId> {
        self.focused
    }

    pub fn active(&self) -> &[WidgetId] {
        &self.active
    }

    pub fn panes(&self) -> &Panes {
        &self.panes
    }

    pub fn service(&self) -> &S {
        &self.service
    }
}
