//! Stored playlists and the editor for the one under the catalog cursor.

use mpdeck_proto::{PlaybackService, ServiceResult};

use crate::keys::Key;
use crate::ui::Ui;
use crate::widget::{Kind, Outcome, WidgetId};
use crate::widgets::dialogue::{Dialogue, DialogueCommand};
use crate::widgets::selection::ListView;

impl<S: PlaybackService> Ui<S> {
    pub(crate) async fn catalog_key(&mut self, id: WidgetId, key: Key) -> ServiceResult<Outcome> {
        match key {
            Key::Up | Key::Down => {
                self.navigate(id, key);
                self.follow_catalog_cursor(id).await?;
                Ok(Outcome::Redraw)
            }
            // Playlists are not multi-selectable.
            Key::ShiftDown => Ok(Outcome::Handled),
            Key::Right => {
                if self.list_len(id) > 0 {
                    let editor = self.panes.editor;
                    self.focus(editor).await;
                }
                Ok(Outcome::Handled)
            }
            Key::Delete => {
                let Some(name) = self.current_playlist.clone() else {
                    return Ok(Outcome::Handled);
                };
                let dialogue = Dialogue::confirm(
                    format!("Delete playlist [{name}] from the library?"),
                    &["yes", "no"],
                    1,
                    vec![Some(DialogueCommand::DeletePlaylist(name)), None],
                );
                self.open_dialogue(id, dialogue).await;
                Ok(Outcome::Handled)
            }
            Key::Char('a' | 'A') => {
                let dialogue = Dialogue::prompt(
                    "New playlist name:",
                    "new playlist",
                    &["ok", "cancel"],
                    vec![Some(DialogueCommand::CreatePlaylist), None],
                );
                self.open_dialogue(id, dialogue).await;
                Ok(Outcome::Handled)
            }
            Key::Enter => {
                let Some(name) = self.current_playlist.clone() else {
                    return Ok(Outcome::Handled);
                };
                self.service.enqueue_playlist(&name).await?;
                self.notices.info(format!("Queued playlist {name}"));
                self.paint(self.panes.status);
                Ok(Outcome::Handled)
            }
            _ => Ok(self.navigate(id, key)),
        }
    }

    /// Point the editor at whatever playlist the catalog cursor is on.
    async fn follow_catalog_cursor(&mut self, catalog: WidgetId) -> ServiceResult<()> {
        self.current_playlist = match self.kind_mut(catalog) {
            Some(Kind::Catalog(sel)) => sel.current().map(|p| p.name.clone()),
            _ => None,
        };
        let editor = self.panes.editor;
        if let Some(list) = self.list_mut(editor) {
            list.set_cursor(0);
        }
        self.update(editor).await?;
        self.paint(editor);
        Ok(())
    }

    /// Refresh the catalog after a playlist was created or deleted.
    pub(crate) async fn reload_catalog(&mut self) -> ServiceResult<()> {
        let catalog = self.panes.catalog;
        self.update(catalog).await?;
        self.paint(catalog);
        let editor = self.panes.editor;
        if let Some(list) = self.list_mut(editor) {
            list.set_cursor(0);
        }
        self.update(editor).await?;
        self.paint(editor);
        Ok(())
    }

    pub(crate) async fn editor_key(&mut self, id: WidgetId, key: Key) -> ServiceResult<Outcome> {
        match key {
            Key::Enter => {
                self.enqueue_targets(id).await?;
                Ok(Outcome::Redraw)
            }
            Key::Delete => {
                let Some(name) = self.current_playlist.clone() else {
                    return Ok(Outcome::Handled);
                };
                let targets = self.take_targets(id);
                let mut in_sync = true;
                // Each removal shifts the later positions down by one.
                for (removed, index) in targets.into_iter().enumerate() {
                    let index = index - removed;
                    if let Err(err) = self.service.remove_from_playlist(&name, index).await {
                        self.resync(id).await;
                        return Err(err);
                    }
                    in_sync &= self.drop_row(id, index);
                }
                if !in_sync {
                    self.resync(id).await;
                }
                Ok(Outcome::Redraw)
            }
            // Catalog actions must not fire from inside the editor.
            Key::Char('a' | 'A') => Ok(Outcome::Handled),
            Key::Left => {
                self.focus_parent(id).await;
                Ok(Outcome::Handled)
            }
            Key::Esc => {
                if let Some(songs) = self.songs_mut(id) {
                    if songs.has_selection() {
                        songs.clear_selection();
                        return Ok(Outcome::Redraw);
                    }
                }
                self.focus_parent(id).await;
                Ok(Outcome::Handled)
            }
            Key::Right => {
                let filter = self.panes.filter;
                self.focus(filter).await;
                Ok(Outcome::Handled)
            }
            _ => Ok(self.navigate(id, key)),
        }
    }
}
