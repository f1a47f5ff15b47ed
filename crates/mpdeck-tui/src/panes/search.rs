//! Library search: the filter field and the result list it drives.

use mpdeck_proto::{PlaybackService, ServiceResult, Song};

use crate::keys::Key;
use crate::ui::Ui;
use crate::widget::{Kind, Outcome, WidgetId};
use crate::widgets::selection::{ListView, RowFormat, Selection};

/// Results of the last query, refreshed on every keystroke in the filter.
pub struct SearchPane {
    pub query: String,
    pub results: Selection<Song>,
}

impl SearchPane {
    pub fn new(format: RowFormat) -> Self {
        Self {
            query: String::new(),
            results: Selection::new(format),
        }
    }
}

impl<S: PlaybackService> Ui<S> {
    pub(crate) async fn filter_key(&mut self, id: WidgetId, key: Key) -> ServiceResult<Outcome> {
        match key {
            Key::Char(c) => {
                if let Some(Kind::Filter(field)) = self.kind_mut(id) {
                    field.push(c);
                }
                self.query_changed(id).await?;
                Ok(Outcome::Redraw)
            }
            Key::Backspace => {
                if let Some(Kind::Filter(field)) = self.kind_mut(id) {
                    field.backspace();
                }
                self.query_changed(id).await?;
                Ok(Outcome::Redraw)
            }
            Key::Tab | Key::Enter | Key::Down => {
                if let Some(pair) = self.tree.pair(id) {
                    self.focus(pair).await;
                }
                Ok(Outcome::Handled)
            }
            Key::Left => {
                self.focus_parent(id).await;
                Ok(Outcome::Handled)
            }
            // Back to the editor through the default rule.
            Key::Esc => Ok(Outcome::Unhandled),
            // Everything else is text input and must not reach the keymap.
            _ => Ok(Outcome::Handled),
        }
    }

    /// Push the filter's text into its paired result list and re-run it.
    async fn query_changed(&mut self, filter: WidgetId) -> ServiceResult<()> {
        let Some(pair) = self.tree.pair(filter) else {
            return Ok(());
        };
        let query = match self.kind_mut(filter) {
            Some(Kind::Filter(field)) => field.value().to_string(),
            _ => return Ok(()),
        };
        if let Some(Kind::Search(pane)) = self.kind_mut(pair) {
            pane.query = query;
        }
        self.update(pair).await?;
        self.paint(pair);
        Ok(())
    }

    pub(crate) async fn search_key(&mut self, id: WidgetId, key: Key) -> ServiceResult<Outcome> {
        match key {
            Key::Tab => {
                if let Some(pair) = self.tree.pair(id) {
                    self.focus(pair).await;
                }
                Ok(Outcome::Handled)
            }
            Key::Enter => {
                self.enqueue_targets(id).await?;
                Ok(Outcome::Redraw)
            }
            Key::Left => {
                self.focus_parent(id).await;
                Ok(Outcome::Handled)
            }
            Key::Char('+' | '=') => {
                let Some(name) = self.current_playlist.clone() else {
                    return Ok(Outcome::Handled);
                };
                let files = self.target_files(id);
                for file in &files {
                    self.service.add_to_playlist(&name, file).await?;
                }
                if let Some(results) = self.songs_mut(id) {
                    results.clear_selection();
                }
                if !files.is_empty() {
                    self.notices.info(format!("Added {} to {name}", plural(files.len())));
                    self.paint(self.panes.status);
                }
                let editor = self.panes.editor;
                self.update(editor).await?;
                self.paint(editor);
                Ok(Outcome::Redraw)
            }
            // Results are not a playlist; nothing to delete. The others would
            // otherwise bubble into the editor or the catalog.
            Key::Delete | Key::Right | Key::Char('a' | 'A') => Ok(Outcome::Handled),
            _ => Ok(self.navigate(id, key)),
        }
    }
}

pub(crate) fn plural(n: usize) -> String {
    if n == 1 {
        "1 song".to_string()
    } else {
        format!("{n} songs")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_read_naturally() {
        assert_eq!(plural(1), "1 song");
        assert_eq!(plural(3), "3 songs");
    }

    #[test]
    fn new_pane_is_empty() {
        let pane = SearchPane::new(RowFormat {
            normal: Vec::new(),
            playing: Vec::new(),
        });
        assert!(pane.query.is_empty());
        assert_eq!(pane.results.len(), 0);
    }
}
