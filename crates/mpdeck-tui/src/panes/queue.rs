//! The play queue.

use mpdeck_proto::{PlaybackService, ServiceResult};

use crate::keys::Key;
use crate::ui::Ui;
use crate::widget::{Outcome, WidgetId};
use crate::widgets::dialogue::{Dialogue, DialogueCommand};
use crate::widgets::selection::ListView;

impl<S: PlaybackService> Ui<S> {
    pub(crate) async fn queue_key(&mut self, id: WidgetId, key: Key) -> ServiceResult<Outcome> {
        match key {
            Key::Enter => {
                let Some(songs) = self.songs(id) else {
                    return Ok(Outcome::Unhandled);
                };
                if songs.has_selection() {
                    return Ok(Outcome::Unhandled);
                }
                let Some(song_id) = songs.current().and_then(|s| s.id) else {
                    return Ok(Outcome::Handled);
                };
                self.service.play_by_id(song_id).await?;
                self.refresh_status().await?;
                Ok(Outcome::Redraw)
            }
            Key::Delete => {
                let targets = self.take_targets(id);
                let mut in_sync = true;
                for (removed, index) in targets.into_iter().enumerate() {
                    let index = index - removed;
                    if let Err(err) = self.service.dequeue(index).await {
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
            Key::Char('C') => {
                let dialogue = Dialogue::confirm(
                    "Clear the play queue?",
                    &["yes", "no"],
                    1,
                    vec![Some(DialogueCommand::ClearQueue), None],
                );
                self.open_dialogue(id, dialogue).await;
                Ok(Outcome::Handled)
            }
            _ => Ok(self.navigate(id, key)),
        }
    }
}
