//! Playback status: progress bar, current song and playback flags.
//!
//! Two layouts share one pane. The compact one is the two-row bar under the
//! queue and the playlist browser; the enlarged one fills the lower part of
//! the screen in now-playing mode, with artwork placed above it.

use std::path::PathBuf;

use mpdeck_proto::{PlaybackService, PlaybackState, ServiceResult, Song, Status};
use ratatui::{layout::Rect, style::Style};

use crate::action::Mode;
use crate::artwork::{self, ArtworkChange};
use crate::screen::Screen;
use crate::theme::{style_accent, style_album, style_artist, style_bold, style_default, style_secondary};
use crate::ui::Ui;
use crate::widget::Kind;
use crate::widgets::fit;
use crate::widgets::notice::Notice;
use crate::widgets::progress_bar::{draw_progress, fmt_time};

#[derive(Debug, Default)]
pub struct StatusPane {
    pub status: Status,
    pub song: Option<Song>,
    /// Image shown in now-playing mode, if any.
    pub artwork: Option<PathBuf>,
    pub enlarged: bool,
}

type Span = (String, Style);

impl StatusPane {
    pub fn stopped(&self) -> bool {
        self.status.state == PlaybackState::Stop || self.song.is_none()
    }

    pub fn draw(&self, screen: &mut Screen, area: Rect, notice: Option<&Notice>) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        screen.blank(area);
        if self.enlarged {
            self.draw_enlarged(screen, area, notice);
        } else {
            self.draw_compact(screen, area, notice);
        }
    }

    fn draw_compact(&self, screen: &mut Screen, area: Rect, notice: Option<&Notice>) {
        draw_progress(screen, row(area, 0), self.status.elapsed, self.status.duration);
        let line = row(area, 1);
        if line.height == 0 {
            return;
        }
        if let Some(notice) = notice {
            put_spans(screen, line.x, line.y, line.width, &[(notice.line(), notice.style())]);
            return;
        }
        if self.stopped() {
            put_spans(screen, line.x, line.y, line.width, &[("Stopped".into(), style_bold())]);
            return;
        }

        let mut stamps = String::new();
        if self.status.random {
            stamps.push_str("⤮ ");
        }
        if self.status.repeat {
            stamps.push_str("↻ ");
        }
        let clock = format!(
            "{}/{}",
            fmt_time(self.status.elapsed.as_secs_f64()),
            fmt_time(self.status.duration.as_secs_f64())
        );
        let right = [(stamps, style_secondary()), (clock, style_bold())];
        let right_width = right.iter().map(|(t, _)| fit::width(t)).sum::<usize>() as u16;
        let right_x = line.right().saturating_sub(right_width).max(line.x);
        put_spans(screen, right_x, line.y, line.right() - right_x, &right);

        let mut left = Vec::new();
        if self.status.state == PlaybackState::Pause {
            left.push(("Paused: ".to_string(), style_bold()));
        }
        left.extend(self.title_and_artist(" by "));
        let room = (right_x - line.x).saturating_sub(1);
        put_spans(screen, line.x, line.y, room, &left);
    }

    fn draw_enlarged(&self, screen: &mut Screen, area: Rect, notice: Option<&Notice>) {
        draw_progress(screen, row(area, 0), self.status.elapsed, self.status.duration);

        let title: Vec<Span> = if let Some(notice) = notice {
            vec![(notice.line(), notice.style())]
        } else if self.stopped() {
            vec![("Stopped".into(), style_bold())]
        } else {
            let mut spans = Vec::new();
            if self.status.state == PlaybackState::Pause {
                spans.push(("Paused ─ ".to_string(), style_bold()));
            }
            spans.push((self.display_title(), style_accent()));
            spans
        };
        put_centered(screen, row(area, 1), &title);

        if self.stopped() {
            return;
        }
        let Some(song) = &self.song else {
            return;
        };
        let mut detail: Vec<Span> = Vec::new();
        if let Some(artist) = song.artist.as_deref().filter(|a| !a.is_empty()) {
            detail.push((artist.to_string(), style_artist()));
        }
        if let Some(album) = song.album.as_deref().filter(|a| !a.is_empty()) {
            if !detail.is_empty() {
                detail.push((" ─ ".into(), style_default()));
            }
            detail.push((album.to_string(), style_album()));
        }
        if let Some(track) = song.track.as_deref().filter(|t| !t.is_empty()) {
            detail.push((format!(" (#{track})"), style_secondary()));
        }
        put_centered(screen, row(area, 2), &detail);
    }

    fn display_title(&self) -> String {
        self.song
            .as_ref()
            .map(|s| s.display_title().to_string())
            .unwrap_or_default()
    }

    fn title_and_artist(&self, joiner: &str) -> Vec<Span> {
        let mut spans = vec![(self.display_title(), style_accent())];
        if let Some(artist) = self
            .song
            .as_ref()
            .and_then(|s| s.artist.as_deref())
            .filter(|a| !a.is_empty())
        {
            spans.push((joiner.to_string(), style_default()));
            spans.push((artist.to_string(), style_artist()));
        }
        spans
    }
}

/// Row `n` of `area`, or an empty rect when the area is too short.
fn row(area: Rect, n: u16) -> Rect {
    if n >= area.height {
        return Rect::new(area.x, area.y, area.width, 0);
    }
    Rect::new(area.x, area.y + n, area.width, 1)
}

/// Write styled spans left to right, truncating the first one that does not
/// fit and dropping the rest.
fn put_spans(screen: &mut Screen, x: u16, y: u16, max: u16, spans: &[Span]) -> u16 {
    let end = x.saturating_add(max);
    let mut x = x;
    for (text, style) in spans {
        let room = end.saturating_sub(x);
        if room == 0 {
            break;
        }
        if fit::width(text) <= usize::from(room) {
            x = screen.put(x, y, text, room, *style);
        } else {
            x = screen.put(x, y, &fit::truncate(text, usize::from(room)), room, *style);
            break;
        }
    }
    x
}

fn put_centered(screen: &mut Screen, line: Rect, spans: &[Span]) {
    if line.height == 0 {
        return;
    }
    let total = spans.iter().map(|(t, _)| fit::width(t)).sum::<usize>();
    let used = total.min(usize::from(line.width)) as u16;
    let x = line.x + (line.width - used) / 2;
    put_spans(screen, x, line.y, used, spans);
}

impl<S: PlaybackService> Ui<S> {
    /// Poll the server, react to a track change and repaint the status pane.
    pub(crate) async fn refresh_status(&mut self) -> ServiceResult<()> {
        let status = self.service.status().await?;
        let song = self.service.current_item().await?;
        let changed = status.song_id != self.now_playing;
        self.now_playing = status.song_id;
        if let Some(Kind::Status(pane)) = self.kind_mut(self.panes.status) {
            pane.status = status;
            pane.song = song;
        }

        if changed {
            match self.mode {
                Some(Mode::Queue) => {
                    let queue = self.panes.queue;
                    self.update(queue).await?;
                    self.paint_stacked(queue);
                }
                Some(Mode::NowPlaying) => self.refresh_artwork().await,
                _ => {}
            }
        }
        self.paint(self.panes.status);
        Ok(())
    }

    /// Resolve the image for the current song and queue it for display.
    /// Falls back to the placeholder when stopped or nothing was found.
    pub(crate) async fn refresh_artwork(&mut self) {
        if self.mode != Some(Mode::NowPlaying) {
            return;
        }
        let song = match self.kind_mut(self.panes.status) {
            Some(Kind::Status(pane)) if !pane.stopped() => pane.song.clone(),
            _ => None,
        };
        let path = match song {
            None => self.placeholder.clone(),
            Some(song) => match self.service.fetch_artwork(&song).await {
                Ok(Some(path)) => Some(path),
                Ok(None) => self.placeholder.clone(),
                Err(err) => {
                    self.report(err);
                    self.placeholder.clone()
                }
            },
        };
        if let Some(Kind::Status(pane)) = self.kind_mut(self.panes.status) {
            pane.artwork = path;
        }
        self.place_artwork();
    }

    /// Recompute where the current image goes, e.g. after a resize.
    pub(crate) fn place_artwork(&mut self) {
        let screen = self.screen.area();
        let cell_px = self.cell_px;
        let Some(node) = self.tree.get(self.panes.status) else {
            return;
        };
        let Kind::Status(pane) = &node.kind else {
            return;
        };
        let frame = pane
            .artwork
            .as_deref()
            .and_then(|path| artwork::place(path, node.placement.resolve(screen), cell_px, screen.width));
        self.artwork = Some(match frame {
            Some(frame) => ArtworkChange::Show(frame),
            None => ArtworkChange::Hide,
        });
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::widgets::notice::Notices;

    fn playing() -> StatusPane {
        let mut song = Song::new("music/blue.flac");
        song.title = Some("Blue Monday".into());
        song.artist = Some("New Order".into());
        song.album = Some("Power".into());
        song.track = Some("3".into());
        StatusPane {
            status: Status {
                state: PlaybackState::Play,
                song_id: Some(4),
                elapsed: Duration::from_secs(65),
                duration: Duration::from_secs(130),
                random: true,
                ..Status::default()
            },
            song: Some(song),
            artwork: None,
            enlarged: false,
        }
    }

    #[test]
    fn compact_line_has_song_and_clock() {
        let area = Rect::new(0, 0, 60, 2);
        let mut screen = Screen::new(area);
        playing().draw(&mut screen, area, None);
        let text = screen.row(1);
        assert!(text.starts_with("Blue Monday by New Order"));
        assert!(text.trim_end().ends_with("⤮ 1:05/2:10"));
        assert_eq!(screen.row(0).chars().filter(|&c| c == '─').count(), 60);
    }

    #[test]
    fn paused_and_stopped() {
        let area = Rect::new(0, 0, 40, 2);
        let mut screen = Screen::new(area);
        let mut pane = playing();
        pane.status.state = PlaybackState::Pause;
        pane.draw(&mut screen, area, None);
        assert!(screen.row(1).starts_with("Paused: Blue Monday"));

        pane.status.state = PlaybackState::Stop;
        pane.draw(&mut screen, area, None);
        assert_eq!(screen.row(1).trim_end(), "Stopped");
    }

    #[test]
    fn notice_replaces_song_line() {
        let area = Rect::new(0, 0, 40, 2);
        let mut screen = Screen::new(area);
        let mut notices = Notices::new();
        notices.error("connection lost");
        playing().draw(&mut screen, area, notices.latest());
        assert_eq!(screen.row(1).trim_end(), "✗ connection lost");
    }

    #[test]
    fn narrow_line_truncates_title_not_clock() {
        let area = Rect::new(0, 0, 24, 2);
        let mut screen = Screen::new(area);
        playing().draw(&mut screen, area, None);
        let text = screen.row(1);
        assert!(text.ends_with("1:05/2:10"));
        assert!(text.contains('…'));
    }

    #[test]
    fn enlarged_centers_details() {
        let area = Rect::new(0, 0, 40, 4);
        let mut screen = Screen::new(area);
        let mut pane = playing();
        pane.enlarged = true;
        pane.draw(&mut screen, area, None);
        assert_eq!(screen.row(1).trim(), "Blue Monday");
        assert_eq!(screen.row(2).trim(), "New Order ─ Power (#3)");
        assert!(screen.row(1).starts_with("              Blue"));
    }
}
