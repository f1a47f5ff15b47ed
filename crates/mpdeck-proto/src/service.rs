//! The playback-service seam. The UI only ever talks to a `PlaybackService`;
//! `crate::mpd::MpdClient` is the production implementation.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::keyed_list::KeyedList;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    #[error("connection lost: {0}")]
    ConnectionLost(String),
    #[error("playlist {0:?} already exists")]
    DuplicateName(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("{command} refused ({code}): {message}")]
    Refused {
        code: u32,
        command: String,
        message: String,
    },
    #[error("protocol error: {0}")]
    Protocol(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PlaybackState {
    Play,
    Pause,
    #[default]
    Stop,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Status {
    pub state: PlaybackState,
    pub song_id: Option<u32>,
    pub elapsed: Duration,
    pub duration: Duration,
    pub random: bool,
    pub repeat: bool,
    pub volume: Option<u8>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Song {
    pub file: String,
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub track: Option<String>,
    /// Queue id; only set for songs that came from the queue.
    pub id: Option<u32>,
    pub pos: Option<u32>,
    pub duration: Option<Duration>,
}

impl Song {
    pub fn new(file: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            ..Self::default()
        }
    }

    /// Title, or the file's basename when the tag is missing.
    pub fn display_title(&self) -> &str {
        match self.title.as_deref() {
            Some(t) if !t.is_empty() => t,
            _ => self.file.rsplit('/').next().unwrap_or(&self.file),
        }
    }

    /// Named field lookup used by row templates. Unknown or missing fields
    /// render as an empty string.
    pub fn field(&self, name: &str) -> String {
        match name {
            "file" => self.file.clone(),
            "title" => self.display_title().to_string(),
            "artist" => self.artist.clone().unwrap_or_default(),
            "album" => self.album.clone().unwrap_or_default(),
            "track" => self.track.clone().unwrap_or_default(),
            "id" => self.id.map(|id| id.to_string()).unwrap_or_default(),
            "pos" => self.pos.map(|p| p.to_string()).unwrap_or_default(),
            _ => String::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaylistInfo {
    pub name: String,
    pub last_modified: Option<String>,
}

impl PlaylistInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            last_modified: None,
        }
    }
}

/// Everything the UI needs from the music server.
///
/// Listing calls build a fresh `KeyedList` each time; callers replace what
/// they hold rather than diffing.
#[allow(async_fn_in_trait)]
pub trait PlaybackService {
    async fn connect(&mut self) -> ServiceResult<()>;

    async fn status(&mut self) -> ServiceResult<Status>;
    async fn current_item(&mut self) -> ServiceResult<Option<Song>>;

    /// Stored playlists, sorted by name.
    async fn list_playlists(&mut self) -> ServiceResult<KeyedList<String, PlaylistInfo>>;
    /// Songs of a stored playlist keyed by file. Repeated files share one entry.
    async fn list_playlist_items(&mut self, name: &str) -> ServiceResult<KeyedList<String, Song>>;
    /// Library search over any tag. An empty query yields an empty list.
    async fn search(&mut self, query: &str) -> ServiceResult<KeyedList<String, Song>>;
    /// The play queue keyed by queue id.
    async fn list_queue(&mut self) -> ServiceResult<KeyedList<String, Song>>;

    async fn enqueue(&mut self, file: &str) -> ServiceResult<()>;
    async fn enqueue_playlist(&mut self, name: &str) -> ServiceResult<()>;
    async fn dequeue(&mut self, index: usize) -> ServiceResult<()>;
    async fn clear_queue(&mut self) -> ServiceResult<()>;

    async fn play_by_id(&mut self, id: u32) -> ServiceResult<()>;
    async fn pause(&mut self) -> ServiceResult<()>;
    async fn skip(&mut self) -> ServiceResult<()>;
    async fn toggle_random(&mut self) -> ServiceResult<()>;
    async fn toggle_repeat(&mut self) -> ServiceResult<()>;

    async fn add_to_playlist(&mut self, name: &str, file: &str) -> ServiceResult<()>;
    async fn remove_from_playlist(&mut self, name: &str, index: usize) -> ServiceResult<()>;
    /// Create an empty stored playlist. Fails with `DuplicateName` if one exists.
    async fn create_playlist(&mut self, name: &str) -> ServiceResult<()>;
    async fn delete_playlist(&mut self, name: &str) -> ServiceResult<()>;

    /// Resolve an image for the song, if any source is configured.
    async fn fetch_artwork(&mut self, song: &Song) -> ServiceResult<Option<PathBuf>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_falls_back_to_basename() {
        let mut song = Song::new("Artist/Album/01 - Intro.flac");
        assert_eq!(song.field("title"), "01 - Intro.flac");
        song.title = Some("Intro".into());
        assert_eq!(song.field("title"), "Intro");
        assert_eq!(song.field("artist"), "");
        assert_eq!(song.field("nonsense"), "");
    }

    #[test]
    fn refused_error_reads_well() {
        let err = ServiceError::Refused {
            code: 2,
            command: "play".into(),
            message: "Bad song index".into(),
        };
        assert_eq!(err.to_string(), "play refused (2): Bad song index");
    }
}
