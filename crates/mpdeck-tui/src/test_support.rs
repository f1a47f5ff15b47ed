//! In-memory `PlaybackService` for driving the controller in tests.

use std::collections::BTreeMap;
use std::path::PathBuf;

use mpdeck_proto::{
    KeyedList, PlaybackService, PlaybackState, PlaylistInfo, ServiceError, ServiceResult, Song,
    Status,
};

#[derive(Default)]
pub struct FakeService {
    pub playlists: BTreeMap<String, Vec<String>>,
    pub library: Vec<Song>,
    pub queue: Vec<Song>,
    pub status: Status,
    /// Every mutating call, in order, e.g. `"add_to_playlist mix a.flac"`.
    pub calls: Vec<String>,
    /// Non-empty queries, in order.
    pub searches: Vec<String>,
    pub artwork: Option<PathBuf>,
    /// Returned (once) by the next call of any kind.
    pub fail_next: Option<ServiceError>,
    next_id: u32,
}

pub fn song(file: &str, title: &str, artist: &str) -> Song {
    let mut song = Song::new(file);
    song.title = Some(title.to_string());
    song.artist = Some(artist.to_string());
    song
}

impl FakeService {
    pub fn new() -> Self {
        let library = vec![
            song("a.flac", "Age of Consent", "New Order"),
            song("b.flac", "Blue Monday", "New Order"),
            song("c.flac", "Ceremony", "Joy Division"),
        ];
        Self {
            library,
            ..Self::default()
        }
    }

    pub fn with_playlist(mut self, name: &str, files: &[&str]) -> Self {
        self.playlists
            .insert(name.to_string(), files.iter().map(|f| f.to_string()).collect());
        self
    }

    pub fn calls_named(&self, prefix: &str) -> Vec<&str> {
        self.calls
            .iter()
            .map(String::as_str)
            .filter(|c| c.starts_with(prefix))
            .collect()
    }

    fn check(&mut self) -> ServiceResult<()> {
        match self.fail_next.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn lookup(&self, file: &str) -> Song {
        self.library
            .iter()
            .find(|s| s.file == file)
            .cloned()
            .unwrap_or_else(|| Song::new(file))
    }

    fn push_queue(&mut self, file: &str) {
        self.next_id += 1;
        let mut song = self.lookup(file);
        song.id = Some(self.next_id);
        song.pos = Some(self.queue.len() as u32);
        self.queue.push(song);
    }
}

fn by_file(songs: Vec<Song>) -> KeyedList<String, Song> {
    songs.into_iter().map(|s| (s.file.clone(), s)).collect()
}

impl PlaybackService for FakeService {
    async fn connect(&mut self) -> ServiceResult<()> {
        self.check()
    }

    async fn status(&mut self) -> ServiceResult<Status> {
        self.check()?;
        Ok(self.status.clone())
    }

    async fn current_item(&mut self) -> ServiceResult<Option<Song>> {
        self.check()?;
        Ok(self
            .status
            .song_id
            .and_then(|id| self.queue.iter().find(|s| s.id == Some(id)).cloned()))
    }

    async fn list_playlists(&mut self) -> ServiceResult<KeyedList<String, PlaylistInfo>> {
        self.check()?;
        let mut list = KeyedList::sorted();
        for name in self.playlists.keys() {
            list.insert(name.clone(), PlaylistInfo::new(name.as_str()));
        }
        Ok(list)
    }

    async fn list_playlist_items(&mut self, name: &str) -> ServiceResult<KeyedList<String, Song>> {
        self.check()?;
        let files = self
            .playlists
            .get(name)
            .ok_or_else(|| ServiceError::NotFound(name.to_string()))?;
        Ok(by_file(files.iter().map(|f| self.lookup(f)).collect()))
    }

    async fn search(&mut self, query: &str) -> ServiceResult<KeyedList<String, Song>> {
        self.check()?;
        if query.is_empty() {
            return Ok(KeyedList::new());
        }
        self.searches.push(query.to_string());
        let needle = query.to_lowercase();
        Ok(by_file(
            self.library
                .iter()
                .filter(|s| {
                    s.display_title().to_lowercase().contains(&needle)
                        || s.artist.as_deref().unwrap_or("").to_lowercase().contains(&needle)
                })
                .cloned()
                .collect(),
        ))
    }

    async fn list_queue(&mut self) -> ServiceResult<KeyedList<String, Song>> {
        self.check()?;
        Ok(self
            .queue
            .iter()
            .map(|s| (s.id.map(|id| id.to_string()).unwrap_or_default(), s.clone()))
            .collect())
    }

    async fn enqueue(&mut self, file: &str) -> ServiceResult<()> {
        self.check()?;
        self.calls.push(format!("enqueue {file}"));
        self.push_queue(file);
        Ok(())
    }

    async fn enqueue_playlist(&mut self, name: &str) -> ServiceResult<()> {
        self.check()?;
        self.calls.push(format!("enqueue_playlist {name}"));
        let files = self
            .playlists
            .get(name)
            .cloned()
            .ok_or_else(|| ServiceError::NotFound(name.to_string()))?;
        for file in &files {
            self.push_queue(file);
        }
        Ok(())
    }

    async fn dequeue(&mut self, index: usize) -> ServiceResult<()> {
        self.check()?;
        self.calls.push(format!("dequeue {index}"));
        if index >= self.queue.len() {
            return Err(ServiceError::NotFound(index.to_string()));
        }
        self.queue.remove(index);
        Ok(())
    }

    async fn clear_queue(&mut self) -> ServiceResult<()> {
        self.check()?;
        self.calls.push("clear_queue".to_string());
        self.queue.clear();
        Ok(())
    }

    async fn play_by_id(&mut self, id: u32) -> ServiceResult<()> {
        self.check()?;
        self.calls.push(format!("play_by_id {id}"));
        self.status.state = PlaybackState::Play;
        self.status.song_id = Some(id);
        Ok(())
    }

    async fn pause(&mut self) -> ServiceResult<()> {
        self.check()?;
        self.calls.push("pause".to_string());
        self.status.state = match self.status.state {
            PlaybackState::Play => PlaybackState::Pause,
            PlaybackState::Pause | PlaybackState::Stop => PlaybackState::Play,
        };
        Ok(())
    }

    async fn skip(&mut self) -> ServiceResult<()> {
        self.check()?;
        self.calls.push("skip".to_string());
        Ok(())
    }

    async fn toggle_random(&mut self) -> ServiceResult<()> {
        self.check()?;
        self.calls.push("toggle_random".to_string());
        self.status.random = !self.status.random;
        Ok(())
    }

    async fn toggle_repeat(&mut self) -> ServiceResult<()> {
        self.check()?;
        self.calls.push("toggle_repeat".to_string());
        self.status.repeat = !self.status.repeat;
        Ok(())
    }

    async fn add_to_playlist(&mut self, name: &str, file: &str) -> ServiceResult<()> {
        self.check()?;
        self.calls.push(format!("add_to_playlist {name} {file}"));
        self.playlists
            .get_mut(name)
            .ok_or_else(|| ServiceError::NotFound(name.to_string()))?
            .push(file.to_string());
        Ok(())
    }

    async fn remove_from_playlist(&mut self, name: &str, index: usize) -> ServiceResult<()> {
        self.check()?;
        self.calls.push(format!("remove_from_playlist {name} {index}"));
        let files = self
            .playlists
            .get_mut(name)
            .ok_or_else(|| ServiceError::NotFound(name.to_string()))?;
        if index >= files.len() {
            return Err(ServiceError::NotFound(index.to_string()));
        }
        files.remove(index);
        Ok(())
    }

    async fn create_playlist(&mut self, name: &str) -> ServiceResult<()> {
        self.check()?;
        self.calls.push(format!("create_playlist {name}"));
        if self.playlists.contains_key(name) {
            return Err(ServiceError::DuplicateName(name.to_string()));
        }
        self.playlists.insert(name.to_string(), Vec::new());
        Ok(())
    }

    async fn delete_playlist(&mut self, name: &str) -> ServiceResult<()> {
        self.check()?;
        self.calls.push(format!("delete_playlist {name}"));
        self.playlists
            .remove(name)
            .map(drop)
            .ok_or_else(|| ServiceError::NotFound(name.to_string()))
    }

    async fn fetch_artwork(&mut self, _song: &Song) -> ServiceResult<Option<PathBuf>> {
        self.check()?;
        Ok(self.artwork.clone())
    }
}
