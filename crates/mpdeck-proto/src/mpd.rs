//! `PlaybackService` over the MPD line protocol.
//!
//! One command per line, quoted arguments, `key: value` responses closed by
//! `OK` or `ACK [code@index] {command} message`. A dropped or stalled
//! connection is reopened once and the command retried once; a second
//! failure surfaces as `ServiceError::ConnectionLost`.

use std::path::PathBuf;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::keyed_list::KeyedList;
use crate::service::{
    PlaybackService, PlaybackState, PlaylistInfo, ServiceError, ServiceResult, Song, Status,
};

const ACK_NO_EXIST: u32 = 50;
const ACK_EXIST: u32 = 56;

type Pairs = Vec<(String, String)>;

struct Connection {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
}

impl Connection {
    async fn open(address: &str) -> ServiceResult<Self> {
        let stream = TcpStream::connect(address)
            .await
            .map_err(|e| ServiceError::ConnectionLost(format!("{address}: {e}")))?;
        let (read, writer) = stream.into_split();
        let mut conn = Self {
            reader: BufReader::new(read),
            writer,
        };
        let greeting = conn.read_line().await?;
        if !greeting.starts_with("OK MPD ") {
            return Err(ServiceError::Protocol(format!(
                "unexpected greeting {greeting:?}"
            )));
        }
        debug!("connected to {} ({})", address, greeting.trim_start_matches("OK "));
        Ok(conn)
    }

    async fn read_line(&mut self) -> ServiceResult<String> {
        let mut line = String::new();
        let n = self
            .reader
            .read_line(&mut line)
            .await
            .map_err(|e| ServiceError::ConnectionLost(e.to_string()))?;
        if n == 0 {
            return Err(ServiceError::ConnectionLost("closed by server".into()));
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    async fn exchange(&mut self, command: &str) -> ServiceResult<Pairs> {
        self.writer
            .write_all(format!("{command}\n").as_bytes())
            .await
            .map_err(|e| ServiceError::ConnectionLost(e.to_string()))?;
        self.writer
            .flush()
            .await
            .map_err(|e| ServiceError::ConnectionLost(e.to_string()))?;

        let mut pairs = Vec::new();
        loop {
            let line = self.read_line().await?;
            if line == "OK" {
                return Ok(pairs);
            }
            if let Some(ack) = line.strip_prefix("ACK ") {
                return Err(parse_ack(ack));
            }
            match line.split_once(": ") {
                Some((k, v)) => pairs.push((k.to_string(), v.to_string())),
                None => return Err(ServiceError::Protocol(format!("bad line {line:?}"))),
            }
        }
    }
}

pub struct MpdClient {
    address: String,
    timeout: Duration,
    artwork_command: Option<String>,
    conn: Option<Connection>,
    last_status: Status,
}

impl MpdClient {
    pub fn new(address: impl Into<String>, timeout: Duration) -> Self {
        Self {
            address: address.into(),
            timeout,
            artwork_command: None,
            conn: None,
            last_status: Status::default(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let mut client = Self::new(config.server.address(), config.server.timeout());
        client.artwork_command = config.artwork.command.clone();
        client
    }

    pub fn with_artwork_command(mut self, command: impl Into<String>) -> Self {
        self.artwork_command = Some(command.into());
        self
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    /// Run a command, reconnecting and retrying exactly once if the
    /// connection turns out to be gone.
    async fn call(&mut self, command: &str) -> ServiceResult<Pairs> {
        match self.try_call(command).await {
            Err(ServiceError::ConnectionLost(reason)) => {
                warn!("mpd connection lost during {:?}: {}; reconnecting", command, reason);
                self.try_call(command).await
            }
            other => other,
        }
    }

    async fn try_call(&mut self, command: &str) -> ServiceResult<Pairs> {
        let timeout = self.timeout;
        if self.conn.is_none() {
            let conn = tokio::time::timeout(timeout, Connection::open(&self.address))
                .await
                .map_err(|_| ServiceError::ConnectionLost("connect timed out".into()))??;
            self.conn = Some(conn);
        }
        let Some(conn) = self.conn.as_mut() else {
            return Err(ServiceError::ConnectionLost("not connected".into()));
        };
        let result = match tokio::time::timeout(timeout, conn.exchange(command)).await {
            Ok(result) => result,
            Err(_) => Err(ServiceError::ConnectionLost(format!("{command:?} timed out"))),
        };
        if matches!(result, Err(ServiceError::ConnectionLost(_))) {
            self.conn = None;
        }
        result
    }

    async fn songs(&mut self, command: &str) -> ServiceResult<Vec<Song>> {
        Ok(parse_songs(&self.call(command).await?))
    }
}

impl PlaybackService for MpdClient {
    async fn connect(&mut self) -> ServiceResult<()> {
        self.conn = None;
        let conn = tokio::time::timeout(self.timeout, Connection::open(&self.address))
            .await
            .map_err(|_| ServiceError::ConnectionLost("connect timed out".into()))??;
        self.conn = Some(conn);
        info!("connected to mpd at {}", self.address);
        self.status().await.map(|_| ())
    }

    async fn status(&mut self) -> ServiceResult<Status> {
        let status = parse_status(&self.call("status").await?);
        self.last_status = status.clone();
        Ok(status)
    }

    async fn current_item(&mut self) -> ServiceResult<Option<Song>> {
        Ok(self.songs("currentsong").await?.into_iter().next())
    }

    async fn list_playlists(&mut self) -> ServiceResult<KeyedList<String, PlaylistInfo>> {
        let pairs = self.call("listplaylists").await?;
        let mut list = KeyedList::sorted();
        for info in parse_playlists(&pairs) {
            list.insert(info.name.clone(), info);
        }
        Ok(list)
    }

    async fn list_playlist_items(&mut self, name: &str) -> ServiceResult<KeyedList<String, Song>> {
        let songs = self
            .songs(&format!("listplaylistinfo {}", quote(name)))
            .await?;
        Ok(songs.into_iter().map(|s| (s.file.clone(), s)).collect())
    }

    async fn search(&mut self, query: &str) -> ServiceResult<KeyedList<String, Song>> {
        if query.is_empty() {
            return Ok(KeyedList::new());
        }
        let songs = self.songs(&format!("search any {}", quote(query))).await?;
        Ok(songs.into_iter().map(|s| (s.file.clone(), s)).collect())
    }

    async fn list_queue(&mut self) -> ServiceResult<KeyedList<String, Song>> {
        let songs = self.songs("playlistinfo").await?;
        Ok(songs
            .into_iter()
            .map(|s| {
                let key = s.id.map(|id| id.to_string()).unwrap_or_else(|| s.file.clone());
                (key, s)
            })
            .collect())
    }

    async fn enqueue(&mut self, file: &str) -> ServiceResult<()> {
        self.call(&format!("add {}", quote(file))).await.map(drop)
    }

    async fn enqueue_playlist(&mut self, name: &str) -> ServiceResult<()> {
        self.call(&format!("load {}", quote(name))).await.map(drop)
    }

    async fn dequeue(&mut self, index: usize) -> ServiceResult<()> {
        self.call(&format!("delete {index}")).await.map(drop)
    }

    async fn clear_queue(&mut self) -> ServiceResult<()> {
        self.call("clear").await.map(drop)
    }

    async fn play_by_id(&mut self, id: u32) -> ServiceResult<()> {
        self.call(&format!("playid {id}")).await.map(drop)
    }

    async fn pause(&mut self) -> ServiceResult<()> {
        let command = match self.status().await?.state {
            PlaybackState::Play => "pause 1",
            PlaybackState::Pause => "pause 0",
            PlaybackState::Stop => "play",
        };
        self.call(command).await.map(drop)
    }

    async fn skip(&mut self) -> ServiceResult<()> {
        self.call("next").await.map(drop)
    }

    async fn toggle_random(&mut self) -> ServiceResult<()> {
        let on = !self.last_status.random;
        self.call(&format!("random {}", u8::from(on))).await?;
        self.last_status.random = on;
        Ok(())
    }

    async fn toggle_repeat(&mut self) -> ServiceResult<()> {
        let on = !self.last_status.repeat;
        self.call(&format!("repeat {}", u8::from(on))).await?;
        self.last_status.repeat = on;
        Ok(())
    }

    async fn add_to_playlist(&mut self, name: &str, file: &str) -> ServiceResult<()> {
        self.call(&format!("playlistadd {} {}", quote(name), quote(file)))
            .await
            .map(drop)
    }

    async fn remove_from_playlist(&mut self, name: &str, index: usize) -> ServiceResult<()> {
        self.call(&format!("playlistdelete {} {index}", quote(name)))
            .await
            .map(drop)
    }

    async fn create_playlist(&mut self, name: &str) -> ServiceResult<()> {
        // MPD has no "create"; save the queue under the name, then empty it.
        match self.call(&format!("save {}", quote(name))).await {
            Err(ServiceError::Refused { code: ACK_EXIST, .. }) => {
                return Err(ServiceError::DuplicateName(name.to_string()))
            }
            other => other?,
        };
        self.call(&format!("playlistclear {}", quote(name)))
            .await
            .map(drop)
    }

    async fn delete_playlist(&mut self, name: &str) -> ServiceResult<()> {
        self.call(&format!("rm {}", quote(name))).await.map(drop)
    }

    async fn fetch_artwork(&mut self, song: &Song) -> ServiceResult<Option<PathBuf>> {
        let Some(command) = self.artwork_command.as_deref() else {
            return Ok(None);
        };
        let words = match shell_words::split(command) {
            Ok(words) => words,
            Err(e) => {
                warn!("artwork command {:?} does not parse: {}", command, e);
                return Ok(None);
            }
        };
        let Some((program, args)) = words.split_first() else {
            return Ok(None);
        };
        let output = tokio::process::Command::new(program)
            .args(args)
            .arg(&song.file)
            .kill_on_drop(true)
            .output()
            .await;
        let output = match output {
            Ok(output) if output.status.success() => output,
            Ok(output) => {
                warn!("artwork command exited with {} for {:?}", output.status, song.file);
                return Ok(None);
            }
            Err(e) => {
                warn!("artwork command {:?} failed to start: {}", program, e);
                return Ok(None);
            }
        };
        let stdout = String::from_utf8_lossy(&output.stdout);
        let path = stdout.lines().next().map(str::trim).unwrap_or_default();
        if path.is_empty() {
            return Ok(None);
        }
        Ok(Some(PathBuf::from(path)))
    }
}

// ── Wire helpers ─────────────────────────────────────────────────────────────

pub(crate) fn quote(arg: &str) -> String {
    format!("\"{}\"", arg.replace('\\', "\\\\").replace('"', "\\\""))
}

/// `[50@0] {play} No such song` → typed error.
fn parse_ack(ack: &str) -> ServiceError {
    let code = ack
        .strip_prefix('[')
        .and_then(|s| s.split_once('@'))
        .and_then(|(code, _)| code.parse().ok())
        .unwrap_or(0);
    let command = ack
        .split_once('{')
        .and_then(|(_, rest)| rest.split_once('}'))
        .map(|(cmd, _)| cmd.to_string())
        .unwrap_or_default();
    let message = ack
        .split_once("} ")
        .map(|(_, msg)| msg.to_string())
        .unwrap_or_else(|| ack.to_string());
    if code == ACK_NO_EXIST {
        ServiceError::NotFound(message)
    } else {
        ServiceError::Refused {
            code,
            command,
            message,
        }
    }
}

fn parse_secs(value: &str) -> Option<Duration> {
    value
        .parse::<f64>()
        .ok()
        .filter(|s| s.is_finite() && *s >= 0.0)
        .map(Duration::from_secs_f64)
}

fn parse_status(pairs: &[(String, String)]) -> Status {
    let mut status = Status::default();
    for (key, value) in pairs {
        match key.as_str() {
            "state" => {
                status.state = match value.as_str() {
                    "play" => PlaybackState::Play,
                    "pause" => PlaybackState::Pause,
                    _ => PlaybackState::Stop,
                }
            }
            "songid" => status.song_id = value.parse().ok(),
            "elapsed" => status.elapsed = parse_secs(value).unwrap_or_default(),
            "duration" => status.duration = parse_secs(value).unwrap_or_default(),
            // Older servers only send "time: elapsed:total".
            "time" if status.duration.is_zero() => {
                if let Some((_, total)) = value.split_once(':') {
                    status.duration = parse_secs(total).unwrap_or_default();
                }
            }
            "random" => status.random = value == "1",
            "repeat" => status.repeat = value == "1",
            "volume" => status.volume = value.parse().ok(),
            _ => {}
        }
    }
    status
}

fn parse_songs(pairs: &[(String, String)]) -> Vec<Song> {
    let mut songs: Vec<Song> = Vec::new();
    let mut in_song = false;
    for (key, value) in pairs {
        if key == "file" {
            songs.push(Song::new(value.as_str()));
            in_song = true;
            continue;
        }
        if key == "directory" || key == "playlist" {
            in_song = false;
            continue;
        }
        let Some(song) = songs.last_mut().filter(|_| in_song) else {
            continue;
        };
        match key.as_str() {
            "Title" => song.title = Some(value.clone()),
            "Artist" => song.artist = Some(value.clone()),
            "Album" => song.album = Some(value.clone()),
            "Track" => song.track = Some(value.clone()),
            "Id" => song.id = value.parse().ok(),
            "Pos" => song.pos = value.parse().ok(),
            "duration" => song.duration = parse_secs(value),
            "Time" if song.duration.is_none() => song.duration = parse_secs(value),
            _ => {}
        }
    }
    songs
}

fn parse_playlists(pairs: &[(String, String)]) -> Vec<PlaylistInfo> {
    let mut lists: Vec<PlaylistInfo> = Vec::new();
    for (key, value) in pairs {
        match key.as_str() {
            "playlist" => lists.push(PlaylistInfo::new(value.as_str())),
            "Last-Modified" => {
                if let Some(last) = lists.last_mut() {
                    last.last_modified = Some(value.clone());
                }
            }
            _ => {}
        }
    }
    lists
}
