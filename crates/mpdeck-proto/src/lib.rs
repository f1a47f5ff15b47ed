//! Service-facing half of mpdeck: the keyed list every pane renders, the
//! playback-service seam and its MPD adapter, configuration and paths.

pub mod config;
pub mod keyed_list;
pub mod mpd;
pub mod platform;
pub mod service;

pub use keyed_list::{KeyedList, KeyedListError};
pub use service::{PlaybackService, PlaybackState, PlaylistInfo, ServiceError, ServiceResult, Song, Status};
