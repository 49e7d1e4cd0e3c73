//! Media search — request validation, query composition, and result shapes.
//!
//! The `search` service accepts loosely-typed JSON (as sent by automations or
//! the HTTP API), validates it into a [`SearchRequest`], forwards the composed
//! query to a music server, and answers with the compact form of
//! [`SearchResults`].

mod request;
mod results;

pub use request::{DEFAULT_LIMIT, SearchRequest};
pub use results::{CompactItem, CompactRef, CompactResults, MediaItem, MediaItemRef, SearchResults};

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Kind of media item known to the music server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaType {
    Artist,
    Album,
    Track,
    Playlist,
    Radio,
    Audiobook,
    Podcast,
    Folder,
    Announcement,
    FlowStream,
    Unknown,
}

impl MediaType {
    /// Every searchable media type; used when a request does not narrow it.
    pub const ALL: [Self; 7] = [
        Self::Artist,
        Self::Album,
        Self::Track,
        Self::Playlist,
        Self::Radio,
        Self::Audiobook,
        Self::Podcast,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Artist => "artist",
            Self::Album => "album",
            Self::Track => "track",
            Self::Playlist => "playlist",
            Self::Radio => "radio",
            Self::Audiobook => "audiobook",
            Self::Podcast => "podcast",
            Self::Folder => "folder",
            Self::Announcement => "announcement",
            Self::FlowStream => "flow_stream",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string does not name a [`MediaType`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown media type `{0}`")]
pub struct UnknownMediaType(pub String);

impl FromStr for MediaType {
    type Err = UnknownMediaType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        [
            Self::Artist,
            Self::Album,
            Self::Track,
            Self::Playlist,
            Self::Radio,
            Self::Audiobook,
            Self::Podcast,
            Self::Folder,
            Self::Announcement,
            Self::FlowStream,
            Self::Unknown,
        ]
        .into_iter()
        .find(|kind| kind.as_str() == normalized)
        .ok_or_else(|| UnknownMediaType(s.to_string()))
    }
}
