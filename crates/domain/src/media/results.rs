//! Search results as returned by a music server, and their compact form.

use serde::{Deserialize, Serialize};

use super::MediaType;

/// A reference from one media item to another (a track's album, an album's artist).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaItemRef {
    pub item_id: String,
    pub provider: String,
    pub name: String,
    pub uri: String,
    pub media_type: MediaType,
    pub version: Option<String>,
    pub image: Option<String>,
}

/// A full media item as returned by the music server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaItem {
    pub item_id: String,
    pub provider: String,
    pub name: String,
    pub uri: String,
    pub media_type: MediaType,
    pub version: Option<String>,
    pub image: Option<String>,
    #[serde(default)]
    pub artists: Vec<MediaItemRef>,
    pub album: Option<MediaItemRef>,
    #[serde(default)]
    pub in_library: bool,
}

impl MediaItem {
    /// Reference to this item, suitable for embedding in another item.
    #[must_use]
    pub fn as_ref_item(&self) -> MediaItemRef {
        MediaItemRef {
            item_id: self.item_id.clone(),
            provider: self.provider.clone(),
            name: self.name.clone(),
            uri: self.uri.clone(),
            media_type: self.media_type,
            version: self.version.clone(),
            image: self.image.clone(),
        }
    }
}

/// Results of one search, grouped by media type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchResults {
    pub artists: Vec<MediaItem>,
    pub albums: Vec<MediaItem>,
    pub tracks: Vec<MediaItem>,
    pub playlists: Vec<MediaItem>,
    pub radio: Vec<MediaItem>,
    pub audiobooks: Vec<MediaItem>,
    pub podcasts: Vec<MediaItem>,
}

impl SearchResults {
    /// The bucket a given media type is reported in, if any.
    pub fn bucket_mut(&mut self, media_type: MediaType) -> Option<&mut Vec<MediaItem>> {
        match media_type {
            MediaType::Artist => Some(&mut self.artists),
            MediaType::Album => Some(&mut self.albums),
            MediaType::Track => Some(&mut self.tracks),
            MediaType::Playlist => Some(&mut self.playlists),
            MediaType::Radio => Some(&mut self.radio),
            MediaType::Audiobook => Some(&mut self.audiobooks),
            MediaType::Podcast => Some(&mut self.podcasts),
            MediaType::Folder
            | MediaType::Announcement
            | MediaType::FlowStream
            | MediaType::Unknown => None,
        }
    }

    /// Total number of items across all buckets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.artists.len()
            + self.albums.len()
            + self.tracks.len()
            + self.playlists.len()
            + self.radio.len()
            + self.audiobooks.len()
            + self.podcasts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Trim the results down to what a service response should carry.
    ///
    /// Provider ids and library flags are dropped; albums and tracks keep
    /// their artists, tracks keep their album.
    #[must_use]
    pub fn to_compact(&self) -> CompactResults<'_> {
        CompactResults {
            artists: self.artists.iter().map(CompactItem::plain).collect(),
            albums: self.albums.iter().map(CompactItem::with_artists).collect(),
            tracks: self.tracks.iter().map(CompactItem::with_album).collect(),
            playlists: self.playlists.iter().map(CompactItem::plain).collect(),
            radio: self.radio.iter().map(CompactItem::plain).collect(),
            audiobooks: self.audiobooks.iter().map(CompactItem::plain).collect(),
            podcasts: self.podcasts.iter().map(CompactItem::plain).collect(),
        }
    }
}

/// Compact rendering of [`SearchResults`].
#[derive(Debug, Serialize)]
pub struct CompactResults<'a> {
    pub artists: Vec<CompactItem<'a>>,
    pub albums: Vec<CompactItem<'a>>,
    pub tracks: Vec<CompactItem<'a>>,
    pub playlists: Vec<CompactItem<'a>>,
    pub radio: Vec<CompactItem<'a>>,
    pub audiobooks: Vec<CompactItem<'a>>,
    pub podcasts: Vec<CompactItem<'a>>,
}

#[derive(Debug, Serialize)]
pub struct CompactItem<'a> {
    pub uri: &'a str,
    pub name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artists: Option<Vec<CompactRef<'a>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub album: Option<CompactRef<'a>>,
}

#[derive(Debug, Serialize)]
pub struct CompactRef<'a> {
    pub uri: &'a str,
    pub name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<&'a str>,
}

impl<'a> CompactRef<'a> {
    fn from_ref(item: &'a MediaItemRef) -> Self {
        Self {
            uri: &item.uri,
            name: &item.name,
            version: item.version.as_deref().filter(|v| !v.is_empty()),
            image: item.image.as_deref(),
        }
    }
}

impl<'a> CompactItem<'a> {
    fn plain(item: &'a MediaItem) -> Self {
        Self {
            uri: &item.uri,
            name: &item.name,
            version: item.version.as_deref().filter(|v| !v.is_empty()),
            image: item.image.as_deref(),
            artists: None,
            album: None,
        }
    }

    fn with_artists(item: &'a MediaItem) -> Self {
        Self {
            artists: Some(item.artists.iter().map(CompactRef::from_ref).collect()),
            ..Self::plain(item)
        }
    }

    fn with_album(item: &'a MediaItem) -> Self {
        Self {
            album: item.album.as_ref().map(CompactRef::from_ref),
            ..Self::with_artists(item)
        }
    }
}
