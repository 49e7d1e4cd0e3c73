//! Virtual music server with a small fixed library.

use hearth_app::ports::MusicClient;
use hearth_domain::error::HubError;
use hearth_domain::media::{MediaItem, MediaItemRef, MediaType, SearchResults};

const PROVIDER: &str = "virtual";

/// An in-memory music server.
///
/// A query matches an item when every ` - `-separated part of it is a
/// case-insensitive substring of the item's name, one of its artists, or its
/// album.
pub struct VirtualMusicServer {
    library: Vec<MediaItem>,
}

impl Default for VirtualMusicServer {
    fn default() -> Self {
        Self::new(demo_library())
    }
}

impl VirtualMusicServer {
    #[must_use]
    pub fn new(library: Vec<MediaItem>) -> Self {
        Self { library }
    }

    #[must_use]
    pub fn library(&self) -> &[MediaItem] {
        &self.library
    }
}

fn matches(item: &MediaItem, terms: &[String]) -> bool {
    let mut fields = vec![item.name.to_lowercase()];
    fields.extend(item.artists.iter().map(|a| a.name.to_lowercase()));
    fields.extend(item.album.iter().map(|a| a.name.to_lowercase()));
    terms
        .iter()
        .all(|term| fields.iter().any(|field| field.contains(term.as_str())))
}

impl MusicClient for VirtualMusicServer {
    async fn search(
        &self,
        query: &str,
        media_types: &[MediaType],
        limit: u32,
        library_only: bool,
    ) -> Result<SearchResults, HubError> {
        let terms: Vec<String> = query
            .split(" - ")
            .map(|part| part.trim().to_lowercase())
            .filter(|part| !part.is_empty())
            .collect();
        let limit = usize::try_from(limit).unwrap_or(usize::MAX);

        let mut results = SearchResults::default();
        for &media_type in media_types {
            let Some(bucket) = results.bucket_mut(media_type) else {
                continue;
            };
            bucket.extend(
                self.library
                    .iter()
                    .filter(|item| item.media_type == media_type)
                    .filter(|item| !library_only || item.in_library)
                    .filter(|item| matches(item, &terms))
                    .take(limit)
                    .cloned(),
            );
        }
        tracing::debug!(query, hits = results.len(), "virtual search");
        Ok(results)
    }
}

fn item(media_type: MediaType, name: &str, in_library: bool) -> MediaItem {
    let item_id = name.to_lowercase().replace(' ', "-");
    MediaItem {
        uri: format!("{PROVIDER}://{media_type}/{item_id}"),
        item_id,
        provider: PROVIDER.to_string(),
        name: name.to_string(),
        media_type,
        version: None,
        image: None,
        artists: Vec::new(),
        album: None,
        in_library,
    }
}

fn by(mut media: MediaItem, artist: &MediaItemRef, album: Option<&MediaItemRef>) -> MediaItem {
    media.artists.push(artist.clone());
    media.album = album.cloned();
    media
}

fn demo_library() -> Vec<MediaItem> {
    let beatles = item(MediaType::Artist, "The Beatles", true);
    let queen = item(MediaType::Artist, "Queen", true);
    let miles = item(MediaType::Artist, "Miles Davis", false);

    let abbey_road = by(
        item(MediaType::Album, "Abbey Road", true),
        &beatles.as_ref_item(),
        None,
    );
    let mut opera = by(
        item(MediaType::Album, "A Night at the Opera", true),
        &queen.as_ref_item(),
        None,
    );
    opera.version = Some("2011 Remaster".to_string());
    let kind_of_blue = by(
        item(MediaType::Album, "Kind of Blue", false),
        &miles.as_ref_item(),
        None,
    );

    let tracks = vec![
        by(
            item(MediaType::Track, "Come Together", true),
            &beatles.as_ref_item(),
            Some(&abbey_road.as_ref_item()),
        ),
        by(
            item(MediaType::Track, "Something", true),
            &beatles.as_ref_item(),
            Some(&abbey_road.as_ref_item()),
        ),
        by(
            item(MediaType::Track, "Bohemian Rhapsody", true),
            &queen.as_ref_item(),
            Some(&opera.as_ref_item()),
        ),
        by(
            item(MediaType::Track, "So What", false),
            &miles.as_ref_item(),
            Some(&kind_of_blue.as_ref_item()),
        ),
    ];

    let mut library = vec![beatles, queen, miles, abbey_road, opera, kind_of_blue];
    library.extend(tracks);
    library.extend([
        item(MediaType::Playlist, "Sunday Jazz", true),
        item(MediaType::Radio, "Jazz FM", false),
        item(MediaType::Audiobook, "Dune", true),
        item(MediaType::Podcast, "The Daily", false),
    ]);
    library
}
