use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::format::AudioFormat;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub expires_in: u64,
    pub obtained_at: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistResponse {
    pub id: String,
    pub name: String,
    pub tracks: PlaylistTracksPage,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistTracksPage {
    pub items: Vec<PlaylistItem>,
    pub next: Option<String>,
    pub total: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistItem {
    // episodes and local files share this slot with differently shaped objects
    pub track: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackObject {
    pub name: String,
    pub artists: Vec<ArtistObject>,
    pub album: AlbumObject,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlbumObject {
    pub name: String,
    pub artists: Vec<ArtistObject>,
    pub release_date: String,
    #[serde(default)]
    pub images: Vec<Image>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtistObject {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Image {
    pub url: String,
}

/// Track facts as read from the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    pub title: String,
    pub artists: Vec<String>,
    pub album: String,
    pub album_artists: Vec<String>,
    pub release_date: String,
    pub cover_url: Option<String>,
}

impl Track {
    pub fn artist_line(&self) -> String {
        self.artists.join(", ")
    }

    pub fn album_artist_line(&self) -> String {
        self.album_artists.join(", ")
    }
}

impl From<TrackObject> for Track {
    fn from(track: TrackObject) -> Self {
        Track {
            title: track.name,
            artists: track.artists.into_iter().map(|a| a.name).collect(),
            album_artists: track.album.artists.into_iter().map(|a| a.name).collect(),
            album: track.album.name,
            release_date: track.album.release_date,
            cover_url: track.album.images.into_iter().next().map(|i| i.url),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Playlist {
    pub id: String,
    pub name: String,
    pub tracks: Vec<Track>,
}

/// One acquisition request, consumed once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadJob {
    pub source_url: String,
    pub directory: PathBuf,
    pub base_name: String,
    pub format: AudioFormat,
}

impl DownloadJob {
    /// Path of the file the job produces on success.
    pub fn output_path(&self) -> PathBuf {
        self.directory
            .join(format!("{}.{}", self.base_name, self.format.extension()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoMatch {
    pub url: String,
    pub title: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeniusSearchResponse {
    pub response: GeniusHits,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeniusHits {
    pub hits: Vec<GeniusHit>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeniusHit {
    #[serde(rename = "type")]
    pub kind: String,
    pub result: GeniusSong,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeniusSong {
    pub title: String,
    pub url: String,
    pub primary_artist: Option<GeniusArtist>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeniusArtist {
    pub name: String,
}
