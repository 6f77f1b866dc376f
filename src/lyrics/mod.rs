//! Lyrics lookup.
//!
//! A lyrics page is first fetched directly at a locator built from the
//! normalized artist and title. If the provider answers that page with an
//! HTTP error the resolver falls back to a free-text search. Every failure
//! ends in `None`; the resolver never returns an error to its caller.

mod genius;

use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

use crate::errors::Result;

pub use genius::{GeniusClient, extract_lyrics};

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern"));

#[async_trait]
pub trait LyricsProvider: Send + Sync {
    /// Base URL of the lyrics pages, without trailing slash.
    fn host(&self) -> &str;

    /// Fetches the lyrics on the page at `url`. `Ok(None)` means the page
    /// exists but holds no lyrics.
    async fn lyrics_at(&self, url: &str) -> Result<Option<String>>;

    /// Free-text search by title and artist.
    async fn search(&self, title: &str, artist: &str) -> Result<Option<String>>;
}

/// Strips accents, drops commas and periods, lowercases and joins words with
/// hyphens.
pub fn normalize(text: &str) -> String {
    let folded: String = text
        .nfkd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .nfkd()
        .filter(|c| !is_combining_mark(*c))
        .filter(|c| !matches!(c, ',' | '.'))
        .collect();

    WHITESPACE.replace_all(&folded, "-").into_owned()
}

pub fn lyrics_url(host: &str, artist: &str, title: &str) -> String {
    format!(
        "{}/{}-{}-lyrics",
        host.trim_end_matches('/'),
        normalize(artist),
        normalize(title)
    )
}

pub struct LyricsResolver {
    provider: Box<dyn LyricsProvider>,
}

impl LyricsResolver {
    pub fn new(provider: Box<dyn LyricsProvider>) -> Self {
        LyricsResolver { provider }
    }

    pub async fn resolve(&self, artist: &str, title: &str) -> Option<String> {
        let url = lyrics_url(self.provider.host(), artist, title);

        match self.provider.lyrics_at(&url).await {
            Ok(lyrics) => lyrics,
            Err(e) if e.is_http_status() => {
                log::info!("Song lyrics not found at {}, attempting to search...", url);
                self.search(artist, title).await
            }
            Err(e) => {
                log::error!(
                    "Error fetching lyrics for {} by {}: {}",
                    title,
                    artist,
                    e
                );
                None
            }
        }
    }

    async fn search(&self, artist: &str, title: &str) -> Option<String> {
        match self.provider.search(title, artist).await {
            Ok(Some(lyrics)) => {
                log::info!("Found lyrics for {} by {} through search.", title, artist);
                Some(lyrics)
            }
            Ok(None) => {
                log::error!("Lyrics not found for {} by {}.", title, artist);
                None
            }
            Err(e) => {
                log::error!(
                    "Error searching lyrics for {} by {}: {}",
                    title,
                    artist,
                    e
                );
                None
            }
        }
    }
}
