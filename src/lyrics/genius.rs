use async_trait::async_trait;
use reqwest::Client;
use scraper::{ElementRef, Html, Node, Selector};

use crate::{
    errors::Result,
    lyrics::LyricsProvider,
    types::{GeniusHit, GeniusSearchResponse},
};

/// Genius as lyrics provider. Pages are scraped, search goes through the API.
pub struct GeniusClient {
    client: Client,
    access_token: String,
    api_url: String,
    host: String,
}

impl GeniusClient {
    pub fn new(client: Client, access_token: String, api_url: String, host: String) -> Self {
        GeniusClient {
            client,
            access_token,
            api_url: api_url.trim_end_matches('/').to_string(),
            host: host.trim_end_matches('/').to_string(),
        }
    }

    async fn search_hits(&self, title: &str, artist: &str) -> Result<Vec<GeniusHit>> {
        let api_url = format!("{uri}/search", uri = self.api_url);
        let response = self
            .client
            .get(&api_url)
            .bearer_auth(&self.access_token)
            .query(&[("q", format!("{} {}", title, artist))])
            .send()
            .await?
            .error_for_status()?;

        let json = response.json::<GeniusSearchResponse>().await?;
        Ok(json.response.hits)
    }
}

#[async_trait]
impl LyricsProvider for GeniusClient {
    fn host(&self) -> &str {
        &self.host
    }

    async fn lyrics_at(&self, url: &str) -> Result<Option<String>> {
        let html = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        Ok(extract_lyrics(&html))
    }

    async fn search(&self, title: &str, artist: &str) -> Result<Option<String>> {
        let hits = self.search_hits(title, artist).await?;
        let Some(song) = best_hit(&hits, artist) else {
            return Ok(None);
        };

        log::info!("Search matched {} at {}", song.result.title, song.result.url);
        self.lyrics_at(&song.result.url).await
    }
}

fn best_hit<'a>(hits: &'a [GeniusHit], artist: &str) -> Option<&'a GeniusHit> {
    let artist = artist.to_lowercase();
    let songs = || hits.iter().filter(|hit| hit.kind == "song");

    songs()
        .find(|hit| {
            hit.result
                .primary_artist
                .as_ref()
                .is_some_and(|a| artist.contains(&a.name.to_lowercase()))
        })
        .or_else(|| songs().next())
}

/// Pulls the lyric text out of a Genius song page.
pub fn extract_lyrics(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse(r#"div[data-lyrics-container="true"]"#).ok()?;

    let mut lyrics = String::new();
    for container in document.select(&selector) {
        collect_text(container, &mut lyrics);
        lyrics.push('\n');
    }

    let lyrics = lyrics.trim();
    if lyrics.is_empty() {
        None
    } else {
        Some(lyrics.to_string())
    }
}

fn collect_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        if let Some(child_element) = ElementRef::wrap(child) {
            let value = child_element.value();
            if value.name() == "br" {
                out.push('\n');
            } else if value.attr("data-exclude-from-selection").is_none() {
                collect_text(child_element, out);
            }
        } else if let Node::Text(text) = child.value() {
            out.push_str(text);
        }
    }
}
