//! # Spotify Integration Module
//!
//! Read-only access to the Spotify Web API: the client credentials grant and
//! playlist retrieval. Playlists are exposed to the rest of the application
//! through the [`CatalogProvider`] trait, so the processor does not depend on
//! HTTP details.
//!
//! ## Flow
//!
//! ```text
//! PlaylistProcessor
//!        ↓
//! CatalogProvider (SpotifyClient)
//!        ├── TokenManager → auth::request_token   (POST /api/token)
//!        └── playlist::get_playlist                (GET /playlists/{id}, paged)
//! ```
//!
//! ## Rate Limiting
//!
//! A `429 Too Many Requests` answer is retried after the delay named in the
//! `Retry-After` header, up to two minutes. Longer delays are reported and the
//! request fails.

pub mod auth;
pub mod playlist;

use async_trait::async_trait;
use reqwest::Client;
use tokio::sync::Mutex;

use crate::{
    config::SpotifyCredentials, errors::Result, management::TokenManager, types::Playlist,
};

#[async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Playlist name and its tracks in catalog order.
    async fn playlist(&self, id: &str) -> Result<Playlist>;
}

pub struct SpotifyClient {
    client: Client,
    api_url: String,
    tokens: Mutex<TokenManager>,
}

impl SpotifyClient {
    pub fn new(client: Client, api_url: String, credentials: SpotifyCredentials) -> Self {
        SpotifyClient {
            tokens: Mutex::new(TokenManager::new(client.clone(), credentials)),
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl CatalogProvider for SpotifyClient {
    async fn playlist(&self, id: &str) -> Result<Playlist> {
        let token = self.tokens.lock().await.get_valid_token().await?;
        playlist::get_playlist(&self.client, &self.api_url, &token, id).await
    }
}
