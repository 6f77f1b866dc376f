use chrono::Utc;
use reqwest::Client;

use crate::{config::SpotifyCredentials, errors::Result, spotify, types::Token};

/// Seconds before expiry at which a token is already treated as expired.
const EXPIRY_MARGIN: u64 = 240;

pub struct TokenManager {
    client: Client,
    credentials: SpotifyCredentials,
    token: Option<Token>,
}

impl TokenManager {
    pub fn new(client: Client, credentials: SpotifyCredentials) -> Self {
        TokenManager {
            client,
            credentials,
            token: None,
        }
    }

    pub async fn get_valid_token(&mut self) -> Result<String> {
        match &self.token {
            Some(token) if !is_expired(token) => Ok(token.access_token.clone()),
            _ => {
                let token = spotify::auth::request_token(&self.client, &self.credentials).await?;
                let access_token = token.access_token.clone();
                self.token = Some(token);
                Ok(access_token)
            }
        }
    }
}

pub fn is_expired(token: &Token) -> bool {
    let now = Utc::now().timestamp() as u64;
    now + EXPIRY_MARGIN >= token.obtained_at + token.expires_in
}
