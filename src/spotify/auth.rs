use base64::{Engine, engine::general_purpose::STANDARD};
use chrono::Utc;
use reqwest::{Client, header::AUTHORIZATION};

use crate::{
    config::SpotifyCredentials,
    errors::Result,
    types::{Token, TokenResponse},
};

/// Requests an app token with the client credentials grant.
///
/// The client id and secret are sent as HTTP Basic credentials, as the
/// Spotify accounts service expects for this grant.
///
/// # Errors
///
/// Fails on network errors, on a non-success status (wrong credentials are a
/// `400 Bad Request`) and on an unexpected response body.
pub async fn request_token(client: &Client, credentials: &SpotifyCredentials) -> Result<Token> {
    let basic = STANDARD.encode(format!(
        "{}:{}",
        credentials.client_id, credentials.client_secret
    ));

    let response = client
        .post(&credentials.token_url)
        .header(AUTHORIZATION, format!("Basic {}", basic))
        .form(&[("grant_type", "client_credentials")])
        .send()
        .await?
        .error_for_status()?;

    let json = response.json::<TokenResponse>().await?;

    Ok(Token {
        access_token: json.access_token,
        expires_in: json.expires_in,
        obtained_at: Utc::now().timestamp() as u64,
    })
}
