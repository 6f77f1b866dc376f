use std::time::Duration;

use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use tokio::time::sleep;

use crate::{
    errors::Result,
    types::{Playlist, PlaylistItem, PlaylistResponse, PlaylistTracksPage, Track, TrackObject},
    warning,
};

const MAX_RETRY_AFTER: u64 = 120;
const MIN_RETRY_AFTER: u64 = 1;
const MAX_RATE_LIMIT_RETRIES: u32 = 3;

/// Retrieves a playlist with all of its tracks.
///
/// Follows the `next` links of the track listing until the last page. Items
/// without a track object (removed tracks) or with an object that is not a
/// music track (podcast episodes) are left out.
pub async fn get_playlist(client: &Client, api_url: &str, token: &str, id: &str) -> Result<Playlist> {
    let api_url = format!("{uri}/playlists/{id}", uri = api_url, id = id);
    let response: PlaylistResponse = get_json(client, &api_url, token).await?;

    let mut items = response.tracks.items;
    let mut next = response.tracks.next;
    while let Some(page_url) = next {
        let page: PlaylistTracksPage = get_json(client, &page_url, token).await?;
        items.extend(page.items);
        next = page.next;
    }

    Ok(Playlist {
        id: response.id,
        name: response.name,
        tracks: items.into_iter().filter_map(into_track).collect(),
    })
}

fn into_track(item: PlaylistItem) -> Option<Track> {
    let value = item.track?;
    match serde_json::from_value::<TrackObject>(value) {
        Ok(track) => Some(Track::from(track)),
        Err(e) => {
            log::warn!("Skipping playlist entry that is not a track: {}", e);
            None
        }
    }
}

async fn get_json<T: DeserializeOwned>(client: &Client, url: &str, token: &str) -> Result<T> {
    let response = send(client, url, token).await?;
    Ok(response.json::<T>().await?)
}

/// Sends an authorized GET, waiting out `429` answers a bounded number of
/// times. Once the retries are used up the `429` is returned as an error.
async fn send(client: &Client, url: &str, token: &str) -> Result<Response> {
    let mut retries = 0;
    loop {
        let response = client.get(url).bearer_auth(token).send().await?;

        // check for retry-after header
        if response.status() == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.parse::<u64>().ok())
                .unwrap_or(MIN_RETRY_AFTER)
                .max(MIN_RETRY_AFTER);

            if retries >= MAX_RATE_LIMIT_RETRIES {
                log::error!("Still rate limited after {} retries: {}", retries, url);
            } else if retry_after <= MAX_RETRY_AFTER {
                retries += 1;
                log::warn!("Rate limited, retrying in {} seconds", retry_after);
                sleep(Duration::from_secs(retry_after)).await;
                continue;
            } else {
                warning!(
                    "Retry after has reached an abnormal high of {} seconds. Try again later.",
                    retry_after
                );
            }
        }

        return Ok(response.error_for_status()?);
    }
}
