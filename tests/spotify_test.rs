mod common;

use std::time::Duration;

use common::{bind, client, serve};
use reqwest::StatusCode;
use spotfetch::config::SpotifyCredentials;
use spotfetch::errors::Error;
use spotfetch::spotify::{CatalogProvider, SpotifyClient};

fn track_json(name: &str, artist: &str, with_image: bool) -> String {
    let images = if with_image {
        r#"[{"url":"https://i.scdn.co/image/cover","height":640,"width":640}]"#
    } else {
        "[]"
    };
    format!(
        r#"{{"track":{{"type":"track","name":"{name}","artists":[{{"name":"{artist}"}},{{"name":"Guest"}}],
            "album":{{"name":"Album","artists":[{{"name":"{artist}"}}],"release_date":"2020-01-31","images":{images}}}}}}}"#
    )
}

#[tokio::test]
async fn test_playlist_follows_pages_and_skips_non_tracks() {
    let (listener, host) = bind().await;

    let first_page = format!(
        r#"{{"id":"abc","name":"Road Trip","tracks":{{"items":[{},{{"track":null}}],"next":"{host}/playlists/abc/tracks?offset=2","total":4}}}}"#,
        track_json("First", "Band", true)
    );
    let second_page = format!(
        r#"{{"items":[{{"track":{{"type":"episode","name":"Podcast","show":{{"name":"Show"}}}}}},{}],"next":null,"total":4}}"#,
        track_json("Second", "Solo", false)
    );

    serve(
        listener,
        vec![
            (
                "/token".to_string(),
                200,
                br#"{"access_token":"app-token","token_type":"Bearer","expires_in":3600}"#.to_vec(),
            ),
            ("/playlists/abc/tracks".to_string(), 200, second_page.into_bytes()),
            ("/playlists/abc".to_string(), 200, first_page.into_bytes()),
        ],
    )
    .await;

    let spotify = SpotifyClient::new(
        client(),
        host.clone(),
        SpotifyCredentials {
            client_id: "id".to_string(),
            client_secret: "secret".to_string(),
            token_url: format!("{}/token", host),
        },
    );

    let playlist = spotify.playlist("abc").await.unwrap();
    assert_eq!(playlist.id, "abc");
    assert_eq!(playlist.name, "Road Trip");
    assert_eq!(playlist.tracks.len(), 2);

    let first = &playlist.tracks[0];
    assert_eq!(first.title, "First");
    assert_eq!(first.artist_line(), "Band, Guest");
    assert_eq!(first.album_artist_line(), "Band");
    assert_eq!(first.release_date, "2020-01-31");
    assert_eq!(first.cover_url.as_deref(), Some("https://i.scdn.co/image/cover"));

    let second = &playlist.tracks[1];
    assert_eq!(second.title, "Second");
    assert_eq!(second.cover_url, None);
}

#[tokio::test]
async fn test_playlist_fails_without_token() {
    let (listener, host) = bind().await;
    serve(listener, vec![]).await;

    let spotify = SpotifyClient::new(
        client(),
        host.clone(),
        SpotifyCredentials {
            client_id: "id".to_string(),
            client_secret: "wrong".to_string(),
            token_url: format!("{}/token", host),
        },
    );

    let err = spotify.playlist("abc").await.unwrap_err();
    assert!(err.is_http_status());
}

#[tokio::test]
async fn test_playlist_gives_up_when_always_rate_limited() {
    let (listener, host) = bind().await;
    serve(
        listener,
        vec![
            (
                "/token".to_string(),
                200,
                br#"{"access_token":"app-token","token_type":"Bearer","expires_in":3600}"#.to_vec(),
            ),
            // 429 without a Retry-After header
            ("/playlists".to_string(), 429, Vec::new()),
        ],
    )
    .await;

    let spotify = SpotifyClient::new(
        client(),
        host.clone(),
        SpotifyCredentials {
            client_id: "id".to_string(),
            client_secret: "secret".to_string(),
            token_url: format!("{}/token", host),
        },
    );

    let err = tokio::time::timeout(Duration::from_secs(15), spotify.playlist("abc"))
        .await
        .expect("rate limit retries are bounded")
        .unwrap_err();

    match err {
        Error::Http(e) => assert_eq!(e.status(), Some(StatusCode::TOO_MANY_REQUESTS)),
        other => panic!("expected a 429 error, got {:?}", other),
    }
}
