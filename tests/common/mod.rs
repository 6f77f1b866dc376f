#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use base64::{Engine, engine::general_purpose::STANDARD};
use lofty::{
    config::WriteOptions,
    tag::{Accessor, Tag, TagExt, TagType},
};
use reqwest::Client;
use spotfetch::errors::Result;
use spotfetch::lyrics::{LyricsProvider, LyricsResolver};
use spotfetch::tagging::Tagger;
use spotfetch::types::Track;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// 1x1 transparent PNG.
pub const COVER_PNG: &str =
    "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";

pub const LYRICS: &str = "I walked along the empty street tonight\n\
    Thinking about the days when we were young\n\
    And the summer never seemed to end";

pub fn cover_png() -> Vec<u8> {
    STANDARD.decode(COVER_PNG).unwrap()
}

pub fn client() -> Client {
    Client::builder().no_proxy().build().unwrap()
}

pub fn test_track(title: &str, cover_url: Option<String>) -> Track {
    Track {
        title: title.to_string(),
        artists: vec!["Artist A".to_string(), "Artist B".to_string()],
        album: "Test Album".to_string(),
        album_artists: vec!["Artist A".to_string()],
        release_date: "2021-03-05".to_string(),
        cover_url,
    }
}

/// Lyrics provider answering every lookup with the same text.
pub struct FixedLyrics(pub Option<String>);

#[async_trait]
impl LyricsProvider for FixedLyrics {
    fn host(&self) -> &str {
        "https://lyrics.test"
    }

    async fn lyrics_at(&self, _url: &str) -> Result<Option<String>> {
        Ok(self.0.clone())
    }

    async fn search(&self, _title: &str, _artist: &str) -> Result<Option<String>> {
        Ok(None)
    }
}

pub fn tagger(lyrics: Option<&str>) -> Tagger {
    Tagger::new(
        client(),
        LyricsResolver::new(Box::new(FixedLyrics(lyrics.map(String::from)))),
    )
}

pub async fn bind() -> (TcpListener, String) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let host = format!("http://{}", listener.local_addr().unwrap());
    (listener, host)
}

/// Answers HTTP requests by path prefix; unknown paths get a 404.
pub async fn serve(listener: TcpListener, routes: Vec<(String, u16, Vec<u8>)>) {
    let routes = Arc::new(routes);
    tokio::spawn(async move {
        while let Ok((socket, _)) = listener.accept().await {
            tokio::spawn(respond(socket, Arc::clone(&routes)));
        }
    });
}

/// Answers a single request, then stops listening.
pub async fn serve_once(listener: TcpListener, status: u16, body: Vec<u8>) {
    let routes = Arc::new(vec![("/".to_string(), status, body)]);
    tokio::spawn(async move {
        if let Ok((socket, _)) = listener.accept().await {
            drop(listener);
            respond(socket, routes).await;
        }
    });
}

async fn respond(mut socket: TcpStream, routes: Arc<Vec<(String, u16, Vec<u8>)>>) {
    let request = read_request(&mut socket).await;
    let path = request.split_whitespace().nth(1).unwrap_or("/").to_string();
    let (status, body) = routes
        .iter()
        .find(|(prefix, _, _)| path.starts_with(prefix.as_str()))
        .map(|(_, status, body)| (*status, body.clone()))
        .unwrap_or((404, Vec::new()));
    let reason = match status {
        200 => "OK",
        429 => "Too Many Requests",
        _ => "Not Found",
    };

    let head = format!(
        "HTTP/1.1 {} {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        status,
        reason,
        body.len()
    );
    let _ = socket.write_all(head.as_bytes()).await;
    let _ = socket.write_all(&body).await;
    let _ = socket.shutdown().await;
}

// Reads the head and, if announced, the body so closing never resets the peer
async fn read_request(socket: &mut TcpStream) -> String {
    let mut data = Vec::new();
    let mut buf = [0u8; 4096];
    loop {
        let n = socket.read(&mut buf).await.unwrap_or(0);
        if n == 0 {
            break;
        }
        data.extend_from_slice(&buf[..n]);

        let Some(end) = data.windows(4).position(|w| w == b"\r\n\r\n") else {
            continue;
        };
        let head = String::from_utf8_lossy(&data[..end]).to_lowercase();
        let length = head
            .lines()
            .find_map(|line| line.strip_prefix("content-length:"))
            .and_then(|value| value.trim().parse::<usize>().ok())
            .unwrap_or(0);
        if data.len() >= end + 4 + length {
            break;
        }
    }
    String::from_utf8_lossy(&data).to_string()
}

/// MPEG-1 Layer III frames (128 kbit/s, 44.1 kHz) without any tag.
pub fn write_mp3(path: &Path) {
    let mut data = Vec::new();
    for _ in 0..10 {
        data.extend_from_slice(&[0xFF, 0xFB, 0x90, 0x64]);
        data.extend(std::iter::repeat_n(0u8, 413));
    }
    std::fs::write(path, data).unwrap();
}

/// MP3 that already carries an ID3v2 header.
pub fn write_tagged_mp3(path: &Path) {
    write_mp3(path);
    let mut tag = Tag::new(TagType::Id3v2);
    tag.set_title("placeholder".to_string());
    tag.save_to_path(path, WriteOptions::default()).unwrap();
}

/// PCM WAV, mono, 8 kHz, 16 bit, 0.1 s of silence.
pub fn write_wav(path: &Path) {
    let samples = vec![0u8; 1600];
    let mut data = Vec::new();
    data.extend_from_slice(b"RIFF");
    data.extend_from_slice(&(36 + samples.len() as u32).to_le_bytes());
    data.extend_from_slice(b"WAVE");
    data.extend_from_slice(b"fmt ");
    data.extend_from_slice(&16u32.to_le_bytes());
    data.extend_from_slice(&1u16.to_le_bytes()); // PCM
    data.extend_from_slice(&1u16.to_le_bytes()); // channels
    data.extend_from_slice(&8000u32.to_le_bytes()); // sample rate
    data.extend_from_slice(&16000u32.to_le_bytes()); // byte rate
    data.extend_from_slice(&2u16.to_le_bytes()); // block align
    data.extend_from_slice(&16u16.to_le_bytes()); // bits per sample
    data.extend_from_slice(b"data");
    data.extend_from_slice(&(samples.len() as u32).to_le_bytes());
    data.extend_from_slice(&samples);
    std::fs::write(path, data).unwrap();
}

fn streaminfo(last: bool) -> Vec<u8> {
    let mut data = vec![if last { 0x80 } else { 0x00 }, 0x00, 0x00, 0x22];
    data.extend_from_slice(&[0x10, 0x00, 0x10, 0x00]); // min/max block size
    data.extend_from_slice(&[0x00; 6]); // min/max frame size
    data.extend_from_slice(&[0x0A, 0xC4, 0x42, 0xF0, 0x00, 0x00, 0x00, 0x00]);
    data.extend_from_slice(&[0x00; 16]); // MD5
    data
}

/// FLAC stream: STREAMINFO, a final PADDING block and a few frame bytes.
pub fn write_flac(path: &Path) {
    let mut data = Vec::new();
    data.extend_from_slice(b"fLaC");
    data.extend(streaminfo(false));
    data.extend_from_slice(&[0x81, 0x00, 0x00, 0x08]);
    data.extend_from_slice(&[0x00; 8]);
    data.extend_from_slice(&[0xFF, 0xF8, 0x69, 0x08, 0x00, 0x00, 0x00, 0x00]);
    std::fs::write(path, data).unwrap();
}

/// FLAC stream that ends right after a lone STREAMINFO block.
pub fn write_bare_flac(path: &Path) {
    let mut data = Vec::new();
    data.extend_from_slice(b"fLaC");
    data.extend(streaminfo(true));
    std::fs::write(path, data).unwrap();
}

fn atom(name: &[u8; 4], payload: &[u8]) -> Vec<u8> {
    let mut data = Vec::new();
    data.extend_from_slice(&(8 + payload.len() as u32).to_be_bytes());
    data.extend_from_slice(name);
    data.extend_from_slice(payload);
    data
}

/// Minimal M4A: `ftyp`, a `moov` holding only `mvhd`, and a small `mdat`.
pub fn write_m4a(path: &Path) {
    let mut ftyp = Vec::new();
    ftyp.extend_from_slice(b"M4A ");
    ftyp.extend_from_slice(&0u32.to_be_bytes());
    ftyp.extend_from_slice(b"M4A mp42isom");

    // version/flags, creation, modification, then the timescale
    let mut mvhd = vec![0u8; 100];
    mvhd[12..16].copy_from_slice(&1000u32.to_be_bytes());

    let mut data = atom(b"ftyp", &ftyp);
    data.extend(atom(b"moov", &atom(b"mvhd", &mvhd)));
    data.extend(atom(b"mdat", &[0u8; 16]));
    std::fs::write(path, data).unwrap();
}
