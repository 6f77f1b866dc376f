//! Metadata tagging for the four supported containers.
//!
//! [`Tagger`] fetches the cover art and lyrics once, then hands them to the
//! [`MetadataWriter`] chosen by the file extension. Each writer reports the
//! outcome of its sub-steps (text fields, artwork, lyrics) separately so a
//! failing download or embed never prevents the other fields from landing in
//! the file.

mod flac;
mod id3;
mod mp4;

use std::{fmt, path::Path};

use lofty::{
    config::ParseOptions,
    file::TaggedFileExt,
    picture::{Picture, PictureType},
    probe::Probe,
    tag::{Accessor, ItemKey, Tag, TagType},
};
use reqwest::Client;

use crate::{
    errors::{Error, Result},
    format::AudioFormat,
    lyrics::LyricsResolver,
    types::Track,
};

pub use flac::FlacWriter;
pub use id3::Id3Writer;
pub use mp4::Mp4Writer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerFormat {
    /// ID3v2 tag already present in the file.
    Mp3,
    /// ID3v2 tag block injected into a RIFF container.
    Wav,
    /// Vorbis comments plus picture blocks.
    Flac,
    /// iTunes-style item list with a cover atom.
    M4a,
}

impl ContainerFormat {
    pub fn from_extension(extension: &str) -> Result<Self> {
        match extension.to_lowercase().as_str() {
            "mp3" => Ok(ContainerFormat::Mp3),
            "wav" => Ok(ContainerFormat::Wav),
            "flac" => Ok(ContainerFormat::Flac),
            "m4a" => Ok(ContainerFormat::M4a),
            other => Err(Error::UnsupportedContainer(other.to_string())),
        }
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| Error::UnsupportedContainer(path.display().to_string()))?;
        Self::from_extension(extension)
    }

    pub fn writer(self) -> Box<dyn MetadataWriter> {
        match self {
            ContainerFormat::Mp3 => Box::new(Id3Writer::existing()),
            ContainerFormat::Wav => Box::new(Id3Writer::injected()),
            ContainerFormat::Flac => Box::new(FlacWriter),
            ContainerFormat::M4a => Box::new(Mp4Writer),
        }
    }
}

impl From<AudioFormat> for ContainerFormat {
    fn from(format: AudioFormat) -> Self {
        match format {
            AudioFormat::Mp3 => ContainerFormat::Mp3,
            AudioFormat::Wav => ContainerFormat::Wav,
            AudioFormat::Flac => ContainerFormat::Flac,
            AudioFormat::M4a => ContainerFormat::M4a,
        }
    }
}

/// Cover art as obtained for one track.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Artwork {
    Fetched(Vec<u8>),
    Unavailable,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assets {
    pub artwork: Artwork,
    pub lyrics: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Written,
    Skipped(String),
    Failed(String),
}

impl Outcome {
    pub fn is_written(&self) -> bool {
        matches!(self, Outcome::Written)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Written => write!(f, "written"),
            Outcome::Skipped(reason) => write!(f, "skipped: {}", reason),
            Outcome::Failed(reason) => write!(f, "failed: {}", reason),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagReport {
    pub fields: Outcome,
    pub artwork: Outcome,
    pub lyrics: Outcome,
}

impl TagReport {
    pub fn failed(reason: impl fmt::Display) -> Self {
        let reason = reason.to_string();
        TagReport {
            fields: Outcome::Failed(reason.clone()),
            artwork: Outcome::Failed(reason.clone()),
            lyrics: Outcome::Failed(reason),
        }
    }

    pub fn skipped(reason: impl fmt::Display) -> Self {
        let reason = reason.to_string();
        TagReport {
            fields: Outcome::Skipped(reason.clone()),
            artwork: Outcome::Skipped(reason.clone()),
            lyrics: Outcome::Skipped(reason),
        }
    }

    fn log(&self, track: &Track) {
        let artist = track.artist_line();
        for (stage, outcome) in [
            ("metadata", &self.fields),
            ("album art", &self.artwork),
            ("lyrics", &self.lyrics),
        ] {
            match outcome {
                Outcome::Written => {}
                Outcome::Skipped(reason) => log::warn!(
                    "Skipped {} for {} by {}: {}",
                    stage,
                    track.title,
                    artist,
                    reason
                ),
                Outcome::Failed(reason) => log::error!(
                    "Error adding {} for {} by {}: {}",
                    stage,
                    track.title,
                    artist,
                    reason
                ),
            }
        }
    }
}

/// Writes a track's metadata into one container schema.
pub trait MetadataWriter {
    fn write(&self, path: &Path, track: &Track, assets: &Assets) -> TagReport;
}

pub struct Tagger {
    client: Client,
    lyrics: LyricsResolver,
}

impl Tagger {
    pub fn new(client: Client, lyrics: LyricsResolver) -> Self {
        Tagger { client, lyrics }
    }

    /// Tags the file at `path`. Never fails: every problem ends up in the
    /// returned report and the log.
    pub async fn tag(&self, path: &Path, track: &Track) -> TagReport {
        let format = match ContainerFormat::from_path(path) {
            Ok(format) => format,
            Err(e) => {
                let report = TagReport::failed(e);
                report.log(track);
                return report;
            }
        };

        if !path.is_file() {
            let report = TagReport::failed(format!("file not found: {}", path.display()));
            report.log(track);
            return report;
        }

        let assets = Assets {
            artwork: self.fetch_artwork(track).await,
            lyrics: self.lyrics.resolve(&track.artist_line(), &track.title).await,
        };

        // lofty does blocking file I/O and may panic on malformed streams
        let target = path.to_path_buf();
        let owned = track.clone();
        let report = tokio::task::spawn_blocking(move || {
            format.writer().write(&target, &owned, &assets)
        })
        .await
        .unwrap_or_else(|e| TagReport::failed(format!("tag writer aborted: {}", e)));
        report.log(track);
        report
    }

    async fn fetch_artwork(&self, track: &Track) -> Artwork {
        let Some(url) = &track.cover_url else {
            return Artwork::Unavailable;
        };

        match self.download(url).await {
            Ok(data) => Artwork::Fetched(data),
            Err(e) => Artwork::Failed(format!("failed to download album art: {}", e)),
        }
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>> {
        let bytes = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;
        Ok(bytes.to_vec())
    }
}

/// Text fields as read back from a tagged file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagSnapshot {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub album_artist: Option<String>,
    pub release_date: Option<String>,
    pub lyrics: Option<String>,
    pub pictures: usize,
}

/// Reads the tag of type `tag_type` back from `path`.
pub fn read_tag(path: &Path, tag_type: TagType) -> Result<Option<TagSnapshot>> {
    let tagged = Probe::open(path)?
        .options(ParseOptions::new().read_properties(false))
        .guess_file_type()?
        .read()?;

    Ok(tagged.tag(tag_type).map(|tag| TagSnapshot {
        title: tag.title().map(|s| s.into_owned()),
        artist: tag.artist().map(|s| s.into_owned()),
        album: tag.album().map(|s| s.into_owned()),
        album_artist: tag.get_string(&ItemKey::AlbumArtist).map(String::from),
        release_date: tag.get_string(&ItemKey::RecordingDate).map(String::from),
        lyrics: tag.get_string(&ItemKey::Lyrics).map(String::from),
        pictures: tag.pictures().len(),
    }))
}

fn existing_tag(path: &Path, tag_type: TagType) -> Result<Option<Tag>> {
    let tagged = Probe::open(path)?
        .options(ParseOptions::new().read_properties(false))
        .guess_file_type()?
        .read()?;

    Ok(tagged.tag(tag_type).cloned())
}

fn existing_or_new(path: &Path, tag_type: TagType) -> Result<Tag> {
    Ok(existing_tag(path, tag_type)?.unwrap_or_else(|| Tag::new(tag_type)))
}

fn set_fields(tag: &mut Tag, track: &Track) {
    tag.set_title(track.title.clone());
    tag.set_artist(track.artist_line());
    tag.set_album(track.album.clone());
    tag.insert_text(ItemKey::AlbumArtist, track.album_artist_line());
    tag.insert_text(ItemKey::RecordingDate, track.release_date.clone());
}

fn front_cover(data: &[u8]) -> Result<Picture> {
    let mut picture = Picture::from_reader(&mut &data[..])?;
    picture.set_pic_type(PictureType::CoverFront);
    Ok(picture)
}

fn replace_pictures(tag: &mut Tag, picture: Picture) {
    while !tag.pictures().is_empty() {
        tag.remove_picture(0);
    }
    tag.push_picture(picture);
}

fn embed_artwork(tag: &mut Tag, artwork: &Artwork) -> Outcome {
    match artwork {
        Artwork::Fetched(data) => match front_cover(data) {
            Ok(picture) => {
                replace_pictures(tag, picture);
                Outcome::Written
            }
            Err(e) => Outcome::Failed(e.to_string()),
        },
        Artwork::Unavailable => Outcome::Skipped("no cover art".to_string()),
        Artwork::Failed(reason) => Outcome::Failed(reason.clone()),
    }
}

fn step(operation: impl FnOnce() -> Result<Outcome>) -> Outcome {
    operation().unwrap_or_else(|e| Outcome::Failed(e.to_string()))
}
