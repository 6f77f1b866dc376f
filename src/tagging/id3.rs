use std::path::Path;

use lofty::{
    TextEncoding,
    config::WriteOptions,
    id3::v2::{Frame, Id3v2Tag, UnsynchronizedTextFrame},
    tag::{Tag, TagExt, TagType},
};

use crate::{
    errors::{Error, Result},
    language,
    tagging::{Assets, MetadataWriter, Outcome, TagReport, embed_artwork, existing_tag, set_fields},
    types::Track,
};

const LYRICS_DESCRIPTION: &str = "desc";

/// ID3v2 writer for MP3 (tag must already exist) and WAV (tag block is
/// created and injected).
pub struct Id3Writer {
    inject: bool,
}

impl Id3Writer {
    pub fn existing() -> Self {
        Id3Writer { inject: false }
    }

    pub fn injected() -> Self {
        Id3Writer { inject: true }
    }

    fn base_tag(&self, path: &Path) -> Result<Tag> {
        if self.inject {
            return Ok(Tag::new(TagType::Id3v2));
        }

        existing_tag(path, TagType::Id3v2)?
            .ok_or_else(|| Error::MissingTagHeader(path.display().to_string()))
    }
}

impl MetadataWriter for Id3Writer {
    fn write(&self, path: &Path, track: &Track, assets: &Assets) -> TagReport {
        let mut tag = match self.base_tag(path) {
            Ok(tag) => tag,
            Err(e @ Error::MissingTagHeader(_)) => return TagReport::skipped(e),
            Err(e) => return TagReport::failed(e),
        };

        set_fields(&mut tag, track);
        let artwork = embed_artwork(&mut tag, &assets.artwork);

        let mut id3 = Id3v2Tag::from(tag);
        let lyrics = match &assets.lyrics {
            Some(text) => match lyric_language(text) {
                Ok(language) => {
                    id3.insert(Frame::UnsynchronizedText(UnsynchronizedTextFrame::new(
                        TextEncoding::UTF8,
                        language,
                        LYRICS_DESCRIPTION.to_string(),
                        text.clone(),
                    )));
                    Outcome::Written
                }
                Err(e) => Outcome::Failed(e.to_string()),
            },
            None => Outcome::Skipped("no lyrics found".to_string()),
        };

        if let Err(e) = id3.save_to_path(path, WriteOptions::default()) {
            return TagReport::failed(e);
        }

        TagReport {
            fields: Outcome::Written,
            artwork,
            lyrics,
        }
    }
}

fn lyric_language(text: &str) -> Result<[u8; 3]> {
    let code = language::detect_iso639_2(text)?;
    <[u8; 3]>::try_from(code.as_bytes()).map_err(|_| Error::UnmappedLanguage(code.to_string()))
}
