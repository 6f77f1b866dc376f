use std::path::Path;

use lofty::{
    config::WriteOptions,
    tag::{ItemKey, TagExt, TagType},
};

use crate::{
    tagging::{
        Assets, MetadataWriter, Outcome, TagReport, embed_artwork, existing_or_new, set_fields,
    },
    types::Track,
};

/// Vorbis comment writer for FLAC. Cover art goes into a picture block,
/// lyrics into a plain `LYRICS` field.
pub struct FlacWriter;

impl MetadataWriter for FlacWriter {
    fn write(&self, path: &Path, track: &Track, assets: &Assets) -> TagReport {
        let mut tag = match existing_or_new(path, TagType::VorbisComments) {
            Ok(tag) => tag,
            Err(e) => return TagReport::failed(e),
        };

        set_fields(&mut tag, track);
        let artwork = embed_artwork(&mut tag, &assets.artwork);

        let lyrics = match &assets.lyrics {
            Some(text) if tag.insert_text(ItemKey::Lyrics, text.clone()) => Outcome::Written,
            Some(_) => Outcome::Failed("lyrics field rejected".to_string()),
            None => Outcome::Skipped("no lyrics found".to_string()),
        };

        if let Err(e) = tag.save_to_path(path, WriteOptions::default()) {
            return TagReport::failed(e);
        }

        TagReport {
            fields: Outcome::Written,
            artwork,
            lyrics,
        }
    }
}
