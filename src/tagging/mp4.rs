use std::path::Path;

use lofty::{
    config::WriteOptions,
    tag::{ItemKey, TagExt, TagType},
};

use crate::{
    tagging::{
        Artwork, Assets, MetadataWriter, Outcome, TagReport, embed_artwork, existing_or_new,
        set_fields, step,
    },
    types::Track,
};

/// MP4 item list writer. Fields, cover and lyrics are each written by
/// reopening the file and saving it again, so one failing stage leaves the
/// earlier ones on disk.
pub struct Mp4Writer;

impl MetadataWriter for Mp4Writer {
    fn write(&self, path: &Path, track: &Track, assets: &Assets) -> TagReport {
        let fields = step(|| {
            let mut tag = existing_or_new(path, TagType::Mp4Ilst)?;
            set_fields(&mut tag, track);
            tag.save_to_path(path, WriteOptions::default())?;
            Ok(Outcome::Written)
        });

        let artwork = match &assets.artwork {
            Artwork::Fetched(_) => step(|| {
                let mut tag = existing_or_new(path, TagType::Mp4Ilst)?;
                let outcome = embed_artwork(&mut tag, &assets.artwork);
                if outcome.is_written() {
                    tag.save_to_path(path, WriteOptions::default())?;
                }
                Ok(outcome)
            }),
            Artwork::Unavailable => Outcome::Skipped("no cover art".to_string()),
            Artwork::Failed(reason) => Outcome::Failed(reason.clone()),
        };

        let lyrics = match &assets.lyrics {
            Some(text) => step(|| {
                let mut tag = existing_or_new(path, TagType::Mp4Ilst)?;
                if !tag.insert_text(ItemKey::Lyrics, text.clone()) {
                    return Ok(Outcome::Failed("lyrics field rejected".to_string()));
                }
                tag.save_to_path(path, WriteOptions::default())?;
                Ok(Outcome::Written)
            }),
            None => Outcome::Skipped("no lyrics found".to_string()),
        };

        TagReport {
            fields,
            artwork,
            lyrics,
        }
    }
}
