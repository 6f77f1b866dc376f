//! Per-playlist orchestration: catalog → search → download with retry → tag.
//!
//! Tracks are processed one after the other in catalog order. A track that
//! finds no video, or whose download keeps failing, is recorded and skipped;
//! it never stops the rest of the playlist.

use std::{
    convert::Infallible,
    path::{Path, PathBuf},
    time::Duration,
};

use indicatif::{ProgressBar, ProgressStyle};

use crate::{
    errors::Result,
    format::AudioFormat,
    info,
    media::{AudioAcquirer, VideoSearch},
    retry::{RetryPolicy, retry_with},
    spotify::CatalogProvider,
    tagging::Tagger,
    types::{DownloadJob, Track},
    utils, warning,
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaylistSummary {
    pub name: String,
    pub directory: PathBuf,
    pub downloaded: Vec<PathBuf>,
    pub skipped: Vec<String>,
    pub failed: Vec<String>,
}

pub struct PlaylistProcessor<'a> {
    catalog: &'a dyn CatalogProvider,
    search: &'a dyn VideoSearch,
    acquirer: &'a dyn AudioAcquirer,
    tagger: &'a Tagger,
    format: AudioFormat,
    retry: RetryPolicy,
}

impl<'a> PlaylistProcessor<'a> {
    pub fn new(
        catalog: &'a dyn CatalogProvider,
        search: &'a dyn VideoSearch,
        acquirer: &'a dyn AudioAcquirer,
        tagger: &'a Tagger,
        format: AudioFormat,
    ) -> Self {
        PlaylistProcessor {
            catalog,
            search,
            acquirer,
            tagger,
            format,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Downloads and tags every track of the playlist behind `link` into a
    /// directory named after the playlist below `output_root`.
    ///
    /// # Errors
    ///
    /// Fails on a malformed link, when the catalog cannot be read, or when the
    /// output directory cannot be created. Per-track problems are never
    /// returned; they are logged and listed in the summary.
    pub async fn process(&self, link: &str, output_root: &Path) -> Result<PlaylistSummary> {
        let id = utils::parse_playlist_id(link)?;

        let pb = ProgressBar::new_spinner();
        pb.set_message(format!("Fetching playlist {}...", id));
        pb.enable_steady_tick(Duration::from_millis(100));
        if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
            pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
        }
        let playlist = self.catalog.playlist(&id).await;
        pb.finish_and_clear();
        let playlist = playlist?;

        let directory = output_root.join(utils::sanitize_playlist_name(&playlist.name));
        async_fs::create_dir_all(&directory).await?;

        info!("Processing playlist: {}", playlist.name);
        log::info!(
            "Processing playlist {} ({} tracks) into {}",
            playlist.name,
            playlist.tracks.len(),
            directory.display()
        );

        let mut summary = PlaylistSummary {
            name: playlist.name.clone(),
            directory,
            ..Default::default()
        };

        for (index, track) in playlist.tracks.iter().enumerate() {
            self.process_track(index + 1, track, &mut summary).await;
        }

        Ok(summary)
    }

    async fn process_track(&self, index: usize, track: &Track, summary: &mut PlaylistSummary) {
        let phrase = utils::search_phrase(track);

        let found = match self.search.best_match(&phrase).await {
            Ok(found) => found,
            Err(e) => {
                log::error!("Error searching video for {}: {}", track.title, e);
                summary.failed.push(track.title.clone());
                return;
            }
        };

        let Some(video) = found else {
            warning!("No YouTube results for: {}", phrase);
            log::warn!("No YouTube results for: {}, skipping", phrase);
            summary.skipped.push(track.title.clone());
            return;
        };

        let job = DownloadJob {
            source_url: video.url,
            directory: summary.directory.clone(),
            base_name: utils::track_file_name(index, &track.title),
            format: self.format,
        };

        let acquirer = self.acquirer;
        let pending = &job;
        let acquired = retry_with(self.retry, move || async move {
            Ok::<_, Infallible>(acquirer.acquire(pending).await)
        })
        .await;

        if acquired.is_none() {
            log::error!(
                "Error processing track {}: download failed after {} attempts",
                track.title,
                self.retry.attempts
            );
            summary.failed.push(track.title.clone());
            return;
        }

        let path = job.output_path();
        let report = self.tagger.tag(&path, track).await;
        log::info!(
            "Tagged {}: metadata {}, album art {}, lyrics {}",
            path.display(),
            report.fields,
            report.artwork,
            report.lyrics
        );
        summary.downloaded.push(path);
    }
}
