use std::path::PathBuf;

use async_trait::async_trait;
use which::which;
use youtube_dl::{SearchOptions, YoutubeDl, YoutubeDlOutput};

use crate::{
    errors::{Error, Result},
    media::{AudioAcquirer, VideoSearch},
    success,
    types::{DownloadJob, VideoMatch},
};

const WATCH_URL: &str = "https://www.youtube.com/watch?v=";

/// yt-dlp backed search and download.
pub struct YtDlp {
    executable: PathBuf,
}

impl YtDlp {
    pub fn new(executable: PathBuf) -> Self {
        YtDlp { executable }
    }

    /// Uses the configured path, or looks `yt-dlp` up on `PATH`.
    pub fn locate(configured: Option<PathBuf>) -> Result<Self> {
        let executable = match configured {
            Some(path) => path,
            None => which("yt-dlp")
                .map_err(|e| Error::Config(format!("yt-dlp path not found: {}", e)))?,
        };

        log::info!("Using yt-dlp path: {:?}", executable);
        Ok(YtDlp::new(executable))
    }

    fn command(&self, job: &DownloadJob) -> YoutubeDl {
        let mut command = YoutubeDl::new(job.source_url.clone());
        command
            .youtube_dl_path(&self.executable)
            .format("bestaudio/best")
            .extract_audio(true)
            .output_template(output_template(&job.base_name))
            .extra_arg("--audio-format")
            .extra_arg(job.format.codec());

        if let Some(quality) = job.format.quality() {
            command
                .extra_arg("--audio-quality")
                .extra_arg(format!("{}K", quality));
        }

        // keep the engine's own chatter out of the console
        command.extra_arg("--quiet").extra_arg("--no-warnings");
        command
    }
}

fn output_template(base_name: &str) -> String {
    format!("{}.%(ext)s", base_name.replace('%', "%%"))
}

fn watch_url(id: &str) -> String {
    format!("{}{}", WATCH_URL, id)
}

#[async_trait]
impl VideoSearch for YtDlp {
    async fn best_match(&self, query: &str) -> Result<Option<VideoMatch>> {
        let options = SearchOptions::youtube(query).with_count(1);
        let output = YoutubeDl::search_for(&options)
            .youtube_dl_path(&self.executable)
            .extra_arg("--flat-playlist")
            .run_async()
            .await?;

        let found = match output {
            YoutubeDlOutput::Playlist(playlist) => playlist
                .entries
                .unwrap_or_default()
                .into_iter()
                .next()
                .map(|video| VideoMatch {
                    url: watch_url(&video.id),
                    title: video.title,
                }),
            YoutubeDlOutput::SingleVideo(video) => Some(VideoMatch {
                url: watch_url(&video.id),
                title: video.title,
            }),
        };

        Ok(found)
    }
}

#[async_trait]
impl AudioAcquirer for YtDlp {
    async fn acquire(&self, job: &DownloadJob) -> bool {
        log::info!(
            "Downloading audio for {} from {}",
            job.base_name,
            job.source_url
        );

        if let Err(e) = self.command(job).download_to_async(&job.directory).await {
            log::error!("Error downloading audio for {}: {}", job.base_name, e);
            return false;
        }

        let output = job.output_path();
        if !output.is_file() {
            log::error!(
                "yt-dlp finished but {} was not written",
                output.display()
            );
            return false;
        }

        log::info!("Successfully downloaded audio for {}", job.base_name);
        success!("Downloaded: {}", job.base_name);
        true
    }
}
