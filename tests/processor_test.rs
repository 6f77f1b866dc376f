mod common;

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use common::{tagger, test_track, write_wav};
use lofty::tag::TagType;
use spotfetch::errors::{Error, Result};
use spotfetch::format::AudioFormat;
use spotfetch::media::{AudioAcquirer, VideoSearch};
use spotfetch::processor::PlaylistProcessor;
use spotfetch::retry::RetryPolicy;
use spotfetch::spotify::CatalogProvider;
use spotfetch::tagging::read_tag;
use spotfetch::types::{DownloadJob, Playlist, VideoMatch};
use tempfile::TempDir;

struct FakeCatalog {
    requested: Mutex<Vec<String>>,
}

#[async_trait]
impl CatalogProvider for FakeCatalog {
    async fn playlist(&self, id: &str) -> Result<Playlist> {
        self.requested.lock().unwrap().push(id.to_string());
        Ok(Playlist {
            id: id.to_string(),
            name: "Road Trip!".to_string(),
            tracks: vec![
                test_track("Missing", None),
                test_track("Found", None),
                test_track("Broken", None),
            ],
        })
    }
}

// No results for "Missing", one video for everything else
struct FakeSearch;

#[async_trait]
impl VideoSearch for FakeSearch {
    async fn best_match(&self, query: &str) -> Result<Option<VideoMatch>> {
        if query.starts_with("Missing") {
            return Ok(None);
        }
        Ok(Some(VideoMatch {
            url: format!("https://www.youtube.com/watch?v={}", query.len()),
            title: Some(query.to_string()),
        }))
    }
}

// Writes a WAV for every job except the "Broken" one, which always fails
struct FakeAcquirer {
    jobs: Mutex<Vec<DownloadJob>>,
}

#[async_trait]
impl AudioAcquirer for FakeAcquirer {
    async fn acquire(&self, job: &DownloadJob) -> bool {
        self.jobs.lock().unwrap().push(job.clone());
        if job.base_name.contains("Broken") {
            return false;
        }
        write_wav(&job.output_path());
        true
    }
}

fn no_delay(attempts: u32) -> RetryPolicy {
    RetryPolicy {
        attempts,
        delay: Duration::ZERO,
    }
}

#[tokio::test]
async fn test_process_playlist_end_to_end() {
    let output = TempDir::new().unwrap();
    let catalog = FakeCatalog {
        requested: Mutex::new(Vec::new()),
    };
    let acquirer = FakeAcquirer {
        jobs: Mutex::new(Vec::new()),
    };
    let search = FakeSearch;
    let tagger = tagger(None);

    let processor =
        PlaylistProcessor::new(&catalog, &search, &acquirer, &tagger, AudioFormat::Wav)
            .with_retry(no_delay(2));

    let summary = processor
        .process(
            "https://open.spotify.com/playlist/abc123?si=share",
            output.path(),
        )
        .await
        .unwrap();

    assert_eq!(*catalog.requested.lock().unwrap(), vec!["abc123".to_string()]);
    assert_eq!(summary.name, "Road Trip!");
    assert_eq!(summary.directory, output.path().join("Road Trip"));
    assert_eq!(summary.skipped, vec!["Missing".to_string()]);
    assert_eq!(summary.failed, vec!["Broken".to_string()]);
    assert_eq!(
        summary.downloaded,
        vec![output.path().join("Road Trip").join("02 - Found.wav")]
    );

    // Only the downloaded track lands in the folder, named by its playlist position
    let mut files: Vec<String> = std::fs::read_dir(&summary.directory)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    files.sort();
    assert_eq!(files, vec!["02 - Found.wav".to_string()]);

    let jobs = acquirer.jobs.lock().unwrap();
    let broken = jobs.iter().filter(|j| j.base_name == "03 - Broken").count();
    assert_eq!(broken, 2);
    assert!(jobs.iter().all(|j| j.format == AudioFormat::Wav));

    let snapshot = read_tag(&summary.downloaded[0], TagType::Id3v2)
        .unwrap()
        .unwrap();
    assert_eq!(snapshot.title.as_deref(), Some("Found"));
    assert_eq!(snapshot.artist.as_deref(), Some("Artist A, Artist B"));
    assert_eq!(snapshot.release_date.as_deref(), Some("2021-03-05"));
}

#[tokio::test]
async fn test_process_rejects_bad_link() {
    let output = TempDir::new().unwrap();
    let catalog = FakeCatalog {
        requested: Mutex::new(Vec::new()),
    };
    let acquirer = FakeAcquirer {
        jobs: Mutex::new(Vec::new()),
    };
    let search = FakeSearch;
    let tagger = tagger(None);

    let processor =
        PlaylistProcessor::new(&catalog, &search, &acquirer, &tagger, AudioFormat::Mp3)
            .with_retry(no_delay(1));

    let result = processor
        .process("https://open.spotify.com/album/abc123", output.path())
        .await;

    assert!(matches!(result, Err(Error::InvalidPlaylistLink(_))));
    assert!(catalog.requested.lock().unwrap().is_empty());
    assert!(acquirer.jobs.lock().unwrap().is_empty());
}
