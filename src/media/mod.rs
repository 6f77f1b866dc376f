//! Video search and audio acquisition.

mod youtube;

use async_trait::async_trait;

use crate::{
    errors::Result,
    types::{DownloadJob, VideoMatch},
};

pub use youtube::YtDlp;

#[async_trait]
pub trait VideoSearch: Send + Sync {
    /// Best match for a free-text query, `None` when the search came back empty.
    async fn best_match(&self, query: &str) -> Result<Option<VideoMatch>>;
}

#[async_trait]
pub trait AudioAcquirer: Send + Sync {
    /// Downloads and transcodes the job's source. Failures are logged and
    /// reported as `false`, never returned as errors.
    async fn acquire(&self, job: &DownloadJob) -> bool;
}
