use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid playlist link {0}, expected format: https://open.spotify.com/playlist/...")]
    InvalidPlaylistLink(String),

    #[error("invalid format choice {0:?}, expected a number between 1 and 4")]
    InvalidFormatChoice(String),

    #[error("unsupported audio container: {0}")]
    UnsupportedContainer(String),

    #[error("no language mapping found for {0}")]
    UnmappedLanguage(String),

    #[error("could not detect lyrics language")]
    UndetectedLanguage,

    #[error("no ID3 header found in {0}")]
    MissingTagHeader(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("filesystem error: {0}")]
    Io(#[from] std::io::Error),

    #[error("tag error: {0}")]
    Tag(#[from] lofty::error::LoftyError),

    #[error("yt-dlp error: {0}")]
    Download(#[from] youtube_dl::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// True when the error carries an HTTP status from the remote side, as
    /// opposed to a connection or decoding failure.
    pub fn is_http_status(&self) -> bool {
        matches!(self, Error::Http(e) if e.is_status())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
