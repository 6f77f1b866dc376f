//! Configuration management.
//!
//! Values come from environment variables, which may be supplied through a
//! `.env` file. Two files are read, the first one winning for any variable
//! already set:
//! 1. `.env` in the local data directory (`~/.local/share/spotfetch/.env` on Linux)
//! 2. `.env` in the current working directory
//!
//! Everything the run needs is collected once into [`Settings`], which is then
//! passed by reference. Command-line flags override individual fields.

use std::{env, path::PathBuf, time::Duration};

use crate::{
    errors::{Error, Result},
    retry::RetryPolicy,
    utils,
};

pub const DEFAULT_SPOTIFY_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_SPOTIFY_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_GENIUS_API_URL: &str = "https://api.genius.com";
pub const DEFAULT_GENIUS_URL: &str = "https://genius.com";
pub const DEFAULT_LOG_FILE: &str = "spotfetch.log";

/// Loads environment variables from `.env` files.
///
/// Creates the local data directory if it doesn't exist. A missing `.env` file
/// is not an error, the variables may come from the environment itself.
///
/// # Errors
///
/// Returns an error if the data directory cannot be created.
pub async fn load_env() -> Result<()> {
    let path = env_path();
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent).await?;
    }

    if dotenv::from_path(&path).is_err() {
        log::info!("No environment file at {}", path.display());
    }
    dotenv::dotenv().ok();
    Ok(())
}

/// Location of the `.env` file in the local data directory.
pub fn env_path() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("spotfetch/.env");
    path
}

#[derive(Debug, Clone)]
pub struct SpotifyCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub token_url: String,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub spotify: SpotifyCredentials,
    pub spotify_api_url: String,
    pub genius_access_token: String,
    pub genius_api_url: String,
    pub genius_url: String,
    pub output_root: PathBuf,
    pub move_to: Option<PathBuf>,
    pub playlists: Vec<String>,
    pub log_file: PathBuf,
    pub yt_dlp_path: Option<PathBuf>,
    pub retry: RetryPolicy,
}

impl Settings {
    /// Builds the settings from the process environment.
    ///
    /// # Errors
    ///
    /// Fails when a required variable (`SPOTIFY_CLIENT_ID`,
    /// `SPOTIFY_CLIENT_SECRET`, `GENIUS_ACCESS_TOKEN`) is missing, a numeric
    /// variable does not parse, or `RETRY_ATTEMPTS` is zero or beyond `u32`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the settings from any key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let required = |key: &str| var(key).ok_or_else(|| Error::Config(format!("{} must be set", key)));
        let number = |key: &str, default: u64| -> Result<u64> {
            match var(key) {
                Some(value) => value
                    .trim()
                    .parse()
                    .map_err(|_| Error::Config(format!("{} must be a number, got {}", key, value))),
                None => Ok(default),
            }
        };

        let defaults = RetryPolicy::default();
        let attempts = number("RETRY_ATTEMPTS", u64::from(defaults.attempts))?;
        let attempts = u32::try_from(attempts)
            .ok()
            .filter(|attempts| *attempts > 0)
            .ok_or_else(|| {
                Error::Config(format!(
                    "RETRY_ATTEMPTS must be between 1 and {}, got {}",
                    u32::MAX,
                    attempts
                ))
            })?;

        Ok(Settings {
            spotify: SpotifyCredentials {
                client_id: required("SPOTIFY_CLIENT_ID")?,
                client_secret: required("SPOTIFY_CLIENT_SECRET")?,
                token_url: var("SPOTIFY_TOKEN_URL")
                    .unwrap_or_else(|| DEFAULT_SPOTIFY_TOKEN_URL.to_string()),
            },
            spotify_api_url: var("SPOTIFY_API_URL")
                .unwrap_or_else(|| DEFAULT_SPOTIFY_API_URL.to_string()),
            genius_access_token: required("GENIUS_ACCESS_TOKEN")?,
            genius_api_url: var("GENIUS_API_URL")
                .unwrap_or_else(|| DEFAULT_GENIUS_API_URL.to_string()),
            genius_url: var("GENIUS_URL").unwrap_or_else(|| DEFAULT_GENIUS_URL.to_string()),
            output_root: var("OUTPUT_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(".")),
            move_to: var("MUSIC_DIR").map(PathBuf::from),
            playlists: var("PLAYLISTS")
                .map(|value| utils::split_list(&value))
                .unwrap_or_default(),
            log_file: var("LOG_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE)),
            yt_dlp_path: var("YT_DLP_PATH").map(PathBuf::from),
            retry: RetryPolicy {
                attempts,
                delay: Duration::from_secs(number(
                    "RETRY_DELAY_SECS",
                    defaults.delay.as_secs(),
                )?),
            },
        })
    }
}
