//! Spotify playlist downloader library.
//!
//! Reads a Spotify playlist, finds each track on YouTube, downloads and
//! transcodes the audio with yt-dlp, then tags the file with metadata,
//! cover art and Genius lyrics.
//!
//! # Modules
//!
//! - `cli` - Command implementations
//! - `config` - Environment loading and run settings
//! - `errors` - Crate error type
//! - `format` - Audio format selection
//! - `language` - Language detection and ISO 639 mapping
//! - `logging` - File logger
//! - `lyrics` - Lyrics lookup on Genius
//! - `management` - Access token lifecycle
//! - `media` - Video search and audio acquisition
//! - `processor` - Per-playlist orchestration
//! - `retry` - Bounded retry helper
//! - `spotify` - Spotify Web API client
//! - `tagging` - Metadata writers per container
//! - `types` - Data structures and type definitions
//! - `utils` - Link parsing and file naming helpers

pub mod cli;
pub mod config;
pub mod errors;
pub mod format;
pub mod language;
pub mod logging;
pub mod lyrics;
pub mod management;
pub mod media;
pub mod processor;
pub mod retry;
pub mod spotify;
pub mod tagging;
pub mod types;
pub mod utils;

/// Prints an informational message with a blue bullet point.
///
/// # Example
///
/// ```
/// info!("Processing playlist: {}", name);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
///
/// Creates a formatted output line with a green "✓" indicator to signify
/// successful completion of operations. Used to provide positive feedback
/// when operations complete successfully.
///
/// # Example
///
/// ```
/// success!("Downloaded: {}", path.display());
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Creates a formatted error output with a red "!" indicator and immediately
/// terminates the program with exit code 1. Used for unrecoverable errors
/// that require immediate program termination.
///
/// # Example
///
/// ```
/// error!("Cannot load configuration: {}", e);
/// // Program exits here - code after this will not execute
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// # Example
///
/// ```
/// warning!("No YouTube results for: {}", phrase);
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
