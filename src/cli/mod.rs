//! # CLI Module
//!
//! Command implementations behind the `spotfetch` binary. Each command
//! resolves its [`Settings`](crate::config::Settings), wires the concrete
//! Spotify, YouTube and Genius clients together and reports progress on the
//! console while the detailed trail goes to the log file.
//!
//! ## Commands
//!
//! - [`download`] - Downloads, converts and tags every track of the given playlists
//!
//! ## Usage
//!
//! ```bash
//! spotfetch download https://open.spotify.com/playlist/37i9dQZF1DXcBWIGoYBM5M
//! spotfetch download --format flac --move-to ~/Music <LINK> <LINK>
//! spotfetch download                     # links from PLAYLISTS, format prompted
//! ```

mod download;

pub use download::DownloadArgs;
pub use download::download;
