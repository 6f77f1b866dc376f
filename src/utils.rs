use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::LazyLock,
};

use regex::Regex;

use crate::{
    errors::{Error, Result},
    types::Track,
};

pub const DEFAULT_PLAYLIST_DIR: &str = "playlist";

static PLAYLIST_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https://open\.spotify\.com/playlist/(\w+)").expect("playlist link pattern")
});

/// Extracts the catalog id from a playlist link.
pub fn parse_playlist_id(link: &str) -> Result<String> {
    PLAYLIST_LINK
        .captures(link.trim())
        .and_then(|caps| caps.get(1))
        .map(|id| id.as_str().to_string())
        .ok_or_else(|| Error::InvalidPlaylistLink(link.to_string()))
}

/// Keeps alphanumerics, spaces, underscores and hyphens. Falls back to
/// [`DEFAULT_PLAYLIST_DIR`] when nothing is left.
pub fn sanitize_playlist_name(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '_' | '-'))
        .collect();
    let sanitized = sanitized.trim_end();

    if sanitized.is_empty() {
        DEFAULT_PLAYLIST_DIR.to_string()
    } else {
        sanitized.to_string()
    }
}

/// `"<2-digit index> - <title>"`, with `index` counted from 1.
pub fn track_file_name(index: usize, title: &str) -> String {
    let title: String = title
        .chars()
        .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
        .collect();
    format!("{:02} - {}", index, title)
}

pub fn search_phrase(track: &Track) -> String {
    format!("{} (Official Audio) - {}", track.title, track.artist_line())
}

pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Moves the directory `source` to `target`. A rename across filesystems
/// turns into a recursive copy followed by removing `source`.
pub async fn move_dir(source: &Path, target: &Path) -> Result<()> {
    match async_fs::rename(source, target).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::CrossesDevices => {
            log::info!(
                "{} and {} are on different filesystems, copying instead",
                source.display(),
                target.display()
            );
            copy_dir(source, target).await?;
            async_fs::remove_dir_all(source).await?;
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

/// Copies the directory tree under `source` into `target`.
pub async fn copy_dir(source: &Path, target: &Path) -> Result<()> {
    let mut pending: Vec<(PathBuf, PathBuf)> =
        vec![(source.to_path_buf(), target.to_path_buf())];
    while let Some((from, to)) = pending.pop() {
        async_fs::create_dir_all(&to).await?;
        let mut entries = tokio::fs::read_dir(&from).await?;
        while let Some(entry) = entries.next_entry().await? {
            let destination = to.join(entry.file_name());
            if entry.file_type().await?.is_dir() {
                pending.push((entry.path(), destination));
            } else {
                async_fs::copy(entry.path(), &destination).await?;
            }
        }
    }
    Ok(())
}
