use std::{
    io::{self, BufRead, Write},
    path::{Path, PathBuf},
};

use reqwest::Client;

use crate::{
    config::Settings,
    error,
    format::{self, AudioFormat},
    info, logging,
    lyrics::{GeniusClient, LyricsResolver},
    media::YtDlp,
    processor::PlaylistProcessor,
    spotify::SpotifyClient,
    success,
    tagging::Tagger,
    utils, warning,
};

#[derive(Debug, Clone, Default)]
pub struct DownloadArgs {
    pub playlists: Vec<String>,
    pub format: Option<AudioFormat>,
    pub output: Option<PathBuf>,
    pub move_to: Option<PathBuf>,
    pub log_file: Option<PathBuf>,
}

pub async fn download(args: DownloadArgs) {
    let mut settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            error!("Cannot load configuration: {}", e);
        }
    };

    if let Some(output) = args.output {
        settings.output_root = output;
    }
    if let Some(move_to) = args.move_to {
        settings.move_to = Some(move_to);
    }
    if let Some(log_file) = args.log_file {
        settings.log_file = log_file;
    }
    if !args.playlists.is_empty() {
        settings.playlists = args.playlists;
    }

    if let Err(e) = logging::init(&settings.log_file) {
        warning!("Logging to {} is disabled: {}", settings.log_file.display(), e);
    }

    if settings.playlists.is_empty() {
        error!("No playlist links given. Pass them as arguments or set PLAYLISTS.");
    }

    let format = match args.format {
        Some(format) => format,
        None => prompt_format(),
    };
    log::info!("Downloading as {}", format);

    let yt_dlp = match YtDlp::locate(settings.yt_dlp_path.clone()) {
        Ok(yt_dlp) => yt_dlp,
        Err(e) => {
            error!("{}", e);
        }
    };

    let client = Client::new();
    let catalog = SpotifyClient::new(
        client.clone(),
        settings.spotify_api_url.clone(),
        settings.spotify.clone(),
    );
    let genius = GeniusClient::new(
        client.clone(),
        settings.genius_access_token.clone(),
        settings.genius_api_url.clone(),
        settings.genius_url.clone(),
    );
    let tagger = Tagger::new(client, LyricsResolver::new(Box::new(genius)));
    let processor = PlaylistProcessor::new(&catalog, &yt_dlp, &yt_dlp, &tagger, format)
        .with_retry(settings.retry);

    for link in &settings.playlists {
        match processor.process(link, &settings.output_root).await {
            Ok(summary) => {
                success!(
                    "Finished {}: {} downloaded, {} skipped, {} failed",
                    summary.name,
                    summary.downloaded.len(),
                    summary.skipped.len(),
                    summary.failed.len()
                );

                if let Some(destination) = &settings.move_to {
                    move_playlist(&summary.directory, destination).await;
                }
            }
            Err(e) => {
                log::error!("Error processing playlist {}: {}", link, e);
                warning!("Failed to process playlist {}: {}", link, e);
            }
        }
    }

    log::info!("Process complete.");
}

/// Asks for the audio format until a valid choice is entered.
fn prompt_format() -> AudioFormat {
    println!();
    println!("Select audio format:");
    for format in AudioFormat::ALL {
        println!("{}. {}", format.choice(), format);
    }

    let stdin = io::stdin();
    loop {
        print!("Enter the number corresponding to the desired format: ");
        let _ = io::stdout().flush();

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => {
                error!("No format selected.");
            }
            Ok(_) => {}
            Err(e) => {
                error!("Cannot read input: {}", e);
            }
        }

        match format::validate(&line).and_then(|_| line.parse::<AudioFormat>()) {
            Ok(format) => return format,
            Err(_) => warning!("Invalid input. Please enter a number between 1 and 4."),
        }
    }
}

async fn move_playlist(directory: &Path, destination: &Path) {
    let Some(name) = directory.file_name() else {
        return;
    };
    let target = destination.join(name);

    match utils::move_dir(directory, &target).await {
        Ok(()) => {
            info!("Playlist folder moved to {}", target.display());
            log::info!("Moved {} to {}", directory.display(), target.display());
        }
        Err(e) => {
            warning!("Error moving playlist folder: {}", e);
            log::error!(
                "Error moving {} to {}: {}",
                directory.display(),
                target.display(),
                e
            );
        }
    }
}
