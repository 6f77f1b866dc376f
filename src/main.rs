use std::path::PathBuf;

use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use spotfetch::{
    cli::{self, DownloadArgs},
    config, error,
    format::{self, AudioFormat},
};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Download the tracks of one or more playlists
    Download(DownloadOptions),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct DownloadOptions {
    /// Playlist links; falls back to PLAYLISTS when omitted
    pub playlists: Vec<String>,

    /// Audio format (1-4 or mp3, wav, flac, m4a); prompted when omitted
    #[clap(long, value_parser = format::parse_format)]
    pub format: Option<AudioFormat>,

    /// Directory the playlist folders are created in
    #[clap(long)]
    pub output: Option<PathBuf>,

    /// Move each finished playlist folder here
    #[clap(long)]
    pub move_to: Option<PathBuf>,

    /// Log file, truncated at start
    #[clap(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }

    let cli = Cli::parse();

    match cli.command {
        Command::Download(opt) => {
            cli::download(DownloadArgs {
                playlists: opt.playlists,
                format: opt.format,
                output: opt.output,
                move_to: opt.move_to,
                log_file: opt.log_file,
            })
            .await
        }
        Command::Completions(opt) => {
            let mut cmd = Cli::command_for_update();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}
