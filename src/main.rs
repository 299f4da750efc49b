use std::path::PathBuf;

use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use spotsync::{cli, config, warning};

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
  author=env!("CARGO_PKG_AUTHORS"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// List the tagged audio files of a directory
    Scan(ScanOptions),

    /// Look up the tracks of a directory on Spotify
    Search(ScanOptions),

    /// Sync the tracks of a directory into the playlist
    Sync(SyncOptions),

    /// Show the contents of the playlist
    Show(ShowOptions),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct ScanOptions {
    /// Directory to scan; prompted for when omitted
    directory: Option<PathBuf>,
}

#[derive(Parser, Debug, Clone)]
pub struct SyncOptions {
    /// Directory to scan; prompted for when omitted
    directory: Option<PathBuf>,

    /// Playlist ID (defaults to SPOTIFY_PLAYLIST_ID)
    #[clap(long)]
    playlist: Option<String>,

    /// Show the playlist before updating it
    #[clap(long)]
    show_before: bool,

    /// Do not show the playlist after updating it
    #[clap(long)]
    hide_after: bool,

    /// Resolve tracks and print the batches without touching the playlist
    #[clap(long)]
    dry_run: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct ShowOptions {
    /// Playlist ID (defaults to SPOTIFY_PLAYLIST_ID)
    #[clap(long)]
    playlist: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    if let Err(e) = config::load_env().await {
        warning!("Cannot load environment file. Err: {}", e);
    }

    let cli = Cli::parse();

    match cli.command {
        Command::Scan(opt) => cli::scan(opt.directory),
        Command::Search(opt) => cli::search(opt.directory).await,
        Command::Sync(opt) => {
            cli::sync(
                opt.directory,
                opt.playlist,
                opt.show_before,
                !opt.hide_after,
                opt.dry_run,
            )
            .await
        }
        Command::Show(opt) => cli::show(opt.playlist).await,
        Command::Completions(opt) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}
