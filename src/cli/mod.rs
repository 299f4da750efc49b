//! # CLI Module
//!
//! User-facing commands. Each command threads the library stages together
//! and renders their reports; none of the stages print on their own.
//!
//! - [`scan`] - list the tracks a directory would contribute
//! - [`search`] - scan and look every track up in the catalog
//! - [`sync`] - scan, search and reconcile the configured playlist
//! - [`show`] - print the playlist's current contents
//!
//! ## Usage Patterns
//!
//! ```bash
//! spotsync scan ~/Music/mixtape
//! spotsync search ~/Music/mixtape
//! spotsync sync ~/Music/mixtape --show-before
//! spotsync sync --dry-run            # prompts for the directory
//! spotsync show --playlist 37i9dQZF1DXcBWIGoYBM5M
//! ```
//!
//! Missing credentials or configuration terminate the command through
//! [`error!`](crate::error). Everything else is reported and the command
//! carries on with what it has.

mod scan;
mod search;
mod show;
mod sync;

pub use scan::scan;
pub use search::search;
pub use show::show;
pub use sync::sync;

use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
    time::Duration,
};

use indicatif::{ProgressBar, ProgressStyle};

use crate::{config, error, management::TokenManager, spotify::SpotifyClient};

/// Returns `directory` or asks for one on stdin.
pub(crate) fn directory_or_prompt(directory: Option<PathBuf>) -> PathBuf {
    if let Some(directory) = directory {
        return directory;
    }

    print!("Enter the directory path: ");
    let _ = io::stdout().flush();

    let mut line = String::new();
    if let Err(e) = io::stdin().lock().read_line(&mut line) {
        error!("Cannot read directory path: {}", e);
    }
    PathBuf::from(line.trim_end_matches(['\r', '\n']))
}

/// Builds an authenticated client from `SPOTIFY_ACCESS_TOKEN` or the token
/// cache, refreshing the cached token when needed.
pub(crate) async fn connect() -> SpotifyClient {
    if let Some(token) = config::spotify_access_token() {
        return SpotifyClient::new(config::spotify_apiurl(), token);
    }

    let mut token_mgr = match TokenManager::load().await {
        Ok(mgr) => mgr,
        Err(e) => error!(
            "Failed to load token. Provide SPOTIFY_ACCESS_TOKEN or a token cache.\n Error: {}",
            e
        ),
    };

    match token_mgr.get_valid_token().await {
        Ok(token) => SpotifyClient::new(config::spotify_apiurl(), token),
        Err(e) => error!("Failed to obtain a valid token. Err: {}", e),
    }
}

pub(crate) fn playlist_or_config(playlist: Option<String>) -> String {
    match playlist {
        Some(id) => id,
        None => match config::spotify_playlist_id() {
            Ok(id) => id,
            Err(e) => error!("{}", e),
        },
    }
}

pub(crate) fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }
    pb
}

pub(crate) fn progress_bar(len: u64, message: &str) -> ProgressBar {
    let pb = ProgressBar::new(len);
    pb.set_message(message.to_string());
    if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg} [{bar:30}] {pos}/{len}")
    {
        pb.set_style(style.progress_chars("=> "));
    }
    pb
}
