//! Configuration management for spotsync.
//!
//! This module handles loading and accessing configuration values from environment
//! variables and `.env` files. Credentials and the target playlist are supplied
//! out of band; this module only reads them.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Application defaults (where applicable)

use std::{env, path::PathBuf};

use thiserror::Error;

pub const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_MARKET: &str = "NL";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
}

/// Returns the application data directory (`<data_local_dir>/spotsync`).
///
/// Falls back to the current directory when the platform has no local data
/// directory.
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("spotsync");
    path
}

/// Loads environment variables from a `.env` file in the local data directory.
///
/// The file lives at:
/// - Linux: `~/.local/share/spotsync/.env`
/// - macOS: `~/Library/Application Support/spotsync/.env`
/// - Windows: `%LOCALAPPDATA%/spotsync/.env`
///
/// Variables that are already set in the process environment are not
/// overridden.
///
/// # Errors
///
/// Returns an error string if the data directory cannot be created or the
/// `.env` file cannot be read or parsed.
pub async fn load_env() -> Result<(), String> {
    let path = data_dir().join(".env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    dotenv::from_path(&path).map_err(|e| format!("{}: {}", path.display(), e))?;
    Ok(())
}

fn required(key: &'static str) -> Result<String, ConfigError> {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::Missing(key)),
    }
}

fn optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Returns the Spotify Web API base URL (`SPOTIFY_API_URL`).
pub fn spotify_apiurl() -> String {
    optional("SPOTIFY_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string())
}

/// Returns the Spotify token endpoint (`SPOTIFY_API_TOKEN_URL`), used for
/// refreshing the cached access token.
pub fn spotify_apitoken_url() -> String {
    optional("SPOTIFY_API_TOKEN_URL").unwrap_or_else(|| DEFAULT_TOKEN_URL.to_string())
}

/// Returns the client ID registered with Spotify's developer platform.
///
/// # Errors
///
/// Fails if `SPOTIFY_API_AUTH_CLIENT_ID` is not set.
pub fn spotify_client_id() -> Result<String, ConfigError> {
    required("SPOTIFY_API_AUTH_CLIENT_ID")
}

/// Returns the client secret if one is configured.
///
/// Apps registered for the PKCE flow have no secret, in which case token
/// refresh only sends the client ID.
pub fn spotify_client_secret() -> Option<String> {
    optional("SPOTIFY_API_AUTH_CLIENT_SECRET")
}

/// Returns the playlist that `sync` and `show` operate on.
///
/// # Errors
///
/// Fails if `SPOTIFY_PLAYLIST_ID` is not set.
pub fn spotify_playlist_id() -> Result<String, ConfigError> {
    required("SPOTIFY_PLAYLIST_ID")
}

/// Returns the market (ISO 3166-1 alpha-2) that search and playlist reads
/// are scoped to. Defaults to `NL`.
pub fn spotify_market() -> String {
    optional("SPOTIFY_MARKET").unwrap_or_else(|| DEFAULT_MARKET.to_string())
}

/// Returns an access token supplied directly through `SPOTIFY_ACCESS_TOKEN`.
///
/// When set, the cached token file is not consulted.
pub fn spotify_access_token() -> Option<String> {
    optional("SPOTIFY_ACCESS_TOKEN")
}
