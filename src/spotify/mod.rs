//! # Spotify Integration Module
//!
//! Remote side of the sync. The rest of the crate talks to Spotify only
//! through the two traits defined here:
//!
//! - [`CatalogSearch`] - free-text track search
//! - [`PlaylistStore`] - paginated playlist reads and the two batch mutations
//!
//! [`SpotifyClient`] implements both against the Spotify Web API with
//! `reqwest`. Tests substitute in-memory fakes.
//!
//! ## API Coverage
//!
//! - `GET /search` - track search, one result, market scoped
//! - `GET /playlists/{playlist_id}/tracks` - playlist items with field projection
//! - `DELETE /playlists/{playlist_id}/tracks` - remove all occurrences of up to 20 tracks
//! - `POST /playlists/{playlist_id}/tracks` - append up to 20 tracks
//!
//! ## Error Handling
//!
//! All calls return [`ApiError`]. The transport waits out a `Retry-After` of up
//! to 120 seconds on 429 and retries a 502 after 10 seconds, at most
//! [`client::MAX_ATTEMPTS`] attempts per call. The 502 retry only applies to
//! reads and removals; an append is never sent twice. Everything else is handed
//! back to the caller unchanged.

pub mod client;

use async_trait::async_trait;
use thiserror::Error;

use crate::types::{PlaylistPage, TrackHit};

pub use client::SpotifyClient;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("spotify responded with {status}: {body}")]
    Status { status: u16, body: String },
    #[error("rate limited, retry after {retry_after} seconds")]
    RateLimited { retry_after: u64 },
}

#[async_trait]
pub trait CatalogSearch: Send + Sync {
    /// Searches tracks matching `query`, best match first.
    async fn search_tracks(
        &self,
        query: &str,
        limit: u32,
        market: &str,
    ) -> Result<Vec<TrackHit>, ApiError>;
}

#[async_trait]
pub trait PlaylistStore: Send + Sync {
    /// Reads the page of playlist items starting at `offset`. The page size
    /// is chosen by the server.
    async fn playlist_page(
        &self,
        playlist_id: &str,
        offset: u32,
        market: &str,
    ) -> Result<PlaylistPage, ApiError>;

    /// Removes every occurrence of each id in `track_ids`.
    async fn remove_all_occurrences(
        &self,
        playlist_id: &str,
        track_ids: &[String],
    ) -> Result<(), ApiError>;

    /// Appends `track_ids` to the end of the playlist in order.
    async fn append_tracks(&self, playlist_id: &str, track_ids: &[String])
    -> Result<(), ApiError>;
}
