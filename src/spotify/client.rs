use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use tokio::time::sleep;

use crate::{
    spotify::{ApiError, CatalogSearch, PlaylistStore},
    types::{
        AddTracksRequest, PlaylistEntry, PlaylistItemsResponse, PlaylistPage, RemoveTracksRequest,
        SearchResponse, TrackHit, TrackUri,
    },
    warning,
};

/// Upper bound of requests sent for a single API call, retries included.
pub const MAX_ATTEMPTS: u32 = 3;
/// Longest `Retry-After` the client is willing to wait out.
pub const MAX_RETRY_AFTER_SECS: u64 = 120;
const BAD_GATEWAY_DELAY: Duration = Duration::from_secs(10);

/// Whether a request may be sent again after the server possibly acted on it.
///
/// A 429 is always waited out, the rejected request was never processed. A
/// 502 can arrive after the change was committed, so it is only retried for
/// requests whose repetition leaves the playlist unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Idempotency {
    Idempotent,
    NonIdempotent,
}

/// Projection used for playlist reads; only what the inspector displays.
pub const PLAYLIST_FIELDS: &str = "items.track.artists.name,items.track.name,total";
const UNAVAILABLE: &str = "<unavailable>";

/// Authenticated Spotify Web API client.
///
/// Holds a bearer token obtained elsewhere (see
/// [`TokenManager`](crate::management::TokenManager)); it never refreshes it.
pub struct SpotifyClient {
    http: Client,
    base_url: String,
    token: String,
}

impl SpotifyClient {
    /// Creates a client for the API rooted at `base_url`.
    ///
    /// # Arguments
    ///
    /// * `base_url` - API root such as `https://api.spotify.com/v1`; a trailing
    ///   slash is ignored
    /// * `token` - Bearer access token sent with every request
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Sends the request built by `build`, rebuilding it for each retry.
    ///
    /// # Rate Limiting
    ///
    /// - 429 with a `Retry-After` of at most [`MAX_RETRY_AFTER_SECS`] is waited
    ///   out and retried
    /// - 429 with a longer delay issues a warning and returns
    ///   [`ApiError::RateLimited`] without waiting
    /// - 502 is retried after 10 seconds, only for [`Idempotency::Idempotent`]
    ///   requests
    ///
    /// At most [`MAX_ATTEMPTS`] requests are sent in total.
    async fn send<F>(&self, idempotency: Idempotency, build: F) -> Result<Response, ApiError>
    where
        F: Fn(&Client) -> RequestBuilder + Send + Sync,
    {
        let mut attempt = 0;

        loop {
            attempt += 1;
            let response = build(&self.http).bearer_auth(&self.token).send().await?;
            let status = response.status();

            if status.is_success() {
                return Ok(response);
            }

            if status == StatusCode::TOO_MANY_REQUESTS {
                let retry_after = response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse::<u64>().ok())
                    .unwrap_or(0);

                if retry_after > MAX_RETRY_AFTER_SECS {
                    warning!(
                        "Retry after has reached an abnormal high of {} seconds.",
                        retry_after
                    );
                    return Err(ApiError::RateLimited { retry_after });
                }
                if attempt >= MAX_ATTEMPTS {
                    return Err(ApiError::RateLimited { retry_after });
                }
                sleep(Duration::from_secs(retry_after)).await;
                continue;
            }

            if status == StatusCode::BAD_GATEWAY
                && idempotency == Idempotency::Idempotent
                && attempt < MAX_ATTEMPTS
            {
                sleep(BAD_GATEWAY_DELAY).await;
                continue;
            }

            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }
    }
}

#[async_trait]
impl CatalogSearch for SpotifyClient {
    /// Searches the Spotify catalog for tracks matching a free-text query.
    ///
    /// # Arguments
    ///
    /// * `query` - Free-text query, usually `"<artist> - <title>"`
    /// * `limit` - Maximum number of hits to return
    /// * `market` - ISO 3166-1 alpha-2 country code restricting the results
    ///
    /// # Returns
    ///
    /// Hits in the order Spotify ranks them, best match first. An empty list
    /// means nothing matched. Tracks without a URI or id are dropped.
    ///
    /// # API Endpoint
    ///
    /// `GET /search` with `q`, `type=track`, `limit` and `market`.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Status`] for any non-success response, 502 after retries
    /// - [`ApiError::RateLimited`] when the server asks for a long back-off
    /// - [`ApiError::Transport`] for network and JSON decoding failures
    async fn search_tracks(
        &self,
        query: &str,
        limit: u32,
        market: &str,
    ) -> Result<Vec<TrackHit>, ApiError> {
        let url = self.url("/search");
        let limit = limit.to_string();
        let response = self
            .send(Idempotency::Idempotent, |http| {
                http.get(&url).query(&[
                    ("q", query),
                    ("type", "track"),
                    ("limit", limit.as_str()),
                    ("market", market),
                ])
            })
            .await?;

        let json = response.json::<SearchResponse>().await?;

        let hits = json
            .tracks
            .items
            .into_iter()
            .filter_map(|track| {
                let artist = track.first_artist();
                let uri = track
                    .uri
                    .or_else(|| track.id.map(|id| format!("spotify:track:{}", id)))?;
                Some(TrackHit {
                    uri,
                    name: track.name,
                    artist,
                })
            })
            .collect();

        Ok(hits)
    }
}

#[async_trait]
impl PlaylistStore for SpotifyClient {
    /// Reads one page of playlist items starting at `offset`.
    ///
    /// # Arguments
    ///
    /// * `playlist_id` - Spotify ID of the playlist
    /// * `offset` - Index of the first item to return
    /// * `market` - Market used to relink tracks
    ///
    /// # Returns
    ///
    /// The entries of the page and the playlist total as reported by this
    /// response. Items whose track is no longer available are returned as
    /// `<unavailable>` so positions stay aligned with the server.
    ///
    /// # API Endpoint
    ///
    /// `GET /playlists/{playlist_id}/tracks` projected to
    /// [`PLAYLIST_FIELDS`], with `additional_types=track`. The page size is
    /// left to the server.
    ///
    /// # Errors
    ///
    /// Same as [`search_tracks`](CatalogSearch::search_tracks).
    async fn playlist_page(
        &self,
        playlist_id: &str,
        offset: u32,
        market: &str,
    ) -> Result<PlaylistPage, ApiError> {
        let url = self.url(&format!("/playlists/{}/tracks", playlist_id));
        let offset = offset.to_string();
        let response = self
            .send(Idempotency::Idempotent, |http| {
                http.get(&url).query(&[
                    ("offset", offset.as_str()),
                    ("market", market),
                    ("fields", PLAYLIST_FIELDS),
                    ("additional_types", "track"),
                ])
            })
            .await?;

        let json = response.json::<PlaylistItemsResponse>().await?;

        let entries = json
            .items
            .into_iter()
            .map(|item| match item.track {
                Some(track) => PlaylistEntry {
                    artist: track.first_artist(),
                    name: track.name,
                },
                None => PlaylistEntry {
                    artist: UNAVAILABLE.to_string(),
                    name: UNAVAILABLE.to_string(),
                },
            })
            .collect();

        Ok(PlaylistPage {
            entries,
            total: json.total,
        })
    }

    /// Removes every occurrence of the given tracks from a playlist.
    ///
    /// # Arguments
    ///
    /// * `playlist_id` - Spotify ID of the playlist
    /// * `track_ids` - Track URIs, at most 100 per request
    ///
    /// # API Endpoint
    ///
    /// `DELETE /playlists/{playlist_id}/tracks` with `{"tracks": [{"uri": ..}]}`.
    /// Positions are not sent, so all occurrences go.
    ///
    /// # Errors
    ///
    /// Removal is idempotent, so a 502 is retried like a read. Other failures
    /// are returned as for [`search_tracks`](CatalogSearch::search_tracks).
    async fn remove_all_occurrences(
        &self,
        playlist_id: &str,
        track_ids: &[String],
    ) -> Result<(), ApiError> {
        let url = self.url(&format!("/playlists/{}/tracks", playlist_id));
        let body = RemoveTracksRequest {
            tracks: track_ids
                .iter()
                .map(|uri| TrackUri { uri: uri.clone() })
                .collect(),
        };

        self.send(Idempotency::Idempotent, |http| {
            http.delete(&url).json(&body)
        })
        .await?;
        Ok(())
    }

    /// Appends tracks to the end of a playlist, in the given order.
    ///
    /// # Arguments
    ///
    /// * `playlist_id` - Spotify ID of the playlist
    /// * `track_ids` - Track URIs, at most 100 per request
    ///
    /// # API Endpoint
    ///
    /// `POST /playlists/{playlist_id}/tracks` with `{"uris": [..]}`.
    ///
    /// # Errors
    ///
    /// A 502 is returned as [`ApiError::Status`] without a retry: the gateway
    /// may fail after the append was applied, and sending it again would add
    /// the tracks twice. A 429 is still waited out.
    async fn append_tracks(
        &self,
        playlist_id: &str,
        track_ids: &[String],
    ) -> Result<(), ApiError> {
        let url = self.url(&format!("/playlists/{}/tracks", playlist_id));
        let body = AddTracksRequest {
            uris: track_ids.to_vec(),
        };

        self.send(Idempotency::NonIdempotent, |http| {
            http.post(&url).json(&body)
        })
        .await?;
        Ok(())
    }
}
