use std::path::PathBuf;

use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;

use crate::{config, types::Token};

/// Seconds before expiry at which a token is already treated as expired.
const EXPIRY_MARGIN_SECS: u64 = 240;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("cannot read token cache {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot write token cache: {0}")]
    Write(#[from] std::io::Error),
    #[error("malformed token cache: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error(transparent)]
    Config(#[from] config::ConfigError),
    #[error("token refresh failed: {0}")]
    Refresh(String),
}

#[derive(Debug, Deserialize)]
struct RefreshResponse {
    access_token: String,
    refresh_token: Option<String>,
    scope: Option<String>,
    expires_in: Option<u64>,
}

/// Keeps the cached Spotify token valid.
///
/// The token itself is issued by an external authorization flow and written
/// to `<data_local_dir>/spotsync/cache/token.json`; this type only loads,
/// refreshes and re-persists it.
pub struct TokenManager {
    token: Token,
    path: PathBuf,
}

impl TokenManager {
    pub fn new(token: Token) -> Self {
        TokenManager {
            token,
            path: Self::token_path(),
        }
    }

    /// Uses `path` instead of the default cache location.
    pub fn with_path(token: Token, path: PathBuf) -> Self {
        TokenManager { token, path }
    }

    pub async fn load() -> Result<Self, TokenError> {
        Self::load_from(Self::token_path()).await
    }

    pub async fn load_from(path: PathBuf) -> Result<Self, TokenError> {
        let content = async_fs::read_to_string(&path)
            .await
            .map_err(|e| TokenError::Read {
                path: path.display().to_string(),
                source: e,
            })?;
        let token: Token = serde_json::from_str(&content)?;
        Ok(Self { token, path })
    }

    pub async fn persist(&self) -> Result<(), TokenError> {
        if let Some(parent) = self.path.parent() {
            async_fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(&self.token)?;
        async_fs::write(&self.path, json).await?;
        Ok(())
    }

    /// Returns an access token, refreshing and persisting it first when it is
    /// about to expire.
    pub async fn get_valid_token(&mut self) -> Result<String, TokenError> {
        if self.is_expired(Utc::now().timestamp() as u64) {
            self.token = self.refresh_token().await?;
            self.persist().await?;
        }

        Ok(self.token.access_token.clone())
    }

    pub fn is_expired(&self, now: u64) -> bool {
        let expires_at = self.token.obtained_at + self.token.expires_in;
        now >= expires_at.saturating_sub(EXPIRY_MARGIN_SECS)
    }

    async fn refresh_token(&self) -> Result<Token, TokenError> {
        let client_id = config::spotify_client_id()?;

        let mut request = Client::new().post(config::spotify_apitoken_url()).form(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", self.token.refresh_token.as_str()),
            ("client_id", client_id.as_str()),
        ]);
        if let Some(secret) = config::spotify_client_secret() {
            request = request.basic_auth(&client_id, Some(secret));
        }

        let res = request
            .send()
            .await
            .map_err(|e| TokenError::Refresh(e.to_string()))?;
        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(TokenError::Refresh(format!("{}: {}", status, body)));
        }

        let json: RefreshResponse = res
            .json()
            .await
            .map_err(|e| TokenError::Refresh(e.to_string()))?;

        // Spotify may omit the refresh token and scope; keep the old ones then.
        Ok(Token {
            access_token: json.access_token,
            refresh_token: json
                .refresh_token
                .unwrap_or_else(|| self.token.refresh_token.clone()),
            scope: json.scope.unwrap_or_else(|| self.token.scope.clone()),
            expires_in: json.expires_in.unwrap_or(3600),
            obtained_at: Utc::now().timestamp() as u64,
        })
    }

    fn token_path() -> PathBuf {
        config::data_dir().join("cache/token.json")
    }

    pub fn current_token(&self) -> &Token {
        &self.token
    }
}
