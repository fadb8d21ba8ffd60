//! Auth gate — password-grant sessions against the hosted service.
//!
//! The remote backend only works behind a signed-in session, mirroring the
//! app's redirect-to-login gate. Sessions come from the service's GoTrue
//! style auth endpoints (`/auth/v1/*`) and are persisted at
//! `~/.taskmaster/session.json` so the CLI stays signed in between
//! invocations.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{Result, StoreError};

/// Refresh this long before the token actually expires.
const EXPIRY_MARGIN_SECS: i64 = 60;

/// A signed-in session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Bearer token sent on every data request.
    pub access_token: String,
    /// Token used to obtain a fresh access token.
    pub refresh_token: String,
    /// Id of the signed-in user; scopes all task queries.
    pub user_id: String,
    /// Access token expiry as a Unix timestamp (seconds).
    pub expires_at: i64,
}

impl Session {
    /// Whether the access token is expired (or about to, within a 60s
    /// margin).
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() + EXPIRY_MARGIN_SECS >= self.expires_at
    }
}

/// Wire shape of the auth token endpoints.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: String,
    expires_in: i64,
    user: TokenUser,
}

#[derive(Debug, Deserialize)]
struct TokenUser {
    id: String,
}

impl TokenResponse {
    fn into_session(self, now: DateTime<Utc>) -> Session {
        Session {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            user_id: self.user.id,
            expires_at: now.timestamp() + self.expires_in,
        }
    }
}

/// Resolve the path to the persisted session
/// (`~/.taskmaster/session.json`).
pub fn session_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(home).join(".taskmaster").join("session.json")
}

/// Load the persisted session, if any.
pub fn load_session_from(path: &Path) -> Result<Option<Session>> {
    if !path.exists() {
        return Ok(None);
    }
    let content = std::fs::read_to_string(path)?;
    Ok(Some(serde_json::from_str(&content)?))
}

/// Persist a session to disk.
pub fn save_session_to(path: &Path, session: &Session) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, serde_json::to_string_pretty(session)?)?;
    Ok(())
}

/// Remove the persisted session. Missing file is not an error.
pub fn clear_session_at(path: &Path) -> Result<()> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

/// Client for the hosted service's auth endpoints.
#[derive(Debug, Clone)]
pub struct AuthClient {
    base_url: String,
    anon_key: String,
    client: reqwest::Client,
}

impl AuthClient {
    /// Build a client for `base_url` (no trailing slash) using the public
    /// `anon_key`.
    pub fn new(base_url: &str, anon_key: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key: anon_key.to_string(),
            client,
        })
    }

    /// Sign in with email and password.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session> {
        let url = format!("{}/auth/v1/token?grant_type=password", self.base_url);
        let response = self
            .client
            .post(&url)
            .header("apikey", &self.anon_key)
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await?;
        Self::parse_token_response(response).await
    }

    /// Register a new account. The service signs the user in on success.
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<Session> {
        let url = format!("{}/auth/v1/signup", self.base_url);
        let response = self
            .client
            .post(&url)
            .header("apikey", &self.anon_key)
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await?;
        Self::parse_token_response(response).await
    }

    /// Exchange a refresh token for a fresh session.
    pub async fn refresh(&self, session: &Session) -> Result<Session> {
        let url = format!("{}/auth/v1/token?grant_type=refresh_token", self.base_url);
        let response = self
            .client
            .post(&url)
            .header("apikey", &self.anon_key)
            .json(&serde_json::json!({ "refresh_token": session.refresh_token }))
            .send()
            .await?;
        Self::parse_token_response(response).await
    }

    /// Revoke the session server-side.
    pub async fn sign_out(&self, session: &Session) -> Result<()> {
        let url = format!("{}/auth/v1/logout", self.base_url);
        let response = self
            .client
            .post(&url)
            .header("apikey", &self.anon_key)
            .bearer_auth(&session.access_token)
            .send()
            .await?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Auth(format!("sign-out failed: {status}: {body}")));
        }
        Ok(())
    }

    /// Return a session whose access token is valid, refreshing if needed.
    pub async fn ensure_valid(&self, session: Session) -> Result<Session> {
        if session.is_expired(Utc::now()) {
            debug!("access token expired, refreshing session");
            self.refresh(&session).await
        } else {
            Ok(session)
        }
    }

    async fn parse_token_response(response: reqwest::Response) -> Result<Session> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Auth(format!("{}: {body}", status.as_u16())));
        }
        let token: TokenResponse = response.json().await?;
        Ok(token.into_session(Utc::now()))
    }
}
