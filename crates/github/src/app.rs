//! GitHub App authentication.
//!
//! An App proves its identity with a short-lived RS256 JWT signed by its
//! private key, then trades that JWT for an installation access token scoped
//! to the installation an event was delivered for.

use std::path::Path;

use chrono::Utc;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use workflow::InstallationId;

use crate::client::{api_url, send_json};
use crate::errors::GitHubError;

/// Backdating applied to `iat` to absorb clock drift.
const CLOCK_DRIFT_SECS: i64 = 60;

/// Lifetime of a JWT. GitHub rejects anything over ten minutes.
const JWT_LIFETIME_SECS: i64 = 600;

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct Claims {
    pub(crate) iat: i64,
    pub(crate) exp: i64,
    pub(crate) iss: String,
}

/// A GitHub App id and its signing key.
#[derive(Clone)]
pub struct AppCredentials {
    app_id: u64,
    key: EncodingKey,
}

impl std::fmt::Debug for AppCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppCredentials")
            .field("app_id", &self.app_id)
            .field("key", &"<redacted>")
            .finish()
    }
}

impl AppCredentials {
    /// Parses an RSA private key in PEM form (PKCS#1 or PKCS#8).
    pub fn from_pem(app_id: u64, pem: &[u8]) -> Result<Self, GitHubError> {
        Ok(Self {
            app_id,
            key: EncodingKey::from_rsa_pem(pem)?,
        })
    }

    /// Reads and parses the private key downloaded at App registration.
    pub fn from_pem_file(app_id: u64, path: &Path) -> Result<Self, GitHubError> {
        let pem = std::fs::read(path).map_err(|source| GitHubError::PrivateKeyFile {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_pem(app_id, &pem)
    }

    /// The App id (the numeric "App ID", not the OAuth client id).
    pub fn app_id(&self) -> u64 {
        self.app_id
    }

    /// Signs an App JWT valid from `now - 60s` to `now + 600s`.
    pub fn jwt(&self, now: i64) -> Result<String, GitHubError> {
        let claims = Claims {
            iat: now - CLOCK_DRIFT_SECS,
            exp: now + JWT_LIFETIME_SECS,
            iss: self.app_id.to_string(),
        };
        Ok(jsonwebtoken::encode(
            &Header::new(Algorithm::RS256),
            &claims,
            &self.key,
        )?)
    }
}

#[derive(Debug, Deserialize)]
struct InstallationTokenResponse {
    token: String,
    expires_at: Option<String>,
}

/// Exchanges an App JWT for an installation access token.
#[instrument(skip(http, base_url, credentials), fields(app_id = credentials.app_id()))]
pub(crate) async fn installation_token(
    http: &reqwest::Client,
    base_url: &Url,
    credentials: &AppCredentials,
    installation: InstallationId,
) -> Result<String, GitHubError> {
    let jwt = credentials.jwt(Utc::now().timestamp())?;
    let installation = installation.to_string();
    let url = api_url(
        base_url,
        ["app", "installations", installation.as_str(), "access_tokens"],
    )?;
    let response: InstallationTokenResponse = send_json(http.post(url).bearer_auth(jwt)).await?;
    debug!(expires_at = ?response.expires_at, "Minted installation token");
    Ok(response.token)
}

#[cfg(test)]
#[path = "app_tests.rs"]
mod tests;
