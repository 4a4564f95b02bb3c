//! Per-event construction of [`GitHubClient`]s.
//!
//! Plain repository webhooks carry no installation and are served with a
//! personal access token. Events delivered to a GitHub App carry an
//! installation id; those get a client authenticated as that installation.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Url;
use tracing::{debug, warn};
use workflow::{InstallationId, LabelEditor, LabelEditorProvider, WorkflowError};

use crate::app::{installation_token, AppCredentials};
use crate::client::{http_client, parse_base_url, GitHubClient};
use crate::errors::GitHubError;

/// Builds GitHub clients from the configured credentials.
#[derive(Clone)]
pub struct GitHubClientProvider {
    http: reqwest::Client,
    base_url: Url,
    personal_token: Option<String>,
    app: Option<AppCredentials>,
}

impl std::fmt::Debug for GitHubClientProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubClientProvider")
            .field("base_url", &self.base_url.as_str())
            .field("personal_token", &self.personal_token.as_ref().map(|_| "<redacted>"))
            .field("app", &self.app)
            .finish()
    }
}

impl GitHubClientProvider {
    /// A provider with no credentials; add them with
    /// [`with_personal_token`](Self::with_personal_token) and
    /// [`with_app`](Self::with_app).
    pub fn new(base_url: &str) -> Result<Self, GitHubError> {
        Ok(Self {
            http: http_client()?,
            base_url: parse_base_url(base_url)?,
            personal_token: None,
            app: None,
        })
    }

    /// Serves events without an installation with `token`.
    pub fn with_personal_token(mut self, token: impl Into<String>) -> Self {
        self.personal_token = Some(token.into());
        self
    }

    /// Serves events with an installation as the GitHub App.
    pub fn with_app(mut self, credentials: AppCredentials) -> Self {
        self.app = Some(credentials);
        self
    }

    /// Returns a client for `installation`, or for the personal token when
    /// there is none.
    pub async fn client_for(
        &self,
        installation: Option<InstallationId>,
    ) -> Result<GitHubClient, GitHubError> {
        let token = match installation {
            None => self
                .personal_token
                .clone()
                .ok_or_else(|| GitHubError::MissingCredentials {
                    message: "GITHUB_AUTH_TOKEN is not set".to_string(),
                })?,
            Some(id) => {
                let app = self.app.as_ref().ok_or_else(|| GitHubError::MissingCredentials {
                    message: "GITHUB_APP_ID and GITHUB_PRIVATE_KEY are not set".to_string(),
                })?;
                installation_token(&self.http, &self.base_url, app, id).await?
            }
        };
        debug!(installation = ?installation, "Built GitHub client");
        Ok(GitHubClient::with_http(
            self.http.clone(),
            self.base_url.clone(),
            token,
        ))
    }
}

#[async_trait]
impl LabelEditorProvider for GitHubClientProvider {
    async fn editor_for(
        &self,
        installation: Option<InstallationId>,
    ) -> Result<Arc<dyn LabelEditor>, WorkflowError> {
        match self.client_for(installation).await {
            Ok(client) => Ok(Arc::new(client) as Arc<dyn LabelEditor>),
            Err(e) => {
                warn!(installation = ?installation, error = %e, "GitHub client unavailable");
                Err(WorkflowError::ClientUnavailable {
                    message: e.to_string(),
                })
            }
        }
    }
}

#[cfg(test)]
#[path = "provider_tests.rs"]
mod tests;
