//! reqwest-backed implementation of [`workflow::LabelEditor`].

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::{RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use workflow::{IssueEdit, IssueState, IssueTarget, LabelEditor, LabelName, LabelSet, WorkflowError};

use crate::errors::GitHubError;

/// Public GitHub REST API.
pub const GITHUB_API_URL: &str = "https://api.github.com";

const API_VERSION: &str = "2022-11-28";

const USER_AGENT_VALUE: &str = concat!("issue-workflow/", env!("CARGO_PKG_VERSION"));

/// Builds the HTTP client shared by every GitHub call.
pub(crate) fn http_client() -> Result<reqwest::Client, GitHubError> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
    headers.insert("X-GitHub-Api-Version", HeaderValue::from_static(API_VERSION));
    headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));
    Ok(reqwest::Client::builder().default_headers(headers).build()?)
}

/// Parses an API base URL, rejecting ones that cannot take path segments.
pub(crate) fn parse_base_url(base_url: &str) -> Result<Url, GitHubError> {
    let url = Url::parse(base_url).map_err(|e| GitHubError::InvalidUrl {
        url: base_url.to_string(),
        message: e.to_string(),
    })?;
    if url.cannot_be_a_base() {
        return Err(GitHubError::InvalidUrl {
            url: base_url.to_string(),
            message: "URL cannot be a base".to_string(),
        });
    }
    Ok(url)
}

/// Appends `segments` to `base`, percent-encoding each one.
pub(crate) fn api_url<I>(base: &Url, segments: I) -> Result<Url, GitHubError>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| GitHubError::InvalidUrl {
            url: base.to_string(),
            message: "URL cannot be a base".to_string(),
        })?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Sends `request` and decodes a JSON body, mapping non-2xx to
/// [`GitHubError::Status`].
pub(crate) async fn send_json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, GitHubError> {
    let response = checked(request).await?;
    Ok(response.json().await?)
}

async fn checked(request: RequestBuilder) -> Result<reqwest::Response, GitHubError> {
    let response = request.send().await?;
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(GitHubError::Status {
            status: status.as_u16(),
            body,
        });
    }
    Ok(response)
}

#[derive(Debug, Deserialize)]
struct LabelResponse {
    name: String,
}

#[derive(Debug, Deserialize)]
struct IssueResponse {
    #[serde(default)]
    labels: Vec<LabelResponse>,
}

#[derive(Debug, Serialize)]
struct EditIssueRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    labels: Option<Vec<&'a str>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    state: Option<&'static str>,
}

#[derive(Debug, Serialize)]
struct AddLabelsRequest<'a> {
    labels: Vec<&'a str>,
}

fn label_set(labels: Vec<LabelResponse>) -> LabelSet {
    LabelSet::from_names(labels.into_iter().map(|l| l.name))
}

fn state_name(state: IssueState) -> &'static str {
    match state {
        IssueState::Open => "open",
        IssueState::Closed => "closed",
    }
}

/// An authenticated GitHub REST client.
#[derive(Clone)]
pub struct GitHubClient {
    http: reqwest::Client,
    base_url: Url,
    token: String,
}

impl std::fmt::Debug for GitHubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubClient")
            .field("base_url", &self.base_url.as_str())
            .field("token", &"<redacted>")
            .finish()
    }
}

impl GitHubClient {
    /// Creates a client that authenticates with `token` against `base_url`
    /// (normally [`GITHUB_API_URL`]).
    pub fn new(base_url: &str, token: impl Into<String>) -> Result<Self, GitHubError> {
        Ok(Self::with_http(http_client()?, parse_base_url(base_url)?, token))
    }

    pub(crate) fn with_http(http: reqwest::Client, base_url: Url, token: impl Into<String>) -> Self {
        Self {
            http,
            base_url,
            token: token.into(),
        }
    }

    fn issue_url(&self, target: &IssueTarget, tail: &[&str]) -> Result<Url, GitHubError> {
        let number = target.number.to_string();
        let head = [
            "repos",
            target.owner.as_str(),
            target.repository.as_str(),
            "issues",
            number.as_str(),
        ];
        api_url(&self.base_url, head.iter().chain(tail))
    }
}

#[async_trait]
impl LabelEditor for GitHubClient {
    #[instrument(skip(self, edit), fields(issue = %target))]
    async fn edit(&self, target: &IssueTarget, edit: &IssueEdit) -> Result<LabelSet, WorkflowError> {
        let url = self.issue_url(target, &[])?;
        let body = EditIssueRequest {
            labels: edit
                .labels
                .as_ref()
                .map(|labels| labels.iter().map(LabelName::as_str).collect()),
            state: edit.state.map(state_name),
        };
        debug!(?body, "PATCH issue");
        let issue: IssueResponse =
            send_json(self.http.patch(url).bearer_auth(&self.token).json(&body)).await?;
        Ok(label_set(issue.labels))
    }

    #[instrument(skip(self, labels), fields(issue = %target))]
    async fn add_labels(
        &self,
        target: &IssueTarget,
        labels: &[LabelName],
    ) -> Result<LabelSet, WorkflowError> {
        let url = self.issue_url(target, &["labels"])?;
        let body = AddLabelsRequest {
            labels: labels.iter().map(LabelName::as_str).collect(),
        };
        debug!(?body, "POST issue labels");
        let labels: Vec<LabelResponse> =
            send_json(self.http.post(url).bearer_auth(&self.token).json(&body)).await?;
        Ok(label_set(labels))
    }

    #[instrument(skip(self), fields(issue = %target))]
    async fn remove_label(
        &self,
        target: &IssueTarget,
        label: &LabelName,
    ) -> Result<(), WorkflowError> {
        let url = self.issue_url(target, &["labels", label.as_str()])?;
        checked(self.http.delete(url).bearer_auth(&self.token)).await?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
