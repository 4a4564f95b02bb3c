//! Errors raised while talking to the GitHub REST API.

use std::path::PathBuf;

use thiserror::Error;
use workflow::WorkflowError;

/// A GitHub API or credential failure.
#[derive(Debug, Error)]
pub enum GitHubError {
    /// The credentials needed for the requested client are not configured.
    #[error("GitHub credentials missing: {message}")]
    MissingCredentials {
        /// Which setting is missing.
        message: String,
    },

    /// The GitHub App private key file could not be read.
    #[error("Failed to read GitHub App private key {}: {source}", .path.display())]
    PrivateKeyFile {
        /// Path that was read.
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The private key is not valid RSA PEM, or signing failed.
    #[error("Failed to sign GitHub App JWT: {source}")]
    Jwt {
        #[from]
        source: jsonwebtoken::errors::Error,
    },

    /// The configured API base URL cannot carry request paths.
    #[error("Invalid GitHub API URL {url:?}: {message}")]
    InvalidUrl {
        /// The URL as configured.
        url: String,
        /// Parser detail.
        message: String,
    },

    /// The request did not complete or the response did not decode.
    #[error("GitHub API request failed: {source}")]
    Transport {
        #[from]
        source: reqwest::Error,
    },

    /// GitHub answered with a non-success status.
    #[error("GitHub API returned {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, for the logs.
        body: String,
    },
}

impl From<GitHubError> for WorkflowError {
    fn from(error: GitHubError) -> Self {
        WorkflowError::EditFailed {
            message: error.to_string(),
        }
    }
}
