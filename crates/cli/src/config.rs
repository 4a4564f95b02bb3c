//! Command-line and environment configuration.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::builder::FalseyValueParser;
use clap::{CommandFactory, Parser, ValueEnum};
use github::{AppCredentials, GITHUB_API_URL};

/// Registration instructions shown by `--help` and at `/`.
const REGISTRATION: &str = "\
The receiver authenticates to the GitHub API with either:

  * GITHUB_AUTH_TOKEN, a personal access token, for repository webhooks; or
  * GITHUB_APP_ID and GITHUB_PRIVATE_KEY, for events delivered to a GitHub App.

REGISTER WEBHOOK:

  Open https://github.com/<owner>/<repo>/settings/hooks and click \"Add webhook\".

   * Payload URL: https://<service-url>/event_handler
   * Content type: application/json
   * Secret: the value of GITHUB_WEBHOOK_SECRET
   * Select \"Let me select individual events\", check \"Issues\", uncheck \"Pushes\".

  GitHub sends a ping on registration. A green check mark means every selected
  event type is handled; a red X means at least one is not.";

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines.
    Text,
    /// One JSON object per line.
    Json,
}

/// GitHub webhook receiver that keeps issue workflow labels consistent.
#[derive(Debug, Clone, Parser)]
#[command(name = "issue-workflow", version, after_long_help = REGISTRATION)]
pub struct Config {
    /// Address to listen on.
    #[arg(long, env = "LISTEN_ADDR", default_value = "0.0.0.0:8901")]
    pub addr: SocketAddr,

    /// Secret the webhook was registered with.
    #[arg(long, env = "GITHUB_WEBHOOK_SECRET", hide_env_values = true, value_parser = non_empty)]
    pub webhook_secret: String,

    /// Personal access token used for events without an App installation.
    #[arg(long, env = "GITHUB_AUTH_TOKEN", hide_env_values = true)]
    pub auth_token: Option<String>,

    /// GitHub App id (the numeric "App ID", not the client id).
    #[arg(long, env = "GITHUB_APP_ID")]
    pub app_id: Option<u64>,

    /// Path to the GitHub App private key (PEM).
    #[arg(long, env = "GITHUB_PRIVATE_KEY")]
    pub private_key: Option<PathBuf>,

    /// GitHub REST API base URL.
    #[arg(long, env = "GITHUB_API_URL", default_value = GITHUB_API_URL)]
    pub github_api_url: String,

    /// Delay before editing a newly opened issue, so the label shows up
    /// after the page the author submitted from has loaded.
    #[arg(long, env = "OPENED_DELAY_MS", default_value_t = 1000)]
    pub opened_delay_ms: u64,

    /// Upper bound on one label edit, including client construction.
    #[arg(long, env = "EDIT_TIMEOUT_SECS", default_value_t = 60)]
    pub edit_timeout_secs: u64,

    /// Log every verified payload. The environment form accepts `1`/`0`
    /// as well as `true`/`false`.
    #[arg(long, env = "DEBUG_LOGGING", value_parser = FalseyValueParser::new())]
    pub debug_logging: bool,

    /// Repositories (`owner/name`) whose issues are managed. Empty means all.
    #[arg(long, env = "ALLOWED_REPOS", value_delimiter = ',')]
    pub allowed_repos: Vec<String>,

    /// Log output format.
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    /// OTLP collector endpoint; traces are exported when set.
    #[arg(long, env = "OTEL_EXPORTER_OTLP_ENDPOINT")]
    pub otlp_endpoint: Option<String>,
}

fn non_empty(value: &str) -> Result<String, String> {
    if value.trim().is_empty() {
        Err("must not be empty".to_string())
    } else {
        Ok(value.to_string())
    }
}

impl Config {
    /// [`opened_delay_ms`](Self::opened_delay_ms) as a duration.
    pub fn opened_delay(&self) -> Duration {
        Duration::from_millis(self.opened_delay_ms)
    }

    /// [`edit_timeout_secs`](Self::edit_timeout_secs) as a duration.
    pub fn edit_timeout(&self) -> Duration {
        Duration::from_secs(self.edit_timeout_secs)
    }

    /// Loads the GitHub App key when App credentials are configured.
    pub fn app_credentials(&self) -> Result<Option<AppCredentials>> {
        match (self.app_id, &self.private_key) {
            (Some(app_id), Some(path)) => AppCredentials::from_pem_file(app_id, path)
                .map(Some)
                .with_context(|| format!("loading GitHub App {app_id} credentials")),
            (None, None) => Ok(None),
            _ => bail!("GITHUB_APP_ID and GITHUB_PRIVATE_KEY must be set together"),
        }
    }

    /// The page served at `/`: registration instructions and flags.
    pub fn usage() -> String {
        Config::command().render_long_help().to_string()
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
