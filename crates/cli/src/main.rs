//! `issue-workflow` entry point.
//!
//! This binary is the composition root. Responsibilities:
//!
//! 1. **Parse configuration**: flags with environment fallbacks ([`config`]).
//! 2. **Wire observability**: `tracing-subscriber` with a text or JSON layer
//!    and, when an endpoint is configured, an OpenTelemetry OTLP exporter
//!    ([`telemetry`]).
//! 3. **Construct infrastructure**: the GitHub client provider and the
//!    deployment's handler table ([`handlers`]).
//! 4. **Serve**: mount the webhook router and run until interrupted.

mod config;
mod handlers;
mod telemetry;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use github::GitHubClientProvider;
use listener::{build_router, AppState, Dispatcher, DispatcherConfig, EVENT_HANDLER_PATH};
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::config::Config;
use crate::handlers::{
    deployment_handlers, IssuesWorkflowHandler, RepositoryAllowList, WorkflowTiming,
};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::parse();
    let _telemetry = telemetry::init(
        config.log_format,
        config.otlp_endpoint.as_deref(),
        config.debug_logging,
    )?;

    let mut provider = GitHubClientProvider::new(&config.github_api_url)
        .context("configuring GitHub client")?;
    match &config.auth_token {
        Some(token) => provider = provider.with_personal_token(token),
        None => warn!("GITHUB_AUTH_TOKEN is not set; repository webhooks cannot edit labels"),
    }
    if let Some(credentials) = config.app_credentials()? {
        info!(app_id = credentials.app_id(), "GitHub App authentication enabled");
        provider = provider.with_app(credentials);
    }

    let issues = IssuesWorkflowHandler::new(
        Arc::new(provider),
        WorkflowTiming {
            opened_delay: config.opened_delay(),
            edit_timeout: config.edit_timeout(),
        },
        RepositoryAllowList::new(&config.allowed_repos),
    );
    let dispatcher = Dispatcher::new(
        DispatcherConfig {
            webhook_secret: config.webhook_secret.clone(),
            debug_payloads: config.debug_logging,
        },
        deployment_handlers(issues),
    );
    info!(
        supported = ?dispatcher.handlers().supported_kinds(),
        "Handlers registered"
    );

    let router = build_router(AppState {
        dispatcher: Arc::new(dispatcher),
        usage: Config::usage().into(),
    });

    let listener = TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("binding {}", config.addr))?;
    info!(addr = %config.addr, path = EVENT_HANDLER_PATH, "Listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving webhook endpoint")?;

    info!("Shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
