//! HTTP surface: `/event_handler` for deliveries and `/` for usage help.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, Method},
    response::{IntoResponse, Response},
    routing::{any, get},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::dispatch::Dispatcher;

/// Path GitHub is configured to deliver to.
pub const EVENT_HANDLER_PATH: &str = "/event_handler";

/// Shared router state.
#[derive(Clone)]
pub struct AppState {
    /// The webhook dispatcher.
    pub dispatcher: Arc<Dispatcher>,
    /// Plain-text page served at `/`.
    pub usage: Arc<str>,
}

/// Builds the receiver's router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(usage_page))
        // Every method reaches the dispatcher so non-POST gets a 405 body.
        .route(EVENT_HANDLER_PATH, any(event_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn usage_page(State(state): State<AppState>) -> String {
    state.usage.to_string()
}

async fn event_handler(
    State(state): State<AppState>,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    match state.dispatcher.dispatch(&method, &headers, &body).await {
        Ok(outcome) => (outcome.status_code(), outcome.message()).into_response(),
        Err(e) => (e.status_code(), e.public_message()).into_response(),
    }
}

#[cfg(test)]
#[path = "server_tests.rs"]
mod tests;
