//! The webhook dispatcher: authenticate, resolve, negotiate or route.

use axum::http::{HeaderMap, Method, StatusCode};
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use crate::errors::{DispatchError, UnsupportedReason};
use crate::events::{resolve, InboundEvent, Resolved};
use crate::handlers::HandlerTable;
use crate::kinds::EventKind;
use crate::negotiate::negotiate;
use crate::signature::verify_signature;

/// Header naming the event kind.
pub const EVENT_HEADER: &str = "x-github-event";

/// Header carrying GitHub's per-delivery GUID.
pub const DELIVERY_HEADER: &str = "x-github-delivery";

/// Construction-time settings for a [`Dispatcher`].
#[derive(Clone)]
pub struct DispatcherConfig {
    /// Shared secret the webhook was registered with.
    pub webhook_secret: String,
    /// Log every verified payload at `debug`.
    pub debug_payloads: bool,
}

impl std::fmt::Debug for DispatcherConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DispatcherConfig")
            .field("webhook_secret", &"<redacted>")
            .field("debug_payloads", &self.debug_payloads)
            .finish()
    }
}

/// A delivery that was accepted with 200.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatched {
    /// A `ping` whose declared kinds are all handled.
    Pong,
    /// A deprecated `integration_*` delivery, dropped.
    LegacyAlias {
        /// The legacy name.
        name: String,
    },
    /// The handler for `kind` completed.
    Handled(EventKind),
}

impl Dispatched {
    /// Always 200.
    pub fn status_code(&self) -> StatusCode {
        StatusCode::OK
    }

    /// Short response body.
    pub fn message(&self) -> String {
        match self {
            Dispatched::Pong => "pong".to_string(),
            Dispatched::LegacyAlias { name } => format!("Ignoring legacy event: {name}"),
            Dispatched::Handled(kind) => format!("Handled {kind}"),
        }
    }
}

/// Routes authenticated deliveries to a [`HandlerTable`].
#[derive(Debug)]
pub struct Dispatcher {
    config: DispatcherConfig,
    handlers: HandlerTable,
}

impl Dispatcher {
    /// Creates a dispatcher over an immutable handler table.
    pub fn new(config: DispatcherConfig, handlers: HandlerTable) -> Self {
        Self { config, handlers }
    }

    /// The registered handlers.
    pub fn handlers(&self) -> &HandlerTable {
        &self.handlers
    }

    /// Processes one webhook request.
    ///
    /// The method is checked before anything else, then the body is
    /// authenticated before it is parsed.
    #[instrument(
        name = "webhook",
        skip_all,
        fields(delivery = %delivery_id(headers), event = event_name(headers).unwrap_or_default())
    )]
    pub async fn dispatch(
        &self,
        method: &Method,
        headers: &HeaderMap,
        body: &[u8],
    ) -> Result<Dispatched, DispatchError> {
        let result = self.dispatch_inner(method, headers, body).await;
        match &result {
            Ok(outcome) => info!(outcome = %outcome.message(), "Webhook accepted"),
            Err(
                e @ (DispatchError::HandlerFailed { .. } | DispatchError::ClientUnavailable { .. }),
            ) => error!(error = %e, "Webhook handler failed"),
            Err(e) => warn!(error = %e, status = e.status_code().as_u16(), "Webhook rejected"),
        }
        result
    }

    async fn dispatch_inner(
        &self,
        method: &Method,
        headers: &HeaderMap,
        body: &[u8],
    ) -> Result<Dispatched, DispatchError> {
        if method != Method::POST {
            return Err(DispatchError::MethodNotAllowed {
                method: method.to_string(),
            });
        }

        let payload = verify_signature(body, &self.config.webhook_secret, headers)
            .map_err(|source| DispatchError::SignatureInvalid { source })?;

        if self.config.debug_payloads {
            debug!(payload = %String::from_utf8_lossy(payload), "Verified payload");
        }

        let event = match resolve(event_name(headers), payload)? {
            Resolved::LegacyAlias { name, current } => {
                info!(legacy = %name, current = %current, "Ignoring legacy event name");
                return Ok(Dispatched::LegacyAlias { name });
            }
            Resolved::Event(event) => event,
        };

        match event {
            InboundEvent::Ping(ping) => {
                negotiate(&self.handlers, ping.declared_events())
                    .map_err(|source| DispatchError::NegotiationFailed { source })?;
                debug!(zen = ping.zen.as_deref().unwrap_or_default(), "Ping accepted");
                Ok(Dispatched::Pong)
            }
            InboundEvent::Unmodeled { kind, .. } => Err(DispatchError::UnsupportedEventKind {
                kind,
                reason: UnsupportedReason::UnknownEventType,
            }),
            event => {
                let kind = event.kind();
                self.handlers.invoke(event).await?;
                Ok(Dispatched::Handled(kind))
            }
        }
    }
}

fn event_name(headers: &HeaderMap) -> Option<&str> {
    headers.get(EVENT_HEADER).and_then(|v| v.to_str().ok())
}

/// Parses `X-GitHub-Delivery`, or mints a fresh id when it is absent or not
/// a UUID.
pub fn delivery_id(headers: &HeaderMap) -> Uuid {
    headers
        .get(DELIVERY_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| Uuid::parse_str(v).ok())
        .unwrap_or_else(Uuid::new_v4)
}

#[cfg(test)]
#[path = "dispatch_tests.rs"]
mod tests;
