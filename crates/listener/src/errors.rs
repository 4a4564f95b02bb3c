//! Error types for the webhook listener.

use axum::http::StatusCode;
use thiserror::Error;

use crate::kinds::EventKind;
use crate::negotiate::NegotiationError;
use crate::signature::SignatureError;

/// Why a recognised event kind cannot be dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnsupportedReason {
    /// The kind has no typed payload in this receiver.
    UnknownEventType,
    /// The kind is modeled but no handler was registered for it.
    UnimplementedHandler,
}

impl std::fmt::Display for UnsupportedReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnsupportedReason::UnknownEventType => write!(f, "Unsupported event type"),
            UnsupportedReason::UnimplementedHandler => write!(f, "Unimplemented handler func for"),
        }
    }
}

/// A failed webhook delivery, mapped to an HTTP status by
/// [`DispatchError::status_code`].
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The request method was not POST.
    #[error("Method not allowed: {method}")]
    MethodNotAllowed {
        /// The method received.
        method: String,
    },

    /// The payload signature did not verify.
    #[error("Payload did not validate: {source}")]
    SignatureInvalid {
        #[source]
        source: SignatureError,
    },

    /// The payload is not valid JSON for its declared kind.
    #[error("Failed to parse webhook: {kind}: {source}")]
    MalformedPayload {
        /// The declared kind.
        kind: EventKind,
        #[source]
        source: serde_json::Error,
    },

    /// The `X-GitHub-Event` header is missing or names no known kind.
    #[error("Unknown event type: {name:?}")]
    UnknownEventKind {
        /// The header value, empty when absent.
        name: String,
    },

    /// The kind is recognised but cannot be dispatched.
    #[error("{reason}: {kind}")]
    UnsupportedEventKind {
        /// The kind delivered.
        kind: EventKind,
        /// Why it cannot be dispatched.
        reason: UnsupportedReason,
    },

    /// A ping declared event kinds this receiver does not handle.
    #[error("Unsupported event type in hook: {source}")]
    NegotiationFailed {
        #[source]
        source: NegotiationError,
    },

    /// The handler returned an error.
    #[error("Handler failed for {kind}: {message}")]
    HandlerFailed {
        /// The kind being handled.
        kind: EventKind,
        /// Handler-supplied detail, logged but not returned to the caller.
        message: String,
    },

    /// The handler could not obtain a GitHub client.
    #[error("Failed to create GitHub client for {kind}: {message}")]
    ClientUnavailable {
        /// The kind being handled.
        kind: EventKind,
        /// Handler-supplied detail, logged but not returned to the caller.
        message: String,
    },
}

impl DispatchError {
    /// HTTP status returned to GitHub for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            DispatchError::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            DispatchError::UnsupportedEventKind { .. } | DispatchError::NegotiationFailed { .. } => {
                StatusCode::NOT_IMPLEMENTED
            }
            DispatchError::SignatureInvalid { .. }
            | DispatchError::MalformedPayload { .. }
            | DispatchError::UnknownEventKind { .. }
            | DispatchError::HandlerFailed { .. }
            | DispatchError::ClientUnavailable { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short response body. Handler and client details stay in the logs.
    pub fn public_message(&self) -> String {
        match self {
            DispatchError::SignatureInvalid { .. } => "Payload did not validate".to_string(),
            DispatchError::MalformedPayload { .. } => "Failed to parse webhook".to_string(),
            DispatchError::HandlerFailed { .. } => "Handler failed".to_string(),
            DispatchError::ClientUnavailable { .. } => {
                "Failed to create GitHub client".to_string()
            }
            other => other.to_string(),
        }
    }
}

/// An error returned by an [`crate::EventHandler`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HandlerError {
    /// No GitHub client could be constructed for the delivery.
    #[error("client unavailable: {message}")]
    ClientUnavailable {
        /// Detail for the logs.
        message: String,
    },

    /// Handling failed for any other reason.
    #[error("{message}")]
    Failed {
        /// Detail for the logs.
        message: String,
    },
}

impl HandlerError {
    /// Builds [`HandlerError::Failed`].
    pub fn failed(message: impl Into<String>) -> Self {
        HandlerError::Failed {
            message: message.into(),
        }
    }

    /// Builds [`HandlerError::ClientUnavailable`].
    pub fn client_unavailable(message: impl Into<String>) -> Self {
        HandlerError::ClientUnavailable {
            message: message.into(),
        }
    }

    pub(crate) fn into_dispatch_error(self, kind: EventKind) -> DispatchError {
        match self {
            HandlerError::ClientUnavailable { message } => {
                DispatchError::ClientUnavailable { kind, message }
            }
            HandlerError::Failed { message } => DispatchError::HandlerFailed { kind, message },
        }
    }
}

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;
