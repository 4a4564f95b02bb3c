//! Capability negotiation for `ping` deliveries.
//!
//! When a webhook is registered GitHub sends a `ping` listing the event kinds
//! the hook will deliver. Answering 200 accepts the registration, so every
//! declared kind must have a handler.

use thiserror::Error;

use crate::handlers::HandlerTable;
use crate::kinds::EventKind;

/// A declared event kind the receiver cannot accept.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NegotiationError {
    /// The name is not a recognised event kind.
    #[error("Unsupported event type in hook: {0:?}")]
    UnrecognizedKind(String),
    /// The kind is recognised but has no handler.
    #[error("Unimplemented handler func for: {0}")]
    Unsupported(EventKind),
}

/// Checks that every name in `declared` has a registered handler.
///
/// Stops at the first name that fails. An empty declaration succeeds.
pub fn negotiate<S: AsRef<str>>(
    table: &HandlerTable,
    declared: &[S],
) -> Result<(), NegotiationError> {
    let supported = table.supported_kinds();
    for name in declared {
        let name = name.as_ref();
        let kind: EventKind = name
            .parse()
            .map_err(|_| NegotiationError::UnrecognizedKind(name.to_string()))?;
        if !supported.contains(&kind) {
            return Err(NegotiationError::Unsupported(kind));
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "negotiate_tests.rs"]
mod tests;
