//! Error type for the workflow domain.
//!
//! [`WorkflowError`] covers everything that can stop a planned transition from
//! reaching GitHub. Planning itself cannot fail; only the label-edit port and
//! its construction can.

use std::time::Duration;

use thiserror::Error;

/// Errors produced while submitting a workflow transition.
///
/// None of these are retried here. Webhook senders redeliver on a non-2xx
/// response and transitions are idempotent, so the caller decides.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// No label-edit client could be built for the event, e.g. because the
    /// credentials for its installation are missing or rejected.
    #[error("Label edit client unavailable: {message}")]
    ClientUnavailable {
        /// Description of why the client could not be constructed.
        message: String,
    },

    /// The label-edit capability rejected or failed the request.
    #[error("Label edit failed: {message}")]
    EditFailed {
        /// Description of the failure, including the upstream status if any.
        message: String,
    },

    /// The label-edit call did not finish within the configured bound.
    #[error("Label edit timed out after {after:?}")]
    Timeout {
        /// The timeout that elapsed.
        after: Duration,
    },
}
