//! GitHub webhook receiver.
//!
//! Every delivery flows one way through this crate:
//!
//! ```text
//! request ─► signature ─► events::resolve ─► negotiate (ping)
//!                                        └─► HandlerTable ─► EventHandler
//! ```
//!
//! The [`Dispatcher`] owns that pipeline and maps each outcome to an HTTP
//! status; [`build_router`] mounts it at `/event_handler`.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** HTTP, HMAC, and JSON decoding live here. Handlers are
//! supplied by the composition root; this crate knows nothing about labels
//! or issue workflows.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`signature`] | HMAC verification of the raw body |
//! | [`kinds`] | [`EventKind`] and the legacy `integration_*` aliases |
//! | [`events`] | Typed payloads, [`InboundEvent`], and the resolver |
//! | [`handlers`] | [`EventHandler`], [`HandlerTable`], and its builder |
//! | [`negotiate`] | Ping capability negotiation |
//! | [`dispatch`] | [`Dispatcher`] and its configuration |
//! | [`server`] | axum router |
//! | [`errors`] | [`DispatchError`] and [`HandlerError`] |

pub mod dispatch;
pub mod errors;
pub mod events;
pub mod handlers;
pub mod kinds;
pub mod negotiate;
pub mod server;
pub mod signature;

pub use dispatch::{delivery_id, Dispatched, Dispatcher, DispatcherConfig};
pub use errors::{DispatchError, HandlerError, UnsupportedReason};
pub use events::{resolve, InboundEvent, Resolved};
pub use handlers::{handler_fn, EventHandler, HandlerFn, HandlerTable, HandlerTableBuilder};
pub use kinds::{EventKind, UnrecognizedEventKind};
pub use negotiate::{negotiate, NegotiationError};
pub use server::{build_router, AppState, EVENT_HANDLER_PATH};
pub use signature::{sign, verify_signature, SignatureAlgorithm, SignatureError};
