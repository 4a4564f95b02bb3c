//! Event handler registration.
//!
//! A [`HandlerTable`] has one typed slot per modeled event kind (`ping` is
//! answered by the negotiator and has none). Tables are assembled through
//! [`HandlerTableBuilder`] and never change afterwards, so the set of
//! supported kinds can be derived once and cached.

use std::future::Future;
use std::sync::{Arc, OnceLock};

use async_trait::async_trait;

use crate::errors::{DispatchError, HandlerError, UnsupportedReason};
use crate::events::{
    InboundEvent, InstallationEvent, InstallationRepositoriesEvent, IssueCommentEvent,
    IssuesEvent, LabelEvent, ProjectCardEvent, ProjectColumnEvent, ProjectEvent,
    PullRequestEvent, PushEvent,
};
use crate::kinds::EventKind;

/// Handles one kind of decoded webhook event.
#[async_trait]
pub trait EventHandler<E>: Send + Sync
where
    E: Send + 'static,
{
    /// Processes the event. An error turns into a 500 response.
    async fn handle(&self, event: E) -> Result<(), HandlerError>;
}

/// Adapts an async closure into an [`EventHandler`]. Build with
/// [`handler_fn`].
pub struct HandlerFn<F>(F);

/// Wraps `f` so it can be registered in a [`HandlerTable`].
pub fn handler_fn<F>(f: F) -> HandlerFn<F> {
    HandlerFn(f)
}

#[async_trait]
impl<E, F, Fut> EventHandler<E> for HandlerFn<F>
where
    E: Send + 'static,
    F: Fn(E) -> Fut + Send + Sync,
    Fut: Future<Output = Result<(), HandlerError>> + Send + 'static,
{
    async fn handle(&self, event: E) -> Result<(), HandlerError> {
        (self.0)(event).await
    }
}

type Slot<E> = Option<Arc<dyn EventHandler<E>>>;

async fn call<E: Send + 'static>(
    slot: &Slot<E>,
    kind: EventKind,
    event: E,
) -> Result<(), DispatchError> {
    let handler = slot.as_ref().ok_or(DispatchError::UnsupportedEventKind {
        kind,
        reason: UnsupportedReason::UnimplementedHandler,
    })?;
    handler
        .handle(event)
        .await
        .map_err(|e| e.into_dispatch_error(kind))
}

// ---------------------------------------------------------------------------
// Macro for the slot table.
// Generates: HandlerTable fields, has_handler(), invoke(), and the builder.
// ---------------------------------------------------------------------------
macro_rules! handler_slots {
    (
        $( $field:ident : $variant:ident ( $event:ty ) ),+ $(,)?
    ) => {
        /// Immutable mapping from modeled event kinds to handlers.
        pub struct HandlerTable {
            $( $field: Slot<$event>, )+
            supported: OnceLock<Vec<EventKind>>,
        }

        impl HandlerTable {
            /// Returns `true` if a handler is registered for `kind`.
            pub fn has_handler(&self, kind: EventKind) -> bool {
                match kind {
                    $( EventKind::$variant => self.$field.is_some(), )+
                    _ => false,
                }
            }

            /// Routes `event` to its handler.
            ///
            /// Events with no slot, or an empty one, fail with
            /// [`DispatchError::UnsupportedEventKind`].
            pub async fn invoke(&self, event: InboundEvent) -> Result<(), DispatchError> {
                match event {
                    $( InboundEvent::$variant(e) => call(&self.$field, EventKind::$variant, e).await, )+
                    other => {
                        let kind = other.kind();
                        let reason = if kind.is_modeled() {
                            UnsupportedReason::UnimplementedHandler
                        } else {
                            UnsupportedReason::UnknownEventType
                        };
                        Err(DispatchError::UnsupportedEventKind { kind, reason })
                    }
                }
            }
        }

        /// Collects handlers for a [`HandlerTable`].
        #[derive(Default)]
        pub struct HandlerTableBuilder {
            $( $field: Slot<$event>, )+
        }

        impl HandlerTableBuilder {
            $(
                #[doc = concat!("Registers the `", stringify!($field), "` handler, replacing any earlier one.")]
                pub fn $field(mut self, handler: impl EventHandler<$event> + 'static) -> Self {
                    self.$field = Some(Arc::new(handler));
                    self
                }
            )+

            /// Freezes the registrations.
            pub fn build(self) -> HandlerTable {
                HandlerTable {
                    $( $field: self.$field, )+
                    supported: OnceLock::new(),
                }
            }
        }
    };
}

handler_slots! {
    installation: Installation(InstallationEvent),
    installation_repositories: InstallationRepositories(InstallationRepositoriesEvent),
    issue_comment: IssueComment(IssueCommentEvent),
    issues: Issues(IssuesEvent),
    label: Label(LabelEvent),
    project: Project(ProjectEvent),
    project_card: ProjectCard(ProjectCardEvent),
    project_column: ProjectColumn(ProjectColumnEvent),
    pull_request: PullRequest(PullRequestEvent),
    push: Push(PushEvent),
}

impl HandlerTable {
    /// Starts an empty table.
    pub fn builder() -> HandlerTableBuilder {
        HandlerTableBuilder::default()
    }

    /// Kinds with a registered handler, in wire-name order.
    ///
    /// Computed on first use and cached; concurrent callers observe the same
    /// list.
    pub fn supported_kinds(&self) -> &[EventKind] {
        self.supported.get_or_init(|| {
            EventKind::ALL
                .iter()
                .copied()
                .filter(|kind| self.has_handler(*kind))
                .collect()
        })
    }
}

impl std::fmt::Debug for HandlerTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerTable")
            .field("supported", &self.supported_kinds())
            .finish()
    }
}

#[cfg(test)]
#[path = "handlers_tests.rs"]
mod tests;
