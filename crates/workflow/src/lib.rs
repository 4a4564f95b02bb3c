//! Issue workflow domain.
//!
//! This crate owns the label-based workflow state machine: the mutually
//! exclusive workflow labels, the calendar-derived sprint labels, the pure
//! transition planner, and the engine that submits a planned transition
//! through the label-edit port.
//!
//! ## Architectural Layer
//!
//! **Business logic + port definitions.** This crate has no I/O dependencies.
//! It defines *what* is needed ([`LabelEditor`], [`LabelEditorProvider`]);
//! the `github` crate defines *how* to supply it.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identifiers`] | Newtype identifiers (`IssueNumber`, `LabelName`, etc.) |
//! | [`labels`] | `WorkflowStatus`, `LabelSet`, sprint label derivation |
//! | [`transitions`] | Transition planning (`plan_transition`) |
//! | [`engine`] | `LabelEditor` port and `WorkflowEngine` |
//! | [`errors`] | `WorkflowError` |

pub mod engine;
pub mod errors;
pub mod identifiers;
pub mod labels;
pub mod transitions;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use engine::{
    IssueEdit, IssueTarget, LabelEditor, LabelEditorProvider, TransitionOutcome, WorkflowEngine,
};
pub use errors::WorkflowError;
pub use identifiers::{InstallationId, IssueNumber, LabelName, RepositoryName, RepositoryOwner};
pub use labels::{sprint_labels, LabelSet, WorkflowStatus};
pub use transitions::{
    plan_transition, IssueAction, IssueSnapshot, IssueState, NoOpReason, TransitionPlan,
    WorkflowTransitionRequest,
};
