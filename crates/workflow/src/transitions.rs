//! Transition planning for the label workflow.
//!
//! [`plan_transition`] is a pure function of the issue as reported by the
//! webhook payload, the lifecycle action, the triggering label and the current
//! date. It never looks anything up; the resulting plan is deterministic, so a
//! redelivered event plans the same request (or a no-op once it has been
//! applied).
//!
//! | Action | Plan |
//! |--------|------|
//! | `opened` / `reopened` | add `review/triage` |
//! | `closed` | remove `review/triage` |
//! | `labeled` `backlog` | remove `review/triage`, `current`, `closed` |
//! | `labeled` `current` | add sprint labels, remove `review/triage`, `backlog`, `closed` |
//! | `labeled` `closed` | close the issue |
//! | anything else | no-op |

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::labels::{sprint_labels, LabelSet, WorkflowStatus, REVIEW_TRIAGE};
use crate::LabelName;

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// The `action` field of an `issues` webhook event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum IssueAction {
    /// A new issue was opened.
    Opened,
    /// A closed issue was reopened.
    Reopened,
    /// The issue was closed.
    Closed,
    /// A label was added; the event names the label.
    Labeled,
    /// A label was removed; the event names the label.
    Unlabeled,
    /// Any action the workflow does not react to (e.g. `edited`, `assigned`).
    Other(String),
}

impl From<&str> for IssueAction {
    fn from(action: &str) -> Self {
        match action {
            "opened" => IssueAction::Opened,
            "reopened" => IssueAction::Reopened,
            "closed" => IssueAction::Closed,
            "labeled" => IssueAction::Labeled,
            "unlabeled" => IssueAction::Unlabeled,
            other => IssueAction::Other(other.to_string()),
        }
    }
}

impl std::fmt::Display for IssueAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IssueAction::Opened => write!(f, "opened"),
            IssueAction::Reopened => write!(f, "reopened"),
            IssueAction::Closed => write!(f, "closed"),
            IssueAction::Labeled => write!(f, "labeled"),
            IssueAction::Unlabeled => write!(f, "unlabeled"),
            IssueAction::Other(action) => write!(f, "{action}"),
        }
    }
}

/// Open/closed state of an issue as reported by the payload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueState {
    /// The issue is open.
    #[default]
    Open,
    /// The issue is closed.
    Closed,
}

/// The parts of an issue the planner looks at.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssueSnapshot {
    /// Labels attached when the event was emitted (including the trigger
    /// label for `labeled` events).
    pub labels: LabelSet,
    /// Open/closed state when the event was emitted.
    pub state: IssueState,
}

impl IssueSnapshot {
    /// Creates a snapshot from a label set and a state.
    pub fn new(labels: LabelSet, state: IssueState) -> Self {
        Self { labels, state }
    }
}

// ---------------------------------------------------------------------------
// Outputs
// ---------------------------------------------------------------------------

/// A single change to submit to the label-edit capability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WorkflowTransitionRequest {
    /// Attach labels that are not yet present.
    AddLabels {
        /// Labels to add; none of them is present on the issue.
        labels: Vec<LabelName>,
    },
    /// Detach labels that are present.
    RemoveLabels {
        /// Labels to remove; all of them are present on the issue.
        labels: Vec<LabelName>,
        /// The label set left after removal.
        remaining: LabelSet,
    },
    /// Replace the whole label set.
    ReplaceLabels {
        /// The complete desired label set.
        labels: LabelSet,
    },
    /// Close the issue, optionally replacing the label set at the same time.
    CloseIssue {
        /// Label set to submit along with the close, or `None` to keep labels.
        labels: Option<LabelSet>,
    },
}

impl std::fmt::Display for WorkflowTransitionRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AddLabels { labels } => write!(f, "add [{}]", join_labels(labels)),
            Self::RemoveLabels { labels, .. } => write!(f, "remove [{}]", join_labels(labels)),
            Self::ReplaceLabels { labels } => write!(f, "replace with {labels}"),
            Self::CloseIssue { labels: None } => write!(f, "close"),
            Self::CloseIssue {
                labels: Some(labels),
            } => write!(f, "close with {labels}"),
        }
    }
}

fn join_labels(labels: &[LabelName]) -> String {
    labels
        .iter()
        .map(LabelName::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Why a plan decided not to touch the issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoOpReason {
    /// Every label the transition would add is already present.
    AlreadyLabelled,
    /// None of the labels the transition would remove is present.
    NothingToRemove,
    /// The transition would close an issue that is already closed.
    AlreadyClosed,
    /// The triggering label does not start a transition.
    UntrackedLabel,
    /// Label removals are observed but never acted on.
    ObservedOnly,
    /// The action is not part of the workflow.
    UnhandledAction,
}

impl std::fmt::Display for NoOpReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            NoOpReason::AlreadyLabelled => "labels already present",
            NoOpReason::NothingToRemove => "nothing to remove",
            NoOpReason::AlreadyClosed => "issue already closed",
            NoOpReason::UntrackedLabel => "label does not start a transition",
            NoOpReason::ObservedOnly => "label removal observed",
            NoOpReason::UnhandledAction => "action not handled",
        };
        write!(f, "{text}")
    }
}

/// Result of planning: either leave the issue alone or submit one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionPlan {
    /// The issue already matches the desired state.
    NoOp(NoOpReason),
    /// Submit this request.
    Submit(WorkflowTransitionRequest),
}

// ---------------------------------------------------------------------------
// Planning
// ---------------------------------------------------------------------------

/// Plans the workflow transition for one `issues` event.
///
/// The issue's [`WorkflowStatus`] is derived once, from its labels and, for
/// `labeled` events, the triggering workflow label. Every decision is keyed
/// on that status; the label set is consulted only to name the labels to
/// evict. `today` drives sprint label derivation.
pub fn plan_transition(
    issue: &IssueSnapshot,
    action: &IssueAction,
    trigger: Option<&LabelName>,
    today: NaiveDate,
) -> TransitionPlan {
    let trigger = match action {
        IssueAction::Labeled => {
            match trigger.filter(|t| WorkflowStatus::from_label(t.as_str()).is_some()) {
                Some(trigger) => Some(trigger),
                None => return TransitionPlan::NoOp(NoOpReason::UntrackedLabel),
            }
        }
        _ => None,
    };
    let status = WorkflowStatus::derive(&issue.labels, trigger);

    match action {
        IssueAction::Opened | IssueAction::Reopened => match status {
            WorkflowStatus::ReviewTriage => TransitionPlan::NoOp(NoOpReason::AlreadyLabelled),
            _ => TransitionPlan::Submit(WorkflowTransitionRequest::AddLabels {
                labels: vec![LabelName::from_static(REVIEW_TRIAGE)],
            }),
        },
        IssueAction::Closed => match status {
            WorkflowStatus::ReviewTriage => {
                remove_statuses(&issue.labels, &[WorkflowStatus::ReviewTriage])
            }
            _ => TransitionPlan::NoOp(NoOpReason::NothingToRemove),
        },
        IssueAction::Labeled => match status {
            WorkflowStatus::Backlog => remove_statuses(
                &issue.labels,
                &[
                    WorkflowStatus::ReviewTriage,
                    WorkflowStatus::Current,
                    WorkflowStatus::Closed,
                ],
            ),
            WorkflowStatus::Current => plan_current(&issue.labels, today),
            WorkflowStatus::Closed => match issue.state {
                IssueState::Closed => TransitionPlan::NoOp(NoOpReason::AlreadyClosed),
                IssueState::Open => TransitionPlan::Submit(WorkflowTransitionRequest::CloseIssue {
                    labels: None,
                }),
            },
            WorkflowStatus::ReviewTriage | WorkflowStatus::None => {
                TransitionPlan::NoOp(NoOpReason::UntrackedLabel)
            }
        },
        IssueAction::Unlabeled => TransitionPlan::NoOp(NoOpReason::ObservedOnly),
        IssueAction::Other(_) => TransitionPlan::NoOp(NoOpReason::UnhandledAction),
    }
}

fn remove_statuses(labels: &LabelSet, statuses: &[WorkflowStatus]) -> TransitionPlan {
    let remove = labels.matching_statuses(statuses);
    if remove.is_empty() {
        return TransitionPlan::NoOp(NoOpReason::NothingToRemove);
    }
    TransitionPlan::Submit(WorkflowTransitionRequest::RemoveLabels {
        remaining: labels.without(&remove),
        labels: remove,
    })
}

// Moving to `current` both adds sprint labels and evicts the other workflow
// labels. Submit the narrowest request that gets there.
fn plan_current(labels: &LabelSet, today: NaiveDate) -> TransitionPlan {
    let add: Vec<LabelName> = sprint_labels(today)
        .into_iter()
        .filter(|l| !labels.contains(l.as_str()))
        .collect();
    let remove = labels.matching_statuses(&[
        WorkflowStatus::ReviewTriage,
        WorkflowStatus::Backlog,
        WorkflowStatus::Closed,
    ]);

    match (add.is_empty(), remove.is_empty()) {
        (true, true) => TransitionPlan::NoOp(NoOpReason::AlreadyLabelled),
        (false, true) => TransitionPlan::Submit(WorkflowTransitionRequest::AddLabels { labels: add }),
        (true, false) => remove_statuses(
            labels,
            &[
                WorkflowStatus::ReviewTriage,
                WorkflowStatus::Backlog,
                WorkflowStatus::Closed,
            ],
        ),
        (false, false) => {
            let desired = add
                .iter()
                .fold(labels.without(&remove), |set, label| set.with(label));
            TransitionPlan::Submit(WorkflowTransitionRequest::ReplaceLabels { labels: desired })
        }
    }
}

#[cfg(test)]
#[path = "transitions_tests.rs"]
mod tests;
