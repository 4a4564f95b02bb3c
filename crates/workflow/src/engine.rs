//! The workflow engine and the label-edit port it drives.
//!
//! The engine turns a [`TransitionPlan`] into exactly one call on a
//! [`LabelEditor`], or none at all for a no-op. Infrastructure crates supply
//! editors through a [`LabelEditorProvider`] (see the `github` crate); tests
//! supply a recording fake.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::labels::LabelSet;
use crate::transitions::{
    plan_transition, IssueAction, IssueSnapshot, IssueState, NoOpReason, TransitionPlan,
    WorkflowTransitionRequest,
};
use crate::{InstallationId, IssueNumber, LabelName, RepositoryName, RepositoryOwner, WorkflowError};

// ---------------------------------------------------------------------------
// Port types
// ---------------------------------------------------------------------------

/// The issue a transition applies to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IssueTarget {
    /// Repository owner login.
    pub owner: RepositoryOwner,
    /// Repository name.
    pub repository: RepositoryName,
    /// Issue number within the repository.
    pub number: IssueNumber,
}

impl IssueTarget {
    /// Creates a new target.
    pub fn new(owner: RepositoryOwner, repository: RepositoryName, number: IssueNumber) -> Self {
        Self {
            owner,
            repository,
            number,
        }
    }
}

impl std::fmt::Display for IssueTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}#{}", self.owner, self.repository, self.number)
    }
}

/// Desired issue state for [`LabelEditor::edit`]. `None` fields are left
/// unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueEdit {
    /// Full replacement label set.
    pub labels: Option<LabelSet>,
    /// New open/closed state.
    pub state: Option<IssueState>,
}

/// The "edit labels" capability of the issue tracker.
///
/// All operations are scoped to one issue. Implementations report failures as
/// [`WorkflowError::EditFailed`] and never retry.
#[async_trait]
pub trait LabelEditor: Send + Sync {
    /// Sets the full label list and/or the state of the issue. Returns the
    /// labels GitHub reports afterwards.
    async fn edit(&self, target: &IssueTarget, edit: &IssueEdit) -> Result<LabelSet, WorkflowError>;

    /// Adds labels. Returns the resulting label list.
    async fn add_labels(
        &self,
        target: &IssueTarget,
        labels: &[LabelName],
    ) -> Result<LabelSet, WorkflowError>;

    /// Removes a single label.
    async fn remove_label(&self, target: &IssueTarget, label: &LabelName)
        -> Result<(), WorkflowError>;
}

/// Builds a [`LabelEditor`] for the credentials an event is scoped to.
///
/// `installation` is the GitHub App installation the event was delivered
/// for, or `None` for plain repository webhooks.
#[async_trait]
pub trait LabelEditorProvider: Send + Sync {
    /// Returns an editor, or [`WorkflowError::ClientUnavailable`].
    async fn editor_for(
        &self,
        installation: Option<InstallationId>,
    ) -> Result<Arc<dyn LabelEditor>, WorkflowError>;
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// What the engine did for one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionOutcome {
    /// Nothing was submitted.
    NoOp(NoOpReason),
    /// One request was submitted.
    Applied {
        /// The submitted request.
        request: WorkflowTransitionRequest,
        /// Labels reported by the editor afterwards, when it reports them.
        labels: Option<LabelSet>,
    },
}

/// Plans label workflow transitions and applies them through editors
/// obtained from a [`LabelEditorProvider`].
///
/// The editor is only built once a plan needs one, so events that change
/// nothing never touch credentials.
#[derive(Clone)]
pub struct WorkflowEngine {
    provider: Arc<dyn LabelEditorProvider>,
    opened_delay: Duration,
}

impl WorkflowEngine {
    /// Creates an engine that obtains editors from `provider`.
    pub fn new(provider: Arc<dyn LabelEditorProvider>) -> Self {
        Self {
            provider,
            opened_delay: Duration::ZERO,
        }
    }

    /// Waits `delay` between building the editor and submitting a change
    /// planned for an `opened` event.
    pub fn with_opened_delay(mut self, delay: Duration) -> Self {
        self.opened_delay = delay;
        self
    }

    /// Submits `request` as a single editor call.
    ///
    /// A removal of one label uses [`LabelEditor::remove_label`]; removing
    /// several replaces the label set in one edit so the issue never passes
    /// through an intermediate state.
    pub async fn apply(
        editor: &dyn LabelEditor,
        target: &IssueTarget,
        request: &WorkflowTransitionRequest,
    ) -> Result<Option<LabelSet>, WorkflowError> {
        info!(issue = %target, request = %request, "Submitting workflow transition");
        match request {
            WorkflowTransitionRequest::AddLabels { labels } => {
                editor.add_labels(target, labels).await.map(Some)
            }
            WorkflowTransitionRequest::RemoveLabels { labels, remaining } => match labels.as_slice() {
                [single] => editor
                    .remove_label(target, single)
                    .await
                    .map(|()| Some(remaining.clone())),
                _ => {
                    let edit = IssueEdit {
                        labels: Some(remaining.clone()),
                        state: None,
                    };
                    editor.edit(target, &edit).await.map(Some)
                }
            },
            WorkflowTransitionRequest::ReplaceLabels { labels } => {
                let edit = IssueEdit {
                    labels: Some(labels.clone()),
                    state: None,
                };
                editor.edit(target, &edit).await.map(Some)
            }
            WorkflowTransitionRequest::CloseIssue { labels } => {
                let edit = IssueEdit {
                    labels: labels.clone(),
                    state: Some(IssueState::Closed),
                };
                editor.edit(target, &edit).await.map(Some)
            }
        }
    }

    /// Plans the transition for one event and applies it unless it is a
    /// no-op.
    ///
    /// `installation` selects the credentials the editor is built with.
    pub async fn run(
        &self,
        target: &IssueTarget,
        installation: Option<InstallationId>,
        issue: &IssueSnapshot,
        action: &IssueAction,
        trigger: Option<&LabelName>,
        today: NaiveDate,
    ) -> Result<TransitionOutcome, WorkflowError> {
        let request = match plan_transition(issue, action, trigger, today) {
            TransitionPlan::NoOp(reason) => {
                debug!(issue = %target, action = %action, reason = %reason, "No workflow transition");
                return Ok(TransitionOutcome::NoOp(reason));
            }
            TransitionPlan::Submit(request) => request,
        };

        let editor = self.provider.editor_for(installation).await?;
        if *action == IssueAction::Opened && !self.opened_delay.is_zero() {
            // Lose the race with the page load after "Submit new issue" so
            // the author sees the new label.
            tokio::time::sleep(self.opened_delay).await;
        }
        let labels = Self::apply(editor.as_ref(), target, &request).await?;
        Ok(TransitionOutcome::Applied { request, labels })
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
