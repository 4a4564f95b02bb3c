//! Handlers registered by this deployment.
//!
//! `issues` drives the label workflow. Installation and project events are
//! logged and acknowledged so App registrations that subscribe to them pass
//! the ping check.

use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use listener::events::{IssuesEvent, Label, Repository};
use listener::{EventHandler, HandlerError, HandlerTable};
use tracing::{debug, info, instrument, warn};
use workflow::{
    InstallationId, IssueAction, IssueNumber, IssueSnapshot, IssueState, IssueTarget,
    LabelEditorProvider, LabelName, LabelSet, RepositoryName, RepositoryOwner, TransitionOutcome,
    WorkflowEngine, WorkflowError,
};

// ---------------------------------------------------------------------------
// Repository allow-list
// ---------------------------------------------------------------------------

/// Repositories whose issues are managed. An empty list allows every
/// repository. Entries are `owner/name`, matched case-insensitively.
#[derive(Debug, Clone, Default)]
pub struct RepositoryAllowList(Vec<String>);

impl RepositoryAllowList {
    /// Normalises `owner/name` entries; blank entries are dropped.
    pub fn new<I, S>(repositories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(
            repositories
                .into_iter()
                .map(|r| r.as_ref().trim().to_ascii_lowercase())
                .filter(|r| !r.is_empty())
                .collect(),
        )
    }

    /// Whether issues in `full_name` (`owner/name`) are managed.
    pub fn allows(&self, full_name: &str) -> bool {
        self.0.is_empty() || self.0.iter().any(|r| r.eq_ignore_ascii_case(full_name))
    }
}

// ---------------------------------------------------------------------------
// Issues
// ---------------------------------------------------------------------------

/// Timing knobs for [`IssuesWorkflowHandler`].
#[derive(Debug, Clone, Copy)]
pub struct WorkflowTiming {
    /// Wait before editing an issue that was just opened.
    pub opened_delay: Duration,
    /// Bound on everything after planning: client construction, the opened
    /// delay and the edit.
    pub edit_timeout: Duration,
}

/// Applies the label workflow to `issues` events.
pub struct IssuesWorkflowHandler {
    engine: WorkflowEngine,
    edit_timeout: Duration,
    allow_list: RepositoryAllowList,
    today: fn() -> NaiveDate,
}

impl IssuesWorkflowHandler {
    /// A handler that builds editors from `provider` and dates sprint labels
    /// from the system clock.
    pub fn new(
        provider: Arc<dyn LabelEditorProvider>,
        timing: WorkflowTiming,
        allow_list: RepositoryAllowList,
    ) -> Self {
        Self {
            engine: WorkflowEngine::new(provider).with_opened_delay(timing.opened_delay),
            edit_timeout: timing.edit_timeout,
            allow_list,
            today: || Utc::now().date_naive(),
        }
    }

    /// Overrides the date used for sprint labels.
    pub fn with_clock(mut self, today: fn() -> NaiveDate) -> Self {
        self.today = today;
        self
    }
}

fn issue_target(repository: Option<&Repository>, number: Option<u64>) -> Option<IssueTarget> {
    let repository = repository?;
    let owner = repository.owner.as_ref().map(|o| o.login.clone())?;
    Some(IssueTarget::new(
        RepositoryOwner::new(owner)?,
        RepositoryName::new(repository.name.clone())?,
        IssueNumber::new(number?),
    ))
}

fn snapshot(labels: &[Label], state: Option<&str>) -> IssueSnapshot {
    let state = match state {
        Some("closed") => IssueState::Closed,
        _ => IssueState::Open,
    };
    IssueSnapshot::new(
        LabelSet::from_names(labels.iter().map(|l| l.name.as_str())),
        state,
    )
}

#[async_trait]
impl EventHandler<IssuesEvent> for IssuesWorkflowHandler {
    #[instrument(skip_all, fields(action = event.action.as_deref().unwrap_or_default()))]
    async fn handle(&self, event: IssuesEvent) -> Result<(), HandlerError> {
        let issue = event.issue.unwrap_or_default();
        let Some(target) = issue_target(event.repository.as_ref(), issue.number) else {
            return Err(HandlerError::failed(
                "issues event is missing its repository or issue number",
            ));
        };

        let full_name = format!("{}/{}", target.owner, target.repository);
        if !self.allow_list.allows(&full_name) {
            info!(repository = %full_name, "Repository not in allow-list; ignoring");
            return Ok(());
        }

        let action = IssueAction::from(event.action.as_deref().unwrap_or_default());
        let trigger = event.label.and_then(|l| LabelName::new(l.name));
        let current = snapshot(&issue.labels, issue.state.as_deref());
        let today = (self.today)();
        info!(
            issue = %target,
            url = issue.html_url.as_deref().unwrap_or_default(),
            labels = %current.labels,
            trigger = trigger.as_ref().map(LabelName::as_str).unwrap_or_default(),
            "Issues event"
        );

        let installation = event
            .installation
            .and_then(|i| i.id)
            .filter(|id| *id != 0)
            .map(InstallationId::new);
        let outcome = tokio::time::timeout(
            self.edit_timeout,
            self.engine
                .run(&target, installation, &current, &action, trigger.as_ref(), today),
        )
        .await
        .unwrap_or(Err(WorkflowError::Timeout {
            after: self.edit_timeout,
        }));

        match outcome {
            Ok(TransitionOutcome::NoOp(_)) => Ok(()),
            Ok(TransitionOutcome::Applied { request, labels }) => {
                info!(
                    issue = %target,
                    request = %request,
                    labels = %labels.unwrap_or_default(),
                    "Workflow transition applied"
                );
                Ok(())
            }
            Err(WorkflowError::ClientUnavailable { message }) => {
                Err(HandlerError::client_unavailable(message))
            }
            Err(e) => {
                warn!(issue = %target, error = %e, "Workflow transition failed");
                Err(HandlerError::failed(e.to_string()))
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

/// Logs the payload and acknowledges.
#[derive(Debug, Clone, Copy)]
pub struct EventLogger {
    kind: &'static str,
}

impl EventLogger {
    /// A logger that tags its lines with `kind`.
    pub fn new(kind: &'static str) -> Self {
        Self { kind }
    }
}

#[async_trait]
impl<E> EventHandler<E> for EventLogger
where
    E: Debug + Send + 'static,
{
    async fn handle(&self, event: E) -> Result<(), HandlerError> {
        info!(kind = self.kind, "Event received");
        debug!(kind = self.kind, event = ?event, "Event payload");
        Ok(())
    }
}

/// The handler table this deployment serves.
pub fn deployment_handlers(issues: IssuesWorkflowHandler) -> HandlerTable {
    HandlerTable::builder()
        .issues(issues)
        .installation(EventLogger::new("installation"))
        .installation_repositories(EventLogger::new("installation_repositories"))
        .project(EventLogger::new("project"))
        .project_card(EventLogger::new("project_card"))
        .project_column(EventLogger::new("project_column"))
        .build()
}

#[cfg(test)]
#[path = "handlers_tests.rs"]
mod tests;
