//! Typed webhook payloads and the event resolver.
//!
//! Payload structs keep only the fields handlers use. Fields GitHub may omit
//! are `Option` or defaulted, so a sparse payload still decodes; a field with
//! the wrong JSON type, or a body that is not a JSON object, does not.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::DispatchError;
use crate::kinds::{legacy_alias, EventKind};

// ---------------------------------------------------------------------------
// Shared payload fragments
// ---------------------------------------------------------------------------

/// A GitHub user or organisation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Login name.
    #[serde(default)]
    pub login: String,
    /// Numeric id.
    pub id: Option<u64>,
}

/// A repository as embedded in event payloads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Repository {
    /// Repository id.
    pub id: Option<u64>,
    /// Short name.
    #[serde(default)]
    pub name: String,
    /// `owner/name`.
    pub full_name: Option<String>,
    /// Owning user or organisation.
    pub owner: Option<User>,
    /// Browser URL.
    pub html_url: Option<String>,
}

/// A repository reference in installation payloads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RepositoryRef {
    /// Repository id.
    pub id: Option<u64>,
    /// Short name.
    #[serde(default)]
    pub name: String,
    /// `owner/name`.
    pub full_name: Option<String>,
}

/// A label attached to an issue or pull request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Label {
    /// Label id.
    pub id: Option<u64>,
    /// Label name.
    #[serde(default)]
    pub name: String,
    /// Hex colour without `#`.
    pub color: Option<String>,
}

/// An issue.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    /// Per-repository issue number.
    pub number: Option<u64>,
    /// Title.
    pub title: Option<String>,
    /// `open` or `closed`.
    pub state: Option<String>,
    /// Browser URL.
    pub html_url: Option<String>,
    /// Labels currently attached.
    #[serde(default)]
    pub labels: Vec<Label>,
}

/// The App installation an event was delivered for.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Installation {
    /// Installation id.
    pub id: Option<u64>,
    /// Account the App is installed on.
    pub account: Option<User>,
}

/// Webhook registration details sent with `ping`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Hook {
    /// Hook id.
    pub id: Option<u64>,
    /// Event kinds the hook will deliver.
    #[serde(default)]
    pub events: Vec<String>,
    /// Whether the hook is active.
    pub active: Option<bool>,
}

// ---------------------------------------------------------------------------
// Event payloads
// ---------------------------------------------------------------------------

/// `ping`: sent once when a webhook is registered.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PingEvent {
    /// Random GitHub zen quote.
    pub zen: Option<String>,
    /// Id of the registered hook.
    pub hook_id: Option<u64>,
    /// The hook configuration, including the declared event kinds.
    pub hook: Option<Hook>,
}

impl PingEvent {
    /// Event kind names the sender declares it will deliver.
    pub fn declared_events(&self) -> &[String] {
        self.hook.as_ref().map_or(&[], |h| h.events.as_slice())
    }
}

/// `issues`: an issue lifecycle action.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IssuesEvent {
    /// `opened`, `closed`, `labeled`, ...
    pub action: Option<String>,
    /// The issue, with its labels as of the action.
    pub issue: Option<Issue>,
    /// The label added or removed, for `labeled`/`unlabeled`.
    pub label: Option<Label>,
    /// Repository the issue belongs to.
    pub repository: Option<Repository>,
    /// User who performed the action.
    pub sender: Option<User>,
    /// App installation, when delivered to a GitHub App.
    pub installation: Option<Installation>,
}

/// A comment on an issue or pull request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    /// Comment id.
    pub id: Option<u64>,
    /// Markdown body.
    pub body: Option<String>,
    /// Browser URL.
    pub html_url: Option<String>,
}

/// `issue_comment`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IssueCommentEvent {
    /// `created`, `edited` or `deleted`.
    pub action: Option<String>,
    /// Commented issue.
    pub issue: Option<Issue>,
    /// The comment.
    pub comment: Option<Comment>,
    /// Repository.
    pub repository: Option<Repository>,
    /// Acting user.
    pub sender: Option<User>,
    /// App installation.
    pub installation: Option<Installation>,
}

/// `label`: a repository label was created, edited or deleted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LabelEvent {
    /// `created`, `edited` or `deleted`.
    pub action: Option<String>,
    /// The label.
    pub label: Option<Label>,
    /// Repository.
    pub repository: Option<Repository>,
    /// Acting user.
    pub sender: Option<User>,
    /// App installation.
    pub installation: Option<Installation>,
}

/// `push`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PushEvent {
    /// Full ref that was pushed, e.g. `refs/heads/main`.
    #[serde(rename = "ref")]
    pub git_ref: Option<String>,
    /// Commit SHA before the push.
    pub before: Option<String>,
    /// Commit SHA after the push.
    pub after: Option<String>,
    /// Repository.
    pub repository: Option<Repository>,
    /// Acting user.
    pub sender: Option<User>,
    /// App installation.
    pub installation: Option<Installation>,
}

/// `installation`: the App was installed, uninstalled or changed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InstallationEvent {
    /// `created`, `deleted`, ...
    pub action: Option<String>,
    /// The installation.
    pub installation: Option<Installation>,
    /// Repositories the installation covers.
    #[serde(default)]
    pub repositories: Vec<RepositoryRef>,
    /// Acting user.
    pub sender: Option<User>,
}

/// `installation_repositories`: repositories were added to or removed from
/// an installation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InstallationRepositoriesEvent {
    /// `added` or `removed`.
    pub action: Option<String>,
    /// The installation.
    pub installation: Option<Installation>,
    /// `all` or `selected`.
    pub repository_selection: Option<String>,
    /// Repositories added.
    #[serde(default)]
    pub repositories_added: Vec<RepositoryRef>,
    /// Repositories removed.
    #[serde(default)]
    pub repositories_removed: Vec<RepositoryRef>,
    /// Acting user.
    pub sender: Option<User>,
}

/// A classic project board.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Project {
    /// Project id.
    pub id: Option<u64>,
    /// Name.
    pub name: Option<String>,
    /// Number.
    pub number: Option<u64>,
    /// Browser URL.
    pub html_url: Option<String>,
}

/// A card on a classic project board.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectCard {
    /// Card id.
    pub id: Option<u64>,
    /// Column the card is in.
    pub column_id: Option<u64>,
    /// Free-text note, for note cards.
    pub note: Option<String>,
    /// API URL of the linked issue or pull request, for content cards.
    pub content_url: Option<String>,
}

/// A column on a classic project board.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectColumn {
    /// Column id.
    pub id: Option<u64>,
    /// Column name.
    pub name: Option<String>,
}

/// `project`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectEvent {
    /// `created`, `edited`, `closed`, ...
    pub action: Option<String>,
    /// The project.
    pub project: Option<Project>,
    /// Repository, for repository projects.
    pub repository: Option<Repository>,
    /// Acting user.
    pub sender: Option<User>,
    /// App installation.
    pub installation: Option<Installation>,
}

/// `project_card`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectCardEvent {
    /// `created`, `moved`, ...
    pub action: Option<String>,
    /// The card.
    pub project_card: Option<ProjectCard>,
    /// Repository, for repository projects.
    pub repository: Option<Repository>,
    /// Acting user.
    pub sender: Option<User>,
    /// App installation.
    pub installation: Option<Installation>,
}

/// `project_column`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectColumnEvent {
    /// `created`, `moved`, ...
    pub action: Option<String>,
    /// The column.
    pub project_column: Option<ProjectColumn>,
    /// Repository, for repository projects.
    pub repository: Option<Repository>,
    /// Acting user.
    pub sender: Option<User>,
    /// App installation.
    pub installation: Option<Installation>,
}

/// A pull request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PullRequest {
    /// Number.
    pub number: Option<u64>,
    /// Title.
    pub title: Option<String>,
    /// `open` or `closed`.
    pub state: Option<String>,
    /// Browser URL.
    pub html_url: Option<String>,
    /// Whether it was merged.
    #[serde(default)]
    pub merged: bool,
    /// Attached labels.
    #[serde(default)]
    pub labels: Vec<Label>,
}

/// `pull_request`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PullRequestEvent {
    /// `opened`, `closed`, `synchronize`, ...
    pub action: Option<String>,
    /// Pull request number.
    pub number: Option<u64>,
    /// The pull request.
    pub pull_request: Option<PullRequest>,
    /// Repository.
    pub repository: Option<Repository>,
    /// Acting user.
    pub sender: Option<User>,
    /// App installation.
    pub installation: Option<Installation>,
}

// ---------------------------------------------------------------------------
// Inbound event
// ---------------------------------------------------------------------------

/// One decoded webhook delivery.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundEvent {
    /// `ping`
    Ping(PingEvent),
    /// `installation`
    Installation(InstallationEvent),
    /// `installation_repositories`
    InstallationRepositories(InstallationRepositoriesEvent),
    /// `issue_comment`
    IssueComment(IssueCommentEvent),
    /// `issues`
    Issues(IssuesEvent),
    /// `label`
    Label(LabelEvent),
    /// `project`
    Project(ProjectEvent),
    /// `project_card`
    ProjectCard(ProjectCardEvent),
    /// `project_column`
    ProjectColumn(ProjectColumnEvent),
    /// `pull_request`
    PullRequest(PullRequestEvent),
    /// `push`
    Push(PushEvent),
    /// A recognised kind without a typed payload. The body is kept as a JSON
    /// object for logging.
    Unmodeled {
        /// The kind named by the delivery.
        kind: EventKind,
        /// The raw JSON object.
        payload: Map<String, Value>,
    },
}

impl InboundEvent {
    /// Decodes `payload` strictly according to `kind`.
    pub fn decode(kind: EventKind, payload: &[u8]) -> Result<Self, serde_json::Error> {
        let event = match kind {
            EventKind::Ping => InboundEvent::Ping(serde_json::from_slice(payload)?),
            EventKind::Installation => InboundEvent::Installation(serde_json::from_slice(payload)?),
            EventKind::InstallationRepositories => {
                InboundEvent::InstallationRepositories(serde_json::from_slice(payload)?)
            }
            EventKind::IssueComment => InboundEvent::IssueComment(serde_json::from_slice(payload)?),
            EventKind::Issues => InboundEvent::Issues(serde_json::from_slice(payload)?),
            EventKind::Label => InboundEvent::Label(serde_json::from_slice(payload)?),
            EventKind::Project => InboundEvent::Project(serde_json::from_slice(payload)?),
            EventKind::ProjectCard => InboundEvent::ProjectCard(serde_json::from_slice(payload)?),
            EventKind::ProjectColumn => {
                InboundEvent::ProjectColumn(serde_json::from_slice(payload)?)
            }
            EventKind::PullRequest => InboundEvent::PullRequest(serde_json::from_slice(payload)?),
            EventKind::Push => InboundEvent::Push(serde_json::from_slice(payload)?),
            kind => InboundEvent::Unmodeled {
                kind,
                payload: serde_json::from_slice(payload)?,
            },
        };
        Ok(event)
    }

    /// The kind this event was decoded as.
    pub fn kind(&self) -> EventKind {
        match self {
            InboundEvent::Ping(_) => EventKind::Ping,
            InboundEvent::Installation(_) => EventKind::Installation,
            InboundEvent::InstallationRepositories(_) => EventKind::InstallationRepositories,
            InboundEvent::IssueComment(_) => EventKind::IssueComment,
            InboundEvent::Issues(_) => EventKind::Issues,
            InboundEvent::Label(_) => EventKind::Label,
            InboundEvent::Project(_) => EventKind::Project,
            InboundEvent::ProjectCard(_) => EventKind::ProjectCard,
            InboundEvent::ProjectColumn(_) => EventKind::ProjectColumn,
            InboundEvent::PullRequest(_) => EventKind::PullRequest,
            InboundEvent::Push(_) => EventKind::Push,
            InboundEvent::Unmodeled { kind, .. } => *kind,
        }
    }
}

// ---------------------------------------------------------------------------
// Resolver
// ---------------------------------------------------------------------------

/// Result of resolving a delivery's kind and payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolved {
    /// A deprecated `integration_*` name; acknowledged without decoding.
    LegacyAlias {
        /// The legacy name as delivered.
        name: String,
        /// The current kind it duplicates.
        current: EventKind,
    },
    /// A decoded event.
    Event(InboundEvent),
}

/// Maps the `X-GitHub-Event` header value and the verified payload to an
/// [`InboundEvent`].
///
/// A missing or unrecognised name is [`DispatchError::UnknownEventKind`]; a
/// payload that does not decode as its declared kind is
/// [`DispatchError::MalformedPayload`].
pub fn resolve(kind_header: Option<&str>, payload: &[u8]) -> Result<Resolved, DispatchError> {
    let name = kind_header.ok_or_else(|| DispatchError::UnknownEventKind {
        name: String::new(),
    })?;
    if let Some(current) = legacy_alias(name) {
        return Ok(Resolved::LegacyAlias {
            name: name.to_string(),
            current,
        });
    }
    let kind: EventKind = name.parse().map_err(|_| DispatchError::UnknownEventKind {
        name: name.to_string(),
    })?;
    InboundEvent::decode(kind, payload)
        .map(Resolved::Event)
        .map_err(|source| DispatchError::MalformedPayload { kind, source })
}

#[cfg(test)]
#[path = "events_tests.rs"]
mod tests;
