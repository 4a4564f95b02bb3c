//! The closed set of GitHub webhook event kinds the receiver recognises.
//!
//! The `X-GitHub-Event` header names the kind of every delivery. Names outside
//! this set are rejected as unknown; names inside it but without a typed
//! payload (see [`EventKind::is_modeled`]) are recognised yet never routed to a
//! handler.

use std::str::FromStr;

use thiserror::Error;

/// Returned when a wire name is not a recognised event kind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unrecognized event type: {0:?}")]
pub struct UnrecognizedEventKind(pub String);

// ---------------------------------------------------------------------------
// Macro for the kind enum.
// Generates: enum, ALL, as_str(), Display, FromStr.
// ---------------------------------------------------------------------------
macro_rules! event_kinds {
    (
        $( $variant:ident => $wire:literal ),+ $(,)?
    ) => {
        /// A GitHub webhook event kind, named by the `X-GitHub-Event` header.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum EventKind {
            $(
                #[doc = concat!("`", $wire, "`")]
                $variant,
            )+
        }

        impl EventKind {
            /// Every recognised kind, in wire-name order.
            pub const ALL: &'static [EventKind] = &[ $( EventKind::$variant, )+ ];

            /// Returns the wire name used in the `X-GitHub-Event` header.
            pub fn as_str(self) -> &'static str {
                match self {
                    $( EventKind::$variant => $wire, )+
                }
            }
        }

        impl FromStr for EventKind {
            type Err = UnrecognizedEventKind;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $wire => Ok(EventKind::$variant), )+
                    other => Err(UnrecognizedEventKind(other.to_string())),
                }
            }
        }

        impl std::fmt::Display for EventKind {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.as_str())
            }
        }
    };
}

event_kinds! {
    CheckRun => "check_run",
    CheckSuite => "check_suite",
    CommitComment => "commit_comment",
    Create => "create",
    Delete => "delete",
    Deployment => "deployment",
    DeploymentStatus => "deployment_status",
    Fork => "fork",
    GitHubAppAuthorization => "github_app_authorization",
    Gollum => "gollum",
    Installation => "installation",
    InstallationRepositories => "installation_repositories",
    IssueComment => "issue_comment",
    Issues => "issues",
    Label => "label",
    MarketplacePurchase => "marketplace_purchase",
    Member => "member",
    Membership => "membership",
    Milestone => "milestone",
    Organization => "organization",
    OrgBlock => "org_block",
    PageBuild => "page_build",
    Ping => "ping",
    Project => "project",
    ProjectCard => "project_card",
    ProjectColumn => "project_column",
    Public => "public",
    PullRequest => "pull_request",
    PullRequestReview => "pull_request_review",
    PullRequestReviewComment => "pull_request_review_comment",
    Push => "push",
    Release => "release",
    Repository => "repository",
    RepositoryVulnerabilityAlert => "repository_vulnerability_alert",
    Status => "status",
    Team => "team",
    TeamAdd => "team_add",
    Watch => "watch",
}

impl EventKind {
    /// Returns `true` if the kind decodes into a typed payload and has a
    /// handler slot in [`crate::HandlerTable`]. `ping` is modeled but is
    /// answered by capability negotiation, not by a handler.
    pub fn is_modeled(self) -> bool {
        matches!(
            self,
            EventKind::Ping
                | EventKind::Installation
                | EventKind::InstallationRepositories
                | EventKind::IssueComment
                | EventKind::Issues
                | EventKind::Label
                | EventKind::Project
                | EventKind::ProjectCard
                | EventKind::ProjectColumn
                | EventKind::PullRequest
                | EventKind::Push
        )
    }
}

/// Deprecated `integration_*` names GitHub still delivers alongside the
/// current ones. Deliveries under these names are acknowledged and dropped.
pub const LEGACY_ALIASES: [(&str, EventKind); 2] = [
    ("integration_installation", EventKind::Installation),
    (
        "integration_installation_repositories",
        EventKind::InstallationRepositories,
    ),
];

/// Returns the current kind a legacy name stands for, if `name` is one.
pub fn legacy_alias(name: &str) -> Option<EventKind> {
    LEGACY_ALIASES
        .iter()
        .find(|(legacy, _)| *legacy == name)
        .map(|(_, kind)| *kind)
}

#[cfg(test)]
#[path = "kinds_tests.rs"]
mod tests;
