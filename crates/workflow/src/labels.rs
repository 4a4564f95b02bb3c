//! Label vocabulary: the workflow status labels, issue label sets, and the
//! calendar-derived sprint labels.
//!
//! The four workflow labels (`review/triage`, `backlog`, `current`, `closed`)
//! are mutually exclusive. GitHub does not enforce that; the workflow engine
//! keeps it true in every label set it submits. Every other label is
//! informational and left alone.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::LabelName;

// ---------------------------------------------------------------------------
// Workflow status
// ---------------------------------------------------------------------------

/// Label for issues awaiting triage.
pub const REVIEW_TRIAGE: &str = "review/triage";
/// Label for accepted, unscheduled issues.
pub const BACKLOG: &str = "backlog";
/// Label for issues scheduled in the running sprint.
pub const CURRENT: &str = "current";
/// Label for finished issues.
pub const CLOSED: &str = "closed";

/// Position of an issue in the triage → backlog → current → closed pipeline.
///
/// Derived once from an issue's labels. [`WorkflowStatus::None`] means no
/// workflow label is present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowStatus {
    /// No workflow label is attached.
    None,
    /// `review/triage`: newly opened, awaiting triage.
    ReviewTriage,
    /// `backlog`: accepted, not scheduled.
    Backlog,
    /// `current`: scheduled in the running sprint.
    Current,
    /// `closed`: done.
    Closed,
}

impl WorkflowStatus {
    /// Statuses that are represented by a label, in pipeline order.
    pub const LABELLED: [WorkflowStatus; 4] = [
        WorkflowStatus::ReviewTriage,
        WorkflowStatus::Backlog,
        WorkflowStatus::Current,
        WorkflowStatus::Closed,
    ];

    /// Returns the label name for this status, or `None` for [`WorkflowStatus::None`].
    pub fn label(self) -> Option<&'static str> {
        match self {
            WorkflowStatus::None => None,
            WorkflowStatus::ReviewTriage => Some(REVIEW_TRIAGE),
            WorkflowStatus::Backlog => Some(BACKLOG),
            WorkflowStatus::Current => Some(CURRENT),
            WorkflowStatus::Closed => Some(CLOSED),
        }
    }

    /// Returns the label for this status as a [`LabelName`].
    pub fn label_name(self) -> Option<LabelName> {
        self.label().map(LabelName::from_static)
    }

    /// Maps a label name onto the workflow vocabulary, ignoring ASCII case.
    ///
    /// Returns `None` for informational labels.
    pub fn from_label(name: &str) -> Option<Self> {
        Self::LABELLED
            .into_iter()
            .find(|status| status.label().is_some_and(|l| l.eq_ignore_ascii_case(name)))
    }

    /// Derives the single current status of an issue.
    ///
    /// A triggering workflow label wins: the issue has just moved there.
    /// Otherwise the earliest workflow label present in pipeline order is
    /// used, so a label set that violates mutual exclusion still yields one
    /// deterministic answer and `review/triage` is never hidden by a later
    /// label.
    pub fn derive(labels: &LabelSet, trigger: Option<&LabelName>) -> Self {
        trigger
            .and_then(|t| Self::from_label(t.as_str()))
            .or_else(|| {
                Self::LABELLED
                    .into_iter()
                    .find(|status| labels.has_status(*status))
            })
            .unwrap_or(WorkflowStatus::None)
    }
}

impl std::fmt::Display for WorkflowStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label().unwrap_or("none"))
    }
}

// ---------------------------------------------------------------------------
// Label sets
// ---------------------------------------------------------------------------

/// The ordered, duplicate-free list of labels attached to an issue.
///
/// A value, not a live view: it reflects what the webhook payload reported.
/// The engine computes a desired set from it and submits that wholesale.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelSet(Vec<LabelName>);

impl LabelSet {
    /// Creates an empty label set.
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Builds a label set from raw names, dropping empty names and duplicates
    /// while preserving first-seen order.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        names
            .into_iter()
            .filter_map(LabelName::new)
            .collect()
    }

    /// Returns `true` if a label with exactly this name is present.
    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|l| l.as_str() == name)
    }

    /// Returns `true` if the label for `status` is present in any letter case.
    pub fn has_status(&self, status: WorkflowStatus) -> bool {
        self.0
            .iter()
            .any(|l| WorkflowStatus::from_label(l.as_str()) == Some(status))
    }

    /// Returns the present labels whose workflow status is one of `statuses`,
    /// spelled as they appear on the issue.
    pub fn matching_statuses(&self, statuses: &[WorkflowStatus]) -> Vec<LabelName> {
        self.0
            .iter()
            .filter(|l| {
                WorkflowStatus::from_label(l.as_str()).is_some_and(|s| statuses.contains(&s))
            })
            .cloned()
            .collect()
    }

    /// Returns a copy with `label` appended, or an identical copy if it is
    /// already present.
    pub fn with(&self, label: &LabelName) -> Self {
        let mut next = self.clone();
        if !next.contains(label.as_str()) {
            next.0.push(label.clone());
        }
        next
    }

    /// Returns a copy with every label named in `remove` dropped.
    pub fn without(&self, remove: &[LabelName]) -> Self {
        Self(
            self.0
                .iter()
                .filter(|l| !remove.contains(l))
                .cloned()
                .collect(),
        )
    }

    /// Number of labels.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if no labels are attached.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates the labels in order.
    pub fn iter(&self) -> std::slice::Iter<'_, LabelName> {
        self.0.iter()
    }

    /// Returns the label names as owned strings, e.g. for a request body.
    pub fn to_names(&self) -> Vec<String> {
        self.0.iter().map(|l| l.as_str().to_string()).collect()
    }
}

impl FromIterator<LabelName> for LabelSet {
    fn from_iter<T: IntoIterator<Item = LabelName>>(iter: T) -> Self {
        let mut set = LabelSet::new();
        for label in iter {
            if !set.contains(label.as_str()) {
                set.0.push(label);
            }
        }
        set
    }
}

impl<'a> IntoIterator for &'a LabelSet {
    type Item = &'a LabelName;
    type IntoIter = std::slice::Iter<'a, LabelName>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl std::fmt::Display for LabelSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.0.iter().map(LabelName::as_str).collect();
        write!(f, "[{}]", names.join(", "))
    }
}

// ---------------------------------------------------------------------------
// Sprint labels
// ---------------------------------------------------------------------------

/// Computes the sprint label pair for `today`.
///
/// A sprint spans two ISO weeks: `"Sprint {(week + 1) / 2}"`. The year label
/// is the ISO week-based year, which differs from the calendar year for the
/// last days of December and the first days of January.
pub fn sprint_labels(today: NaiveDate) -> Vec<LabelName> {
    let iso = today.iso_week();
    [format!("Sprint {}", (iso.week() + 1) / 2), iso.year().to_string()]
        .into_iter()
        .filter_map(LabelName::new)
        .collect()
}

#[cfg(test)]
#[path = "labels_tests.rs"]
mod tests;
