use super::*;

fn label(name: &str) -> LabelName {
    LabelName::new(name).unwrap()
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn names(labels: &[LabelName]) -> Vec<&str> {
    labels.iter().map(LabelName::as_str).collect()
}

#[test]
fn test_sprint_labels_known_dates() {
    let cases = [
        (date(2019, 1, 1), ["Sprint 1", "2019"]),
        (date(2019, 2, 17), ["Sprint 4", "2019"]),
        (date(2019, 12, 29), ["Sprint 26", "2019"]),
        (date(2019, 12, 31), ["Sprint 1", "2020"]),
    ];
    for (today, want) in cases {
        assert_eq!(names(&sprint_labels(today)), want, "date {today}");
    }
}

#[test]
fn test_sprint_labels_use_iso_year_in_early_january() {
    // 2021-01-01 falls in ISO week 53 of 2020.
    assert_eq!(
        names(&sprint_labels(date(2021, 1, 1))),
        ["Sprint 27", "2020"]
    );
}

#[test]
fn test_from_label_ignores_case() {
    assert_eq!(
        WorkflowStatus::from_label("Backlog"),
        Some(WorkflowStatus::Backlog)
    );
    assert_eq!(
        WorkflowStatus::from_label("REVIEW/TRIAGE"),
        Some(WorkflowStatus::ReviewTriage)
    );
    assert_eq!(WorkflowStatus::from_label("bug"), None);
    assert_eq!(WorkflowStatus::from_label("none"), None);
}

#[test]
fn test_derive_prefers_trigger_label() {
    let labels = LabelSet::from_names(["review/triage", "current", "bug"]);
    assert_eq!(
        WorkflowStatus::derive(&labels, Some(&label("current"))),
        WorkflowStatus::Current
    );
    assert_eq!(
        WorkflowStatus::derive(&labels, Some(&label("review/triage"))),
        WorkflowStatus::ReviewTriage
    );
}

#[test]
fn test_derive_without_trigger_uses_earliest_status() {
    let labels = LabelSet::from_names(["backlog", "review/triage"]);
    assert_eq!(
        WorkflowStatus::derive(&labels, None),
        WorkflowStatus::ReviewTriage
    );

    let informational = LabelSet::from_names(["bug", "Sprint 3"]);
    assert_eq!(
        WorkflowStatus::derive(&informational, Some(&label("bug"))),
        WorkflowStatus::None
    );
}

#[test]
fn test_derive_trusts_trigger_missing_from_labels() {
    let labels = LabelSet::from_names(["backlog"]);
    assert_eq!(
        WorkflowStatus::derive(&labels, Some(&label("Current"))),
        WorkflowStatus::Current
    );
}

#[test]
fn test_from_names_drops_empty_and_duplicates() {
    let labels = LabelSet::from_names(["bug", "", "bug", "backlog"]);
    assert_eq!(labels.to_names(), vec!["bug", "backlog"]);
}

#[test]
fn test_with_existing_label_is_identity() {
    let labels = LabelSet::from_names(["review/triage", "bug"]);
    assert_eq!(labels.with(&label("bug")), labels);
    assert_eq!(
        labels.with(&label("backlog")).to_names(),
        vec!["review/triage", "bug", "backlog"]
    );
}

#[test]
fn test_without_absent_label_is_identity() {
    let labels = LabelSet::from_names(["review/triage", "bug"]);
    assert_eq!(labels.without(&[label("current")]), labels);
    assert_eq!(labels.without(&[label("bug")]).to_names(), vec!["review/triage"]);
}

#[test]
fn test_matching_statuses_keeps_original_spelling() {
    let labels = LabelSet::from_names(["Current", "bug", "closed"]);
    let found = labels.matching_statuses(&[WorkflowStatus::Current, WorkflowStatus::Backlog]);
    assert_eq!(names(&found), ["Current"]);
}
