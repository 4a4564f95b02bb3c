use super::*;
use crate::errors::HandlerError;
use crate::events::{IssuesEvent, PushEvent};
use crate::handlers::handler_fn;

fn push_and_issues() -> HandlerTable {
    HandlerTable::builder()
        .push(handler_fn(|_e: PushEvent| async { Ok::<(), HandlerError>(()) }))
        .issues(handler_fn(|_e: IssuesEvent| async { Ok::<(), HandlerError>(()) }))
        .build()
}

#[test]
fn test_declared_kinds_with_handlers_succeed() {
    let table = push_and_issues();
    assert_eq!(negotiate(&table, &["push"]), Ok(()));
    assert_eq!(negotiate(&table, &["issues", "push"]), Ok(()));
}

#[test]
fn test_empty_declaration_succeeds() {
    let empty: [&str; 0] = [];
    assert_eq!(negotiate(&HandlerTable::builder().build(), &empty), Ok(()));
}

#[test]
fn test_missing_handler_is_unsupported() {
    let table = HandlerTable::builder().build();
    assert_eq!(
        negotiate(&table, &["push"]),
        Err(NegotiationError::Unsupported(EventKind::Push))
    );
}

#[test]
fn test_unmodeled_kind_is_unsupported() {
    let table = push_and_issues();
    assert_eq!(
        negotiate(&table, &["push", "watch"]),
        Err(NegotiationError::Unsupported(EventKind::Watch))
    );
}

#[test]
fn test_unrecognized_name() {
    let table = push_and_issues();
    let declared = vec!["push".to_string(), "bananas".to_string()];
    assert_eq!(
        negotiate(&table, &declared),
        Err(NegotiationError::UnrecognizedKind("bananas".to_string()))
    );
}

#[test]
fn test_concurrent_negotiation_sees_one_cache() {
    let table = push_and_issues();
    std::thread::scope(|scope| {
        for _ in 0..8 {
            scope.spawn(|| assert_eq!(negotiate(&table, &["issues"]), Ok(())));
        }
    });
    assert_eq!(
        table.supported_kinds(),
        [EventKind::Issues, EventKind::Push]
    );
}
