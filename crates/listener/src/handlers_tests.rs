use std::sync::atomic::{AtomicUsize, Ordering};

use super::*;

fn ok_push() -> HandlerFn<impl Fn(PushEvent) -> std::future::Ready<Result<(), HandlerError>>> {
    handler_fn(|_event: PushEvent| std::future::ready(Ok(())))
}

#[test]
fn test_empty_table_supports_nothing() {
    let table = HandlerTable::builder().build();
    assert!(table.supported_kinds().is_empty());
    for kind in EventKind::ALL {
        assert!(!table.has_handler(*kind));
    }
}

#[test]
fn test_supported_kinds_lists_registered_slots() {
    let table = HandlerTable::builder()
        .push(ok_push())
        .issues(handler_fn(|_event: IssuesEvent| async { Ok::<(), HandlerError>(()) }))
        .build();
    assert_eq!(
        table.supported_kinds(),
        [EventKind::Issues, EventKind::Push]
    );
    assert!(!table.has_handler(EventKind::Ping));
    assert!(!table.has_handler(EventKind::Watch));
}

#[test]
fn test_supported_kinds_is_computed_once() {
    let table = HandlerTable::builder().push(ok_push()).build();
    let first = table.supported_kinds().as_ptr();
    let second = table.supported_kinds().as_ptr();
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_invoke_routes_to_slot() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let table = HandlerTable::builder()
        .push(handler_fn(move |event: PushEvent| {
            let counter = counter.clone();
            async move {
                assert_eq!(event.git_ref.as_deref(), Some("refs/heads/main"));
                counter.fetch_add(1, Ordering::SeqCst);
                Ok::<(), HandlerError>(())
            }
        }))
        .build();

    let event = InboundEvent::Push(PushEvent {
        git_ref: Some("refs/heads/main".to_string()),
        ..PushEvent::default()
    });
    table.invoke(event).await.unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_invoke_empty_slot_is_unimplemented() {
    let table = HandlerTable::builder().build();
    let err = table
        .invoke(InboundEvent::Push(PushEvent::default()))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DispatchError::UnsupportedEventKind {
            kind: EventKind::Push,
            reason: UnsupportedReason::UnimplementedHandler,
        }
    ));
}

#[tokio::test]
async fn test_invoke_unmodeled_is_unknown_type() {
    let table = HandlerTable::builder().push(ok_push()).build();
    let err = table
        .invoke(InboundEvent::Unmodeled {
            kind: EventKind::Watch,
            payload: serde_json::Map::new(),
        })
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DispatchError::UnsupportedEventKind {
            kind: EventKind::Watch,
            reason: UnsupportedReason::UnknownEventType,
        }
    ));
}

#[tokio::test]
async fn test_handler_error_is_wrapped_with_kind() {
    let table = HandlerTable::builder()
        .push(handler_fn(|_event: PushEvent| async {
            Err::<(), _>(HandlerError::failed("Return failure"))
        }))
        .build();
    let err = table
        .invoke(InboundEvent::Push(PushEvent::default()))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DispatchError::HandlerFailed { kind: EventKind::Push, ref message } if message == "Return failure"
    ));
    assert_eq!(err.status_code().as_u16(), 500);
}
