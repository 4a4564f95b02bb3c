use super::*;

#[test]
fn test_status_codes() {
    let cases = [
        (
            DispatchError::MethodNotAllowed {
                method: "GET".to_string(),
            },
            405,
        ),
        (
            DispatchError::SignatureInvalid {
                source: SignatureError::Mismatch,
            },
            500,
        ),
        (
            DispatchError::UnknownEventKind {
                name: "bananas".to_string(),
            },
            500,
        ),
        (
            DispatchError::UnsupportedEventKind {
                kind: EventKind::Watch,
                reason: UnsupportedReason::UnknownEventType,
            },
            501,
        ),
        (
            DispatchError::UnsupportedEventKind {
                kind: EventKind::Push,
                reason: UnsupportedReason::UnimplementedHandler,
            },
            501,
        ),
        (
            DispatchError::NegotiationFailed {
                source: NegotiationError::Unsupported(EventKind::Push),
            },
            501,
        ),
        (
            DispatchError::HandlerFailed {
                kind: EventKind::Issues,
                message: "boom".to_string(),
            },
            500,
        ),
        (
            DispatchError::ClientUnavailable {
                kind: EventKind::Issues,
                message: "no token".to_string(),
            },
            500,
        ),
    ];
    for (error, status) in cases {
        assert_eq!(error.status_code().as_u16(), status, "{error}");
    }
}

#[test]
fn test_public_message_hides_handler_detail() {
    let error = HandlerError::failed("token ghs_secret rejected")
        .into_dispatch_error(EventKind::Issues);
    assert!(matches!(error, DispatchError::HandlerFailed { .. }));
    assert!(!error.public_message().contains("ghs_secret"));
    assert!(error.to_string().contains("ghs_secret"));
}

#[test]
fn test_unsupported_messages_name_the_kind() {
    let unknown = DispatchError::UnsupportedEventKind {
        kind: EventKind::Watch,
        reason: UnsupportedReason::UnknownEventType,
    };
    assert_eq!(unknown.public_message(), "Unsupported event type: watch");

    let unimplemented = DispatchError::UnsupportedEventKind {
        kind: EventKind::Push,
        reason: UnsupportedReason::UnimplementedHandler,
    };
    assert_eq!(
        unimplemented.public_message(),
        "Unimplemented handler func for: push"
    );
}

#[test]
fn test_client_unavailable_maps_through() {
    let error = HandlerError::client_unavailable("missing GITHUB_AUTH_TOKEN")
        .into_dispatch_error(EventKind::Issues);
    assert!(matches!(
        error,
        DispatchError::ClientUnavailable {
            kind: EventKind::Issues,
            ..
        }
    ));
}
