use super::*;

const PING: &[u8] = include_bytes!("../testdata/ping.json");
const PUSH: &[u8] = include_bytes!("../testdata/push.json");
const ISSUES_OPENED: &[u8] = include_bytes!("../testdata/issues_opened.json");
const EMPTY: &[u8] = include_bytes!("../testdata/empty.json");
const BAD: &[u8] = include_bytes!("../testdata/bad.json");

#[test]
fn test_ping_declares_hook_events() {
    let Ok(Resolved::Event(InboundEvent::Ping(ping))) = resolve(Some("ping"), PING) else {
        panic!("ping did not resolve");
    };
    assert_eq!(ping.hook_id, Some(74623413));
    assert_eq!(ping.declared_events(), ["push".to_string()]);
}

#[test]
fn test_ping_without_hook_declares_nothing() {
    let ping: PingEvent = serde_json::from_slice(EMPTY).unwrap();
    assert!(ping.declared_events().is_empty());
}

#[test]
fn test_issues_payload_decodes() {
    let Ok(Resolved::Event(InboundEvent::Issues(event))) = resolve(Some("issues"), ISSUES_OPENED)
    else {
        panic!("issues did not resolve");
    };
    assert_eq!(event.action.as_deref(), Some("opened"));
    let issue = event.issue.unwrap();
    assert_eq!(issue.number, Some(12));
    assert!(issue.labels.is_empty());
    assert_eq!(event.installation.and_then(|i| i.id), Some(402617));
}

#[test]
fn test_push_ref_field_is_renamed() {
    let event = InboundEvent::decode(EventKind::Push, PUSH).unwrap();
    let InboundEvent::Push(push) = event else {
        panic!("expected push");
    };
    assert_eq!(push.git_ref.as_deref(), Some("refs/heads/main"));
}

#[test]
fn test_empty_object_decodes_for_every_modeled_kind() {
    for kind in EventKind::ALL.iter().filter(|k| k.is_modeled()) {
        let event = InboundEvent::decode(*kind, EMPTY).unwrap();
        assert_eq!(event.kind(), *kind);
    }
}

#[test]
fn test_unmodeled_kind_keeps_raw_object() {
    let event = InboundEvent::decode(EventKind::Watch, br#"{"action":"started"}"#).unwrap();
    match event {
        InboundEvent::Unmodeled { kind, payload } => {
            assert_eq!(kind, EventKind::Watch);
            assert_eq!(payload["action"], "started");
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn test_legacy_alias_is_not_decoded() {
    // Invalid JSON is fine: legacy deliveries are never parsed.
    let resolved = resolve(Some("integration_installation"), BAD).unwrap();
    assert_eq!(
        resolved,
        Resolved::LegacyAlias {
            name: "integration_installation".to_string(),
            current: EventKind::Installation,
        }
    );
}

#[test]
fn test_unknown_or_missing_kind() {
    assert!(matches!(
        resolve(Some("bananas"), EMPTY),
        Err(DispatchError::UnknownEventKind { name }) if name == "bananas"
    ));
    assert!(matches!(
        resolve(None, EMPTY),
        Err(DispatchError::UnknownEventKind { name }) if name.is_empty()
    ));
}

#[test]
fn test_malformed_payloads() {
    assert!(matches!(
        resolve(Some("push"), BAD),
        Err(DispatchError::MalformedPayload {
            kind: EventKind::Push,
            ..
        })
    ));
    // Well-formed JSON with a mistyped field.
    assert!(matches!(
        resolve(Some("issues"), br#"{"issue":{"number":"twelve"}}"#),
        Err(DispatchError::MalformedPayload { .. })
    ));
    // Unmodeled kinds still require a JSON object.
    assert!(matches!(
        resolve(Some("watch"), b"[1, 2]"),
        Err(DispatchError::MalformedPayload { .. })
    ));
}
