use super::*;

#[test]
fn test_every_kind_round_trips_its_wire_name() {
    for kind in EventKind::ALL {
        assert_eq!(kind.as_str().parse::<EventKind>(), Ok(*kind));
    }
}

#[test]
fn test_unknown_name_is_rejected() {
    assert_eq!(
        "bananas".parse::<EventKind>(),
        Err(UnrecognizedEventKind("bananas".to_string()))
    );
    // Wire names are case-sensitive.
    assert!("Issues".parse::<EventKind>().is_err());
}

#[test]
fn test_legacy_aliases_are_not_kinds() {
    for (legacy, current) in LEGACY_ALIASES {
        assert!(legacy.parse::<EventKind>().is_err());
        assert_eq!(legacy_alias(legacy), Some(current));
    }
    assert_eq!(legacy_alias("installation"), None);
}

#[test]
fn test_modeled_kinds() {
    assert!(EventKind::Issues.is_modeled());
    assert!(EventKind::Push.is_modeled());
    assert!(!EventKind::Watch.is_modeled());
    assert!(!EventKind::CheckRun.is_modeled());
}
