use quicklog_types::{EventType, LevelSet, Severity};

// ── Token resolution ─────────────────────────────────────────────

#[test]
fn token_names_round_trip() {
    for et in EventType::ALL {
        assert_eq!(EventType::from_token(et.token()), Some(et));
    }
}

#[test]
fn token_resolution_trims_whitespace() {
    assert_eq!(EventType::from_token("  etWarning "), Some(EventType::Warning));
}

#[test]
fn token_resolution_accepts_ordinals() {
    assert_eq!(EventType::from_token("0"), Some(EventType::Header));
    assert_eq!(EventType::from_token("4"), Some(EventType::Error));
    assert_eq!(EventType::from_token("12"), None);
}

#[test]
fn token_resolution_is_case_sensitive() {
    assert_eq!(EventType::from_token("etinfo"), None);
}

// ── Encoding ─────────────────────────────────────────────────────

#[test]
fn encode_uses_declaration_order() {
    let set: LevelSet = [EventType::Error, EventType::Info].into_iter().collect();
    assert_eq!(set.encode(), "[etInfo,etError]");
}

#[test]
fn encode_empty_set() {
    assert_eq!(LevelSet::new().encode(), "[]");
}

#[test]
fn duplicates_collapse() {
    let mut set = LevelSet::new();
    assert!(set.insert(EventType::Info));
    assert!(!set.insert(EventType::Info));
    assert_eq!(set.len(), 1);
}

// ── Decoding ─────────────────────────────────────────────────────

#[test]
fn decode_drops_unknown_tokens() {
    let set = LevelSet::decode("[etInfo,bogus,etError]");
    let expected: LevelSet = [EventType::Info, EventType::Error].into_iter().collect();
    assert_eq!(set, expected);
}

#[test]
fn decode_tolerates_spaces_after_commas() {
    let set = LevelSet::decode("[etHeader, etInfo, etDone]");
    assert_eq!(set.len(), 3);
    assert!(set.contains(EventType::Done));
}

#[test]
fn decode_empty_list() {
    assert!(LevelSet::decode("[]").is_empty());
}

#[test]
fn decode_all_levels() {
    let set = LevelSet::decode(
        "[etHeader,etInfo,etSuccess,etWarning,etError,etCritical,etException,etDebug,etTrace,etDone,etCustom1,etCustom2]",
    );
    assert_eq!(set, LevelSet::all());
}

#[test]
fn looks_encoded_requires_brackets() {
    assert!(LevelSet::looks_encoded("[etInfo]"));
    assert!(LevelSet::looks_encoded(" [] "));
    assert!(!LevelSet::looks_encoded("LOG_DEBUG"));
}

// ── Presets ──────────────────────────────────────────────────────

#[test]
fn debug_preset_extends_trace() {
    let trace = LevelSet::trace();
    let debug = LevelSet::debug();
    assert!(!trace.contains(EventType::Debug));
    assert!(debug.contains(EventType::Debug));
    assert_eq!(debug.len(), trace.len() + 1);
}

#[test]
fn verbose_preset_is_all() {
    assert_eq!(LevelSet::preset("LOG_VERBOSE"), Some(LevelSet::all()));
    assert_eq!(LevelSet::preset("LOG_NOPE"), None);
}

// ── Serde ────────────────────────────────────────────────────────

#[test]
fn serializes_as_bracketed_string() {
    let set: LevelSet = [EventType::Critical].into_iter().collect();
    assert_eq!(serde_json::to_string(&set).unwrap(), r#""[etCritical]""#);
}

#[test]
fn deserializes_lossily() {
    let set: LevelSet = serde_json::from_str(r#""[etTrace,etNope]""#).unwrap();
    assert_eq!(set.iter().collect::<Vec<_>>(), vec![EventType::Trace]);
}

// ── Severity ─────────────────────────────────────────────────────

#[test]
fn custom_severity_maps_to_custom1() {
    assert_eq!(Severity::Custom.event_type(), EventType::Custom1);
    assert_eq!(Severity::Critical.event_type(), EventType::Critical);
}

#[test]
fn severity_index_matches_entry_point_order() {
    for (position, severity) in Severity::ALL.into_iter().enumerate() {
        assert_eq!(severity.index(), position);
    }
}
