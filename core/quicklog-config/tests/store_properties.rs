//! Property-based tests for settings persistence.
//!
//! Whatever a document holds, writing it and loading it back through either
//! store yields an equal document.

use proptest::prelude::*;
use quicklog_config::{ConfigurationStore, FileConfigStore, OnMissing, StringConfigStore};
use quicklog_types::{EventType, LevelSet, ProviderDescriptor, Settings};
use tempfile::TempDir;

// =============================================================================
// HELPER STRATEGIES
// =============================================================================

fn level_set_strategy() -> impl Strategy<Value = LevelSet> {
    prop::sample::subsequence(EventType::ALL.to_vec(), 0..=EventType::ALL.len())
        .prop_map(|types| types.into_iter().collect())
}

fn name_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[A-Za-z0-9][A-Za-z0-9 ._:-]{0,24}").unwrap()
}

fn provider_strategy() -> impl Strategy<Value = ProviderDescriptor> {
    (
        name_strategy(),
        prop::sample::select(vec!["ConsoleProvider", "FileProvider", "EmailProvider", "FutureProvider"]),
        level_set_strategy(),
        any::<bool>(),
        0i64..10_000,
        "[A-Za-z0-9 /._]{0,20}",
    )
        .prop_map(|(name, provider_type, levels, flag, number, text)| {
            let mut descriptor = ProviderDescriptor::new(name, provider_type).unwrap();
            descriptor.set("LogLevel", levels.encode());
            descriptor.set("ShowTimeStamp", flag);
            descriptor.set("MaxFailsToRestart", number);
            descriptor.set("Filename", text.clone());
            descriptor.set("SMTP", format!(r#"{{"Host":"{text}"}}"#));
            descriptor
        })
}

fn settings_strategy() -> impl Strategy<Value = Settings> {
    (
        prop::option::of("[A-Za-z]{0,12}"),
        any::<bool>(),
        prop::collection::vec(provider_strategy(), 0..6),
    )
        .prop_map(|(environment, handle, providers)| Settings {
            environment,
            handle_uncatched_exceptions: handle,
            providers,
        })
}

// =============================================================================
// ROUND-TRIP PROPERTIES
// =============================================================================

proptest! {
    #[test]
    fn string_store_round_trips(settings in settings_strategy()) {
        let mut store = StringConfigStore::empty();
        *store.reset() = settings.clone();
        store.write().unwrap();

        let mut reader = StringConfigStore::new(store.into_inner());
        prop_assert_eq!(reader.load().unwrap().clone(), settings);
    }

    #[test]
    fn file_store_round_trips(settings in settings_strategy()) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("qlconfig.json");
        let mut store = FileConfigStore::new(&path, OnMissing::Fail);
        *store.reset() = settings.clone();
        store.write().unwrap();

        let mut reader = FileConfigStore::new(&path, OnMissing::Fail);
        prop_assert_eq!(reader.load().unwrap().clone(), settings);
    }
}
