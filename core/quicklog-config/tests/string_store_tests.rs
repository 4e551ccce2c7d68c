use pretty_assertions::assert_eq;
use quicklog_config::{ConfigError, ConfigurationStore, StringConfigStore};
use quicklog_types::{LevelSet, PropertyBag, ProviderDescriptor};

#[test]
fn empty_store_has_fresh_settings() {
    let mut store = StringConfigStore::empty();
    assert!(store.settings().providers.is_empty());
    assert_eq!(store.as_str(), "");
}

#[test]
fn blank_buffer_loads_as_empty_document() {
    let mut store = StringConfigStore::new("   \n");
    assert!(store.load().unwrap().providers.is_empty());
}

#[test]
fn write_then_load_round_trips() {
    let mut store = StringConfigStore::empty();
    {
        let settings = store.settings();
        settings.set_environment("Embedded");
        settings.add_provider(
            ProviderDescriptor::new("Console", "ConsoleProvider")
                .unwrap()
                .with_info(PropertyBag::new().with("LogLevel", LevelSet::basic())),
        );
    }
    let before = store.settings().clone();
    store.write().unwrap();
    assert!(store.as_str().contains("\"providerProps\""));

    let after = store.load().unwrap().clone();
    assert_eq!(after, before);
}

#[test]
fn values_set_after_construction_round_trip() {
    let mut store = StringConfigStore::empty();
    let mut descriptor = ProviderDescriptor::new("Console", "ConsoleProvider").unwrap();
    descriptor.set("LogLevel", "[etInfo,etError]");
    descriptor.set("SendLimits", r#"{"MaxSent":5}"#);
    descriptor.set("ShowTimeStamp", true);
    store.settings().add_provider(descriptor);

    let before = store.settings().clone();
    store.write().unwrap();
    let after = store.load().unwrap().clone();
    assert_eq!(after, before);
}

#[test]
fn buffer_can_seed_another_store() {
    let mut first = StringConfigStore::empty();
    first
        .settings()
        .add_provider(ProviderDescriptor::standard_console());
    first.write().unwrap();

    let mut second = StringConfigStore::new(first.into_inner());
    let settings = second.load().unwrap();
    assert!(settings.provider("Standard Console").is_some());
}

#[test]
fn malformed_buffer_is_a_serialization_error() {
    let mut store = StringConfigStore::new(r#"{"providers": [42]}"#);
    assert!(matches!(store.load(), Err(ConfigError::Serialization(_))));
}

#[test]
fn load_replaces_previous_document() {
    let mut store = StringConfigStore::new(r#"{"environment":"a","providers":[]}"#);
    store.settings().set_environment("changed in memory");
    let settings = store.load().unwrap();
    assert_eq!(settings.environment.as_deref(), Some("a"));
}
