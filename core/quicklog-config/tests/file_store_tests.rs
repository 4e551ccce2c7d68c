use pretty_assertions::assert_eq;
use quicklog_config::{ConfigError, ConfigurationStore, FileConfigStore, OnMissing};
use quicklog_types::{EventType, PropertyBag, PropertyValue, ProviderDescriptor};
use tempfile::TempDir;

fn test_console() -> ProviderDescriptor {
    ProviderDescriptor::new("Test Console", "ConsoleProvider")
        .unwrap()
        .with_info(
            PropertyBag::new()
                .with("LogLevel", "[etInfo,etError]")
                .with("ShowTimeStamp", true),
        )
}

fn test_email() -> ProviderDescriptor {
    ProviderDescriptor::new("Alerts", "EmailProvider")
        .unwrap()
        .with_info(
            PropertyBag::new()
                .with("LogLevel", "[etCritical,etException]")
                .with("SMTP", r#"{"Host":"mail.domain.com","UseSSL":false}"#)
                .with("MaxFailsToStop", 10),
        )
}

#[test]
fn missing_file_creates_empty_settings() {
    let dir = TempDir::new().unwrap();
    let mut store = FileConfigStore::new(dir.path().join("config.json"), OnMissing::CreateEmpty);
    let settings = store.load().unwrap();
    assert!(settings.providers.is_empty());
    assert!(settings.environment.is_none());
}

#[test]
fn missing_file_fails_when_strict() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");
    let mut store = FileConfigStore::new(&path, OnMissing::Fail);
    match store.load() {
        Err(ConfigError::NotFound(p)) => assert_eq!(p, path),
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[test]
fn write_creates_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");
    let mut store = FileConfigStore::new(&path, OnMissing::CreateEmpty);
    store.load().unwrap().add_provider(test_console());
    store.write().unwrap();
    assert!(path.exists());
}

#[test]
fn write_without_load_writes_empty_document() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");
    let mut store = FileConfigStore::new(&path, OnMissing::Fail);
    store.write().unwrap();
    let mut reopened = FileConfigStore::new(&path, OnMissing::Fail);
    assert!(reopened.load().unwrap().providers.is_empty());
}

#[test]
fn reopened_store_finds_written_provider() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");

    let mut store = FileConfigStore::new(&path, OnMissing::CreateEmpty);
    store.load().unwrap().add_provider(test_console());
    store.write().unwrap();

    let mut fresh = FileConfigStore::new(&path, OnMissing::Fail);
    let settings = fresh.load().unwrap();
    assert!(settings.provider("Test Console").is_some());
}

#[test]
fn round_trip_preserves_document() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");

    let mut store = FileConfigStore::new(&path, OnMissing::CreateEmpty);
    {
        let settings = store.load().unwrap();
        settings.set_environment("Test Env");
        settings.add_provider(test_console());
        settings.add_provider(test_email());
    }
    let before = store.settings().clone();
    store.write().unwrap();

    let after = store.load().unwrap().clone();
    assert_eq!(after, before);

    let email = after.provider("Alerts").unwrap();
    assert!(matches!(email.info().get("SMTP"), Some(PropertyValue::Json(_))));
    let levels = email.info().log_level().unwrap();
    assert!(levels.contains(EventType::Critical));
    assert!(levels.contains(EventType::Exception));
}

#[test]
fn write_replaces_existing_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, "stale contents that are much longer than the new document will be, padding padding padding padding padding padding padding padding padding padding padding padding padding padding").unwrap();

    let mut store = FileConfigStore::new(&path, OnMissing::Fail);
    store.reset().set_environment("prod");
    store.write().unwrap();

    let contents = std::fs::read_to_string(&path).unwrap();
    assert!(!contents.contains("stale"));
    let mut reopened = FileConfigStore::new(&path, OnMissing::Fail);
    assert_eq!(reopened.load().unwrap().environment.as_deref(), Some("prod"));
}

#[test]
fn malformed_file_is_a_serialization_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, "{ this is not json").unwrap();
    let mut store = FileConfigStore::new(&path, OnMissing::CreateEmpty);
    assert!(matches!(store.load(), Err(ConfigError::Serialization(_))));
}

#[test]
fn reset_discards_loaded_document() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");
    let mut store = FileConfigStore::new(&path, OnMissing::CreateEmpty);
    store.load().unwrap().add_provider(test_console());
    assert!(store.reset().providers.is_empty());
    assert!(store.settings().providers.is_empty());
}

#[test]
fn load_reads_wrapper_sample_document() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(
        &path,
        r#"{"environment": "Testing","providers":
            [{"providerProps": {"providerName": "A dirty ELK logger for testing purposes",
            "providerType": "RedisProvider",
            "providerInfo": {
                "AppName": " API",
                "IncludedInfo": "[iiUserName, iiAppName, iiEnvironment]",
                "LogLevel": "[etHeader,etInfo,etSuccess,etWarning,etError,etCritical,etException,etDebug,etTrace,etDone,etCustom1,etCustom2]",
                "Port": 6379, "Password": "",
                "MaxFailsToRestart": 1, "MaxFailsToStop": 0,
                "OutputAsJson": true, "Enable": true
            }}}]}"#,
    )
    .unwrap();

    let mut store = FileConfigStore::new(&path, OnMissing::Fail);
    let settings = store.load().unwrap();
    assert_eq!(settings.environment.as_deref(), Some("Testing"));
    let redis = settings
        .provider("A dirty ELK logger for testing purposes")
        .unwrap();
    assert_eq!(redis.info().log_level().unwrap().len(), 12);
    assert_eq!(
        redis.info().get("IncludedInfo").and_then(PropertyValue::as_str),
        Some("[iiUserName, iiAppName, iiEnvironment]")
    );
}
