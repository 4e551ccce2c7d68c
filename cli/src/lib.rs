//! Operations behind the `quicklog` command.

use anyhow::{Context, Result};
use quicklog_config::defaults::default_settings;
use quicklog_config::{ConfigurationStore, FileConfigStore, OnMissing};
use quicklog_native::{EngineConfig, ProviderRegistry};
use quicklog_types::{PropertyValue, Settings};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tracing::info;

/// What the engine reports about itself.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ProbeReport {
    pub version: String,
    pub library: PathBuf,
    pub supported_types: Vec<String>,
    pub active_providers: String,
    pub queue_count: i32,
}

/// Writes the default catalog to `path`, replacing any existing file.
/// Returns the number of providers written.
pub fn write_defaults(path: &Path) -> Result<usize> {
    let mut store = FileConfigStore::new(path, OnMissing::CreateEmpty);
    *store.reset() = default_settings().context("building default settings")?;
    store
        .write()
        .with_context(|| format!("writing {}", path.display()))?;
    let count = store.settings().providers.len();
    info!("Wrote {} default providers to {}", count, path.display());
    Ok(count)
}

pub fn load_settings(path: &Path, on_missing: OnMissing) -> Result<Settings> {
    let mut store = FileConfigStore::new(path, on_missing);
    let settings = store
        .load()
        .with_context(|| format!("loading {}", path.display()))?;
    Ok(settings.clone())
}

fn render_value(value: &PropertyValue) -> String {
    match value {
        PropertyValue::Levels(levels) => levels.encode(),
        PropertyValue::Json(json) => format!("(json) {json}"),
        other => other.to_wire().to_string(),
    }
}

/// Human-readable listing of a settings document. Keys a known provider
/// kind does not document are marked with `?`.
#[must_use]
pub fn render_settings(settings: &Settings) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "environment: {}",
        settings.environment.as_deref().unwrap_or("(none)")
    );
    let _ = writeln!(out, "providers: {}", settings.providers.len());
    for descriptor in &settings.providers {
        let _ = writeln!(
            out,
            "\n[{}] {}",
            descriptor.provider_type(),
            descriptor.name()
        );
        let unknown = descriptor.unrecognized_keys();
        let mut keys: Vec<&str> = descriptor.info().keys().collect();
        keys.sort_unstable();
        for key in keys {
            let marker = if unknown.contains(&key) { "?" } else { " " };
            if let Some(value) = descriptor.info().get(key) {
                let _ = writeln!(out, "  {marker} {key} = {}", render_value(value));
            }
        }
    }
    out
}

/// Loads the engine under `root` and asks it about itself.
pub fn probe(root: Option<PathBuf>) -> Result<ProbeReport> {
    let config = EngineConfig {
        root_path: root,
        handle_exceptions: false,
    };
    let library = quicklog_native::engine::init(&config).context("loading native engine")?;
    let path = library.path().to_path_buf();
    let registry = ProviderRegistry::new(library);
    Ok(ProbeReport {
        version: registry.version(),
        library: path,
        supported_types: registry
            .supported_types()
            .context("reading supported provider types")?,
        active_providers: registry.active_provider_names(),
        queue_count: registry.queue_count(),
    })
}
