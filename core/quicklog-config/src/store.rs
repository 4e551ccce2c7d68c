use crate::error::ConfigResult;
use quicklog_types::Settings;
use serde::{Deserialize, Serialize};

/// What a file store does when its file does not exist yet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OnMissing {
    /// Raise [`ConfigError::NotFound`](crate::ConfigError::NotFound).
    Fail,
    /// Start from a fresh, empty document.
    #[default]
    CreateEmpty,
}

/// Load/write/reset contract shared by file and string stores.
///
/// The store owns its document between [`load`](Self::load) and the next
/// `load` or [`reset`](Self::reset).
pub trait ConfigurationStore {
    /// Replaces the current document with the persisted one.
    fn load(&mut self) -> ConfigResult<&mut Settings>;

    /// Persists the current document, creating an empty one first if none
    /// was loaded.
    fn write(&mut self) -> ConfigResult<()>;

    /// Discards the current document and starts a fresh one.
    fn reset(&mut self) -> &mut Settings;

    /// The current document, created empty on first access.
    fn settings(&mut self) -> &mut Settings;
}
