use crate::error::ConfigResult;
use crate::resolver::TypeResolver;
use crate::store::ConfigurationStore;
use quicklog_types::Settings;

/// Settings persisted into an in-memory JSON buffer.
///
/// Useful when the logger configuration lives inside another system's
/// configuration source rather than in a file of its own.
#[derive(Debug, Default)]
pub struct StringConfigStore {
    buffer: String,
    settings: Option<Settings>,
}

impl StringConfigStore {
    pub fn new(buffer: impl Into<String>) -> Self {
        Self {
            buffer: buffer.into(),
            settings: None,
        }
    }

    /// A store with an empty buffer and a fresh document.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            buffer: String::new(),
            settings: Some(Settings::new()),
        }
    }

    /// The buffer as of the last [`write`](ConfigurationStore::write).
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    #[must_use]
    pub fn into_inner(self) -> String {
        self.buffer
    }
}

impl ConfigurationStore for StringConfigStore {
    fn load(&mut self) -> ConfigResult<&mut Settings> {
        self.settings = None;
        let settings = if self.buffer.trim().is_empty() {
            Settings::new()
        } else {
            TypeResolver::decode_settings(&self.buffer)?
        };
        Ok(self.settings.insert(settings))
    }

    fn write(&mut self) -> ConfigResult<()> {
        self.buffer = TypeResolver::encode_settings(self.settings())?;
        Ok(())
    }

    fn reset(&mut self) -> &mut Settings {
        self.settings.insert(Settings::new())
    }

    fn settings(&mut self) -> &mut Settings {
        self.settings.get_or_insert_with(Settings::new)
    }
}
