use crate::error::{ConfigError, ConfigResult};
use crate::resolver::TypeResolver;
use crate::store::{ConfigurationStore, OnMissing};
use quicklog_types::Settings;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Settings persisted as a JSON file.
pub struct FileConfigStore {
    path: PathBuf,
    on_missing: OnMissing,
    settings: Option<Settings>,
}

impl FileConfigStore {
    pub fn new(path: impl Into<PathBuf>, on_missing: OnMissing) -> Self {
        Self {
            path: path.into(),
            on_missing,
            settings: None,
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn on_missing(&self) -> OnMissing {
        self.on_missing
    }
}

impl ConfigurationStore for FileConfigStore {
    fn load(&mut self) -> ConfigResult<&mut Settings> {
        self.settings = None;
        if !self.path.exists() {
            return match self.on_missing {
                OnMissing::Fail => Err(ConfigError::NotFound(self.path.clone())),
                OnMissing::CreateEmpty => {
                    debug!("No config file at {:?}, starting empty", self.path);
                    Ok(self.settings.insert(Settings::new()))
                }
            };
        }

        let contents = std::fs::read_to_string(&self.path)?;
        let settings = TypeResolver::decode_settings(&contents)?;
        info!(
            providers = settings.providers.len(),
            "Loaded logger settings from {:?}", self.path
        );
        Ok(self.settings.insert(settings))
    }

    fn write(&mut self) -> ConfigResult<()> {
        let json = TypeResolver::encode_settings(self.settings())?;
        // Delete then write: a crash in between loses the file.
        if self.path.exists() {
            std::fs::remove_file(&self.path)?;
        }
        std::fs::write(&self.path, json)?;
        debug!("Wrote logger settings to {:?}", self.path);
        Ok(())
    }

    fn reset(&mut self) -> &mut Settings {
        self.settings.insert(Settings::new())
    }

    fn settings(&mut self) -> &mut Settings {
        self.settings.get_or_insert_with(Settings::new)
    }
}
