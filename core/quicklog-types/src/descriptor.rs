use crate::property::{PropertyBag, PropertyValue};
use crate::schema::ProviderKind;
use crate::{Error, LevelSet, Result};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Name, type and settings of one log sink.
///
/// The type is free-form here; only the engine's catalog decides whether it
/// is valid, at registration time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawDescriptor")]
pub struct ProviderDescriptor {
    #[serde(rename = "providerName")]
    name: String,
    #[serde(rename = "providerType")]
    provider_type: String,
    #[serde(rename = "providerInfo", default)]
    info: PropertyBag,
}

#[derive(Deserialize)]
struct RawDescriptor {
    #[serde(rename = "providerName", default)]
    name: String,
    #[serde(rename = "providerType", default)]
    provider_type: String,
    #[serde(rename = "providerInfo", default)]
    info: Option<PropertyBag>,
}

impl TryFrom<RawDescriptor> for ProviderDescriptor {
    type Error = Error;

    fn try_from(raw: RawDescriptor) -> Result<Self> {
        let mut descriptor = Self::new(raw.name, raw.provider_type)?;
        descriptor.set_info(raw.info.unwrap_or_default());
        Ok(descriptor)
    }
}

impl ProviderDescriptor {
    /// Creates a descriptor with an empty property bag.
    ///
    /// Fails with [`Error::InvalidProviderName`] if `name` is empty.
    pub fn new(name: impl Into<String>, provider_type: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(Error::InvalidProviderName);
        }
        Ok(Self {
            name,
            provider_type: provider_type.into(),
            info: PropertyBag::new(),
        })
    }

    /// Builder-style replacement of the property bag.
    #[must_use]
    pub fn with_info(mut self, info: PropertyBag) -> Self {
        self.set_info(info);
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> Result<()> {
        let name = name.into();
        if name.is_empty() {
            return Err(Error::InvalidProviderName);
        }
        self.name = name;
        Ok(())
    }

    #[must_use]
    pub fn provider_type(&self) -> &str {
        &self.provider_type
    }

    /// Changes the type and re-reads the property bag against its schema.
    pub fn set_provider_type(&mut self, provider_type: impl Into<String>) {
        self.provider_type = provider_type.into();
        let kind = self.kind();
        self.info.apply_schema(&kind);
    }

    #[must_use]
    pub fn kind(&self) -> ProviderKind {
        ProviderKind::from_type_name(&self.provider_type)
    }

    #[must_use]
    pub fn info(&self) -> &PropertyBag {
        &self.info
    }

    /// Edits the property bag in place, then re-applies the schema.
    pub fn update_info<R>(&mut self, edit: impl FnOnce(&mut PropertyBag) -> R) -> R {
        let result = edit(&mut self.info);
        let kind = self.kind();
        self.info.apply_schema(&kind);
        result
    }

    /// Replaces the property bag, retyping it against the provider kind.
    pub fn set_info(&mut self, mut info: PropertyBag) {
        info.apply_schema(&self.kind());
        self.info = info;
    }

    /// Inserts one setting, typed the way a later load would read it.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<PropertyValue>) {
        let key = key.into();
        let value = PropertyValue::conform(value.into(), self.kind().field_kind(&key));
        self.info.insert(key, value);
    }

    /// Keys a known provider kind does not document. Always empty for
    /// unknown kinds.
    #[must_use]
    pub fn unrecognized_keys(&self) -> Vec<&str> {
        let kind = self.kind();
        if !kind.is_known() {
            return Vec::new();
        }
        let mut keys: Vec<&str> = self
            .info
            .keys()
            .filter(|key| kind.field_kind(key).is_none())
            .collect();
        keys.sort_unstable();
        keys
    }

    /// Rewrites the name to embed the current process id and a fresh UUID so
    /// several processes can register providers from one shared configuration.
    #[must_use]
    pub fn with_process_scope(mut self) -> Self {
        self.name = format!(
            "[Name : {}] - [PID : {}] - [GUID : {}]",
            self.name,
            std::process::id(),
            Uuid::new_v4()
        );
        self
    }

    /// Serializes to the props object the native engine's add call expects.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// The built-in console provider: every level, timestamps and colours.
    #[must_use]
    pub fn standard_console() -> Self {
        Self {
            name: "Standard Console".into(),
            provider_type: ProviderKind::Console.type_name().into(),
            info: PropertyBag::new()
                .with("LogLevel", LevelSet::all())
                .with("ShowEventColors", true)
                .with("ShowTimeStamp", true),
        }
    }

    /// The built-in file provider writing to `file_path`, no rotation.
    #[must_use]
    pub fn standard_file(file_path: &str) -> Self {
        Self {
            name: "Standard File".into(),
            provider_type: ProviderKind::File.type_name().into(),
            info: PropertyBag::new()
                .with("LogLevel", LevelSet::all())
                .with("Filename", file_path)
                .with("DailyRotate", false)
                .with("ShowTimeStamp", true),
        }
    }
}
