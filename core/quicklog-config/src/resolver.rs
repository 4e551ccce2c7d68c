//! Resolution of the document's polymorphic touch points.
//!
//! Provider entries and their `providerProps` are declared by capability,
//! but JSON has no way to pick an implementation from a capability name.
//! Exactly one concrete shape exists for each, so the resolver strips any
//! type tag it finds and always builds that shape. Adding a second concrete
//! provider shape means extending [`Shape`], not just the data.

use crate::error::ConfigResult;
use quicklog_types::{ProviderDescriptor, Settings};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

/// Key under which type-annotating serializers record an implementation.
const TYPE_TAG: &str = "$type";

const PROVIDER_PROPS: &str = "providerProps";

/// The two places in a settings document that carry a capability-typed value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// An item of `providers[]`.
    Provider,
    /// The `providerProps` object inside a provider item.
    ProviderProps,
}

impl Shape {
    /// Capability name a tag may legitimately carry for this touch point.
    #[must_use]
    pub const fn capability(self) -> &'static str {
        match self {
            Shape::Provider => "ILoggerProvider",
            Shape::ProviderProps => "ILoggerProviderProps",
        }
    }

    /// The single concrete shape this touch point resolves to.
    #[must_use]
    pub const fn concrete(self) -> &'static str {
        match self {
            Shape::Provider => "QuickLoggerProvider",
            Shape::ProviderProps => "QuickLoggerProviderProps",
        }
    }

    fn matches_tag(self, tag: &str) -> bool {
        // Tags are usually assembly-qualified: "Ns.Type, Assembly".
        let short = tag.split(',').next().unwrap_or(tag).trim();
        let short = short.rsplit('.').next().unwrap_or(short);
        short == self.capability() || short == self.concrete()
    }
}

#[derive(Serialize, Deserialize, Default)]
struct SettingsDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    environment: Option<String>,
    #[serde(
        rename = "handleUncatchedExceptions",
        default,
        skip_serializing_if = "std::ops::Not::not"
    )]
    handle_uncatched_exceptions: bool,
    #[serde(default)]
    providers: Option<Vec<Value>>,
}

/// Maps settings documents to and from JSON through the two touch points.
#[derive(Debug, Clone, Copy, Default)]
pub struct TypeResolver;

impl TypeResolver {
    /// Parses a full settings document.
    pub fn decode_settings(json: &str) -> ConfigResult<Settings> {
        let document: SettingsDocument = serde_json::from_str(json)?;
        let providers = document
            .providers
            .unwrap_or_default()
            .into_iter()
            .map(Self::decode_provider)
            .collect::<ConfigResult<Vec<_>>>()?;
        Ok(Settings {
            environment: document.environment,
            handle_uncatched_exceptions: document.handle_uncatched_exceptions,
            providers,
        })
    }

    /// Serializes a full settings document, pretty-printed.
    pub fn encode_settings(settings: &Settings) -> ConfigResult<String> {
        let providers = settings
            .providers
            .iter()
            .map(Self::encode_provider)
            .collect::<ConfigResult<Vec<_>>>()?;
        let document = SettingsDocument {
            environment: settings.environment.clone(),
            handle_uncatched_exceptions: settings.handle_uncatched_exceptions,
            providers: Some(providers),
        };
        Ok(serde_json::to_string_pretty(&document)?)
    }

    /// Resolves one `providers[]` item to its descriptor.
    ///
    /// A bare props object (no `providerProps` wrapper) is accepted as well.
    pub fn decode_provider(value: Value) -> ConfigResult<ProviderDescriptor> {
        let mut entry = Self::untag(Shape::Provider, value)?;
        let props = match entry.remove(PROVIDER_PROPS) {
            Some(props) => props,
            None if entry.contains_key("providerName") => {
                debug!("provider entry without providerProps wrapper, reading it as props");
                Value::Object(entry)
            }
            None => return Err(invalid("provider entry is missing providerProps")),
        };
        Self::decode_props(props)
    }

    /// Resolves a `providerProps` object to its descriptor.
    pub fn decode_props(value: Value) -> ConfigResult<ProviderDescriptor> {
        let props = Self::untag(Shape::ProviderProps, value)?;
        Ok(serde_json::from_value(Value::Object(props))?)
    }

    /// Wraps a descriptor as a `providers[]` item. No type tag is written.
    pub fn encode_provider(descriptor: &ProviderDescriptor) -> ConfigResult<Value> {
        let mut entry = Map::new();
        entry.insert(PROVIDER_PROPS.to_string(), serde_json::to_value(descriptor)?);
        Ok(Value::Object(entry))
    }

    fn untag(shape: Shape, value: Value) -> ConfigResult<Map<String, Value>> {
        let Value::Object(mut object) = value else {
            return Err(invalid(match shape {
                Shape::Provider => "provider entry must be an object",
                Shape::ProviderProps => "providerProps must be an object",
            }));
        };
        if let Some(tag) = object.remove(TYPE_TAG) {
            let tag = tag.as_str().unwrap_or_default();
            if !shape.matches_tag(tag) {
                debug!(
                    tag,
                    resolved = shape.concrete(),
                    "ignoring foreign type tag"
                );
            }
        }
        Ok(object)
    }
}

fn invalid(message: &str) -> crate::ConfigError {
    <serde_json::Error as serde::de::Error>::custom(message).into()
}
