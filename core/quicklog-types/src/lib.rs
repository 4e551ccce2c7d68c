//! Core type definitions for QuickLog.
//!
//! This crate defines the managed-side vocabulary shared by the configuration
//! store and the native bridge:
//! - Event types, level sets and their bracketed token encoding
//! - Schema-less provider property bags
//! - Provider descriptors and the per-type field schema
//! - The `Settings` document persisted by configuration stores
//!
//! Nothing here talks to the native engine; delivery semantics belong to it.

mod descriptor;
mod level;
mod property;
mod schema;
mod settings;

pub use descriptor::ProviderDescriptor;
pub use level::{EventType, LevelSet, Severity};
pub use property::{PropertyBag, PropertyValue};
pub use schema::{FieldKind, ProviderKind};
pub use settings::Settings;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in type operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid provider name: provider names must not be empty")]
    InvalidProviderName,

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
