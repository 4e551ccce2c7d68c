//! Configuration persistence for QuickLog.
//!
//! A [`ConfigurationStore`] owns one in-memory [`Settings`] document between
//! loads and persists it as JSON, either to a file ([`FileConfigStore`]) or
//! to an in-memory buffer ([`StringConfigStore`]) that can be embedded in
//! another system's configuration source.
//!
//! The document's provider entries are resolved through [`TypeResolver`],
//! which always materializes the single concrete provider shape.

pub mod defaults;
mod error;
mod file;
mod resolver;
mod store;
mod string;

pub use error::{ConfigError, ConfigResult};
pub use file::FileConfigStore;
pub use quicklog_types::Settings;
pub use resolver::{Shape, TypeResolver};
pub use store::{ConfigurationStore, OnMissing};
pub use string::StringConfigStore;
