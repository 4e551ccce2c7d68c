//! Native side of QuickLog.
//!
//! The logging work itself happens inside a prebuilt engine library. This
//! crate finds and loads that library, marshals calls across its UTF-16
//! ABI, and keeps the per-provider callback trampolines alive for as long
//! as the engine may call them.
//!
//! - [`NativeEngine`]: the primitive operations the engine exports
//! - [`NativeLibrary`]: the `libloading`-backed implementation
//! - [`engine::init`] / [`engine::shutdown`]: the process-wide instance
//! - [`ProviderRegistry`]: the public entry point for providers and log calls
//! - [`ProviderEvents`]: per-provider observers fed by the callback bridge

mod bridge;
pub mod config;
pub mod engine;
mod error;
mod events;
pub mod hook;
mod library;
mod registry;
pub mod wide;

pub use bridge::{leased_slots, Trampoline, CALLBACK_SLOTS};
pub use config::EngineConfig;
pub use engine::NativeEngine;
pub use error::{NativeError, NativeResult};
pub use events::{EventChannel, Provider, ProviderEvent, ProviderEvents};
pub use library::NativeLibrary;
pub use registry::{AsProviderName, ExceptionInfo, NameScope, ProviderRegistry};

pub use quicklog_types::{LevelSet, ProviderDescriptor, Severity};
