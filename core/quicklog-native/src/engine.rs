//! The engine's primitive operations and the process-wide instance.
//!
//! One engine library is loaded per process and shared by every registry.
//! [`init`] loads it on first use; [`shutdown`] drops the process reference
//! so a later `init` loads afresh. Registries created earlier keep their
//! own reference until they are dropped.

use crate::bridge::Trampoline;
use crate::config::EngineConfig;
use crate::error::{NativeError, NativeResult};
use crate::events::EventChannel;
use crate::hook;
use crate::library::NativeLibrary;
use quicklog_types::Severity;
use std::sync::{Arc, Mutex, MutexGuard, Weak};
use tracing::info;

/// Primitive calls into the native engine.
///
/// Every method is a direct, synchronous forward. Delivery happens inside
/// the engine and is only observable through the queue queries.
pub trait NativeEngine: Send + Sync {
    /// Registers a provider from its props JSON. `false` means rejected.
    fn add_provider_json(&self, json: &str) -> bool;

    fn remove_provider(&self, name: &str) -> bool;

    fn enable_provider(&self, name: &str);

    fn disable_provider(&self, name: &str);

    fn log(&self, severity: Severity, message: &str);

    fn exception(&self, message: &str, type_name: &str, stack_trace: Option<&str>);

    fn version(&self) -> String;

    /// Supported provider types as a raw JSON string array.
    fn provider_types(&self) -> String;

    /// Names of the currently registered providers, as the engine reports them.
    fn current_providers(&self) -> String;

    fn last_error(&self) -> String;

    fn queue_count(&self) -> i32;

    fn is_queue_empty(&self) -> bool;

    /// Blocks up to `seconds` while the engine drains its queue.
    fn wait_for_flush(&self, seconds: i32);

    /// Hands `trampoline` to the registration export for `channel`.
    fn register_callback(
        &self,
        provider: &str,
        channel: EventChannel,
        trampoline: Trampoline,
    ) -> NativeResult<()>;

    fn add_standard_console(&self) -> NativeResult<bool> {
        Err(NativeError::Unsupported("AddStandardConsoleProviderNative"))
    }

    fn add_standard_file(&self, _file_name: &str) -> NativeResult<()> {
        Err(NativeError::Unsupported("AddStandardFileProviderNative"))
    }

    /// Asks the engine to raise every channel of every provider once.
    fn test_callbacks(&self) -> NativeResult<()> {
        Err(NativeError::Unsupported("TestCallbacksNative"))
    }
}

static ENGINE: Mutex<Option<Arc<NativeLibrary>>> = Mutex::new(None);

fn lock_engine() -> MutexGuard<'static, Option<Arc<NativeLibrary>>> {
    ENGINE.lock().unwrap_or_else(|e| e.into_inner())
}

/// Loads the engine on first call and returns the shared instance.
///
/// Later calls return the same instance and ignore `config`. When
/// `handle_exceptions` is set on the loading call, the panic hook is
/// pointed at the new instance.
pub fn init(config: &EngineConfig) -> NativeResult<Arc<NativeLibrary>> {
    let mut current = lock_engine();
    if let Some(engine) = current.as_ref() {
        return Ok(Arc::clone(engine));
    }

    let engine = Arc::new(NativeLibrary::load(config)?);
    if config.handle_exceptions {
        let dynamic: Arc<dyn NativeEngine> = engine.clone();
        let target: Weak<dyn NativeEngine> = Arc::downgrade(&dynamic);
        hook::install(target);
    }
    *current = Some(Arc::clone(&engine));
    Ok(engine)
}

/// The loaded instance, if any.
#[must_use]
pub fn current() -> Option<Arc<NativeLibrary>> {
    lock_engine().clone()
}

/// Releases the process reference. Returns whether one was held.
pub fn shutdown() -> bool {
    let released = lock_engine().take();
    if let Some(engine) = &released {
        info!(path = %engine.path().display(), "releasing native engine");
    }
    released.is_some()
}
