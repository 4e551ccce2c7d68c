//! [`NativeEngine`] backed by the prebuilt engine library.

use crate::bridge::Trampoline;
use crate::config::EngineConfig;
use crate::engine::NativeEngine;
use crate::error::{NativeError, NativeResult};
use crate::events::EventChannel;
use crate::wide::{from_wide_ptr, to_wide};
use libloading::Library;
use quicklog_types::Severity;
use std::ffi::c_void;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

type Bool = i32;

type WideFn = unsafe extern "system" fn(*const u16);
type WideBoolFn = unsafe extern "system" fn(*const u16) -> Bool;
type ExceptionFn = unsafe extern "system" fn(*const u16, *const u16, *const u16);
type OutStringFn = unsafe extern "system" fn(*mut *const u16) -> i32;
type OutIntFn = unsafe extern "system" fn(*mut i32) -> i32;
type OutBoolFn = unsafe extern "system" fn(*mut Bool) -> i32;
type SecondsFn = unsafe extern "system" fn(i32);
type RegisterFn = unsafe extern "system" fn(*const u16, *const c_void);
type BoolFn = unsafe extern "system" fn() -> Bool;
type VoidFn = unsafe extern "system" fn();

const fn log_export(severity: Severity) -> &'static str {
    match severity {
        Severity::Info => "InfoNative",
        Severity::Success => "SuccessNative",
        Severity::Warning => "WarningNative",
        Severity::Error => "ErrorNative",
        Severity::Critical => "CriticalNative",
        Severity::Debug => "DebugNative",
        Severity::Trace => "TraceNative",
        Severity::Custom => "CustomNative",
    }
}

/// Resolved entry points. Valid only while the owning `Library` is loaded.
struct Exports {
    add_provider_json: WideBoolFn,
    remove_provider: WideBoolFn,
    enable_provider: WideFn,
    disable_provider: WideFn,
    log: [WideFn; 8],
    exception: ExceptionFn,
    lib_version: OutStringFn,
    provider_names: OutStringFn,
    current_providers: OutStringFn,
    last_error: OutStringFn,
    queue_count: OutIntFn,
    is_queue_empty: OutBoolFn,
    wait_for_flush: SecondsFn,
    callbacks: [Option<RegisterFn>; 8],
    add_standard_console: Option<BoolFn>,
    add_standard_file: Option<WideFn>,
    test_callbacks: Option<VoidFn>,
}

/// # Safety
/// `T` must be the function pointer type of the export called `name`.
unsafe fn required<T: Copy>(library: &Library, name: &'static str) -> NativeResult<T> {
    // SAFETY: upheld by the caller.
    let symbol = unsafe { library.get::<T>(name.as_bytes()) }
        .map_err(|source| NativeError::MissingSymbol { name, source })?;
    Ok(*symbol)
}

/// # Safety
/// As for [`required`].
unsafe fn optional<T: Copy>(library: &Library, name: &'static str) -> Option<T> {
    // SAFETY: upheld by the caller.
    match unsafe { library.get::<T>(name.as_bytes()) } {
        Ok(symbol) => Some(*symbol),
        Err(_) => {
            debug!(export = name, "optional engine export not present");
            None
        }
    }
}

impl Exports {
    /// # Safety
    /// `library` must be a QuickLogger engine build exporting the ABI these
    /// signatures describe.
    unsafe fn resolve(library: &Library) -> NativeResult<Self> {
        // SAFETY: every signature below matches the engine's exports.
        unsafe {
            let mut log = [noop_wide as WideFn; 8];
            for severity in Severity::ALL {
                log[severity.index()] = required(library, log_export(severity))?;
            }

            let callbacks = EventChannel::ALL.map(|c| optional::<RegisterFn>(library, c.export_name()));

            Ok(Self {
                add_provider_json: required(library, "AddProviderJSONNative")?,
                remove_provider: required(library, "RemoveProviderNative")?,
                enable_provider: required(library, "EnableProviderNative")?,
                disable_provider: required(library, "DisableProviderNative")?,
                log,
                exception: required(library, "ExceptionNative")?,
                lib_version: required(library, "GetLibVersionNative")?,
                provider_names: required(library, "GetProviderNamesNative")?,
                current_providers: required(library, "GetCurrentProvidersNative")?,
                last_error: required(library, "GetLastError")?,
                queue_count: required(library, "GetQueueCountNative")?,
                is_queue_empty: required(library, "IsQueueEmptyNative")?,
                wait_for_flush: required(library, "WaitSecondsForFlushBeforeExitNative")?,
                callbacks,
                add_standard_console: optional(library, "AddStandardConsoleProviderNative"),
                add_standard_file: optional(library, "AddStandardFileProviderNative"),
                test_callbacks: optional(library, "TestCallbacksNative"),
            })
        }
    }
}

unsafe extern "system" fn noop_wide(_: *const u16) {}

/// The loaded engine library and its resolved exports.
pub struct NativeLibrary {
    path: PathBuf,
    exports: Exports,
    // Declared last so the exports never outlive the mapping.
    _library: Library,
}

impl NativeLibrary {
    /// Loads the first candidate library under the configured root.
    ///
    /// Prefer [`engine::init`](crate::engine::init), which shares one
    /// instance per process.
    pub fn load(config: &EngineConfig) -> NativeResult<Self> {
        let searched = config.library_candidates();
        let Some(path) = searched.iter().find(|p| p.is_file()).cloned() else {
            return Err(NativeError::LibraryNotFound { searched });
        };
        Self::open(path)
    }

    /// Loads the engine from an explicit file.
    pub fn open(path: impl Into<PathBuf>) -> NativeResult<Self> {
        let path = path.into();
        // SAFETY: loading runs the library's initializers; the file is the
        // engine build the caller pointed us at.
        let library = unsafe { Library::new(&path) }.map_err(|source| NativeError::LibraryLoad {
            path: path.clone(),
            source,
        })?;
        // SAFETY: as above, the library is a QuickLogger engine build.
        let exports = unsafe { Exports::resolve(&library)? };
        info!(path = %path.display(), "loaded native engine");
        Ok(Self {
            path,
            exports,
            _library: library,
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_string(f: OutStringFn) -> String {
        let mut out: *const u16 = std::ptr::null();
        // SAFETY: the engine writes an engine-owned string pointer or
        // leaves it null; it is copied before returning.
        unsafe {
            f(&mut out);
            from_wide_ptr(out)
        }
    }

    fn call_wide(f: WideFn, arg: &str) {
        let arg = to_wide(arg);
        // SAFETY: `arg` is NUL-terminated and outlives the call.
        unsafe { f(arg.as_ptr()) }
    }

    fn call_wide_bool(f: WideBoolFn, arg: &str) -> bool {
        let arg = to_wide(arg);
        // SAFETY: `arg` is NUL-terminated and outlives the call.
        unsafe { f(arg.as_ptr()) != 0 }
    }
}

impl NativeEngine for NativeLibrary {
    fn add_provider_json(&self, json: &str) -> bool {
        Self::call_wide_bool(self.exports.add_provider_json, json)
    }

    fn remove_provider(&self, name: &str) -> bool {
        Self::call_wide_bool(self.exports.remove_provider, name)
    }

    fn enable_provider(&self, name: &str) {
        Self::call_wide(self.exports.enable_provider, name);
    }

    fn disable_provider(&self, name: &str) {
        Self::call_wide(self.exports.disable_provider, name);
    }

    fn log(&self, severity: Severity, message: &str) {
        Self::call_wide(self.exports.log[severity.index()], message);
    }

    fn exception(&self, message: &str, type_name: &str, stack_trace: Option<&str>) {
        let message = to_wide(message);
        let type_name = to_wide(type_name);
        let stack_trace = to_wide(stack_trace.unwrap_or_default());
        // SAFETY: all three buffers are NUL-terminated and outlive the call.
        unsafe {
            (self.exports.exception)(message.as_ptr(), type_name.as_ptr(), stack_trace.as_ptr());
        }
    }

    fn version(&self) -> String {
        Self::read_string(self.exports.lib_version)
    }

    fn provider_types(&self) -> String {
        Self::read_string(self.exports.provider_names)
    }

    fn current_providers(&self) -> String {
        Self::read_string(self.exports.current_providers)
    }

    fn last_error(&self) -> String {
        Self::read_string(self.exports.last_error)
    }

    fn queue_count(&self) -> i32 {
        let mut count = 0;
        // SAFETY: `count` is a valid out pointer for the call.
        unsafe { (self.exports.queue_count)(&mut count) };
        count
    }

    fn is_queue_empty(&self) -> bool {
        let mut empty: Bool = 0;
        // SAFETY: `empty` is a valid out pointer for the call.
        unsafe { (self.exports.is_queue_empty)(&mut empty) };
        empty != 0
    }

    fn wait_for_flush(&self, seconds: i32) {
        // SAFETY: plain integer argument.
        unsafe { (self.exports.wait_for_flush)(seconds) }
    }

    fn register_callback(
        &self,
        provider: &str,
        channel: EventChannel,
        trampoline: Trampoline,
    ) -> NativeResult<()> {
        let register = self.exports.callbacks[channel.index()]
            .ok_or(NativeError::Unsupported(channel.export_name()))?;
        let provider = to_wide(provider);
        // SAFETY: `provider` is NUL-terminated; the trampoline pointer stays
        // valid for the life of the process.
        unsafe { register(provider.as_ptr(), trampoline.as_ptr()) };
        Ok(())
    }

    fn add_standard_console(&self) -> NativeResult<bool> {
        let f = self
            .exports
            .add_standard_console
            .ok_or(NativeError::Unsupported("AddStandardConsoleProviderNative"))?;
        // SAFETY: no arguments.
        Ok(unsafe { f() } != 0)
    }

    fn add_standard_file(&self, file_name: &str) -> NativeResult<()> {
        let f = self
            .exports
            .add_standard_file
            .ok_or(NativeError::Unsupported("AddStandardFileProviderNative"))?;
        Self::call_wide(f, file_name);
        Ok(())
    }

    fn test_callbacks(&self) -> NativeResult<()> {
        let f = self
            .exports
            .test_callbacks
            .ok_or(NativeError::Unsupported("TestCallbacksNative"))?;
        // SAFETY: no arguments.
        unsafe { f() };
        Ok(())
    }
}

impl std::fmt::Debug for NativeLibrary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NativeLibrary")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}
