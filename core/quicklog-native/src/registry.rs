//! Provider registration and log dispatch.

use crate::bridge::SlotLease;
use crate::config::EngineConfig;
use crate::engine::{self, NativeEngine};
use crate::error::{NativeError, NativeResult};
use crate::events::{EventChannel, Provider, ProviderEvents};
use quicklog_types::{ProviderDescriptor, Settings, Severity};
use std::collections::{HashMap, HashSet};
use std::error::Error as StdError;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, info, warn};

/// Anything that names a registered provider.
pub trait AsProviderName {
    fn provider_name(&self) -> &str;
}

impl AsProviderName for str {
    fn provider_name(&self) -> &str {
        self
    }
}

impl AsProviderName for String {
    fn provider_name(&self) -> &str {
        self
    }
}

impl AsProviderName for ProviderDescriptor {
    fn provider_name(&self) -> &str {
        self.name()
    }
}

impl AsProviderName for Provider {
    fn provider_name(&self) -> &str {
        self.name()
    }
}

/// A decomposed error for the engine's exception channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExceptionInfo {
    pub message: String,
    pub type_name: String,
    pub stack_trace: Option<String>,
}

impl ExceptionInfo {
    pub fn new(
        message: impl Into<String>,
        type_name: impl Into<String>,
        stack_trace: Option<String>,
    ) -> Self {
        Self {
            message: message.into(),
            type_name: type_name.into(),
            stack_trace,
        }
    }

    /// Message from `Display`, type name from `E`, and one trace line per
    /// error in the `source()` chain.
    pub fn from_error<E: StdError + ?Sized>(error: &E) -> Self {
        let mut trace = Vec::new();
        let mut source = error.source();
        while let Some(cause) = source {
            trace.push(format!("caused by: {cause}"));
            source = cause.source();
        }
        Self {
            message: error.to_string(),
            type_name: std::any::type_name::<E>().to_string(),
            stack_trace: (!trace.is_empty()).then(|| trace.join("\n")),
        }
    }
}

/// How [`ProviderRegistry::register_all`] names providers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NameScope {
    /// Register under the configured name.
    #[default]
    Configured,
    /// Embed process id and a fresh UUID in the name.
    Process,
}

struct Registration {
    events: Arc<ProviderEvents>,
    lease: Option<SlotLease>,
    wired: bool,
}

#[derive(Default)]
struct Table {
    registrations: HashMap<String, Registration>,
    /// Adds the engine has accepted that are still wiring callbacks, by
    /// ticket. A removal clears them so the add does not commit.
    in_flight: HashMap<String, HashSet<u64>>,
}

impl Table {
    fn take_ticket(&mut self, name: &str, ticket: u64) -> bool {
        let Some(tickets) = self.in_flight.get_mut(name) else {
            return false;
        };
        let held = tickets.remove(&ticket);
        if tickets.is_empty() {
            self.in_flight.remove(name);
        }
        held
    }
}

/// Splits the engine's provider list into names. Accepts a JSON string
/// array or a comma, semicolon or newline separated list.
fn parse_provider_list(raw: &str) -> Vec<String> {
    if let Ok(names) = serde_json::from_str::<Vec<String>>(raw) {
        return names;
    }
    raw.split([',', ';', '\n'])
        .map(|name| name.trim().trim_matches('"').trim())
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

/// Public entry point: registers providers with the engine and forwards
/// log calls to it.
///
/// The registry owns the callback retention for every provider it added.
/// Dropping the registry releases it; the engine keeps the providers.
/// Adds, removals and lookups may run on any number of threads. Native add
/// and remove calls are serialized, so event handlers must not add or
/// remove providers synchronously from inside an engine remove call.
pub struct ProviderRegistry {
    engine: Arc<dyn NativeEngine>,
    table: RwLock<Table>,
    /// Held across each native add or remove and its bookkeeping.
    mutations: Mutex<()>,
    next_ticket: AtomicU64,
}

impl ProviderRegistry {
    pub fn new(engine: Arc<dyn NativeEngine>) -> Self {
        Self {
            engine,
            table: RwLock::new(Table::default()),
            mutations: Mutex::new(()),
            next_ticket: AtomicU64::new(0),
        }
    }

    /// A registry over the process-wide engine, loading it if needed.
    pub fn load(config: &EngineConfig) -> NativeResult<Self> {
        let engine: Arc<dyn NativeEngine> = engine::init(config)?;
        Ok(Self::new(engine))
    }

    #[must_use]
    pub fn engine(&self) -> &Arc<dyn NativeEngine> {
        &self.engine
    }

    fn read(&self) -> RwLockReadGuard<'_, Table> {
        self.table.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Table> {
        self.table.write().unwrap_or_else(|e| e.into_inner())
    }

    fn lock_mutations(&self) -> MutexGuard<'_, ()> {
        self.mutations.lock().unwrap_or_else(|e| e.into_inner())
    }

    // ── Providers ────────────────────────────────────────────────

    /// Registers `provider` and wires its eight callback channels.
    ///
    /// Fails if the engine does not list the provider type
    /// (case-insensitively) or rejects the provider. Once the engine has
    /// accepted it, wiring problems are logged rather than returned; see
    /// [`is_wired`](Self::is_wired).
    ///
    /// A removal of the same name that succeeds while the callbacks are
    /// still being wired wins: nothing is retained for the provider.
    pub fn add_provider(&self, provider: &Provider) -> NativeResult<()> {
        let descriptor = provider.descriptor();
        let supported = self.supported_types()?;
        if !supported
            .iter()
            .any(|t| t.eq_ignore_ascii_case(descriptor.provider_type()))
        {
            return Err(NativeError::Registration {
                reason: "invalid provider type",
                detail: self.engine.last_error(),
            });
        }

        let name = descriptor.name();
        let json = descriptor.to_json()?;
        let ticket = self.next_ticket.fetch_add(1, Ordering::Relaxed);
        {
            let _mutating = self.lock_mutations();
            if !self.engine.add_provider_json(&json) {
                return Err(NativeError::Registration {
                    reason: "native engine rejected provider",
                    detail: self.engine.last_error(),
                });
            }
            self.write()
                .in_flight
                .entry(name.to_string())
                .or_default()
                .insert(ticket);
        }
        info!(
            provider = name,
            provider_type = descriptor.provider_type(),
            "provider registered"
        );

        let registration = self.wire(name, Arc::clone(provider.events()));
        drop(self.commit(name, ticket, registration));
        Ok(())
    }

    /// Stores `registration` unless the provider was removed while it was
    /// being wired. Returns whatever is released, to be dropped unlocked.
    fn commit(&self, name: &str, ticket: u64, registration: Registration) -> Option<Registration> {
        let mut table = self.write();
        if !table.take_ticket(name, ticket) {
            debug!(provider = name, "provider removed while wiring, releasing callbacks");
            return Some(registration);
        }
        table.registrations.insert(name.to_string(), registration)
    }

    fn wire(&self, name: &str, events: Arc<ProviderEvents>) -> Registration {
        let Some(lease) = SlotLease::acquire(Arc::clone(&events)) else {
            warn!(provider = name, "no free callback slot, provider has no callbacks");
            return Registration {
                events,
                lease: None,
                wired: false,
            };
        };
        let mut wired = true;
        for channel in EventChannel::ALL {
            if let Err(error) = self
                .engine
                .register_callback(name, channel, lease.trampoline(channel))
            {
                warn!(provider = name, ?channel, %error, "callback wiring failed");
                wired = false;
            }
        }
        Registration {
            events,
            lease: Some(lease),
            wired,
        }
    }

    /// Unregisters a provider. The engine's answer alone decides success;
    /// on success the provider's callbacks are released.
    pub fn remove_provider<P: AsProviderName + ?Sized>(&self, provider: &P) -> NativeResult<()> {
        let name = provider.provider_name();
        let released = {
            let _mutating = self.lock_mutations();
            if !self.engine.remove_provider(name) {
                return Err(NativeError::Removal {
                    name: name.to_string(),
                    detail: self.engine.last_error(),
                });
            }
            let mut table = self.write();
            table.in_flight.remove(name);
            table.registrations.remove(name)
        };
        debug!(
            provider = name,
            slot = released.as_ref().and_then(|r| r.lease.as_ref()).map(SlotLease::slot),
            "provider callbacks released"
        );
        info!(provider = name, "provider removed");
        Ok(())
    }

    pub fn enable_provider<P: AsProviderName + ?Sized>(&self, provider: &P) {
        self.engine.enable_provider(provider.provider_name());
    }

    pub fn disable_provider<P: AsProviderName + ?Sized>(&self, provider: &P) {
        self.engine.disable_provider(provider.provider_name());
    }

    /// Whether all eight channels of `name` were handed to the engine.
    #[must_use]
    pub fn is_wired(&self, name: &str) -> bool {
        self.read().registrations.get(name).is_some_and(|r| r.wired)
    }

    /// The observers retained for `name`, if this registry added it.
    #[must_use]
    pub fn events(&self, name: &str) -> Option<Arc<ProviderEvents>> {
        self.read()
            .registrations
            .get(name)
            .map(|r| Arc::clone(&r.events))
    }

    /// Names this registry added and has not removed, sorted.
    #[must_use]
    pub fn registered_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.read().registrations.keys().cloned().collect();
        names.sort_unstable();
        names
    }

    /// Adds every provider of a settings document.
    ///
    /// Each provider is attempted regardless of earlier failures. Successful
    /// entries return the provider as registered, with its final name.
    pub fn register_all(
        &self,
        settings: &Settings,
        scope: NameScope,
    ) -> Vec<NativeResult<Provider>> {
        settings
            .providers
            .iter()
            .map(|descriptor| {
                let descriptor = match scope {
                    NameScope::Configured => descriptor.clone(),
                    NameScope::Process => descriptor.clone().with_process_scope(),
                };
                let provider = Provider::new(descriptor);
                self.add_provider(&provider).map(|()| provider)
            })
            .collect()
    }

    /// Registers the built-in console descriptor.
    pub fn add_standard_console_provider(&self) -> NativeResult<Provider> {
        let provider = Provider::new(ProviderDescriptor::standard_console());
        self.add_provider(&provider)?;
        Ok(provider)
    }

    /// Registers the built-in file descriptor writing to `file_path`.
    pub fn add_standard_file_provider(&self, file_path: &str) -> NativeResult<Provider> {
        let provider = Provider::new(ProviderDescriptor::standard_file(file_path));
        self.add_provider(&provider)?;
        Ok(provider)
    }

    /// The engine's own console shortcut. No callbacks are wired.
    pub fn add_native_standard_console(&self) -> NativeResult<bool> {
        self.engine.add_standard_console()
    }

    /// The engine's own file shortcut. No callbacks are wired.
    pub fn add_native_standard_file(&self, file_name: &str) -> NativeResult<()> {
        self.engine.add_standard_file(file_name)
    }

    pub fn test_callbacks(&self) -> NativeResult<()> {
        self.engine.test_callbacks()
    }

    // ── Logging ──────────────────────────────────────────────────

    /// Forwards `message` unmodified to the entry point for `severity`.
    pub fn log(&self, severity: Severity, message: &str) {
        self.engine.log(severity, message);
    }

    pub fn info(&self, message: &str) {
        self.log(Severity::Info, message);
    }

    pub fn success(&self, message: &str) {
        self.log(Severity::Success, message);
    }

    pub fn warning(&self, message: &str) {
        self.log(Severity::Warning, message);
    }

    pub fn error(&self, message: &str) {
        self.log(Severity::Error, message);
    }

    pub fn critical(&self, message: &str) {
        self.log(Severity::Critical, message);
    }

    pub fn debug(&self, message: &str) {
        self.log(Severity::Debug, message);
    }

    pub fn trace(&self, message: &str) {
        self.log(Severity::Trace, message);
    }

    pub fn custom(&self, message: &str) {
        self.log(Severity::Custom, message);
    }

    pub fn exception(&self, exception: &ExceptionInfo) {
        self.engine.exception(
            &exception.message,
            &exception.type_name,
            exception.stack_trace.as_deref(),
        );
    }

    /// KPI metrics have no engine entry point.
    pub fn kpi(&self, _name: &str, _value: &str) -> NativeResult<()> {
        Err(NativeError::NotImplemented("kpi"))
    }

    // ── Queries ──────────────────────────────────────────────────

    /// Provider types the engine accepts.
    pub fn supported_types(&self) -> NativeResult<Vec<String>> {
        let raw = self.engine.provider_types();
        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&raw)?)
    }

    /// The engine's provider list, verbatim.
    #[must_use]
    pub fn active_provider_names(&self) -> String {
        self.engine.current_providers()
    }

    /// The engine's provider list split into names.
    #[must_use]
    pub fn active_providers(&self) -> Vec<String> {
        parse_provider_list(&self.engine.current_providers())
    }

    /// Whether the engine lists a provider named exactly `name`.
    #[must_use]
    pub fn is_active(&self, name: &str) -> bool {
        self.active_providers().iter().any(|active| active == name)
    }

    #[must_use]
    pub fn version(&self) -> String {
        self.engine.version()
    }

    #[must_use]
    pub fn last_error(&self) -> String {
        self.engine.last_error()
    }

    #[must_use]
    pub fn queue_count(&self) -> i32 {
        self.engine.queue_count()
    }

    #[must_use]
    pub fn is_queue_empty(&self) -> bool {
        self.engine.is_queue_empty()
    }

    /// Blocks up to `seconds` for the queue to drain, then reports whether
    /// it did.
    pub fn wait_for_flush(&self, seconds: u32) -> bool {
        self.engine
            .wait_for_flush(i32::try_from(seconds).unwrap_or(i32::MAX));
        self.engine.is_queue_empty()
    }
}

impl fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("providers", &self.registered_names())
            .finish_non_exhaustive()
    }
}
