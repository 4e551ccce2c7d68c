//! In-process stand-in for the native engine.

#![allow(dead_code)]

use quicklog_native::{
    EventChannel, NativeEngine, NativeError, NativeResult, Severity, Trampoline,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

pub const DEFAULT_TYPES: &[&str] = &[
    "ConsoleProvider",
    "FileProvider",
    "RedisProvider",
    "EmailProvider",
];

#[derive(Debug, Default)]
pub struct FakeState {
    pub types: Vec<String>,
    /// Registered providers and whether each is enabled.
    pub providers: Vec<(String, bool)>,
    pub added_json: Vec<String>,
    pub logs: Vec<(Severity, String)>,
    pub exceptions: Vec<(String, String, Option<String>)>,
    pub callbacks: HashMap<(String, EventChannel), Trampoline>,
    pub queue: i32,
    pub last_error: String,
    pub reject_adds: bool,
    pub unsupported_channel: Option<EventChannel>,
    pub flush_waits: Vec<i32>,
    /// Report current providers as a JSON array instead of a comma list.
    pub providers_as_json: bool,
}

type WiringHook = Box<dyn FnOnce(&str) + Send>;

/// Engine fake: keeps providers in a list, queues every log call and
/// drains the queue on flush.
#[derive(Default)]
pub struct FakeEngine {
    state: Mutex<FakeState>,
    wiring_hook: Mutex<Option<WiringHook>>,
}

impl FakeEngine {
    pub fn new() -> Arc<Self> {
        Self::with_types(DEFAULT_TYPES)
    }

    pub fn with_types(types: &[&str]) -> Arc<Self> {
        let engine = Self::default();
        engine.state().types = types.iter().map(|t| t.to_string()).collect();
        Arc::new(engine)
    }

    pub fn state(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap()
    }

    /// Runs `hook` once, right after the next callback is registered, with
    /// the provider name. No engine lock is held while it runs.
    pub fn on_next_callback(&self, hook: impl FnOnce(&str) + Send + 'static) {
        *self.wiring_hook.lock().unwrap() = Some(Box::new(hook));
    }

    pub fn callback(&self, provider: &str, channel: EventChannel) -> Option<Trampoline> {
        self.state()
            .callbacks
            .get(&(provider.to_string(), channel))
            .copied()
    }

    /// Raises `channel` for `provider` as the engine would. Returns false if
    /// no callback is registered.
    pub fn fire(&self, provider: &str, channel: EventChannel, message: &str) -> bool {
        // Lock released before the trampoline runs.
        let Some(trampoline) = self.callback(provider, channel) else {
            return false;
        };
        trampoline.fire(message);
        true
    }

    pub fn enabled(&self, provider: &str) -> Option<bool> {
        self.state()
            .providers
            .iter()
            .find(|(name, _)| name == provider)
            .map(|(_, enabled)| *enabled)
    }

    fn set_enabled(&self, name: &str, enabled: bool) {
        if let Some(entry) = self.state().providers.iter_mut().find(|(n, _)| n == name) {
            entry.1 = enabled;
        }
    }
}

impl NativeEngine for FakeEngine {
    fn add_provider_json(&self, json: &str) -> bool {
        let mut state = self.state();
        state.added_json.push(json.to_string());
        if state.reject_adds {
            state.last_error = "provider rejected by engine".into();
            return false;
        }
        let parsed: serde_json::Value = match serde_json::from_str(json) {
            Ok(v) => v,
            Err(e) => {
                state.last_error = format!("bad provider json: {e}");
                return false;
            }
        };
        let Some(name) = parsed["providerName"].as_str() else {
            state.last_error = "providerName missing".into();
            return false;
        };
        let name = name.to_string();
        state.providers.retain(|(n, _)| *n != name);
        state.providers.push((name, true));
        true
    }

    fn remove_provider(&self, name: &str) -> bool {
        let mut state = self.state();
        let before = state.providers.len();
        state.providers.retain(|(n, _)| n != name);
        if state.providers.len() == before {
            state.last_error = format!("provider {name} not found");
            return false;
        }
        state.callbacks.retain(|(n, _), _| n != name);
        true
    }

    fn enable_provider(&self, name: &str) {
        self.set_enabled(name, true);
    }

    fn disable_provider(&self, name: &str) {
        self.set_enabled(name, false);
    }

    fn log(&self, severity: Severity, message: &str) {
        let mut state = self.state();
        state.logs.push((severity, message.to_string()));
        state.queue += 1;
    }

    fn exception(&self, message: &str, type_name: &str, stack_trace: Option<&str>) {
        let mut state = self.state();
        state.exceptions.push((
            message.to_string(),
            type_name.to_string(),
            stack_trace.map(str::to_string),
        ));
        state.queue += 1;
    }

    fn version(&self) -> String {
        "QuickLogger fake 1.0".into()
    }

    fn provider_types(&self) -> String {
        serde_json::to_string(&self.state().types).unwrap()
    }

    fn current_providers(&self) -> String {
        let state = self.state();
        let names: Vec<&str> = state.providers.iter().map(|(n, _)| n.as_str()).collect();
        if state.providers_as_json {
            serde_json::to_string(&names).unwrap()
        } else {
            names.join(",")
        }
    }

    fn last_error(&self) -> String {
        self.state().last_error.clone()
    }

    fn queue_count(&self) -> i32 {
        self.state().queue
    }

    fn is_queue_empty(&self) -> bool {
        self.state().queue == 0
    }

    fn wait_for_flush(&self, seconds: i32) {
        let mut state = self.state();
        state.flush_waits.push(seconds);
        state.queue = 0;
    }

    fn register_callback(
        &self,
        provider: &str,
        channel: EventChannel,
        trampoline: Trampoline,
    ) -> NativeResult<()> {
        {
            let mut state = self.state();
            if state.unsupported_channel == Some(channel) {
                return Err(NativeError::Unsupported(channel.export_name()));
            }
            state
                .callbacks
                .insert((provider.to_string(), channel), trampoline);
        }
        let hook = self.wiring_hook.lock().unwrap().take();
        if let Some(hook) = hook {
            hook(provider);
        }
        Ok(())
    }

    fn test_callbacks(&self) -> NativeResult<()> {
        let trampolines: Vec<Trampoline> = self.state().callbacks.values().copied().collect();
        for trampoline in trampolines {
            trampoline.fire("test callback");
        }
        Ok(())
    }
}

/// Collects every event delivered to a provider.
pub fn recorder(
    provider: &quicklog_native::Provider,
) -> Arc<Mutex<Vec<quicklog_native::ProviderEvent>>> {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    provider.events().subscribe_all(move |event| {
        sink.lock().unwrap().push(event.clone());
    });
    seen
}
