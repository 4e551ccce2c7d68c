//! Process-wide panic forwarding.
//!
//! Panics are reported to the engine's exception channel with type name
//! `panic` and then handed to whatever hook was installed before. The hook
//! is installed once per process; [`install`] afterwards only retargets it.
//! It never prevents unwinding or termination.

use crate::engine::NativeEngine;
use std::panic::{self, PanicHookInfo};
use std::sync::{Once, RwLock, Weak};

static TARGET: RwLock<Option<Weak<dyn NativeEngine>>> = RwLock::new(None);
static INSTALL: Once = Once::new();

/// Type name reported for forwarded panics.
pub const PANIC_TYPE_NAME: &str = "panic";

/// Points the hook at `engine`, installing it on first call.
pub fn install(engine: Weak<dyn NativeEngine>) {
    *TARGET.write().unwrap_or_else(|e| e.into_inner()) = Some(engine);
    INSTALL.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            forward(info);
            previous(info);
        }));
    });
}

/// Stops forwarding. The hook itself stays installed and only chains.
pub fn detach() {
    *TARGET.write().unwrap_or_else(|e| e.into_inner()) = None;
}

/// Whether panics are currently forwarded to a live engine.
#[must_use]
pub fn is_attached() -> bool {
    TARGET
        .read()
        .unwrap_or_else(|e| e.into_inner())
        .as_ref()
        .is_some_and(|weak| weak.strong_count() > 0)
}

fn forward(info: &PanicHookInfo<'_>) {
    // Runs mid-panic: nothing here may panic.
    let engine = match TARGET.try_read() {
        Ok(target) => target.as_ref().and_then(Weak::upgrade),
        Err(_) => None,
    };
    let Some(engine) = engine else {
        return;
    };
    let payload = info.payload();
    let message = payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("Box<dyn Any>");
    let location = info
        .location()
        .map(|l| format!("at {}:{}:{}", l.file(), l.line(), l.column()));
    engine.exception(message, PANIC_TYPE_NAME, location.as_deref());
}
