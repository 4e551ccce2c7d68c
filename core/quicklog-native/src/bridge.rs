//! Callback bridge between engine notifications and provider observers.
//!
//! The engine stores a bare function pointer per provider and channel, with
//! no user data. Each pointer handed out is therefore a distinct
//! monomorphized trampoline bound at compile time to one slot of a
//! process-wide arena. A [`SlotLease`] keeps the provider's observers in
//! that slot for exactly as long as its registration lives.
//!
//! An event arriving for a released slot is dropped. An event arriving
//! after the slot was leased again reaches the new tenant; that race is
//! known and unsolved.

use crate::events::{EventChannel, ProviderEvent, ProviderEvents};
use crate::wide::{from_wide_ptr, to_wide};
use std::ffi::c_void;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::warn;

/// Maximum number of providers with live callbacks at once.
pub const CALLBACK_SLOTS: usize = 64;

const CHANNELS: usize = EventChannel::ALL.len();

type Tenant = Option<Arc<ProviderEvents>>;

static ARENA: RwLock<[Tenant; CALLBACK_SLOTS]> = RwLock::new([const { None }; CALLBACK_SLOTS]);

fn read_arena() -> RwLockReadGuard<'static, [Tenant; CALLBACK_SLOTS]> {
    ARENA.read().unwrap_or_else(|e| e.into_inner())
}

fn write_arena() -> RwLockWriteGuard<'static, [Tenant; CALLBACK_SLOTS]> {
    ARENA.write().unwrap_or_else(|e| e.into_inner())
}

/// Number of slots currently leased.
#[must_use]
pub fn leased_slots() -> usize {
    read_arena().iter().filter(|t| t.is_some()).count()
}

type MessageFn = unsafe extern "system" fn(*const u16);
type SignalFn = unsafe extern "system" fn();

#[derive(Clone, Copy)]
enum Entry {
    Message(MessageFn),
    Signal(SignalFn),
}

/// A bridge-owned callback pointer for one slot and channel.
///
/// Only the bridge constructs these, so every pointer is one of the
/// arena trampolines.
#[derive(Clone, Copy)]
pub struct Trampoline {
    slot: usize,
    channel: EventChannel,
    entry: Entry,
}

impl Trampoline {
    /// The pointer handed to the engine's registration export.
    #[must_use]
    pub fn as_ptr(self) -> *const c_void {
        match self.entry {
            Entry::Message(f) => f as *const c_void,
            Entry::Signal(f) => f as *const c_void,
        }
    }

    #[must_use]
    pub fn slot(self) -> usize {
        self.slot
    }

    #[must_use]
    pub fn channel(self) -> EventChannel {
        self.channel
    }

    /// Invokes the trampoline the way the engine does. `message` is ignored
    /// on channels without a payload.
    pub fn fire(self, message: &str) {
        match self.entry {
            Entry::Message(f) => {
                let wide = to_wide(message);
                // SAFETY: `f` is a bridge trampoline and `wide` is NUL-terminated.
                unsafe { f(wide.as_ptr()) }
            }
            // SAFETY: `f` is a bridge trampoline taking no arguments.
            Entry::Signal(f) => unsafe { f() },
        }
    }
}

impl std::fmt::Debug for Trampoline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Trampoline")
            .field("slot", &self.slot)
            .field("channel", &self.channel)
            .finish()
    }
}

fn dispatch(slot: usize, channel: usize, message: *const u16) {
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        let channel = EventChannel::ALL[channel];
        // SAFETY: the engine passes null or a NUL-terminated UTF-16 string.
        let message = unsafe { from_wide_ptr(message) };
        let Some(events) = read_arena()[slot].clone() else {
            warn!(slot, ?channel, "dropping engine event for released callback slot");
            return;
        };
        events.emit(&ProviderEvent::new(channel, message));
    }));
    if outcome.is_err() {
        warn!(slot, "provider event handler panicked");
    }
}

unsafe extern "system" fn message_trampoline<const SLOT: usize, const CHANNEL: usize>(
    message: *const u16,
) {
    dispatch(SLOT, CHANNEL, message);
}

unsafe extern "system" fn signal_trampoline<const SLOT: usize, const CHANNEL: usize>() {
    dispatch(SLOT, CHANNEL, std::ptr::null());
}

const fn slot_entries<const SLOT: usize>() -> [Entry; CHANNELS] {
    [
        Entry::Message(message_trampoline::<SLOT, 0>),
        Entry::Message(message_trampoline::<SLOT, 1>),
        Entry::Message(message_trampoline::<SLOT, 2>),
        Entry::Message(message_trampoline::<SLOT, 3>),
        Entry::Message(message_trampoline::<SLOT, 4>),
        Entry::Message(message_trampoline::<SLOT, 5>),
        Entry::Signal(signal_trampoline::<SLOT, 6>),
        Entry::Signal(signal_trampoline::<SLOT, 7>),
    ]
}

macro_rules! slot_table {
    ($($slot:literal),* $(,)?) => {
        [$(slot_entries::<$slot>()),*]
    };
}

static TRAMPOLINES: [[Entry; CHANNELS]; CALLBACK_SLOTS] = slot_table!(
    0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17, 18, 19, 20, 21, 22, 23, 24, 25,
    26, 27, 28, 29, 30, 31, 32, 33, 34, 35, 36, 37, 38, 39, 40, 41, 42, 43, 44, 45, 46, 47, 48, 49,
    50, 51, 52, 53, 54, 55, 56, 57, 58, 59, 60, 61, 62, 63,
);

/// Exclusive hold on one arena slot. Dropping it releases the slot.
#[derive(Debug)]
pub(crate) struct SlotLease {
    slot: usize,
}

impl SlotLease {
    /// Leases the lowest free slot to `events`, or `None` if all are taken.
    pub(crate) fn acquire(events: Arc<ProviderEvents>) -> Option<Self> {
        let mut arena = write_arena();
        let slot = arena.iter().position(Option::is_none)?;
        arena[slot] = Some(events);
        Some(Self { slot })
    }

    pub(crate) fn slot(&self) -> usize {
        self.slot
    }

    pub(crate) fn trampoline(&self, channel: EventChannel) -> Trampoline {
        Trampoline {
            slot: self.slot,
            channel,
            entry: TRAMPOLINES[self.slot][channel.index()],
        }
    }
}

impl Drop for SlotLease {
    fn drop(&mut self) {
        write_arena()[self.slot] = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn channel_order_matches_entry_kinds() {
        for channel in EventChannel::ALL {
            let entry = TRAMPOLINES[0][channel.index()];
            assert_eq!(
                matches!(entry, Entry::Message(_)),
                channel.carries_message(),
                "{channel:?}"
            );
        }
    }

    #[test]
    fn trampolines_are_distinct_per_slot() {
        let a = TRAMPOLINES[0][0];
        let b = TRAMPOLINES[1][0];
        let (Entry::Message(a), Entry::Message(b)) = (a, b) else {
            panic!("expected message entries");
        };
        assert_ne!(a as usize, b as usize);
    }

    #[test]
    fn lease_routes_and_releases() {
        let events = Arc::new(ProviderEvents::new());
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        events.subscribe(EventChannel::Restart, move |e| {
            sink.lock().unwrap().push(e.clone());
        });

        let lease = SlotLease::acquire(Arc::clone(&events)).unwrap();
        let trampoline = lease.trampoline(EventChannel::Restart);
        trampoline.fire("restarting");
        drop(lease);
        trampoline.fire("trailing");

        assert_eq!(
            *seen.lock().unwrap(),
            vec![ProviderEvent::Restart("restarting".into())]
        );
    }
}
