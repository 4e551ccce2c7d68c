//! Per-provider notification channels and their observers.

use quicklog_types::ProviderDescriptor;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};

/// The eight notifications the engine raises per provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventChannel {
    Started,
    StatusChanged,
    Error,
    QueueError,
    CriticalError,
    Restart,
    SendLimitsReached,
    FailToLog,
}

impl EventChannel {
    pub const ALL: [EventChannel; 8] = [
        EventChannel::Started,
        EventChannel::StatusChanged,
        EventChannel::Error,
        EventChannel::QueueError,
        EventChannel::CriticalError,
        EventChannel::Restart,
        EventChannel::SendLimitsReached,
        EventChannel::FailToLog,
    ];

    /// Position in [`EventChannel::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Whether the engine passes a message string on this channel.
    #[must_use]
    pub const fn carries_message(self) -> bool {
        !matches!(
            self,
            EventChannel::SendLimitsReached | EventChannel::FailToLog
        )
    }

    /// The engine export that registers a callback on this channel.
    #[must_use]
    pub const fn export_name(self) -> &'static str {
        match self {
            EventChannel::Started => "AddWrapperStartDelegateNative",
            EventChannel::StatusChanged => "AddWrapperStatusChangedDelegateNative",
            EventChannel::Error => "AddWrapperErrorDelegateNative",
            EventChannel::QueueError => "AddWrapperQueueErrorDelegateNative",
            EventChannel::CriticalError => "AddWrapperCriticalErrorDelegateNative",
            EventChannel::Restart => "AddWrapperRestartDelegateNative",
            EventChannel::SendLimitsReached => "AddWrapperSendLimitsDelegateNative",
            EventChannel::FailToLog => "AddWrapperFailDelegateNative",
        }
    }
}

/// One notification as delivered to observers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderEvent {
    Started(String),
    StatusChanged(String),
    Error(String),
    QueueError(String),
    CriticalError(String),
    Restart(String),
    SendLimitsReached,
    FailToLog,
}

impl ProviderEvent {
    /// Builds the event for `channel`. The message is ignored on channels
    /// that carry none.
    #[must_use]
    pub fn new(channel: EventChannel, message: String) -> Self {
        match channel {
            EventChannel::Started => Self::Started(message),
            EventChannel::StatusChanged => Self::StatusChanged(message),
            EventChannel::Error => Self::Error(message),
            EventChannel::QueueError => Self::QueueError(message),
            EventChannel::CriticalError => Self::CriticalError(message),
            EventChannel::Restart => Self::Restart(message),
            EventChannel::SendLimitsReached => Self::SendLimitsReached,
            EventChannel::FailToLog => Self::FailToLog,
        }
    }

    #[must_use]
    pub fn channel(&self) -> EventChannel {
        match self {
            Self::Started(_) => EventChannel::Started,
            Self::StatusChanged(_) => EventChannel::StatusChanged,
            Self::Error(_) => EventChannel::Error,
            Self::QueueError(_) => EventChannel::QueueError,
            Self::CriticalError(_) => EventChannel::CriticalError,
            Self::Restart(_) => EventChannel::Restart,
            Self::SendLimitsReached => EventChannel::SendLimitsReached,
            Self::FailToLog => EventChannel::FailToLog,
        }
    }

    #[must_use]
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Started(m)
            | Self::StatusChanged(m)
            | Self::Error(m)
            | Self::QueueError(m)
            | Self::CriticalError(m)
            | Self::Restart(m) => Some(m),
            Self::SendLimitsReached | Self::FailToLog => None,
        }
    }
}

type Handler = Arc<dyn Fn(&ProviderEvent) + Send + Sync>;

/// Observer slots for one provider.
///
/// Handlers run on whatever thread the engine raises the event from.
#[derive(Default)]
pub struct ProviderEvents {
    handlers: RwLock<HashMap<EventChannel, Vec<Handler>>>,
}

impl ProviderEvents {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a handler for one channel.
    pub fn subscribe<F>(&self, channel: EventChannel, handler: F)
    where
        F: Fn(&ProviderEvent) + Send + Sync + 'static,
    {
        let mut handlers = self.handlers.write().unwrap_or_else(|e| e.into_inner());
        handlers.entry(channel).or_default().push(Arc::new(handler));
    }

    /// Adds one handler to every channel.
    pub fn subscribe_all<F>(&self, handler: F)
    where
        F: Fn(&ProviderEvent) + Send + Sync + 'static,
    {
        let handler: Handler = Arc::new(handler);
        let mut handlers = self.handlers.write().unwrap_or_else(|e| e.into_inner());
        for channel in EventChannel::ALL {
            handlers.entry(channel).or_default().push(Arc::clone(&handler));
        }
    }

    #[must_use]
    pub fn handler_count(&self, channel: EventChannel) -> usize {
        let handlers = self.handlers.read().unwrap_or_else(|e| e.into_inner());
        handlers.get(&channel).map_or(0, Vec::len)
    }

    /// Delivers `event` to the handlers of its channel, in subscription
    /// order. Handlers may subscribe further handlers while running.
    pub fn emit(&self, event: &ProviderEvent) {
        let snapshot: Vec<Handler> = {
            let handlers = self.handlers.read().unwrap_or_else(|e| e.into_inner());
            handlers.get(&event.channel()).cloned().unwrap_or_default()
        };
        for handler in snapshot {
            handler(event);
        }
    }
}

impl fmt::Debug for ProviderEvents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let handlers = self.handlers.read().unwrap_or_else(|e| e.into_inner());
        let counts: HashMap<_, _> = handlers.iter().map(|(c, h)| (*c, h.len())).collect();
        f.debug_struct("ProviderEvents")
            .field("handlers", &counts)
            .finish()
    }
}

/// A descriptor paired with the observers its callbacks feed.
///
/// Clones share the same observers.
#[derive(Debug, Clone)]
pub struct Provider {
    descriptor: ProviderDescriptor,
    events: Arc<ProviderEvents>,
}

impl Provider {
    #[must_use]
    pub fn new(descriptor: ProviderDescriptor) -> Self {
        Self {
            descriptor,
            events: Arc::new(ProviderEvents::new()),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        self.descriptor.name()
    }

    #[must_use]
    pub fn descriptor(&self) -> &ProviderDescriptor {
        &self.descriptor
    }

    /// Mutable access, meaningful only before registration.
    pub fn descriptor_mut(&mut self) -> &mut ProviderDescriptor {
        &mut self.descriptor
    }

    #[must_use]
    pub fn events(&self) -> &Arc<ProviderEvents> {
        &self.events
    }

    /// Shorthand for `events().subscribe(channel, handler)`.
    pub fn on<F>(&self, channel: EventChannel, handler: F)
    where
        F: Fn(&ProviderEvent) + Send + Sync + 'static,
    {
        self.events.subscribe(channel, handler);
    }
}

impl From<ProviderDescriptor> for Provider {
    fn from(descriptor: ProviderDescriptor) -> Self {
        Self::new(descriptor)
    }
}
