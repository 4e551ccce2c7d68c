//! Event types, level sets and the bracketed token codec.
//!
//! A level set is written on the wire as `[etInfo,etError,...]`. Decoding is
//! lossy on purpose: tokens the vocabulary does not know are dropped so
//! documents written by newer or older engines still load.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Severity tags understood by the native engine, in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EventType {
    Header,
    Info,
    Success,
    Warning,
    Error,
    Critical,
    Exception,
    Debug,
    Trace,
    Done,
    Custom1,
    Custom2,
}

impl EventType {
    /// Every event type, ordinal order.
    pub const ALL: [EventType; 12] = [
        EventType::Header,
        EventType::Info,
        EventType::Success,
        EventType::Warning,
        EventType::Error,
        EventType::Critical,
        EventType::Exception,
        EventType::Debug,
        EventType::Trace,
        EventType::Done,
        EventType::Custom1,
        EventType::Custom2,
    ];

    /// Wire token for this event type.
    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            EventType::Header => "etHeader",
            EventType::Info => "etInfo",
            EventType::Success => "etSuccess",
            EventType::Warning => "etWarning",
            EventType::Error => "etError",
            EventType::Critical => "etCritical",
            EventType::Exception => "etException",
            EventType::Debug => "etDebug",
            EventType::Trace => "etTrace",
            EventType::Done => "etDone",
            EventType::Custom1 => "etCustom1",
            EventType::Custom2 => "etCustom2",
        }
    }

    /// Resolves a single token by name or by ordinal (`"4"` is `Error`).
    ///
    /// Surrounding whitespace is ignored; names are case-sensitive.
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        let token = token.trim();
        if let Some(found) = Self::ALL.iter().find(|et| et.token() == token) {
            return Some(*found);
        }
        token
            .parse::<usize>()
            .ok()
            .and_then(|ordinal| Self::ALL.get(ordinal).copied())
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// A set of event types a provider accepts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct LevelSet(BTreeSet<EventType>);

impl LevelSet {
    /// Creates an empty level set.
    #[must_use]
    pub fn new() -> Self {
        Self(BTreeSet::new())
    }

    /// Every event type.
    #[must_use]
    pub fn all() -> Self {
        EventType::ALL.into_iter().collect()
    }

    /// `LOG_ONLYERRORS`
    #[must_use]
    pub fn only_errors() -> Self {
        [
            EventType::Header,
            EventType::Info,
            EventType::Error,
            EventType::Critical,
            EventType::Exception,
        ]
        .into_iter()
        .collect()
    }

    /// `LOG_ERRORSANDWARNINGS`
    #[must_use]
    pub fn errors_and_warnings() -> Self {
        [
            EventType::Info,
            EventType::Success,
            EventType::Warning,
            EventType::Error,
            EventType::Critical,
            EventType::Exception,
        ]
        .into_iter()
        .collect()
    }

    /// `LOG_BASIC`
    #[must_use]
    pub fn basic() -> Self {
        [
            EventType::Header,
            EventType::Info,
            EventType::Success,
            EventType::Done,
            EventType::Warning,
            EventType::Error,
            EventType::Critical,
            EventType::Exception,
            EventType::Custom1,
            EventType::Custom2,
        ]
        .into_iter()
        .collect()
    }

    /// `LOG_TRACE`
    #[must_use]
    pub fn trace() -> Self {
        [
            EventType::Header,
            EventType::Info,
            EventType::Success,
            EventType::Done,
            EventType::Warning,
            EventType::Error,
            EventType::Critical,
            EventType::Exception,
            EventType::Trace,
        ]
        .into_iter()
        .collect()
    }

    /// `LOG_DEBUG`
    #[must_use]
    pub fn debug() -> Self {
        let mut set = Self::trace();
        set.insert(EventType::Debug);
        set
    }

    /// Looks up a named preset such as `LOG_DEBUG`.
    #[must_use]
    pub fn preset(name: &str) -> Option<Self> {
        match name {
            "LOG_ONLYERRORS" => Some(Self::only_errors()),
            "LOG_ERRORSANDWARNINGS" => Some(Self::errors_and_warnings()),
            "LOG_BASIC" => Some(Self::basic()),
            "LOG_ALL" | "LOG_VERBOSE" => Some(Self::all()),
            "LOG_TRACE" => Some(Self::trace()),
            "LOG_DEBUG" => Some(Self::debug()),
            _ => None,
        }
    }

    /// Adds an event type. Returns `false` if it was already present.
    pub fn insert(&mut self, event_type: EventType) -> bool {
        self.0.insert(event_type)
    }

    pub fn remove(&mut self, event_type: EventType) -> bool {
        self.0.remove(&event_type)
    }

    #[must_use]
    pub fn contains(&self, event_type: EventType) -> bool {
        self.0.contains(&event_type)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = EventType> + '_ {
        self.0.iter().copied()
    }

    /// Encodes as `[tok1,tok2,...]` in declaration order.
    #[must_use]
    pub fn encode(&self) -> String {
        let tokens: Vec<&str> = self.0.iter().map(|et| et.token()).collect();
        format!("[{}]", tokens.join(","))
    }

    /// Decodes a bracketed token list, dropping tokens that do not resolve.
    #[must_use]
    pub fn decode(encoded: &str) -> Self {
        let inner = encoded.replace(['[', ']'], "");
        inner.split(',').filter_map(EventType::from_token).collect()
    }

    /// Whether a string has the bracketed shape the codec writes.
    #[must_use]
    pub fn looks_encoded(value: &str) -> bool {
        let value = value.trim();
        value.starts_with('[') && value.ends_with(']')
    }
}

impl FromIterator<EventType> for LevelSet {
    fn from_iter<I: IntoIterator<Item = EventType>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for LevelSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl FromStr for LevelSet {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::decode(s))
    }
}

impl Serialize for LevelSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.encode())
    }
}

impl<'de> Deserialize<'de> for LevelSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        Ok(Self::decode(&encoded))
    }
}

/// Severity of a single log call, one per native log entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
    Critical,
    Debug,
    Trace,
    Custom,
}

impl Severity {
    pub const ALL: [Severity; 8] = [
        Severity::Info,
        Severity::Success,
        Severity::Warning,
        Severity::Error,
        Severity::Critical,
        Severity::Debug,
        Severity::Trace,
        Severity::Custom,
    ];

    /// Position in [`Severity::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// The event type the engine tags this severity with.
    #[must_use]
    pub const fn event_type(self) -> EventType {
        match self {
            Severity::Info => EventType::Info,
            Severity::Success => EventType::Success,
            Severity::Warning => EventType::Warning,
            Severity::Error => EventType::Error,
            Severity::Critical => EventType::Critical,
            Severity::Debug => EventType::Debug,
            Severity::Trace => EventType::Trace,
            Severity::Custom => EventType::Custom1,
        }
    }
}
