//! Documented settings keys of the provider types the engine ships.

/// How a documented provider key is typed on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Bool,
    Integer,
    Text,
    /// A nested document carried as a JSON string.
    Json,
    /// A bracketed level-set token list.
    Levels,
}

/// Provider types the native engine is known to ship.
///
/// Anything else is carried as `Other` and gets no schema treatment; the
/// engine's own catalog decides whether it is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    Console,
    File,
    Redis,
    Telegram,
    Slack,
    Rest,
    Email,
    Ado,
    WindowsEvent,
    Syslog,
    Other(String),
}

const COMMON_FIELDS: &[(&str, FieldKind)] = &[
    ("LogLevel", FieldKind::Levels),
    ("MaxFailsToRestart", FieldKind::Integer),
    ("MaxFailsToStop", FieldKind::Integer),
    ("TimePrecission", FieldKind::Bool),
    ("Enabled", FieldKind::Bool),
    ("AppName", FieldKind::Text),
    ("Environment", FieldKind::Text),
    ("Platform", FieldKind::Text),
    ("IncludedInfo", FieldKind::Text),
    ("SendLimits", FieldKind::Json),
];

const CONSOLE_FIELDS: &[(&str, FieldKind)] = &[
    ("ShowTimeStamp", FieldKind::Bool),
    ("ShowEventColors", FieldKind::Bool),
    ("UnderlineHeaderEventType", FieldKind::Bool),
];

const FILE_FIELDS: &[(&str, FieldKind)] = &[
    ("Filename", FieldKind::Text),
    ("FileName", FieldKind::Text),
    ("AutoFileNameByProcess", FieldKind::Bool),
    ("MaxRotateFiles", FieldKind::Integer),
    ("MaxFileSizeInMB", FieldKind::Integer),
    ("RotatedFilesPath", FieldKind::Text),
    ("DailyRotate", FieldKind::Bool),
    ("CompressRotatedFiles", FieldKind::Bool),
    ("ShowEventType", FieldKind::Bool),
    ("ShowHeaderInfo", FieldKind::Bool),
    ("ShowTimeStamp", FieldKind::Bool),
    ("UnderlineHeaderEventType", FieldKind::Bool),
    ("AutoFlush", FieldKind::Bool),
];

const REDIS_FIELDS: &[(&str, FieldKind)] = &[
    ("Host", FieldKind::Text),
    ("Port", FieldKind::Integer),
    ("Password", FieldKind::Text),
    ("LogKey", FieldKind::Text),
    ("MaxSize", FieldKind::Integer),
    ("OutputAsJson", FieldKind::Bool),
];

const TELEGRAM_FIELDS: &[(&str, FieldKind)] = &[
    ("ChannelName", FieldKind::Text),
    ("ChannelType", FieldKind::Text),
    ("BotToken", FieldKind::Text),
];

const SLACK_FIELDS: &[(&str, FieldKind)] = &[
    ("ChannelName", FieldKind::Text),
    ("UserName", FieldKind::Text),
    ("WebHookURL", FieldKind::Text),
];

const REST_FIELDS: &[(&str, FieldKind)] = &[
    ("URL", FieldKind::Text),
    ("UserAgent", FieldKind::Text),
];

const EMAIL_FIELDS: &[(&str, FieldKind)] = &[
    ("SMTP", FieldKind::Json),
    ("Mail", FieldKind::Json),
];

const ADO_FIELDS: &[(&str, FieldKind)] = &[
    ("ConnectionString", FieldKind::Text),
    ("DBConfig", FieldKind::Json),
    ("FieldsMapping", FieldKind::Json),
];

const WINDOWS_EVENT_FIELDS: &[(&str, FieldKind)] = &[
    ("Source", FieldKind::Text),
    ("DailyRotate", FieldKind::Bool),
    ("ShowTimeStamp", FieldKind::Bool),
];

const SYSLOG_FIELDS: &[(&str, FieldKind)] = &[
    ("Host", FieldKind::Text),
    ("Port", FieldKind::Integer),
    ("Facility", FieldKind::Text),
];

impl ProviderKind {
    /// Maps a provider type string, case-insensitively.
    #[must_use]
    pub fn from_type_name(provider_type: &str) -> Self {
        match provider_type.to_ascii_lowercase().as_str() {
            "consoleprovider" => ProviderKind::Console,
            "fileprovider" => ProviderKind::File,
            "redisprovider" => ProviderKind::Redis,
            "telegramprovider" => ProviderKind::Telegram,
            "slackprovider" => ProviderKind::Slack,
            "restprovider" => ProviderKind::Rest,
            "emailprovider" => ProviderKind::Email,
            "adoprovider" => ProviderKind::Ado,
            "windowseventprovider" => ProviderKind::WindowsEvent,
            "syslogprovider" => ProviderKind::Syslog,
            _ => ProviderKind::Other(provider_type.to_string()),
        }
    }

    /// Canonical provider type string.
    #[must_use]
    pub fn type_name(&self) -> &str {
        match self {
            ProviderKind::Console => "ConsoleProvider",
            ProviderKind::File => "FileProvider",
            ProviderKind::Redis => "RedisProvider",
            ProviderKind::Telegram => "TelegramProvider",
            ProviderKind::Slack => "SlackProvider",
            ProviderKind::Rest => "RestProvider",
            ProviderKind::Email => "EmailProvider",
            ProviderKind::Ado => "AdoProvider",
            ProviderKind::WindowsEvent => "WindowsEventProvider",
            ProviderKind::Syslog => "SyslogProvider",
            ProviderKind::Other(name) => name,
        }
    }

    #[must_use]
    pub fn is_known(&self) -> bool {
        !matches!(self, ProviderKind::Other(_))
    }

    fn specific_fields(&self) -> &'static [(&'static str, FieldKind)] {
        match self {
            ProviderKind::Console => CONSOLE_FIELDS,
            ProviderKind::File => FILE_FIELDS,
            ProviderKind::Redis => REDIS_FIELDS,
            ProviderKind::Telegram => TELEGRAM_FIELDS,
            ProviderKind::Slack => SLACK_FIELDS,
            ProviderKind::Rest => REST_FIELDS,
            ProviderKind::Email => EMAIL_FIELDS,
            ProviderKind::Ado => ADO_FIELDS,
            ProviderKind::WindowsEvent => WINDOWS_EVENT_FIELDS,
            ProviderKind::Syslog => SYSLOG_FIELDS,
            ProviderKind::Other(_) => &[],
        }
    }

    /// Documented keys for this kind, common keys first.
    ///
    /// `Other` kinds document nothing, not even the common keys.
    pub fn known_fields(&self) -> impl Iterator<Item = (&'static str, FieldKind)> {
        let common: &'static [(&'static str, FieldKind)] =
            if self.is_known() { COMMON_FIELDS } else { &[] };
        common.iter().chain(self.specific_fields()).copied()
    }

    /// Field kind of a documented key. `LogLevel` is a level set for every
    /// kind, including unknown ones.
    #[must_use]
    pub fn field_kind(&self, key: &str) -> Option<FieldKind> {
        if key == "LogLevel" {
            return Some(FieldKind::Levels);
        }
        self.known_fields()
            .find(|(name, _)| *name == key)
            .map(|(_, kind)| kind)
    }
}
