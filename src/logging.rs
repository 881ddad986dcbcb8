//! Log verbosity handling.
//!
//! Verbosity is expressed as the numeric severities operators already use for
//! the suite: `0` debug, `1` info, `2` warn, `3` error, `4` fatal and `5`
//! unknown. Each scenario owns a [`LogScope`]: a subscriber with its own
//! reloadable filter, installed as the default for the scenario's thread. A
//! scenario can raise verbosity for its remaining steps without touching
//! scenarios running beside it.

use std::{fmt, str::FromStr};

use tracing::subscriber::DefaultGuard;
use tracing_subscriber::{
    Registry,
    filter::LevelFilter,
    fmt as tracing_fmt,
    layer::SubscriberExt,
    reload,
};

/// Numeric log severity, lowest is most verbose.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LogVerbosity {
    /// `0`: everything.
    Debug,
    /// `1`: informational and above.
    #[default]
    Info,
    /// `2`: warnings and above.
    Warn,
    /// `3`: errors only.
    Error,
    /// `4`: fatal errors only.
    Fatal,
    /// `5`: messages of unknown severity only.
    Unknown,
}

impl LogVerbosity {
    /// The tracing filter that realises this verbosity.
    ///
    /// `tracing` has no fatal or unknown levels: fatal maps onto `ERROR` and
    /// unknown silences the suite entirely.
    #[must_use]
    pub const fn level_filter(self) -> LevelFilter {
        match self {
            Self::Debug => LevelFilter::DEBUG,
            Self::Info => LevelFilter::INFO,
            Self::Warn => LevelFilter::WARN,
            Self::Error | Self::Fatal => LevelFilter::ERROR,
            Self::Unknown => LevelFilter::OFF,
        }
    }

    /// The numeric severity.
    #[must_use]
    pub const fn as_number(self) -> u8 {
        match self {
            Self::Debug => 0,
            Self::Info => 1,
            Self::Warn => 2,
            Self::Error => 3,
            Self::Fatal => 4,
            Self::Unknown => 5,
        }
    }
}

impl FromStr for LogVerbosity {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().parse::<u8>() {
            Ok(0) => Ok(Self::Debug),
            Ok(1) => Ok(Self::Info),
            Ok(2) => Ok(Self::Warn),
            Ok(3) => Ok(Self::Error),
            Ok(4) => Ok(Self::Fatal),
            Ok(5) => Ok(Self::Unknown),
            _ => Err(format!("expected a severity between 0 and 5, got `{raw}`")),
        }
    }
}

impl fmt::Display for LogVerbosity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.as_number()) }
}

type FilterHandle = reload::Handle<LevelFilter, Registry>;

/// Handle onto one scenario's log filter.
///
/// Cloning is cheap; every clone controls the filter of the [`LogScope`] it
/// came from.
#[derive(Clone)]
pub struct LogHandle {
    default: LogVerbosity,
    filter: Option<FilterHandle>,
}

impl fmt::Debug for LogHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogHandle")
            .field("default", &self.default)
            .field("installed", &self.filter.is_some())
            .finish()
    }
}

impl LogHandle {
    /// A handle that controls nothing, for code paths that run without a
    /// scenario subscriber (unit tests, embedding applications).
    #[must_use]
    pub fn detached(default: LogVerbosity) -> Self {
        Self {
            default,
            filter: None,
        }
    }

    /// Change verbosity for the rest of the current scenario.
    pub fn set_level(&self, level: LogVerbosity) {
        if let Some(filter) = &self.filter {
            if let Err(err) = filter.reload(level.level_filter()) {
                tracing::warn!(error = %err, "failed to change log verbosity");
            }
        }
    }

    /// Restore the configured default verbosity.
    pub fn reset(&self) { self.set_level(self.default); }

    /// The configured default verbosity.
    #[must_use]
    pub fn default_level(&self) -> LogVerbosity { self.default }
}

/// A scenario's own subscriber, active on the thread that created it until
/// dropped.
#[must_use = "the subscriber is uninstalled when the scope is dropped"]
pub struct LogScope {
    handle: LogHandle,
    _guard: DefaultGuard,
}

impl LogScope {
    /// Control over this scope's verbosity.
    #[must_use]
    pub fn handle(&self) -> &LogHandle { &self.handle }
}

impl fmt::Debug for LogScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogScope").field("handle", &self.handle).finish_non_exhaustive()
    }
}

/// Install a fresh subscriber for the calling thread at `default`
/// verbosity.
///
/// Async work driven from this thread with `block_on` logs through it too.
/// Scopes on other threads keep their own filters.
pub fn scope(default: LogVerbosity) -> LogScope {
    let (layer, filter) = reload::Layer::new(default.level_filter());
    let subscriber = tracing_subscriber::registry()
        .with(layer)
        .with(tracing_fmt::layer().with_test_writer());
    let guard = tracing::subscriber::set_default(subscriber);
    LogScope {
        handle: LogHandle {
            default,
            filter: Some(filter),
        },
        _guard: guard,
    }
}
