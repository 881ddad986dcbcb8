//! Per-scenario unique suffixes.
//!
//! Usernames and tag paths are global on the service, so every name a
//! scenario creates carries a suffix derived from the time the scenario
//! started. Suffixes are strictly increasing within the process, which keeps
//! scenarios started in the same microsecond apart.

use std::{
    fmt,
    sync::atomic::{AtomicU64, Ordering},
    time::{SystemTime, UNIX_EPOCH},
};

static LAST_ISSUED: AtomicU64 = AtomicU64::new(0);

/// Digits-only suffix appended to every name a scenario creates.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct UniqueSuffix(String);

impl UniqueSuffix {
    /// Generate a suffix from the current wall clock.
    #[must_use]
    pub fn generate() -> Self {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |elapsed| {
                u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX)
            });
        Self::from_micros(now)
    }

    /// Issue a suffix for `micros`, bumped past any suffix already issued.
    fn from_micros(micros: u64) -> Self {
        let mut last = LAST_ISSUED.load(Ordering::Relaxed);
        loop {
            let next = micros.max(last.saturating_add(1));
            match LAST_ISSUED.compare_exchange_weak(last, next, Ordering::AcqRel, Ordering::Relaxed)
            {
                Ok(_) => return Self(next.to_string()),
                Err(current) => last = current,
            }
        }
    }

    /// Append the suffix to `name`.
    #[must_use]
    pub fn apply(&self, name: &str) -> String { format!("{name}{}", self.0) }

    /// The suffix text.
    #[must_use]
    pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for UniqueSuffix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}
