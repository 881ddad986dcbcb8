//! Suite configuration.
//!
//! Settings come from environment variables so the same scenarios can be
//! pointed at any deployment of the content service. Empty variables count as
//! unset; anything else that fails validation is rejected rather than
//! silently replaced by a default.

use std::time::Duration;

use url::Url;

use crate::{
    error::{Result, SuiteError},
    logging::LogVerbosity,
};

/// Environment keys read by [`SuiteConfig::from_env`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SuiteEnv {
    /// Base URL of the content service.
    ServerUrl,
    /// Administrative account name.
    AdminName,
    /// Administrative account password.
    AdminPassword,
    /// Password assigned to fixture users.
    UserPassword,
    /// Per-request timeout in whole seconds.
    TimeoutSecs,
    /// Numeric log verbosity, `0` (debug) to `5` (unknown).
    LogLevel,
}

impl SuiteEnv {
    /// Returns the canonical environment variable name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ServerUrl => "POOLTEST_SERVER_URL",
            Self::AdminName => "POOLTEST_ADMIN_NAME",
            Self::AdminPassword => "POOLTEST_ADMIN_PASSWORD",
            Self::UserPassword => "POOLTEST_USER_PASSWORD",
            Self::TimeoutSecs => "POOLTEST_TIMEOUT_SECS",
            Self::LogLevel => "POOLTEST_LOG_LEVEL",
        }
    }
}

const DEFAULT_SERVER_URL: &str = "http://localhost:8080/";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Typed configuration for one suite run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SuiteConfig {
    server_url: Url,
    admin_name: String,
    admin_password: String,
    user_password: String,
    timeout: Duration,
    log_level: LogVerbosity,
}

impl SuiteConfig {
    /// Default settings aimed at the service rooted at `raw`.
    ///
    /// # Errors
    ///
    /// Returns [`SuiteError::Config`] when `raw` is not an absolute http(s)
    /// URL.
    pub fn for_server(raw: &str) -> Result<Self> {
        Ok(Self {
            server_url: parse_server_url(raw)?,
            admin_name: "admin".to_owned(),
            admin_password: "admin".to_owned(),
            user_password: "testuser".to_owned(),
            timeout: DEFAULT_TIMEOUT,
            log_level: LogVerbosity::Info,
        })
    }

    /// Load configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`SuiteError::Config`] when a variable is present but invalid.
    pub fn from_env() -> Result<Self> { Self::from_lookup(|key| std::env::var(key).ok()) }

    /// Load configuration through an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns [`SuiteError::Config`] when a value is present but invalid.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: SuiteEnv| {
            lookup(key.as_str())
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
        };

        let server_url = read(SuiteEnv::ServerUrl);
        let mut config = Self::for_server(server_url.as_deref().unwrap_or(DEFAULT_SERVER_URL))?;
        if let Some(name) = read(SuiteEnv::AdminName) {
            config.admin_name = name;
        }
        if let Some(password) = read(SuiteEnv::AdminPassword) {
            config.admin_password = password;
        }
        if let Some(password) = read(SuiteEnv::UserPassword) {
            config.user_password = password;
        }
        if let Some(raw) = read(SuiteEnv::TimeoutSecs) {
            config.timeout = parse_timeout(&raw)?;
        }
        if let Some(raw) = read(SuiteEnv::LogLevel) {
            config.log_level = raw.parse().map_err(|reason| SuiteError::Config {
                key: SuiteEnv::LogLevel.as_str(),
                reason,
            })?;
        }
        Ok(config)
    }

    /// Point the suite at another service base URL.
    ///
    /// A trailing `/` is added when missing so relative resource paths join
    /// underneath the base rather than replacing its last segment.
    ///
    /// # Errors
    ///
    /// Returns [`SuiteError::Config`] when `raw` is not an absolute http(s)
    /// URL.
    pub fn with_server_url(mut self, raw: &str) -> Result<Self> {
        self.server_url = parse_server_url(raw)?;
        Ok(self)
    }

    /// Override the administrative credentials.
    #[must_use]
    pub fn with_admin(mut self, name: impl Into<String>, password: impl Into<String>) -> Self {
        self.admin_name = name.into();
        self.admin_password = password.into();
        self
    }

    /// Override the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Override the default log verbosity.
    #[must_use]
    pub fn with_log_level(mut self, level: LogVerbosity) -> Self {
        self.log_level = level;
        self
    }

    /// Base URL of the service, always ending in `/`.
    #[must_use]
    pub fn server_url(&self) -> &Url { &self.server_url }

    /// Administrative account name.
    #[must_use]
    pub fn admin_name(&self) -> &str { &self.admin_name }

    /// Administrative account password.
    #[must_use]
    pub fn admin_password(&self) -> &str { &self.admin_password }

    /// Password given to fixture users.
    #[must_use]
    pub fn user_password(&self) -> &str { &self.user_password }

    /// Per-request timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration { self.timeout }

    /// Default log verbosity for each scenario.
    #[must_use]
    pub fn log_level(&self) -> LogVerbosity { self.log_level }
}

fn parse_server_url(raw: &str) -> Result<Url> {
    let invalid = |reason: String| SuiteError::Config {
        key: SuiteEnv::ServerUrl.as_str(),
        reason,
    };
    let mut url = Url::parse(raw).map_err(|err| invalid(err.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme `{}`", url.scheme())));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

fn parse_timeout(raw: &str) -> Result<Duration> {
    match raw.parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(SuiteError::Config {
            key: SuiteEnv::TimeoutSecs.as_str(),
            reason: format!("expected a positive number of seconds, got `{raw}`"),
        }),
    }
}
