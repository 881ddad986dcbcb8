//! Identities a session can act as.

use std::fmt;

/// Name and password of an account on the service.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    name: String,
    password: String,
}

impl Credentials {
    /// Build credentials for `name`.
    #[must_use]
    pub fn new(name: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            password: password.into(),
        }
    }

    /// Account name.
    #[must_use]
    pub fn name(&self) -> &str { &self.name }

    /// Account password.
    #[must_use]
    pub fn password(&self) -> &str { &self.password }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("name", &self.name)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// The principal a [`Session`](super::Session) sends requests as.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Identity {
    /// No credentials at all.
    Anonymous,
    /// An authenticated account.
    User(Credentials),
}

impl Identity {
    /// Account name, or `anonymous`.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Anonymous => "anonymous",
            Self::User(credentials) => credentials.name(),
        }
    }

    /// Credentials to authenticate with, if any.
    #[must_use]
    pub fn credentials(&self) -> Option<&Credentials> {
        match self {
            Self::Anonymous => None,
            Self::User(credentials) => Some(credentials),
        }
    }
}

impl From<Credentials> for Identity {
    fn from(credentials: Credentials) -> Self { Self::User(credentials) }
}
