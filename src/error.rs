//! Canonical error and result types for the crate.
//!
//! Every failure a scenario can hit funnels into [`SuiteError`] so step
//! definitions can propagate with `?` and the runner reports one descriptive
//! message per failed scenario.

use crate::json::JsonError;

/// Top-level error type exposed by `pooltest`.
///
/// The variants follow the failure taxonomy of a scenario: configuration and
/// setup problems abort before any step runs, transport and body errors come
/// from the service exchange, and assertion errors describe an expectation
/// the service did not meet.
#[derive(Debug, thiserror::Error)]
pub enum SuiteError {
    /// An environment value could not be interpreted.
    #[error("invalid configuration for {key}: {reason}")]
    Config {
        /// Environment variable or setting name.
        key: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
    /// Scenario fixtures could not be prepared.
    #[error("scenario setup failed while {what}: {reason}")]
    Setup {
        /// The fixture being prepared.
        what: String,
        /// Underlying failure description.
        reason: String,
    },
    /// The request never produced an HTTP response.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    /// A resource path or base URL could not be resolved.
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),
    /// A response body did not have the expected JSON shape.
    #[error(transparent)]
    Json(#[from] JsonError),
    /// The service answered, but not the way the scenario expects.
    #[error("assertion failed: {0}")]
    Assertion(String),
    /// A step ran before the step that establishes its context.
    #[error("scenario state missing: {0}")]
    MissingState(&'static str),
}

impl SuiteError {
    /// Build an assertion failure from any displayable message.
    #[must_use]
    pub fn assertion(message: impl Into<String>) -> Self { Self::Assertion(message.into()) }

    /// Build a setup failure naming the fixture being prepared.
    #[must_use]
    pub fn setup(what: impl Into<String>, reason: impl ToString) -> Self {
        Self::Setup {
            what: what.into(),
            reason: reason.to_string(),
        }
    }

    /// Returns true if this error stems from an unmet expectation.
    #[must_use]
    pub fn is_assertion(&self) -> bool { matches!(self, Self::Assertion(_)) }
}

/// Canonical result alias used by `pooltest` public APIs.
pub type Result<T> = std::result::Result<T, SuiteError>;
