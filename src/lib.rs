//! Behaviour suite support for a pooled content service.
//!
//! The library holds everything a scenario step needs: an authenticated
//! HTTP [`Session`](session::Session), helpers that create fixture users and
//! upload or share pooled files, typed views over the JSON documents the
//! service returns, and the per-scenario [`ScenarioContext`] that ties them
//! together. The scenarios themselves live in `tests/`.

pub mod config;
pub mod content;
pub mod context;
pub mod error;
pub mod expect;
pub mod json;
pub mod logging;
pub mod session;
pub mod suffix;
pub mod users;

pub use config::SuiteConfig;
pub use context::ScenarioContext;
pub use error::{Result, SuiteError};
pub use logging::{LogHandle, LogScope, LogVerbosity};
