//! Test utilities for `pooltest`.
//!
//! [`StubServer`] stands in for the content service so the session client,
//! the user and file helpers and scenario setup can be exercised without a
//! live deployment.
//!
//! ```rust,no_run
//! use pooltest_testing::{Method, StubServer, TestResult, config_for};
//!
//! # async fn example() -> TestResult {
//! let stub = StubServer::spawn().await?;
//! stub.respond(Method::GET, "/p/abc", 200, "file contents");
//! let config = config_for(&stub)?;
//! assert_eq!(config.server_url().as_str(), stub.base_url());
//! # Ok(())
//! # }
//! ```

mod stub;

use std::time::Duration;

pub use axum::http::Method;
use pooltest::{LogHandle, LogVerbosity, SuiteConfig};
use rstest::fixture;
pub use stub::{RecordedRequest, StubServer};

/// Shared result type for integration tests.
pub type TestResult<T = ()> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// `Authorization` header the default administrator sends (`admin:admin`).
pub const ADMIN_BASIC_AUTH: &str = "Basic YWRtaW46YWRtaW4=";

/// Suite configuration pointing at `stub` with a short timeout.
///
/// # Errors
///
/// Returns an error if the stub's base URL is rejected.
pub fn config_for(stub: &StubServer) -> TestResult<SuiteConfig> {
    Ok(SuiteConfig::for_server(stub.base_url())?.with_timeout(Duration::from_secs(5)))
}

/// A log handle that controls no subscriber.
#[fixture]
pub fn detached_log() -> LogHandle {
    let level = LogVerbosity::default();
    LogHandle::detached(level)
}
