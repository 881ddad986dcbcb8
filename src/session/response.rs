//! Fully read HTTP responses.

use std::fmt;

use reqwest::Method;
use url::Url;

use crate::json::{JsonDocument, JsonError};

/// Status and body of one completed request.
///
/// The body is read eagerly so assertions can inspect it any number of times
/// and failure messages can quote it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpResponse {
    method: Method,
    url: Url,
    status: u16,
    body: String,
}

impl HttpResponse {
    /// Assemble a response record.
    #[must_use]
    pub fn new(method: Method, url: Url, status: u16, body: impl Into<String>) -> Self {
        Self {
            method,
            url,
            status,
            body: body.into(),
        }
    }

    /// Numeric status code.
    #[must_use]
    pub fn status(&self) -> u16 { self.status }

    /// Whether the status is in the 2xx range.
    #[must_use]
    pub fn is_success(&self) -> bool { (200..300).contains(&self.status) }

    /// Raw body text.
    #[must_use]
    pub fn body(&self) -> &str { &self.body }

    /// Request method.
    #[must_use]
    pub fn method(&self) -> &Method { &self.method }

    /// Request URL.
    #[must_use]
    pub fn url(&self) -> &Url { &self.url }

    /// Decode the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`JsonError::Malformed`] with the raw body when decoding fails.
    pub fn json(&self) -> Result<JsonDocument, JsonError> { JsonDocument::parse(&self.body) }
}

impl fmt::Display for HttpResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} -> {}", self.method, self.url, self.status)
    }
}
