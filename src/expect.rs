//! Assertion helpers for step definitions.
//!
//! Each helper returns [`SuiteError::Assertion`] rather than panicking, so a
//! failed expectation travels through `?` like any other scenario failure
//! and its message names both the expectation and what was observed.

use std::fmt::Debug;

use crate::{
    error::{Result, SuiteError},
    session::HttpResponse,
};

/// Require `response` to carry status `expected`.
///
/// The failure message quotes the request line and the start of the body.
///
/// # Errors
///
/// Returns [`SuiteError::Assertion`] on any other status.
pub fn status(response: &HttpResponse, expected: u16, context: &str) -> Result<()> {
    if response.status() == expected {
        return Ok(());
    }
    Err(SuiteError::assertion(format!(
        "{context}: expected status {expected}, got {response}{}",
        body_excerpt(response.body())
    )))
}

/// Require `actual == expected`.
///
/// # Errors
///
/// Returns [`SuiteError::Assertion`] naming both values.
pub fn equal<A, E>(actual: &A, expected: &E, context: &str) -> Result<()>
where
    A: PartialEq<E> + Debug + ?Sized,
    E: Debug + ?Sized,
{
    if actual == expected {
        return Ok(());
    }
    Err(SuiteError::assertion(format!(
        "{context}: expected {expected:?}, got {actual:?}"
    )))
}

/// Require `condition` to hold.
///
/// # Errors
///
/// Returns [`SuiteError::Assertion`] carrying `context`.
pub fn that(condition: bool, context: impl Into<String>) -> Result<()> {
    if condition {
        Ok(())
    } else {
        Err(SuiteError::assertion(context))
    }
}

const EXCERPT_LEN: usize = 200;

fn body_excerpt(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    match trimmed.char_indices().nth(EXCERPT_LEN) {
        Some((cut, _)) => format!(" ({}...)", &trimmed[..cut]),
        None => format!(" ({trimmed})"),
    }
}
