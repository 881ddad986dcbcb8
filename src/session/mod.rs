//! HTTP session against the content service.
//!
//! A [`Session`] sends every request as one [`Identity`] at a time. Switching
//! identity rebuilds the underlying client with an empty cookie jar, so
//! server-side session state never leaks from one principal to the next.

mod form;
mod identity;
mod response;

use std::{sync::Arc, time::Duration};

pub use form::FormFields;
pub use identity::{Credentials, Identity};
use reqwest::{
    Method,
    RequestBuilder,
    cookie::Jar,
    header::REFERER,
    multipart::{Form, Part},
};
pub use response::HttpResponse;
use tracing::debug;
use url::Url;

use crate::{
    config::SuiteConfig,
    error::{Result, SuiteError},
};

/// Authenticated HTTP client bound to the service base URL.
#[derive(Debug)]
pub struct Session {
    base: Url,
    timeout: Duration,
    admin: Credentials,
    identity: Identity,
    http: reqwest::Client,
}

impl Session {
    /// Create a session acting as the configured administrator.
    ///
    /// # Errors
    ///
    /// Returns [`SuiteError::Setup`] if the HTTP client cannot be built.
    pub fn new(config: &SuiteConfig) -> Result<Self> {
        let admin = Credentials::new(config.admin_name(), config.admin_password());
        let http = build_client(config.timeout())?;
        Ok(Self {
            base: config.server_url().clone(),
            timeout: config.timeout(),
            identity: Identity::User(admin.clone()),
            admin,
            http,
        })
    }

    /// The identity requests are currently sent as.
    #[must_use]
    pub fn identity(&self) -> &Identity { &self.identity }

    /// The administrative account this session falls back to.
    #[must_use]
    pub fn admin(&self) -> &Credentials { &self.admin }

    /// Base URL every path resolves against.
    #[must_use]
    pub fn base_url(&self) -> &Url { &self.base }

    /// Act as `identity` from now on, discarding all cookies.
    ///
    /// # Errors
    ///
    /// Returns [`SuiteError::Setup`] if the replacement client cannot be
    /// built.
    pub fn switch_user(&mut self, identity: impl Into<Identity>) -> Result<()> {
        let identity = identity.into();
        self.http = build_client(self.timeout)?;
        debug!(from = self.identity.name(), to = identity.name(), "switching acting user");
        self.identity = identity;
        Ok(())
    }

    /// Act as the administrator again.
    ///
    /// # Errors
    ///
    /// Returns [`SuiteError::Setup`] if the replacement client cannot be
    /// built.
    pub fn switch_to_admin(&mut self) -> Result<()> {
        let admin = self.admin.clone();
        self.switch_user(admin)
    }

    /// Resolve a resource path such as `/p/abc.acl.json` against the base
    /// URL.
    ///
    /// One leading `/` is dropped so the path nests under the base rather
    /// than replacing its path.
    ///
    /// # Errors
    ///
    /// Returns [`SuiteError::Url`] when the joined URL is invalid.
    pub fn url_for(&self, path: &str) -> Result<Url> {
        let relative = path.strip_prefix('/').unwrap_or(path);
        Ok(self.base.join(relative)?)
    }

    /// Issue a GET.
    ///
    /// # Errors
    ///
    /// Returns [`SuiteError::Transport`] when no response arrives.
    pub async fn get(&self, url: &Url) -> Result<HttpResponse> {
        self.send(Method::GET, url, |request| request).await
    }

    /// POST url-encoded form fields, plus the `_charset_` marker.
    ///
    /// # Errors
    ///
    /// Returns [`SuiteError::Transport`] when no response arrives.
    pub async fn post(&self, url: &Url, form: &FormFields) -> Result<HttpResponse> {
        let pairs = form.wire_pairs();
        self.send(Method::POST, url, |request| request.form(&pairs))
            .await
    }

    /// POST a single file as multipart form data.
    ///
    /// # Errors
    ///
    /// Returns [`SuiteError::Transport`] when `mime` is not a valid media
    /// type or no response arrives.
    pub async fn post_file(
        &self,
        url: &Url,
        field: &str,
        file_name: &str,
        body: impl Into<Vec<u8>>,
        mime: &str,
    ) -> Result<HttpResponse> {
        let part = Part::bytes(body.into())
            .file_name(file_name.to_owned())
            .mime_str(mime)?;
        let (charset_key, charset_value) = form::CHARSET_FIELD;
        let multipart = Form::new()
            .part(field.to_owned(), part)
            .text(charset_key, charset_value);
        self.send(Method::POST, url, |request| request.multipart(multipart))
            .await
    }

    /// Issue a DELETE.
    ///
    /// # Errors
    ///
    /// Returns [`SuiteError::Transport`] when no response arrives.
    pub async fn delete(&self, url: &Url) -> Result<HttpResponse> {
        self.send(Method::DELETE, url, |request| request).await
    }

    async fn send<F>(&self, method: Method, url: &Url, prepare: F) -> Result<HttpResponse>
    where
        F: FnOnce(RequestBuilder) -> RequestBuilder,
    {
        let mut request = self
            .http
            .request(method.clone(), url.clone())
            .header(REFERER, self.base.as_str());
        if let Some(credentials) = self.identity.credentials() {
            request = request.basic_auth(credentials.name(), Some(credentials.password()));
        }
        let response = prepare(request).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        debug!(
            method = %method,
            url = %url,
            status,
            user = self.identity.name(),
            "request completed"
        );
        Ok(HttpResponse::new(method, url.clone(), status, body))
    }
}

fn build_client(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .cookie_provider(Arc::new(Jar::default()))
        .timeout(timeout)
        .build()
        .map_err(|err| SuiteError::setup("building the http client", err))
}
