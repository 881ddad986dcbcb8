//! Recording stand-in for the content service.
//!
//! Every request is answered from a table of canned responses keyed by method
//! and path, and recorded so tests can inspect exactly what the client sent.
//! Unknown routes answer `404` with an empty body.

use std::{
    collections::HashMap,
    net::{Ipv4Addr, SocketAddr},
    sync::{Arc, Mutex, PoisonError},
};

use axum::{
    Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, Method, StatusCode, Uri, header},
    response::{IntoResponse, Response},
};
use serde_json::Value;
use tokio::{net::TcpListener, sync::oneshot, task::JoinHandle};

/// A request the stub received.
#[derive(Clone, Debug)]
pub struct RecordedRequest {
    method: Method,
    path: String,
    query: Option<String>,
    headers: HeaderMap,
    body: Bytes,
}

impl RecordedRequest {
    /// Request method.
    #[must_use]
    pub fn method(&self) -> &Method { &self.method }

    /// Request path without the query.
    #[must_use]
    pub fn path(&self) -> &str { &self.path }

    /// Raw query string, if any.
    #[must_use]
    pub fn query(&self) -> Option<&str> { self.query.as_deref() }

    /// A header value, when present and valid UTF-8.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }

    /// Body decoded lossily as UTF-8.
    #[must_use]
    pub fn body_text(&self) -> String { String::from_utf8_lossy(&self.body).into_owned() }

    /// Url-encoded body fields in the order sent.
    #[must_use]
    pub fn form(&self) -> Vec<(String, String)> {
        url::form_urlencoded::parse(&self.body)
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect()
    }

    /// Every url-encoded value sent under `key`.
    #[must_use]
    pub fn form_values(&self, key: &str) -> Vec<String> {
        self.form()
            .into_iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v)
            .collect()
    }
}

#[derive(Clone, Debug)]
struct Canned {
    status: StatusCode,
    content_type: &'static str,
    body: String,
}

#[derive(Clone, Default)]
struct StubState {
    routes: Arc<Mutex<HashMap<(Method, String), Canned>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

/// Handle on a running stub; dropping it stops the server.
pub struct StubServer {
    base_url: String,
    state: StubState,
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl StubServer {
    /// Bind an ephemeral localhost port and start serving on the current
    /// runtime.
    ///
    /// # Errors
    ///
    /// Returns any IO error raised while binding.
    pub async fn spawn() -> std::io::Result<Self> {
        let listener = TcpListener::bind(SocketAddr::new(Ipv4Addr::LOCALHOST.into(), 0)).await?;
        let addr = listener.local_addr()?;
        let state = StubState::default();
        let app = Router::new().fallback(handle).with_state(state.clone());
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let task = tokio::spawn(async move {
            let server = axum::serve(listener, app).with_graceful_shutdown(async move {
                let _ = shutdown_rx.await;
            });
            if let Err(err) = server.await {
                tracing::warn!(error = %err, "stub server stopped with an error");
            }
        });
        Ok(Self {
            base_url: format!("http://{addr}/"),
            state,
            shutdown: Some(shutdown_tx),
            task: Some(task),
        })
    }

    /// Base URL of the stub, ending in `/`.
    #[must_use]
    pub fn base_url(&self) -> &str { &self.base_url }

    /// Answer `method path` with `status` and a plain-text `body`.
    pub fn respond(&self, method: Method, path: &str, status: u16, body: impl Into<String>) {
        self.install(method, path, status, "text/plain", body.into());
    }

    /// Answer `method path` with `status` and a JSON `body`.
    pub fn respond_json(&self, method: Method, path: &str, status: u16, body: &Value) {
        self.install(method, path, status, "application/json", body.to_string());
    }

    /// All requests received so far.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state
            .requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Requests received for `path`.
    #[must_use]
    pub fn requests_to(&self, path: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|request| request.path == path)
            .collect()
    }

    fn install(
        &self,
        method: Method,
        path: &str,
        status: u16,
        content_type: &'static str,
        body: String,
    ) {
        let canned = Canned {
            status: StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            content_type,
            body,
        };
        self.state
            .routes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert((method, path.to_owned()), canned);
    }
}

impl Drop for StubServer {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

async fn handle(
    State(state): State<StubState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let path = uri.path().to_owned();
    let canned = state
        .routes
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get(&(method.clone(), path.clone()))
        .cloned();
    state
        .requests
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .push(RecordedRequest {
            method,
            path,
            query: uri.query().map(str::to_owned),
            headers,
            body,
        });
    match canned {
        Some(canned) => (
            canned.status,
            [(header::CONTENT_TYPE, canned.content_type)],
            canned.body,
        )
            .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}
