//! Per-scenario fixture state.
//!
//! A [`ScenarioContext`] is built fresh before every scenario and dropped
//! when it ends. It owns the acting session, the unique suffix and the
//! fixture users, and carries whatever one step establishes for the next:
//! the last response, the pool item under test and the last comment id.

use std::collections::BTreeMap;

use tracing::info;
use url::Url;

use crate::{
    config::SuiteConfig,
    content::{ContentView, FileManager, PoolId},
    error::{Result, SuiteError},
    expect,
    json::JsonDocument,
    logging::LogHandle,
    session::{Credentials, HttpResponse, Identity, Session},
    suffix::UniqueSuffix,
    users::UserManager,
};

/// Short names of the users created before every scenario.
pub const FIXTURE_USERS: [&str; 4] = ["bob", "carol", "ted", "alice"];

#[derive(Debug)]
struct PoolItem {
    id: PoolId,
    file_url: Url,
    infinity_url: Url,
}

/// Mutable state shared by the steps of one scenario.
#[derive(Debug)]
pub struct ScenarioContext {
    config: SuiteConfig,
    log: LogHandle,
    session: Session,
    suffix: UniqueSuffix,
    users: BTreeMap<String, Credentials>,
    last_response: Option<HttpResponse>,
    last_document: Option<JsonDocument>,
    pool_item: Option<PoolItem>,
    comment_id: Option<String>,
}

impl ScenarioContext {
    /// Prepare a scenario: reset log verbosity, open an administrative
    /// session, pick a fresh suffix and create the fixture users.
    ///
    /// # Errors
    ///
    /// Returns [`SuiteError::Setup`] for the first fixture that cannot be
    /// prepared; nothing is retried.
    pub async fn setup(config: SuiteConfig, log: LogHandle) -> Result<Self> {
        log.reset();
        let session = Session::new(&config)?;
        let suffix = UniqueSuffix::generate();

        let mut users = BTreeMap::new();
        {
            let manager = UserManager::new(&session, config.user_password());
            for short in FIXTURE_USERS {
                let credentials = manager.create_user(&suffix.apply(short)).await?;
                users.insert(short.to_owned(), credentials);
            }
        }
        info!(suffix = %suffix, "scenario fixtures ready");

        Ok(Self {
            config,
            log,
            session,
            suffix,
            users,
            last_response: None,
            last_document: None,
            pool_item: None,
            comment_id: None,
        })
    }

    /// Suite configuration.
    #[must_use]
    pub fn config(&self) -> &SuiteConfig { &self.config }

    /// Log verbosity control for the rest of this scenario.
    #[must_use]
    pub fn log(&self) -> &LogHandle { &self.log }

    /// The acting session.
    #[must_use]
    pub fn session(&self) -> &Session { &self.session }

    /// Upload and membership helper bound to the acting session.
    #[must_use]
    pub fn files(&self) -> FileManager<'_> { FileManager::new(&self.session) }

    /// This scenario's unique suffix.
    #[must_use]
    pub fn suffix(&self) -> &UniqueSuffix { &self.suffix }

    /// `name` with this scenario's suffix appended.
    #[must_use]
    pub fn suffixed(&self, name: &str) -> String { self.suffix.apply(name) }

    /// Credentials of fixture user `short` (for example `bob`).
    ///
    /// # Errors
    ///
    /// Returns [`SuiteError::Assertion`] when no such fixture user exists.
    pub fn user(&self, short: &str) -> Result<&Credentials> {
        self.users.get(short).ok_or_else(|| {
            SuiteError::assertion(format!(
                "no fixture user named `{short}`; known users are {FIXTURE_USERS:?}"
            ))
        })
    }

    /// Act as fixture user `short`.
    ///
    /// # Errors
    ///
    /// Fails if the user is unknown or the session cannot switch.
    pub fn act_as(&mut self, short: &str) -> Result<()> {
        let credentials = self.user(short)?.clone();
        self.session.switch_user(credentials)
    }

    /// Act as the administrator.
    ///
    /// # Errors
    ///
    /// Fails if the session cannot switch.
    pub fn act_as_admin(&mut self) -> Result<()> { self.session.switch_to_admin() }

    /// Act without credentials.
    ///
    /// # Errors
    ///
    /// Fails if the session cannot switch.
    pub fn act_as_anonymous(&mut self) -> Result<()> {
        self.session.switch_user(Identity::Anonymous)
    }

    /// Remember `response` as the latest one, forgetting any decoded body of
    /// its predecessor.
    pub fn record(&mut self, response: HttpResponse) {
        self.last_response = Some(response);
        self.last_document = None;
    }

    /// The latest recorded response.
    ///
    /// # Errors
    ///
    /// Returns [`SuiteError::MissingState`] before anything was recorded.
    pub fn last_response(&self) -> Result<&HttpResponse> {
        self.last_response
            .as_ref()
            .ok_or(SuiteError::MissingState("no response has been recorded"))
    }

    /// The latest response decoded as JSON, decoded once and cached.
    ///
    /// # Errors
    ///
    /// Returns [`SuiteError::MissingState`] before anything was recorded and
    /// [`SuiteError::Json`] with the raw body when it is not JSON.
    pub fn last_document(&mut self) -> Result<&JsonDocument> {
        if self.last_document.is_none() {
            let document = self.last_response()?.json()?;
            self.last_document = Some(document);
        }
        self.last_document
            .as_ref()
            .ok_or(SuiteError::MissingState("no response has been recorded"))
    }

    /// Make `id` the pool item under test and derive its URLs.
    ///
    /// # Errors
    ///
    /// Returns [`SuiteError::Url`] when the item URLs cannot be built.
    pub fn adopt_pool_item(&mut self, id: PoolId) -> Result<()> {
        let paths = id.paths();
        let file_url = self.session.url_for(&paths.item())?;
        let infinity_url = self.session.url_for(&paths.infinity())?;
        info!(pool_id = %id, "pool item under test");
        self.pool_item = Some(PoolItem {
            id,
            file_url,
            infinity_url,
        });
        Ok(())
    }

    /// The pool item under test.
    ///
    /// # Errors
    ///
    /// Returns [`SuiteError::MissingState`] before an item was adopted.
    pub fn pool_id(&self) -> Result<&PoolId> { self.pool_item().map(|item| &item.id) }

    /// `/p/{id}` of the item under test.
    ///
    /// # Errors
    ///
    /// Returns [`SuiteError::MissingState`] before an item was adopted.
    pub fn file_url(&self) -> Result<&Url> { self.pool_item().map(|item| &item.file_url) }

    /// Deep view URL of the item under test.
    ///
    /// # Errors
    ///
    /// Returns [`SuiteError::MissingState`] before an item was adopted.
    pub fn infinity_url(&self) -> Result<&Url> { self.pool_item().map(|item| &item.infinity_url) }

    /// Remember the comment later steps edit or delete.
    pub fn set_comment_id(&mut self, comment_id: impl Into<String>) {
        self.comment_id = Some(comment_id.into());
    }

    /// The remembered comment.
    ///
    /// # Errors
    ///
    /// Returns [`SuiteError::MissingState`] before a comment was remembered.
    pub fn comment_id(&self) -> Result<&str> {
        self.comment_id
            .as_deref()
            .ok_or(SuiteError::MissingState("no comment has been fetched"))
    }

    /// GET `url`, require `200` and decode the body.
    ///
    /// # Errors
    ///
    /// Fails on transport errors, any other status, or a non-JSON body.
    pub async fn fetch_document(&self, url: &Url) -> Result<JsonDocument> {
        let response = self.session.get(url).await?;
        expect::status(&response, 200, "fetching a JSON document")?;
        Ok(response.json()?)
    }

    /// Fetch the deep view of the item under test.
    ///
    /// # Errors
    ///
    /// See [`ScenarioContext::fetch_document`]; also fails before an item
    /// was adopted.
    pub async fn fetch_view(&self) -> Result<ContentView> {
        let document = self.fetch_document(self.infinity_url()?).await?;
        Ok(ContentView::from_document(document))
    }

    fn pool_item(&self) -> Result<&PoolItem> {
        self.pool_item
            .as_ref()
            .ok_or(SuiteError::MissingState("no pool item has been created"))
    }
}
