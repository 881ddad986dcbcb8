use tracing::debug;

use super::{MemberChanges, PoolId};
use crate::{
    error::Result,
    session::{HttpResponse, Session},
};

const CREATE_FILE_PATH: &str = "/system/pool/createfile";

/// Uploads pooled files and edits their membership.
#[derive(Clone, Copy, Debug)]
pub struct FileManager<'a> {
    session: &'a Session,
}

impl<'a> FileManager<'a> {
    /// Act through `session`.
    #[must_use]
    pub fn new(session: &'a Session) -> Self { Self { session } }

    /// Upload `body` as a pooled file under the form field `field`.
    ///
    /// With `existing` set, the upload becomes a new version of that item
    /// instead of creating one. The file name sent is the field name; the
    /// service keys its JSON answer by it.
    ///
    /// # Errors
    ///
    /// Returns [`SuiteError::Transport`](crate::SuiteError::Transport) when
    /// no response arrives. Non-success statuses are returned, not raised.
    pub async fn upload_pooled_file(
        &self,
        field: &str,
        body: impl Into<Vec<u8>>,
        mime: &str,
        existing: Option<&PoolId>,
    ) -> Result<HttpResponse> {
        let path = existing.map_or_else(
            || CREATE_FILE_PATH.to_owned(),
            |id| format!("{CREATE_FILE_PATH}.{id}"),
        );
        let url = self.session.url_for(&path)?;
        let response = self
            .session
            .post_file(&url, field, field, body, mime)
            .await?;
        debug!(
            field,
            version_of = existing.map(PoolId::as_str),
            status = response.status(),
            "uploaded pooled file"
        );
        Ok(response)
    }

    /// Apply `changes` to the members of `pool_id`.
    ///
    /// # Errors
    ///
    /// Returns [`SuiteError::Transport`](crate::SuiteError::Transport) when
    /// no response arrives.
    pub async fn manage_members(
        &self,
        pool_id: &PoolId,
        changes: &MemberChanges,
    ) -> Result<HttpResponse> {
        let url = self.session.url_for(&pool_id.paths().members())?;
        self.session.post(&url, &changes.to_form()).await
    }
}
