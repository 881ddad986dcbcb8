use super::PoolId;
use crate::json::{JsonDocument, JsonError};

/// The part of an upload answer describing one uploaded field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadReceipt {
    pool_id: PoolId,
    mime_type: String,
}

impl UploadReceipt {
    /// Read the entry for `field` from an upload answer shaped like
    /// `{"file1": {"poolId": "..", "item": {"_mimeType": ".."}}}`.
    ///
    /// # Errors
    ///
    /// Returns a [`JsonError`] when the entry, its `poolId` or its mime type
    /// is absent or not a string.
    pub fn from_document(document: &JsonDocument, field: &str) -> Result<Self, JsonError> {
        let entry = document.root().field(field)?;
        Ok(Self {
            pool_id: PoolId::new(entry.field("poolId")?.as_str()?),
            mime_type: entry
                .field("item")?
                .field("_mimeType")?
                .as_str()?
                .to_owned(),
        })
    }

    /// Identifier of the created or versioned item.
    #[must_use]
    pub fn pool_id(&self) -> &PoolId { &self.pool_id }

    /// Mime type the service recorded.
    #[must_use]
    pub fn mime_type(&self) -> &str { &self.mime_type }
}

/// Deep (`.infinity.json`) view of a pool item.
#[derive(Clone, Debug, PartialEq)]
pub struct ContentView {
    document: JsonDocument,
}

impl ContentView {
    /// Wrap a decoded deep view.
    #[must_use]
    pub fn from_document(document: JsonDocument) -> Self { Self { document } }

    /// `commentCount`; an item nobody has commented on may omit it.
    ///
    /// # Errors
    ///
    /// Returns [`JsonError::TypeMismatch`] when the count is not an integer.
    pub fn comment_count(&self) -> Result<i64, JsonError> {
        self.document
            .root()
            .opt_field("commentCount")?
            .map_or(Ok(0), |count| count.as_i64())
    }

    /// `sakai:tags`. A single tag may be stored as a bare string.
    ///
    /// # Errors
    ///
    /// Returns [`JsonError::TypeMismatch`] when the tags are neither a string
    /// nor an array of strings.
    pub fn tags(&self) -> Result<Vec<&str>, JsonError> {
        match self.document.root().opt_field("sakai:tags")? {
            None => Ok(Vec::new()),
            Some(tags) if tags.value().is_string() => Ok(vec![tags.as_str()?]),
            Some(tags) => tags.as_str_list(),
        }
    }

    /// A string property stored on the item.
    ///
    /// # Errors
    ///
    /// Returns [`JsonError::TypeMismatch`] when the property is present but
    /// not a string.
    pub fn property(&self, name: &str) -> Result<Option<&str>, JsonError> {
        self.document
            .root()
            .opt_field(name)?
            .map(|node| node.as_str())
            .transpose()
    }

    /// The underlying document.
    #[must_use]
    pub fn document(&self) -> &JsonDocument { &self.document }
}
