use crate::json::{JsonDocument, JsonError};

/// Resource type every tag node reports.
pub const TAG_RESOURCE_TYPE: &str = "sakai/tag";

/// Service path of the tag called `name`.
#[must_use]
pub fn tag_path(name: &str) -> String { format!("/tags/{name}") }

/// A tag node as served at its tag path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TagNode {
    resource_type: String,
    name: String,
    count: i64,
}

impl TagNode {
    /// Decode a tag node.
    ///
    /// # Errors
    ///
    /// Returns a [`JsonError`] when `sling:resourceType`, `sakai:tag-name` or
    /// `sakai:tag-count` is absent or mistyped.
    pub fn from_document(document: &JsonDocument) -> Result<Self, JsonError> {
        let root = document.root();
        Ok(Self {
            resource_type: root.field("sling:resourceType")?.as_str()?.to_owned(),
            name: root.field("sakai:tag-name")?.as_str()?.to_owned(),
            count: root.field("sakai:tag-count")?.as_i64()?,
        })
    }

    /// `sling:resourceType`.
    #[must_use]
    pub fn resource_type(&self) -> &str { &self.resource_type }

    /// `sakai:tag-name`, the last segment of the tag path.
    #[must_use]
    pub fn name(&self) -> &str { &self.name }

    /// `sakai:tag-count`: how many items carry the tag.
    #[must_use]
    pub fn count(&self) -> i64 { self.count }

    /// Whether this node is a tag at all.
    #[must_use]
    pub fn is_tag(&self) -> bool { self.resource_type == TAG_RESOURCE_TYPE }
}
