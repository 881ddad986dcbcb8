//! Pooled content: addressing, upload and membership, and typed views over
//! the JSON documents the service returns for an item.

mod acl;
mod comments;
mod files;
mod members;
mod tags;
mod view;

use std::fmt;

pub use acl::{Grants, Privilege};
pub use comments::{Comment, CommentListing};
pub use files::FileManager;
pub use members::MemberChanges;
pub use tags::{TAG_RESOURCE_TYPE, TagNode, tag_path};
pub use view::{ContentView, UploadReceipt};

/// Identifier the service assigns to a pool item.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PoolId(String);

impl PoolId {
    /// Wrap a service-issued identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self { Self(id.into()) }

    /// The identifier text.
    #[must_use]
    pub fn as_str(&self) -> &str { &self.0 }

    /// Resource paths derived from this item.
    #[must_use]
    pub fn paths(&self) -> ContentPaths<'_> { ContentPaths { id: self } }
}

impl fmt::Display for PoolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

/// Service-relative paths for one pool item.
#[derive(Clone, Copy, Debug)]
pub struct ContentPaths<'a> {
    id: &'a PoolId,
}

impl ContentPaths<'_> {
    /// `/p/{id}`: raw body on GET, property updates on POST.
    #[must_use]
    pub fn item(&self) -> String { format!("/p/{}", self.id) }

    /// `/p/{id}.infinity.json`: the deep view.
    #[must_use]
    pub fn infinity(&self) -> String { format!("/p/{}.infinity.json", self.id) }

    /// `/p/{id}.acl.json`.
    #[must_use]
    pub fn acl(&self) -> String { format!("/p/{}.acl.json", self.id) }

    /// `/p/{id}.comments`.
    #[must_use]
    pub fn comments(&self) -> String { format!("/p/{}.comments", self.id) }

    /// `/p/{id}.members.html`.
    #[must_use]
    pub fn members(&self) -> String { format!("/p/{}.members.html", self.id) }

    /// Comments endpoint addressed at a single comment for deletion.
    #[must_use]
    pub fn comment_delete(&self, comment_id: &str) -> String {
        let encoded: String = url::form_urlencoded::byte_serialize(comment_id.as_bytes()).collect();
        format!("/p/{}.comments?commentId={encoded}", self.id)
    }
}
