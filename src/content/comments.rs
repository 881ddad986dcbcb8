use crate::json::{JsonDocument, JsonError, JsonNode};

/// One comment as listed on `/p/{id}.comments`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Comment {
    comment_id: String,
    body: String,
    author_hash: String,
    author_last_name: Option<String>,
}

impl Comment {
    fn from_node(node: &JsonNode<'_>) -> Result<Self, JsonError> {
        Ok(Self {
            comment_id: node.field("commentId")?.as_str()?.to_owned(),
            body: node.field("comment")?.as_str()?.to_owned(),
            author_hash: node.field("hash")?.as_str()?.to_owned(),
            author_last_name: last_name(node)?,
        })
    }

    /// Identifier used to edit or delete the comment.
    #[must_use]
    pub fn comment_id(&self) -> &str { &self.comment_id }

    /// Comment text.
    #[must_use]
    pub fn body(&self) -> &str { &self.body }

    /// Account name of the author.
    #[must_use]
    pub fn author_hash(&self) -> &str { &self.author_hash }

    /// Author's last name from the embedded profile, when present.
    #[must_use]
    pub fn author_last_name(&self) -> Option<&str> { self.author_last_name.as_deref() }
}

fn last_name(comment: &JsonNode<'_>) -> Result<Option<String>, JsonError> {
    let Some(basic) = comment.opt_field("basic")? else {
        return Ok(None);
    };
    let Some(elements) = basic.opt_field("elements")? else {
        return Ok(None);
    };
    elements
        .opt_field("lastName")?
        .map(|node| profile_value(&node))
        .transpose()
}

/// Profile elements are either `{"value": ".."}` objects or bare strings.
fn profile_value(node: &JsonNode<'_>) -> Result<String, JsonError> {
    if node.value().is_string() {
        return node.as_str().map(str::to_owned);
    }
    Ok(node.field("value")?.as_str()?.to_owned())
}

/// Comments on a pool item, oldest first.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CommentListing {
    comments: Vec<Comment>,
}

impl CommentListing {
    /// Decode a comments document; a missing `comments` list means none.
    ///
    /// # Errors
    ///
    /// Returns a [`JsonError`] when the body is not an object, or a listed
    /// comment lacks its identifier, text or author.
    pub fn from_document(document: &JsonDocument) -> Result<Self, JsonError> {
        let Some(list) = document.root().opt_field("comments")? else {
            return Ok(Self::default());
        };
        let comments = list
            .elements()?
            .iter()
            .map(Comment::from_node)
            .collect::<Result<_, _>>()?;
        Ok(Self { comments })
    }

    /// Whether there are no comments.
    #[must_use]
    pub fn is_empty(&self) -> bool { self.comments.is_empty() }

    /// Number of comments.
    #[must_use]
    pub fn len(&self) -> usize { self.comments.len() }

    /// The first comment.
    #[must_use]
    pub fn first(&self) -> Option<&Comment> { self.comments.first() }

    /// All comments.
    #[must_use]
    pub fn comments(&self) -> &[Comment] { &self.comments }
}
