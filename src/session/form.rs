//! Ordered, multi-valued form fields.

/// Charset marker the service expects on every form post.
pub(crate) const CHARSET_FIELD: (&str, &str) = ("_charset_", "utf-8");

/// Form fields for a url-encoded POST.
///
/// Keys may repeat; the service reads repeated keys as a multi-valued
/// property, which is how several tag paths or members travel in one post.
///
/// # Examples
///
/// ```
/// use pooltest::session::FormFields;
///
/// let form = FormFields::new()
///     .field(":operation", "tag")
///     .values("key", ["/tags/first", "/tags/second"]);
/// assert_eq!(form.len(), 3);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FormFields {
    pairs: Vec<(String, String)>,
}

impl FormFields {
    /// An empty form.
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Append a single-valued field.
    #[must_use]
    pub fn field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.pairs.push((key.into(), value.into()));
        self
    }

    /// Append one entry per value under the same key; no values appends
    /// nothing.
    #[must_use]
    pub fn values<I, V>(mut self, key: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.pairs
            .extend(values.into_iter().map(|value| (key.to_owned(), value.into())));
        self
    }

    /// Number of key/value pairs.
    #[must_use]
    pub fn len(&self) -> usize { self.pairs.len() }

    /// Whether the form has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool { self.pairs.is_empty() }

    /// Values recorded under `key`, in insertion order.
    pub fn get_all<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.pairs
            .iter()
            .filter(move |(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Pairs as sent on the wire, with the charset marker appended.
    pub(crate) fn wire_pairs(&self) -> Vec<(&str, &str)> {
        self.pairs
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .chain(std::iter::once(CHARSET_FIELD))
            .collect()
    }
}
