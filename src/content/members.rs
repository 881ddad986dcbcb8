use crate::session::FormFields;

/// Membership edits applied to a pool item in one request.
///
/// Each role has an add list and a remove list; empty lists are left out of
/// the request entirely.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemberChanges {
    viewers_added: Vec<String>,
    viewers_removed: Vec<String>,
    managers_added: Vec<String>,
    managers_removed: Vec<String>,
    editors_added: Vec<String>,
    editors_removed: Vec<String>,
}

impl MemberChanges {
    /// No changes.
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Grant `principal` read access.
    #[must_use]
    pub fn add_viewer(mut self, principal: impl Into<String>) -> Self {
        self.viewers_added.push(principal.into());
        self
    }

    /// Revoke read access from `principal`.
    #[must_use]
    pub fn remove_viewer(mut self, principal: impl Into<String>) -> Self {
        self.viewers_removed.push(principal.into());
        self
    }

    /// Grant `principal` full control.
    #[must_use]
    pub fn add_manager(mut self, principal: impl Into<String>) -> Self {
        self.managers_added.push(principal.into());
        self
    }

    /// Revoke full control from `principal`.
    #[must_use]
    pub fn remove_manager(mut self, principal: impl Into<String>) -> Self {
        self.managers_removed.push(principal.into());
        self
    }

    /// Grant `principal` read and write access.
    #[must_use]
    pub fn add_editor(mut self, principal: impl Into<String>) -> Self {
        self.editors_added.push(principal.into());
        self
    }

    /// Revoke write access from `principal`.
    #[must_use]
    pub fn remove_editor(mut self, principal: impl Into<String>) -> Self {
        self.editors_removed.push(principal.into());
        self
    }

    /// Whether any change is requested.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        [
            &self.viewers_added,
            &self.viewers_removed,
            &self.managers_added,
            &self.managers_removed,
            &self.editors_added,
            &self.editors_removed,
        ]
        .iter()
        .all(|list| list.is_empty())
    }

    pub(crate) fn to_form(&self) -> FormFields {
        FormFields::new()
            .values(":viewer", &self.viewers_added)
            .values(":viewer@Delete", &self.viewers_removed)
            .values(":manager", &self.managers_added)
            .values(":manager@Delete", &self.managers_removed)
            .values(":editor", &self.editors_added)
            .values(":editor@Delete", &self.editors_removed)
    }
}
