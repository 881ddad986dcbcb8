use std::fmt;

use crate::json::{JsonDocument, JsonError};

/// One entry of a principal's `granted` list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Privilege {
    /// `Read`.
    Read,
    /// `Write`.
    Write,
    /// `All`: full control, always reported last.
    All,
    /// Anything else the service reports, such as `Delete`.
    Other(String),
}

impl From<&str> for Privilege {
    fn from(raw: &str) -> Self {
        match raw {
            "Read" => Self::Read,
            "Write" => Self::Write,
            "All" => Self::All,
            other => Self::Other(other.to_owned()),
        }
    }
}

impl fmt::Display for Privilege {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read => f.write_str("Read"),
            Self::Write => f.write_str("Write"),
            Self::All => f.write_str("All"),
            Self::Other(name) => f.write_str(name),
        }
    }
}

/// Privileges granted to one principal, in the order the service lists
/// them.
///
/// The order is significant: `Read` comes first, `Write` second when
/// present, and `All` last once full control is granted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grants {
    principal: String,
    granted: Vec<Privilege>,
}

impl Grants {
    /// Read `principal`'s grants from an ACL document.
    ///
    /// # Errors
    ///
    /// Returns [`JsonError::Missing`] when the principal or its `granted`
    /// list is absent and [`JsonError::TypeMismatch`] when the list is not an
    /// array of strings.
    pub fn from_acl(acl: &JsonDocument, principal: &str) -> Result<Self, JsonError> {
        let granted = acl
            .root()
            .field(principal)?
            .field("granted")?
            .as_str_list()?
            .into_iter()
            .map(Privilege::from)
            .collect();
        Ok(Self {
            principal: principal.to_owned(),
            granted,
        })
    }

    /// The principal these grants belong to.
    #[must_use]
    pub fn principal(&self) -> &str { &self.principal }

    /// Granted privileges in service order.
    #[must_use]
    pub fn granted(&self) -> &[Privilege] { &self.granted }

    /// Exactly `[Read]`.
    #[must_use]
    pub fn is_read_only(&self) -> bool { self.granted == [Privilege::Read] }

    /// `Read` first and `Write` second.
    #[must_use]
    pub fn is_read_write(&self) -> bool {
        matches!(self.granted.as_slice(), [Privilege::Read, Privilege::Write, ..])
    }

    /// `All` last.
    #[must_use]
    pub fn has_full_control(&self) -> bool { self.granted.last() == Some(&Privilege::All) }
}

impl fmt::Display for Grants {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self.granted.iter().map(ToString::to_string).collect();
        write!(f, "{} -> [{}]", self.principal, names.join(", "))
    }
}
