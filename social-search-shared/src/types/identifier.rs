//! Entity identifiers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque identifier of an entity (message, posting configuration, account, template, ...).
///
/// The nil UUID is reserved as [`Identifier::EMPTY`]. Index fields that hold "no value"
/// (for example a message that never entered a workflow) store the same nil value, so
/// `Identifier::EMPTY` doubles as the null id when building predicates.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Identifier(Uuid);

impl Identifier {
    /// The empty identifier, denoting absence.
    pub const EMPTY: Identifier = Identifier(Uuid::nil());

    /// Generate a new random identifier.
    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an identifier from its textual form.
    ///
    /// Accepts the simple, hyphenated, braced (`{...}`) and URN forms.
    ///
    /// # Example
    ///
    /// ```
    /// use social_search_shared::Identifier;
    ///
    /// let id = Identifier::parse("{110D559F-DEA5-42EA-9C1C-8A5DF7E70EF9}").unwrap();
    /// assert!(!id.is_empty());
    /// ```
    pub fn parse(value: &str) -> Result<Self, uuid::Error> {
        Uuid::parse_str(value.trim()).map(Self)
    }

    /// Returns true for [`Identifier::EMPTY`].
    pub fn is_empty(&self) -> bool {
        self.0.is_nil()
    }
}

impl From<Uuid> for Identifier {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl FromStr for Identifier {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}
