use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;
use uuid::Uuid;

/// The caller-supplied identifier of a [`Movie`](crate::Movie).
///
/// Identifiers are UUIDs. The store never generates them; it only checks
/// that they are unique.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MovieId(Uuid);

impl MovieId {
    /// Wraps an existing UUID.
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Generates a random (v4) identifier.
    ///
    /// Meant for callers and tests that need a fresh id; stores never call it.
    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }

    /// The all-zero identifier.
    pub const fn nil() -> Self {
        Self(Uuid::nil())
    }

    /// Parses an identifier from its textual form.
    ///
    /// Accepts any representation [`Uuid::parse_str`] accepts (hyphenated,
    /// simple, braced or URN).
    pub fn parse(value: &str) -> Result<Self, CoreError> {
        Uuid::parse_str(value)
            .map(Self)
            .map_err(|e| CoreError::InvalidMovieId(format!("'{value}': {e}")))
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Returns the identifier in lowercase hyphenated form, the form used
    /// as the key in text-keyed backends.
    pub fn to_hyphenated(&self) -> String {
        self.0.hyphenated().to_string()
    }
}

impl FromStr for MovieId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<Uuid> for MovieId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<MovieId> for Uuid {
    fn from(value: MovieId) -> Self {
        value.0
    }
}

impl Display for MovieId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}
