//! Domain types for the reading tracker.
//!
//! Newtypes and enums shared by the storage, service, and HTTP layers so that
//! raw strings never flow between them unchecked.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Catalog identifier of a book (an Open Library work key such as `OL45804W`).
///
/// # Examples
///
/// ```rust
/// use myreads::domain::BookId;
///
/// let id = BookId::new("OL45804W");
/// assert_eq!(id.as_str(), "OL45804W");
/// assert_eq!(id.to_string(), "OL45804W");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookId(String);

impl BookId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Identifiers are interpolated into catalog URLs, so only short ASCII
    /// alphanumeric keys are accepted.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        !self.0.is_empty()
            && self.0.len() <= crate::constants::limits::MAX_BOOK_ID_LEN
            && self.0.chars().all(|c| c.is_ascii_alphanumeric())
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BookId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for BookId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Reading status of a tracked book.
///
/// Any status may follow any other; there is no enforced transition graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadingStatus {
    WantToRead,
    Reading,
    Read,
}

impl ReadingStatus {
    pub const ALL: [Self; 3] = [Self::WantToRead, Self::Reading, Self::Read];

    /// Storage and form representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::WantToRead => "want_to_read",
            Self::Reading => "reading",
            Self::Read => "read",
        }
    }

    /// Human readable label for rendered pages.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::WantToRead => "Want to Read",
            Self::Reading => "Currently Reading",
            Self::Read => "Read",
        }
    }
}

impl fmt::Display for ReadingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid status '{0}'. Expected one of: want_to_read, reading, read")]
pub struct ParseStatusError(pub String);

impl FromStr for ReadingStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "want_to_read" => Ok(Self::WantToRead),
            "reading" => Ok(Self::Reading),
            "read" => Ok(Self::Read),
            other => Err(ParseStatusError(other.to_string())),
        }
    }
}
