//! Beach slug type.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::macros::impl_pg_text;

/// Errors that can occur when parsing a [`BeachSlug`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum BeachSlugError {
    /// The input string is empty.
    #[error("beach slug cannot be empty")]
    Empty,
    /// The input string is too long for the `beaches.slug` column.
    #[error("beach slug must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input contains a character that cannot appear in a URL path segment.
    #[error("beach slug contains invalid character {0:?}")]
    InvalidCharacter(char),
}

/// URL slug identifying a beach, e.g. `sdot-yam` or `hilton`.
///
/// Slugs are taken from the forecast provider's URLs
/// (`/forecast/<slug>`) and are the primary key of `beaches`.
///
/// ## Constraints
///
/// - Length: 1-100 characters
/// - ASCII letters, digits, `-` and `_` only
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(try_from = "String", into = "String")]
pub struct BeachSlug(String);

impl BeachSlug {
    /// Maximum length, matching `VARCHAR(100)` in the schema.
    pub const MAX_LENGTH: usize = 100;

    /// Parse a `BeachSlug` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, too long, or contains
    /// characters outside `[A-Za-z0-9_-]`.
    pub fn parse(s: &str) -> Result<Self, BeachSlugError> {
        if s.is_empty() {
            return Err(BeachSlugError::Empty);
        }

        if s.len() > Self::MAX_LENGTH {
            return Err(BeachSlugError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        if let Some(bad) = s
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
        {
            return Err(BeachSlugError::InvalidCharacter(bad));
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the slug as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `BeachSlug` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for BeachSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for BeachSlug {
    type Err = BeachSlugError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for BeachSlug {
    type Error = BeachSlugError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<BeachSlug> for String {
    fn from(slug: BeachSlug) -> Self {
        slug.0
    }
}

impl AsRef<str> for BeachSlug {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// Database values are assumed valid
impl_pg_text!(BeachSlug, |raw| Ok(Self(raw)));
