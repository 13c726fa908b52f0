//! Phone number type.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::macros::impl_pg_text;

/// Errors that can occur when parsing a [`PhoneNumber`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PhoneNumberError {
    /// The input string is empty.
    #[error("phone number cannot be empty")]
    Empty,
    /// The input string is too long for the `users.phone_number` column.
    #[error("phone number must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input contains something other than digits (and a leading `+`).
    #[error("phone number contains invalid character {0:?}")]
    InvalidCharacter(char),
    /// The input is only a `+` sign.
    #[error("phone number must contain at least one digit")]
    MissingDigits,
}

/// A subscriber's phone number, the primary key of `users`.
///
/// Numbers arrive from the messaging provider as plain digit strings
/// (e.g. `972501234567`) and from operators in local form (`0500000000`).
/// The value is stored exactly as given; no normalization is applied.
///
/// ## Constraints
///
/// - Length: 1-20 characters
/// - An optional leading `+`, followed by ASCII digits only
///
/// ## Examples
///
/// ```
/// use surf_bot_core::PhoneNumber;
///
/// assert!(PhoneNumber::parse("0500000000").is_ok());
/// assert!(PhoneNumber::parse("+972501234567").is_ok());
///
/// assert!(PhoneNumber::parse("").is_err());
/// assert!(PhoneNumber::parse("050-000").is_err());
/// assert!(PhoneNumber::parse("+").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Maximum length, matching `VARCHAR(20)` in the schema.
    pub const MAX_LENGTH: usize = 20;

    /// Parse a `PhoneNumber` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, longer than 20 characters,
    /// or contains anything besides digits and a single leading `+`.
    pub fn parse(s: &str) -> Result<Self, PhoneNumberError> {
        if s.is_empty() {
            return Err(PhoneNumberError::Empty);
        }

        if s.len() > Self::MAX_LENGTH {
            return Err(PhoneNumberError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        let digits = s.strip_prefix('+').unwrap_or(s);
        if digits.is_empty() {
            return Err(PhoneNumberError::MissingDigits);
        }

        if let Some(bad) = digits.chars().find(|c| !c.is_ascii_digit()) {
            return Err(PhoneNumberError::InvalidCharacter(bad));
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the phone number as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `PhoneNumber` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for PhoneNumber {
    type Err = PhoneNumberError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for PhoneNumber {
    type Error = PhoneNumberError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<PhoneNumber> for String {
    fn from(phone: PhoneNumber) -> Self {
        phone.0
    }
}

impl AsRef<str> for PhoneNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// Database values are assumed valid
impl_pg_text!(PhoneNumber, |raw| Ok(Self(raw)));
