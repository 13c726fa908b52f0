//! Subscription enums stored as strings on `users`.
//!
//! Both columns are plain `VARCHAR` with a default rather than a Postgres
//! enum type, so the database accepts any string. Decoding an unknown value
//! fails loudly instead of guessing.

use serde::{Deserialize, Serialize};

use super::macros::impl_pg_text;

/// Error returned when a string is not a known status value.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid {kind}: {value}")]
pub struct ParseStatusError {
    kind: &'static str,
    value: String,
}

/// Whether a user receives scheduled forecasts.
///
/// Column: `users.subscription_status VARCHAR(20) NOT NULL DEFAULT 'unsubscribed'`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    /// Receives forecasts for favorite beaches.
    Subscribed,
    /// Default for new users.
    #[default]
    Unsubscribed,
}

impl SubscriptionStatus {
    /// Returns the value as stored in the database.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Subscribed => "subscribed",
            Self::Unsubscribed => "unsubscribed",
        }
    }
}

impl std::fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SubscriptionStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "subscribed" => Ok(Self::Subscribed),
            "unsubscribed" => Ok(Self::Unsubscribed),
            _ => Err(ParseStatusError {
                kind: "subscription status",
                value: s.to_owned(),
            }),
        }
    }
}

impl_pg_text!(SubscriptionStatus, |raw| raw.parse::<Self>().map_err(Into::into));

/// How often a subscribed user is sent forecasts.
///
/// Column: `users.subscription_frequency VARCHAR(10) NOT NULL DEFAULT 'weekly'`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionFrequency {
    Daily,
    #[default]
    Weekly,
}

impl SubscriptionFrequency {
    /// Returns the value as stored in the database.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
        }
    }
}

impl std::fmt::Display for SubscriptionFrequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SubscriptionFrequency {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            _ => Err(ParseStatusError {
                kind: "subscription frequency",
                value: s.to_owned(),
            }),
        }
    }
}

impl_pg_text!(SubscriptionFrequency, |raw| raw.parse::<Self>().map_err(Into::into));
