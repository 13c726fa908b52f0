//! Domain types for rows in the surf bot database.
//!
//! These are validated values, separate from the internal row types the
//! repositories decode into.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use surf_bot_core::{BeachSlug, PhoneNumber, SubscriptionFrequency, SubscriptionStatus};

/// A subscriber, identified by phone number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub phone_number: PhoneNumber,
    /// Display name, if the user has shared one.
    pub first_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub subscription_status: SubscriptionStatus,
    pub subscription_frequency: SubscriptionFrequency,
}

/// A surf spot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Beach {
    pub slug: BeachSlug,
    /// Display name as shown by the forecast provider.
    pub name: String,
    /// When the beach listing was last seeded.
    pub last_updated: Option<DateTime<Utc>>,
}

/// A beach followed by a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Favorite {
    pub phone_number: PhoneNumber,
    pub beach_slug: BeachSlug,
    pub added_at: DateTime<Utc>,
}

/// Input for inserting or refreshing a beach.
///
/// Deserializes from seed files of the form:
///
/// ```yaml
/// - slug: hilton
///   name: Hilton Beach
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewBeach {
    pub slug: BeachSlug,
    pub name: String,
}
