//! User repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use surf_bot_core::{PhoneNumber, SubscriptionFrequency, SubscriptionStatus};

use super::RepositoryError;
use crate::models::User;

// =============================================================================
// Internal Row Types
// =============================================================================

/// Internal row type for `users` queries.
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    phone_number: String,
    first_name: Option<String>,
    created_at: DateTime<Utc>,
    subscription_status: String,
    subscription_frequency: String,
}

impl TryFrom<UserRow> for User {
    type Error = RepositoryError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let phone_number = PhoneNumber::parse(&row.phone_number).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid phone number in database: {e}"))
        })?;
        let subscription_status = row
            .subscription_status
            .parse::<SubscriptionStatus>()
            .map_err(|e| RepositoryError::DataCorruption(format!("{e}")))?;
        let subscription_frequency = row
            .subscription_frequency
            .parse::<SubscriptionFrequency>()
            .map_err(|e| RepositoryError::DataCorruption(format!("{e}")))?;

        Ok(Self {
            phone_number,
            first_name: row.first_name,
            created_at: row.created_at,
            subscription_status,
            subscription_frequency,
        })
    }
}

const USER_COLUMNS: &str =
    "phone_number, first_name, created_at, subscription_status, subscription_frequency";

// =============================================================================
// Repository
// =============================================================================

/// Repository for user database operations.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create a user. Subscription columns take their schema defaults.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the phone number already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        phone_number: &PhoneNumber,
        first_name: Option<&str>,
    ) -> Result<User, RepositoryError> {
        let row: UserRow = sqlx::query_as(&format!(
            "INSERT INTO users (phone_number, first_name) VALUES ($1, $2) RETURNING {USER_COLUMNS}"
        ))
        .bind(phone_number)
        .bind(first_name)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            RepositoryError::from_write(e, "phone number already registered", "invalid user")
        })?;

        row.try_into()
    }

    /// Get a user by phone number.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored row is invalid.
    pub async fn get(&self, phone_number: &PhoneNumber) -> Result<Option<User>, RepositoryError> {
        let row: Option<UserRow> = sqlx::query_as(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE phone_number = $1"
        ))
        .bind(phone_number)
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Update a user's subscription settings.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user does not exist.
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn update_subscription(
        &self,
        phone_number: &PhoneNumber,
        status: SubscriptionStatus,
        frequency: SubscriptionFrequency,
    ) -> Result<User, RepositoryError> {
        let row: UserRow = sqlx::query_as(&format!(
            r"
            UPDATE users
            SET subscription_status = $2, subscription_frequency = $3
            WHERE phone_number = $1
            RETURNING {USER_COLUMNS}
            "
        ))
        .bind(phone_number)
        .bind(status)
        .bind(frequency)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        row.try_into()
    }

    /// Delete a user and, by cascade, their favorites.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, phone_number: &PhoneNumber) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM users WHERE phone_number = $1")
            .bind(phone_number)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn row(status: &str, frequency: &str) -> UserRow {
        UserRow {
            phone_number: "0500000000".to_owned(),
            first_name: Some("Dana".to_owned()),
            created_at: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
            subscription_status: status.to_owned(),
            subscription_frequency: frequency.to_owned(),
        }
    }

    #[test]
    fn test_row_converts_with_defaults() {
        let user = User::try_from(row("unsubscribed", "weekly")).unwrap();
        assert_eq!(user.phone_number.as_str(), "0500000000");
        assert_eq!(user.subscription_status, SubscriptionStatus::Unsubscribed);
        assert_eq!(user.subscription_frequency, SubscriptionFrequency::Weekly);
    }

    #[test]
    fn test_row_with_unknown_status_is_corruption() {
        let err = User::try_from(row("paused", "weekly")).unwrap_err();
        assert!(matches!(err, RepositoryError::DataCorruption(_)));
    }
}
