//! Favorite repository for database operations.
//!
//! A favorite links an existing user to an existing beach. The foreign keys
//! on `favorites` are the only guard; nothing here pre-checks existence.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use surf_bot_core::{BeachSlug, PhoneNumber};

use super::RepositoryError;
use crate::models::Favorite;

/// Internal row type for `favorites` queries.
#[derive(Debug, sqlx::FromRow)]
struct FavoriteRow {
    phone_number: String,
    beach_slug: String,
    added_at: DateTime<Utc>,
}

impl TryFrom<FavoriteRow> for Favorite {
    type Error = RepositoryError;

    fn try_from(row: FavoriteRow) -> Result<Self, Self::Error> {
        let phone_number = PhoneNumber::parse(&row.phone_number).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid phone number in database: {e}"))
        })?;
        let beach_slug = BeachSlug::parse(&row.beach_slug).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid beach slug in database: {e}"))
        })?;

        Ok(Self {
            phone_number,
            beach_slug,
            added_at: row.added_at,
        })
    }
}

/// Repository for favorite database operations.
pub struct FavoriteRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> FavoriteRepository<'a> {
    /// Create a new favorite repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Mark a beach as a favorite of a user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::InvalidReference` if the user or beach does
    /// not exist.
    /// Returns `RepositoryError::Conflict` if the favorite already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn add(
        &self,
        phone_number: &PhoneNumber,
        beach_slug: &BeachSlug,
    ) -> Result<Favorite, RepositoryError> {
        let row: FavoriteRow = sqlx::query_as(
            r"
            INSERT INTO favorites (phone_number, beach_slug)
            VALUES ($1, $2)
            RETURNING phone_number, beach_slug, added_at
            ",
        )
        .bind(phone_number)
        .bind(beach_slug)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            RepositoryError::from_write(
                e,
                "beach is already a favorite",
                "unknown user or beach",
            )
        })?;

        row.try_into()
    }

    /// Remove a favorite. Returns whether one existed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn remove(
        &self,
        phone_number: &PhoneNumber,
        beach_slug: &BeachSlug,
    ) -> Result<bool, RepositoryError> {
        let result =
            sqlx::query("DELETE FROM favorites WHERE phone_number = $1 AND beach_slug = $2")
                .bind(phone_number)
                .bind(beach_slug)
                .execute(self.pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }

    /// List a user's favorites, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_user(
        &self,
        phone_number: &PhoneNumber,
    ) -> Result<Vec<Favorite>, RepositoryError> {
        let rows: Vec<FavoriteRow> = sqlx::query_as(
            r"
            SELECT phone_number, beach_slug, added_at
            FROM favorites
            WHERE phone_number = $1
            ORDER BY added_at ASC, beach_slug ASC
            ",
        )
        .bind(phone_number)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }
}
