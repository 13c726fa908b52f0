//! Beach repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use surf_bot_core::BeachSlug;

use super::RepositoryError;
use crate::models::{Beach, NewBeach};

/// Internal row type for `beaches` queries.
#[derive(Debug, sqlx::FromRow)]
struct BeachRow {
    slug: String,
    name: String,
    last_updated: Option<DateTime<Utc>>,
}

impl TryFrom<BeachRow> for Beach {
    type Error = RepositoryError;

    fn try_from(row: BeachRow) -> Result<Self, Self::Error> {
        let slug = BeachSlug::parse(&row.slug).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid beach slug in database: {e}"))
        })?;

        Ok(Self {
            slug,
            name: row.name,
            last_updated: row.last_updated,
        })
    }
}

/// Refresh name and timestamp when the slug already exists.
const UPSERT_BEACH: &str = r"
    INSERT INTO beaches (slug, name, last_updated)
    VALUES ($1, $2, CURRENT_TIMESTAMP)
    ON CONFLICT (slug) DO UPDATE
    SET name = EXCLUDED.name, last_updated = CURRENT_TIMESTAMP
    RETURNING slug, name, last_updated
";

/// Escape `LIKE` wildcards so user input matches literally.
fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Repository for beach database operations.
pub struct BeachRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> BeachRepository<'a> {
    /// Create a new beach repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a beach, or refresh its name if the slug exists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn upsert(&self, beach: &NewBeach) -> Result<Beach, RepositoryError> {
        let row: BeachRow = sqlx::query_as(UPSERT_BEACH)
            .bind(&beach.slug)
            .bind(&beach.name)
            .fetch_one(self.pool)
            .await?;

        row.try_into()
    }

    /// Upsert a batch of beaches in a single transaction.
    ///
    /// Either every beach is written or none are.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any statement fails; the
    /// transaction is rolled back on drop.
    pub async fn upsert_many(&self, beaches: &[NewBeach]) -> Result<u64, RepositoryError> {
        let mut tx = self.pool.begin().await?;
        let mut written = 0_u64;

        for beach in beaches {
            sqlx::query(UPSERT_BEACH)
                .bind(&beach.slug)
                .bind(&beach.name)
                .execute(&mut *tx)
                .await?;
            written += 1;
        }

        tx.commit().await?;
        Ok(written)
    }

    /// Get a beach by slug.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, slug: &BeachSlug) -> Result<Option<Beach>, RepositoryError> {
        let row: Option<BeachRow> =
            sqlx::query_as("SELECT slug, name, last_updated FROM beaches WHERE slug = $1")
                .bind(slug)
                .fetch_optional(self.pool)
                .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// List all beach names, alphabetically.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_names(&self) -> Result<Vec<String>, RepositoryError> {
        let names = sqlx::query_scalar("SELECT name FROM beaches ORDER BY name ASC")
            .fetch_all(self.pool)
            .await?;

        Ok(names)
    }

    /// Resolve free text (a beach name or slug) to a slug.
    ///
    /// Tries a case-insensitive exact match on name or slug first, then
    /// falls back to a substring match. Ties resolve alphabetically by name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_slug(&self, query: &str) -> Result<Option<BeachSlug>, RepositoryError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(None);
        }

        let exact: Option<String> = sqlx::query_scalar(
            r"
            SELECT slug FROM beaches
            WHERE lower(name) = lower($1) OR lower(slug) = lower($1)
            ORDER BY name
            LIMIT 1
            ",
        )
        .bind(query)
        .fetch_optional(self.pool)
        .await?;

        let found = match exact {
            Some(slug) => Some(slug),
            None => {
                let pattern = format!("%{}%", escape_like(query));
                sqlx::query_scalar(
                    r"
                    SELECT slug FROM beaches
                    WHERE name ILIKE $1 OR slug ILIKE $1
                    ORDER BY name
                    LIMIT 1
                    ",
                )
                .bind(pattern)
                .fetch_optional(self.pool)
                .await?
            }
        };

        found
            .map(|slug| {
                BeachSlug::parse(&slug).map_err(|e| {
                    RepositoryError::DataCorruption(format!("invalid beach slug in database: {e}"))
                })
            })
            .transpose()
    }

    /// Delete a beach and, by cascade, every favorite pointing at it.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, slug: &BeachSlug) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM beaches WHERE slug = $1")
            .bind(slug)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
