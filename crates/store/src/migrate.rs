//! Embedded schema migrations.

use sqlx::PgPool;
use sqlx::migrate::{MigrateError, Migrator};

/// Ordered, forward-only migrations from `crates/store/migrations/`.
///
/// Applied versions are recorded in `_sqlx_migrations`; a migration is
/// never applied before every lower version has been.
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Whether a single embedded migration has been applied to a database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationStatus {
    /// Numeric prefix of the migration file.
    pub version: i64,
    /// Description derived from the file name.
    pub description: String,
    /// True once the migration has completed successfully.
    pub applied: bool,
}

/// Apply all pending migrations in order.
///
/// # Errors
///
/// Returns `MigrateError` if a migration fails or if an applied migration
/// was modified after it ran.
pub async fn run(pool: &PgPool) -> Result<(), MigrateError> {
    tracing::info!(
        migrations = MIGRATOR.iter().count(),
        "Applying pending migrations"
    );
    MIGRATOR.run(pool).await
}

/// Report each embedded migration alongside whether it has been applied.
///
/// Does not create the bookkeeping table; on a fresh database every
/// migration is reported as pending.
///
/// # Errors
///
/// Returns `sqlx::Error` if the database cannot be queried.
pub async fn status(pool: &PgPool) -> Result<Vec<MigrationStatus>, sqlx::Error> {
    let has_table: bool =
        sqlx::query_scalar("SELECT to_regclass('_sqlx_migrations') IS NOT NULL")
            .fetch_one(pool)
            .await?;

    let applied: Vec<i64> = if has_table {
        sqlx::query_scalar("SELECT version FROM _sqlx_migrations WHERE success ORDER BY version")
            .fetch_all(pool)
            .await?
    } else {
        Vec::new()
    };

    Ok(MIGRATOR
        .iter()
        .filter(|m| m.migration_type.is_up_migration())
        .map(|m| MigrationStatus {
            version: m.version,
            description: m.description.to_string(),
            applied: applied.contains(&m.version),
        })
        .collect())
}
