//! Database migration commands.
//!
//! # Usage
//!
//! ```bash
//! # Apply pending migrations
//! surf-cli migrate run
//!
//! # Show which migrations have been applied
//! surf-cli migrate status
//! ```
//!
//! Connection settings are described in [`crate::config`].

use tracing::info;

use crate::config::DatabaseConfig;
use crate::error::CliError;

/// Apply every pending migration in version order.
///
/// # Errors
///
/// Returns `CliError` if the database is unreachable or a migration fails.
pub async fn run() -> Result<(), CliError> {
    let pool = DatabaseConfig::from_env()?.connect().await?;
    surf_bot_store::migrate::run(&pool).await?;
    info!("Migrations complete!");
    Ok(())
}

/// Log each migration and whether it has been applied.
///
/// # Errors
///
/// Returns `CliError` if the database is unreachable.
pub async fn status() -> Result<(), CliError> {
    let pool = DatabaseConfig::from_env()?.connect().await?;
    let migrations = surf_bot_store::migrate::status(&pool).await?;

    let pending = migrations.iter().filter(|m| !m.applied).count();
    for migration in &migrations {
        let state = if migration.applied { "applied" } else { "pending" };
        info!("  {:04} {} ({state})", migration.version, migration.description);
    }
    info!(total = migrations.len(), pending, "Migration status");
    Ok(())
}
