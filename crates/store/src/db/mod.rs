//! Database operations for the surf bot `PostgreSQL`.
//!
//! Repositories borrow a `PgPool` and map rows into the validated types in
//! [`crate::models`]. Referential integrity is left to the storage engine;
//! violations surface as [`RepositoryError::InvalidReference`].

pub mod beaches;
pub mod favorites;
pub mod users;

use std::str::FromStr;
use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use thiserror::Error;

pub use beaches::BeachRepository;
pub use favorites::FavoriteRepository;
pub use users::UserRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., duplicate primary key).
    #[error("constraint violation: {0}")]
    Conflict(String),

    /// Foreign key violation: the referenced user or beach does not exist.
    #[error("invalid reference: {0}")]
    InvalidReference(String),
}

impl RepositoryError {
    /// Classify a write error, turning key violations into domain errors.
    fn from_write(e: sqlx::Error, conflict: &str, reference: &str) -> Self {
        if let sqlx::Error::Database(ref db_err) = e {
            if db_err.is_unique_violation() {
                return Self::Conflict(conflict.to_owned());
            }
            if db_err.is_foreign_key_violation() {
                return Self::InvalidReference(reference.to_owned());
            }
        }
        Self::Database(e)
    }
}

/// Create a `PostgreSQL` connection pool from a connection URL.
///
/// The CLI runs one command per process, so the pool is kept small.
///
/// # Errors
///
/// Returns `sqlx::Error` if the URL is malformed or the connection cannot
/// be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    let options = PgConnectOptions::from_str(database_url.expose_secret())?;
    create_pool_with(options).await
}

/// Create a `PostgreSQL` connection pool from explicit connect options.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool_with(options: PgConnectOptions) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(4)
        .min_connections(1)
        .acquire_timeout(Duration::from_secs(10))
        .connect_with(options)
        .await
}
