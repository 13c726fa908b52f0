//! CLI errors and their exit codes.

use std::path::PathBuf;

use surf_bot_provision::{ConfigError, ProvisionError};
use surf_bot_store::RepositoryError;
use thiserror::Error;

/// Errors that end a `surf-cli` invocation.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Provision(#[from] ProvisionError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("Failed to read {}: {source}", .path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid seed file: {0}")]
    SeedFile(#[from] serde_yaml::Error),

    #[error("Failed to fetch beach listing: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Could not find the beaches container in {0}")]
    MissingListing(String),

    #[error("No beaches found in {0}; nothing was written")]
    NoBeaches(String),
}

impl CliError {
    /// Process exit status for this error.
    ///
    /// Bootstrap failures keep the exit code of the command that failed.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Provision(e) => e.exit_code(),
            _ => 1,
        }
    }
}
