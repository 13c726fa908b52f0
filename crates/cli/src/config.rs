//! Database connection settings for `migrate` and `seed`.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `SURF_DATABASE_URL` / `DATABASE_URL` - Full connection string; when set,
//!   the secret store is not consulted
//! - `SURF_DB_HOST` - Database host (default: `127.0.0.1`)
//! - `SURF_DB_PORT` - Database port (default: `5432`)
//! - `SURF_SECRET_NAME`, `SURF_GCP_PROJECT` - Where the password lives, as
//!   for `bootstrap`

use std::fmt;

use secrecy::{ExposeSecret, SecretString};
use sqlx::PgPool;
use sqlx::postgres::PgConnectOptions;
use surf_bot_provision::config::{DB_NAME, DB_PORT, DB_USER, get_env_or_default, get_optional_env};
use surf_bot_provision::{ConfigError, SecretRef, SecretStore, SystemRunner};

use crate::error::CliError;

/// Default database host: the container published on this machine.
pub const DEFAULT_DB_HOST: &str = "127.0.0.1";

/// How to reach the database.
#[derive(Clone)]
pub enum DatabaseConfig {
    /// An explicit connection string.
    Url(SecretString),
    /// The bootstrapped container; the password is read from the secret
    /// store at connect time.
    Host {
        host: String,
        port: u16,
        secret: SecretRef,
    },
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Url(_) => f.debug_tuple("Url").field(&"[REDACTED]").finish(),
            Self::Host { host, port, secret } => f
                .debug_struct("Host")
                .field("host", host)
                .field("port", port)
                .field("secret", secret)
                .finish(),
        }
    }
}

impl DatabaseConfig {
    /// Load connection settings from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if `SURF_DB_PORT` is not a port
    /// number or a secret location variable is blank.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let url = get_optional_env("SURF_DATABASE_URL").or_else(|| get_optional_env("DATABASE_URL"));
        if let Some(url) = url {
            return Ok(Self::Url(SecretString::from(url)));
        }

        let host = get_env_or_default("SURF_DB_HOST", DEFAULT_DB_HOST);
        let port = parse_port(&get_env_or_default("SURF_DB_PORT", &DB_PORT.to_string()))?;

        Ok(Self::Host {
            host,
            port,
            secret: SecretRef::from_env()?,
        })
    }

    /// Open a connection pool.
    ///
    /// # Errors
    ///
    /// Returns `CliError::Provision` if the password cannot be fetched and
    /// `CliError::Database` if the connection fails.
    pub async fn connect(&self) -> Result<PgPool, CliError> {
        match self {
            Self::Url(url) => {
                tracing::info!("Connecting to database from connection string");
                Ok(surf_bot_store::create_pool(url).await?)
            }
            Self::Host { host, port, secret } => {
                let password = SecretStore::new(&SystemRunner).fetch_latest(secret).await?;
                tracing::info!(%host, port, database = DB_NAME, "Connecting to database");
                let options = connect_options(host, *port, &password);
                Ok(surf_bot_store::create_pool_with(options).await?)
            }
        }
    }
}

/// Connect options for the bootstrapped database.
fn connect_options(host: &str, port: u16, password: &SecretString) -> PgConnectOptions {
    PgConnectOptions::new()
        .host(host)
        .port(port)
        .username(DB_USER)
        .password(password.expose_secret())
        .database(DB_NAME)
}

fn parse_port(value: &str) -> Result<u16, ConfigError> {
    value.trim().parse().map_err(|_| {
        ConfigError::InvalidEnvVar("SURF_DB_PORT".to_owned(), format!("not a port: {value}"))
    })
}
