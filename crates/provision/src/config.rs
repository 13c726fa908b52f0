//! Bootstrap configuration.
//!
//! Host resource names, the image and the database identity are fixed
//! constants shared with the application; only the secret location can be
//! overridden from the environment.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `SURF_SECRET_NAME` - Secret Manager secret holding the database password
//!   (default: `surf-bot-db-password`)
//! - `SURF_GCP_PROJECT` - Google Cloud project for the secret (default: the
//!   gcloud CLI's active project)

use thiserror::Error;

/// Database role created in the container.
pub const DB_USER: &str = "surf_bot_user";
/// Database created in the container.
pub const DB_NAME: &str = "surf_bot_db";
/// Standard `PostgreSQL` port, published on the host.
pub const DB_PORT: u16 = 5432;

/// Named volume holding the database files.
pub const VOLUME_NAME: &str = "postgres-data";
/// Reserved name of the single database container.
pub const CONTAINER_NAME: &str = "surf-postgres";
/// Pinned database image.
pub const POSTGRES_IMAGE: &str = "postgres:16";
/// Data directory inside the image.
pub const POSTGRES_DATA_DIR: &str = "/var/lib/postgresql/data";
/// Docker restart policy for the database container.
pub const RESTART_POLICY: &str = "unless-stopped";

/// Container runtime, TLS tooling and the cloud CLI used for secrets.
pub const PACKAGES: &[&str] = &["docker.io", "ca-certificates", "google-cloud-cli"];
/// systemd unit of the container runtime.
pub const DOCKER_SERVICE: &str = "docker";

/// Default Secret Manager secret name.
pub const DEFAULT_SECRET_NAME: &str = "surf-bot-db-password";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Location of a secret in the secret store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretRef {
    /// Secret name; the latest version is always read.
    pub name: String,
    /// Project override, if any.
    pub project: Option<String>,
}

impl SecretRef {
    /// Load the secret location from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if a variable is set but blank.
    pub fn from_env() -> Result<Self, ConfigError> {
        let name = get_env_or_default("SURF_SECRET_NAME", DEFAULT_SECRET_NAME);
        if name.trim().is_empty() {
            return Err(ConfigError::InvalidEnvVar(
                "SURF_SECRET_NAME".to_owned(),
                "must not be blank".to_owned(),
            ));
        }

        let project = get_optional_env("SURF_GCP_PROJECT");
        if project.as_deref().is_some_and(|p| p.trim().is_empty()) {
            return Err(ConfigError::InvalidEnvVar(
                "SURF_GCP_PROJECT".to_owned(),
                "must not be blank".to_owned(),
            ));
        }

        Ok(Self { name, project })
    }
}

impl Default for SecretRef {
    fn default() -> Self {
        Self {
            name: DEFAULT_SECRET_NAME.to_owned(),
            project: None,
        }
    }
}

/// Everything the bootstrapper needs to know about the target host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapConfig {
    /// Packages to install with the package manager.
    pub packages: Vec<String>,
    /// Service to enable and start.
    pub service: String,
    /// Named volume for the database files.
    pub volume: String,
    /// Reserved container name.
    pub container: String,
    /// Image to run.
    pub image: String,
    pub db_user: String,
    pub db_name: String,
    /// Mount point of `volume` inside the container.
    pub data_dir: String,
    /// Port published on the host and inside the container.
    pub port: u16,
    pub restart_policy: String,
    /// Where the database password lives.
    pub secret: SecretRef,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            packages: PACKAGES.iter().map(|&p| p.to_owned()).collect(),
            service: DOCKER_SERVICE.to_owned(),
            volume: VOLUME_NAME.to_owned(),
            container: CONTAINER_NAME.to_owned(),
            image: POSTGRES_IMAGE.to_owned(),
            db_user: DB_USER.to_owned(),
            db_name: DB_NAME.to_owned(),
            data_dir: POSTGRES_DATA_DIR.to_owned(),
            port: DB_PORT,
            restart_policy: RESTART_POLICY.to_owned(),
            secret: SecretRef::default(),
        }
    }
}

impl BootstrapConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if an override is present but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Ok(Self {
            secret: SecretRef::from_env()?,
            ..Self::default()
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable.
#[must_use]
pub fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
#[must_use]
pub fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_owned())
}
