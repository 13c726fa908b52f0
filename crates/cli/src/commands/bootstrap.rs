//! Host bootstrap command.
//!
//! # Usage
//!
//! ```bash
//! # On a fresh Debian/Ubuntu VM, as root
//! surf-cli bootstrap
//! ```
//!
//! # Environment Variables
//!
//! - `SURF_SECRET_NAME` - Secret holding the database password
//!   (default: `surf-bot-db-password`)
//! - `SURF_GCP_PROJECT` - Project of the secret (default: gcloud's active
//!   project)

use surf_bot_provision::{BootstrapConfig, Bootstrapper, ReconcileOutcome, SystemRunner};
use tracing::info;

use crate::error::CliError;

/// Bring the local host to a running database container.
///
/// # Errors
///
/// Returns `CliError::Config` if the environment is invalid and
/// `CliError::Provision` if any step fails.
pub async fn run() -> Result<(), CliError> {
    let config = BootstrapConfig::from_env()?;
    info!(
        container = %config.container,
        image = %config.image,
        secret = %config.secret.name,
        "Bootstrapping database host"
    );

    let report = Bootstrapper::new(config, SystemRunner).run().await?;

    match report.container {
        ReconcileOutcome::Created => info!("Database container created"),
        ReconcileOutcome::Replaced { was_running } => {
            info!(was_running, "Database container replaced");
        }
    }
    Ok(())
}
