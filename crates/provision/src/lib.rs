//! Surf Bot Provision - One-shot host bootstrap for the surf bot database.
//!
//! Brings a bare Debian/Ubuntu VM to a state where a single `PostgreSQL`
//! container named `surf-postgres` is running with a password pulled from
//! Google Secret Manager. Safe to re-run: every step is idempotent and the
//! container is replaced, never reused.
//!
//! # Steps
//!
//! 1. Install packages (`apt-get`)
//! 2. Enable and start the Docker daemon (`systemctl`)
//! 3. Ensure the `postgres-data` volume exists
//! 4. Fetch and decode the database password (`gcloud secrets`)
//! 5. Stop, remove and recreate the `surf-postgres` container
//!
//! Any failing step aborts the run; nothing is retried.
//!
//! # Modules
//!
//! - [`bootstrap`] - The sequential bootstrap procedure
//! - [`command`] - External command invocation behind the [`CommandRunner`] seam
//! - [`host`] - Package manager and service manager steps
//! - [`docker`] - Volume and container operations
//! - [`reconcile`] - Generic replace-by-name reconciliation
//! - [`secret`] - Secret store access and payload decoding

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod bootstrap;
pub mod command;
pub mod config;
pub mod docker;
pub mod error;
pub mod host;
pub mod reconcile;
pub mod secret;

#[cfg(test)]
mod testing;

pub use bootstrap::{BootstrapReport, BootstrapStep, Bootstrapper};
pub use command::{CommandOutput, CommandRunner, Invocation, SystemRunner};
pub use config::{BootstrapConfig, ConfigError, SecretRef};
pub use error::ProvisionError;
pub use reconcile::{NamedResource, ReconcileOutcome, ResourceState, reconcile};
pub use secret::SecretStore;
