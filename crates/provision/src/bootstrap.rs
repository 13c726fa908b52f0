//! The sequential bootstrap procedure.
//!
//! Steps run strictly in order and the first failure aborts the run. The
//! only state carried between steps is the database password, held in
//! memory from step 4 until the container has been created.

use std::fmt;

use secrecy::SecretString;

use crate::command::CommandRunner;
use crate::config::BootstrapConfig;
use crate::docker::{ContainerRuntime, ContainerSpec, DockerContainer};
use crate::error::ProvisionError;
use crate::host::{PackageManager, ServiceManager};
use crate::reconcile::{ReconcileOutcome, reconcile};
use crate::secret::SecretStore;

/// One numbered step of the bootstrap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapStep {
    InstallPackages,
    EnableService,
    EnsureVolume,
    FetchSecret,
    ReconcileContainer,
}

impl BootstrapStep {
    pub const ALL: [Self; 5] = [
        Self::InstallPackages,
        Self::EnableService,
        Self::EnsureVolume,
        Self::FetchSecret,
        Self::ReconcileContainer,
    ];

    /// 1-based position in the run.
    #[must_use]
    pub const fn number(self) -> usize {
        match self {
            Self::InstallPackages => 1,
            Self::EnableService => 2,
            Self::EnsureVolume => 3,
            Self::FetchSecret => 4,
            Self::ReconcileContainer => 5,
        }
    }

    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::InstallPackages => "Installing packages",
            Self::EnableService => "Enabling container runtime",
            Self::EnsureVolume => "Ensuring data volume",
            Self::FetchSecret => "Fetching database password",
            Self::ReconcileContainer => "Replacing database container",
        }
    }
}

impl fmt::Display for BootstrapStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}/{}] {}",
            self.number(),
            Self::ALL.len(),
            self.description()
        )
    }
}

/// Summary of a successful run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BootstrapReport {
    pub container: ReconcileOutcome,
}

/// Runs the bootstrap against a host reachable through `R`.
pub struct Bootstrapper<R> {
    config: BootstrapConfig,
    runner: R,
}

impl<R: CommandRunner> Bootstrapper<R> {
    #[must_use]
    pub const fn new(config: BootstrapConfig, runner: R) -> Self {
        Self { config, runner }
    }

    #[must_use]
    pub const fn config(&self) -> &BootstrapConfig {
        &self.config
    }

    /// Run every step in order.
    ///
    /// # Errors
    ///
    /// Returns the `ProvisionError` of the first failing step. Later steps
    /// are not attempted.
    pub async fn run(&self) -> Result<BootstrapReport, ProvisionError> {
        run_step(BootstrapStep::InstallPackages, self.install_packages()).await?;
        run_step(BootstrapStep::EnableService, self.enable_service()).await?;
        run_step(BootstrapStep::EnsureVolume, self.ensure_volume()).await?;
        let password = run_step(BootstrapStep::FetchSecret, self.fetch_password()).await?;
        let container = run_step(
            BootstrapStep::ReconcileContainer,
            self.replace_container(password),
        )
        .await?;

        tracing::info!(
            container = %self.config.container,
            outcome = ?container,
            "Bootstrap complete"
        );
        Ok(BootstrapReport { container })
    }

    async fn install_packages(&self) -> Result<(), ProvisionError> {
        let apt = PackageManager::new(&self.runner);
        apt.update_index().await?;
        apt.install(&self.config.packages).await
    }

    async fn enable_service(&self) -> Result<(), ProvisionError> {
        ServiceManager::new(&self.runner)
            .enable_now(&self.config.service)
            .await
    }

    async fn ensure_volume(&self) -> Result<(), ProvisionError> {
        ContainerRuntime::new(&self.runner)
            .ensure_volume(&self.config.volume)
            .await
    }

    async fn fetch_password(&self) -> Result<SecretString, ProvisionError> {
        let password = SecretStore::new(&self.runner)
            .fetch_latest(&self.config.secret)
            .await?;
        tracing::info!(secret = %self.config.secret.name, "Database password retrieved");
        Ok(password)
    }

    async fn replace_container(
        &self,
        password: SecretString,
    ) -> Result<ReconcileOutcome, ProvisionError> {
        let container = DockerContainer::new(&self.runner, self.config.container.clone());
        reconcile(&container, &self.container_spec(password)).await
    }

    /// Desired database container, with `password` passed through the
    /// environment.
    #[must_use]
    pub fn container_spec(&self, password: SecretString) -> ContainerSpec {
        let config = &self.config;
        ContainerSpec {
            image: config.image.clone(),
            env: vec![
                ("POSTGRES_USER".to_owned(), config.db_user.clone()),
                ("POSTGRES_DB".to_owned(), config.db_name.clone()),
            ],
            secret_env: vec![("POSTGRES_PASSWORD".to_owned(), password)],
            volumes: vec![(config.volume.clone(), config.data_dir.clone())],
            ports: vec![(config.port, config.port)],
            restart: Some(config.restart_policy.clone()),
        }
    }
}

/// Announce `step`, run it and log how it ended.
async fn run_step<T>(
    step: BootstrapStep,
    work: impl Future<Output = Result<T, ProvisionError>>,
) -> Result<T, ProvisionError> {
    tracing::info!("{step}");
    let value = work.await.inspect_err(|e| {
        tracing::error!(step = step.number(), error = %e, "Bootstrap step failed");
    })?;
    tracing::info!(step = step.number(), "Step complete");
    Ok(value)
}
