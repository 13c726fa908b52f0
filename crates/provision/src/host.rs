//! Package manager and service manager steps.
//!
//! Both rely on the underlying tool for idempotency: installing an
//! installed package and enabling an enabled unit are no-ops that exit 0.

use crate::command::{CommandRunner, Invocation, run_checked};
use crate::error::ProvisionError;

/// Debian/Ubuntu package manager (`apt-get`).
pub struct PackageManager<'a, R> {
    runner: &'a R,
}

impl<'a, R: CommandRunner> PackageManager<'a, R> {
    #[must_use]
    pub const fn new(runner: &'a R) -> Self {
        Self { runner }
    }

    /// Refresh the package index.
    ///
    /// # Errors
    ///
    /// Returns `ProvisionError` if `apt-get update` fails.
    pub async fn update_index(&self) -> Result<(), ProvisionError> {
        run_checked(self.runner, &apt().arg("update")).await?;
        Ok(())
    }

    /// Install `packages`, skipping any already present.
    ///
    /// # Errors
    ///
    /// Returns `ProvisionError` if `apt-get install` fails.
    pub async fn install(&self, packages: &[String]) -> Result<(), ProvisionError> {
        if packages.is_empty() {
            return Ok(());
        }
        let invocation = apt().args(["install", "-y"]).args(packages.iter().cloned());
        run_checked(self.runner, &invocation).await?;
        Ok(())
    }
}

fn apt() -> Invocation {
    Invocation::new("apt-get").env("DEBIAN_FRONTEND", "noninteractive")
}

/// systemd service manager (`systemctl`).
pub struct ServiceManager<'a, R> {
    runner: &'a R,
}

impl<'a, R: CommandRunner> ServiceManager<'a, R> {
    #[must_use]
    pub const fn new(runner: &'a R) -> Self {
        Self { runner }
    }

    /// Start `unit` now and on every boot.
    ///
    /// # Errors
    ///
    /// Returns `ProvisionError` if `systemctl enable --now` fails.
    pub async fn enable_now(&self, unit: &str) -> Result<(), ProvisionError> {
        let invocation = Invocation::new("systemctl").args(["enable", "--now", unit]);
        run_checked(self.runner, &invocation).await?;
        Ok(())
    }
}
