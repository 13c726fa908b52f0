//! Volume and container operations through the `docker` CLI.

use secrecy::SecretString;

use crate::command::{CommandRunner, Invocation, run_checked};
use crate::error::ProvisionError;
use crate::reconcile::{NamedResource, ResourceState};

/// Volume-level operations.
pub struct ContainerRuntime<'a, R> {
    runner: &'a R,
}

impl<'a, R: CommandRunner> ContainerRuntime<'a, R> {
    #[must_use]
    pub const fn new(runner: &'a R) -> Self {
        Self { runner }
    }

    /// Create the named volume unless it already exists.
    ///
    /// # Errors
    ///
    /// Returns `ProvisionError` if the runtime rejects the volume for any
    /// reason other than it already existing.
    pub async fn ensure_volume(&self, name: &str) -> Result<(), ProvisionError> {
        let invocation = docker().args(["volume", "create", name]);
        let output = self.runner.run(&invocation).await?;
        if !output.success() && output.stderr.contains("already exists") {
            tracing::debug!(volume = name, "Volume already exists");
            return Ok(());
        }
        output.check(&invocation)?;
        Ok(())
    }
}

/// Desired configuration of a container.
#[derive(Debug, Clone, Default)]
pub struct ContainerSpec {
    pub image: String,
    /// Plain environment variables, passed as `-e KEY=VALUE`.
    pub env: Vec<(String, String)>,
    /// Secret environment variables. Only the key is put on the command
    /// line; docker reads the value from its own environment.
    pub secret_env: Vec<(String, SecretString)>,
    /// `(volume, mount point)` pairs.
    pub volumes: Vec<(String, String)>,
    /// `(host, container)` port pairs.
    pub ports: Vec<(u16, u16)>,
    pub restart: Option<String>,
}

/// Arguments for `docker run` creating `name` from `spec`, detached.
#[must_use]
pub fn run_args(name: &str, spec: &ContainerSpec) -> Vec<String> {
    let mut args = vec![
        "run".to_owned(),
        "-d".to_owned(),
        "--name".to_owned(),
        name.to_owned(),
    ];
    if let Some(policy) = &spec.restart {
        args.push("--restart".to_owned());
        args.push(policy.clone());
    }
    for (key, value) in &spec.env {
        args.push("-e".to_owned());
        args.push(format!("{key}={value}"));
    }
    for (key, _) in &spec.secret_env {
        args.push("-e".to_owned());
        args.push(key.clone());
    }
    for (volume, target) in &spec.volumes {
        args.push("-v".to_owned());
        args.push(format!("{volume}:{target}"));
    }
    for (host, container) in &spec.ports {
        args.push("-p".to_owned());
        args.push(format!("{host}:{container}"));
    }
    args.push(spec.image.clone());
    args
}

/// A container addressed by its reserved name.
pub struct DockerContainer<'a, R> {
    runner: &'a R,
    name: String,
}

impl<'a, R: CommandRunner> DockerContainer<'a, R> {
    #[must_use]
    pub fn new(runner: &'a R, name: impl Into<String>) -> Self {
        Self {
            runner,
            name: name.into(),
        }
    }

    /// Whether `docker ps` lists a container with exactly this name.
    async fn listed(&self, all: bool) -> Result<bool, ProvisionError> {
        let mut invocation = docker().arg("ps");
        if all {
            invocation = invocation.arg("-a");
        }
        let invocation = invocation
            .arg("--filter")
            .arg(format!("name=^{}$", self.name))
            .args(["--format", "{{.ID}}"]);
        let output = run_checked(self.runner, &invocation).await?;
        Ok(!output.stdout.trim().is_empty())
    }
}

impl<R: CommandRunner> NamedResource for DockerContainer<'_, R> {
    type Spec = ContainerSpec;

    fn name(&self) -> &str {
        &self.name
    }

    async fn state(&self) -> Result<ResourceState, ProvisionError> {
        if !self.listed(true).await? {
            return Ok(ResourceState::Absent);
        }
        if self.listed(false).await? {
            Ok(ResourceState::Running)
        } else {
            Ok(ResourceState::Stopped)
        }
    }

    async fn stop(&self) -> Result<(), ProvisionError> {
        run_checked(self.runner, &docker().args(["stop", self.name.as_str()])).await?;
        Ok(())
    }

    async fn remove(&self) -> Result<(), ProvisionError> {
        run_checked(self.runner, &docker().args(["rm", self.name.as_str()])).await?;
        Ok(())
    }

    async fn create(&self, spec: &ContainerSpec) -> Result<(), ProvisionError> {
        let mut invocation = docker().args(run_args(&self.name, spec));
        for (key, value) in &spec.secret_env {
            invocation = invocation.secret_env(key.clone(), value.clone());
        }
        let output = run_checked(self.runner, &invocation).await?;
        tracing::debug!(container = %self.name, id = output.stdout.trim(), "Container started");
        Ok(())
    }
}

fn docker() -> Invocation {
    Invocation::new("docker")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::command::CommandOutput;
    use crate::reconcile::{ReconcileOutcome, reconcile};
    use crate::testing::{FakeHost, FakeRunner};

    fn postgres_spec() -> ContainerSpec {
        ContainerSpec {
            image: "postgres:16".to_owned(),
            env: vec![
                ("POSTGRES_USER".to_owned(), "surf_bot_user".to_owned()),
                ("POSTGRES_DB".to_owned(), "surf_bot_db".to_owned()),
            ],
            secret_env: vec![(
                "POSTGRES_PASSWORD".to_owned(),
                SecretString::from("hunter22"),
            )],
            volumes: vec![(
                "postgres-data".to_owned(),
                "/var/lib/postgresql/data".to_owned(),
            )],
            ports: vec![(5432, 5432)],
            restart: Some("unless-stopped".to_owned()),
        }
    }

    #[test]
    fn test_run_args_layout() {
        let args = run_args("surf-postgres", &postgres_spec());
        assert_eq!(
            args.join(" "),
            "run -d --name surf-postgres --restart unless-stopped \
             -e POSTGRES_USER=surf_bot_user -e POSTGRES_DB=surf_bot_db \
             -e POSTGRES_PASSWORD -v postgres-data:/var/lib/postgresql/data \
             -p 5432:5432 postgres:16"
        );
    }

    #[test]
    fn test_run_args_never_contain_secret_value() {
        let args = run_args("surf-postgres", &postgres_spec());
        assert!(args.iter().all(|a| !a.contains("hunter22")));
    }

    #[tokio::test]
    async fn test_ensure_volume_tolerates_existing() {
        let runner = FakeRunner::new(|_| {
            CommandOutput::failed(1, "Error: volume postgres-data already exists")
        });
        ContainerRuntime::new(&runner)
            .ensure_volume("postgres-data")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_ensure_volume_other_failure_propagates() {
        let runner = FakeRunner::new(|_| {
            CommandOutput::failed(125, "Cannot connect to the Docker daemon")
        });
        let err = ContainerRuntime::new(&runner)
            .ensure_volume("postgres-data")
            .await
            .unwrap_err();
        assert_eq!(err.exit_code(), 125);
    }

    #[tokio::test]
    async fn test_state_queries_by_exact_name() {
        let host = FakeHost::with_secret("");
        let runner = FakeHost::runner(&host);
        let container = DockerContainer::new(&runner, "surf-postgres");

        assert_eq!(container.state().await.unwrap(), ResourceState::Absent);
        assert_eq!(
            runner.lines(),
            vec!["docker ps -a --filter name=^surf-postgres$ --format {{.ID}}"]
        );
    }

    #[tokio::test]
    async fn test_state_distinguishes_stopped_and_running() {
        let host = FakeHost::with_secret("");
        let runner = FakeHost::runner(&host);
        let container = DockerContainer::new(&runner, "surf-postgres");

        container.create(&postgres_spec()).await.unwrap();
        assert_eq!(container.state().await.unwrap(), ResourceState::Running);

        container.stop().await.unwrap();
        assert_eq!(container.state().await.unwrap(), ResourceState::Stopped);
    }

    #[tokio::test]
    async fn test_create_passes_password_through_environment() {
        let runner = FakeRunner::succeeding();
        let container = DockerContainer::new(&runner, "surf-postgres");

        container.create(&postgres_spec()).await.unwrap();

        let calls = runner.calls();
        let run = calls.first().unwrap();
        assert!(!run.line.contains("hunter22"));
        assert_eq!(
            run.secret_env,
            vec![("POSTGRES_PASSWORD".to_owned(), "hunter22".to_owned())]
        );
    }

    #[tokio::test]
    async fn test_reconcile_replaces_running_container() {
        let host = FakeHost::with_secret("");
        let runner = FakeHost::runner(&host);
        let container = DockerContainer::new(&runner, "surf-postgres");

        container.create(&postgres_spec()).await.unwrap();
        let before = host.lock().unwrap().container.unwrap().created;

        let outcome = reconcile(&container, &postgres_spec()).await.unwrap();

        assert_eq!(outcome, ReconcileOutcome::Replaced { was_running: true });
        let after = host.lock().unwrap().container.unwrap();
        assert!(after.running);
        assert!(after.created > before);
    }

    #[tokio::test]
    async fn test_reconcile_removes_stopped_container_without_stopping() {
        let host = FakeHost::with_secret("");
        let runner = FakeHost::runner(&host);
        let container = DockerContainer::new(&runner, "surf-postgres");
        container.create(&postgres_spec()).await.unwrap();
        container.stop().await.unwrap();
        let issued_before = runner.lines().len();

        let outcome = reconcile(&container, &postgres_spec()).await.unwrap();

        assert_eq!(outcome, ReconcileOutcome::Replaced { was_running: false });
        let lines = runner.lines();
        let issued = lines.get(issued_before..).unwrap();
        assert!(!issued.iter().any(|l| l.starts_with("docker stop")));
        assert!(issued.iter().any(|l| l == "docker rm surf-postgres"));
    }
}
