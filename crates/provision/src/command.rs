//! External command invocation.
//!
//! Every collaborator (package manager, service manager, container runtime,
//! secret store) is driven through its CLI. [`CommandRunner`] is the seam
//! between the bootstrap logic and the host so the procedure can be
//! exercised without touching a real machine.

use std::fmt;
use std::future::Future;
use std::process::Stdio;

use secrecy::{ExposeSecret, SecretString};

use crate::error::ProvisionError;

/// A fully described external command.
///
/// Secret environment values are handed to the child process only; they
/// never appear in the command line, `Display` output or logs.
#[derive(Debug, Clone)]
pub struct Invocation {
    program: String,
    args: Vec<String>,
    env: Vec<(String, String)>,
    secret_env: Vec<(String, SecretString)>,
}

impl Invocation {
    /// Start describing a call to `program`.
    #[must_use]
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            env: Vec::new(),
            secret_env: Vec::new(),
        }
    }

    /// Append one argument.
    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments.
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Set a plain environment variable for the child.
    #[must_use]
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    /// Set a secret environment variable for the child.
    #[must_use]
    pub fn secret_env(mut self, key: impl Into<String>, value: SecretString) -> Self {
        self.secret_env.push((key.into(), value));
        self
    }

    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    #[must_use]
    pub fn arguments(&self) -> &[String] {
        &self.args
    }

    #[must_use]
    pub fn env_vars(&self) -> &[(String, String)] {
        &self.env
    }

    #[must_use]
    pub fn secret_env_vars(&self) -> &[(String, SecretString)] {
        &self.secret_env
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Captured result of a finished command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, or `None` if the process was killed by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// A successful run with the given standard output.
    #[must_use]
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            code: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// A failed run with the given exit code and standard error.
    #[must_use]
    pub fn failed(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    #[must_use]
    pub const fn success(&self) -> bool {
        matches!(self.code, Some(0))
    }

    /// Convert a non-zero exit into [`ProvisionError::CommandFailed`].
    ///
    /// # Errors
    ///
    /// Returns `ProvisionError::CommandFailed` unless the command exited 0.
    pub fn check(self, invocation: &Invocation) -> Result<Self, ProvisionError> {
        if self.success() {
            Ok(self)
        } else {
            Err(ProvisionError::CommandFailed {
                command: invocation.to_string(),
                code: self.code,
                stderr: self.stderr,
            })
        }
    }
}

/// Runs external commands to completion.
///
/// Implementations return the captured output for any exit status; only a
/// failure to launch the program is an error at this level.
pub trait CommandRunner: Send + Sync {
    /// Run `invocation` and wait for it to exit.
    fn run(
        &self,
        invocation: &Invocation,
    ) -> impl Future<Output = Result<CommandOutput, ProvisionError>> + Send;
}

/// Run a command and fail on non-zero exit.
///
/// # Errors
///
/// Returns `ProvisionError::Spawn` if the program cannot be started and
/// `ProvisionError::CommandFailed` if it exits unsuccessfully.
pub async fn run_checked<R: CommandRunner>(
    runner: &R,
    invocation: &Invocation,
) -> Result<CommandOutput, ProvisionError> {
    runner.run(invocation).await?.check(invocation)
}

/// Runs commands on the local host with `tokio::process`.
///
/// Standard input is closed and both output streams are captured.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    async fn run(&self, invocation: &Invocation) -> Result<CommandOutput, ProvisionError> {
        tracing::debug!(command = %invocation, "Running command");

        let mut command = tokio::process::Command::new(invocation.program());
        command
            .args(invocation.arguments())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        for (key, value) in invocation.env_vars() {
            command.env(key, value);
        }
        for (key, value) in invocation.secret_env_vars() {
            command.env(key, value.expose_secret());
        }

        let output = command
            .output()
            .await
            .map_err(|source| ProvisionError::Spawn {
                program: invocation.program().to_owned(),
                source,
            })?;

        let result = CommandOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };

        tracing::debug!(command = %invocation, code = ?result.code, "Command finished");
        Ok(result)
    }
}
