//! In-memory stand-ins for the host used by unit tests.

use std::sync::{Arc, Mutex};

use secrecy::ExposeSecret;

use crate::command::{CommandOutput, CommandRunner, Invocation};
use crate::error::ProvisionError;

/// A command as seen by [`FakeRunner`], with secret values exposed for
/// assertions.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub line: String,
    pub env: Vec<(String, String)>,
    pub secret_env: Vec<(String, String)>,
}

type Responder = Box<dyn Fn(&str) -> CommandOutput + Send + Sync>;

/// Records every invocation and answers from a closure keyed on the
/// command line.
pub struct FakeRunner {
    respond: Responder,
    calls: Mutex<Vec<RecordedCall>>,
}

impl FakeRunner {
    pub fn new(respond: impl Fn(&str) -> CommandOutput + Send + Sync + 'static) -> Self {
        Self {
            respond: Box::new(respond),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Every command succeeds with empty output.
    pub fn succeeding() -> Self {
        Self::new(|_| CommandOutput::ok(""))
    }

    #[allow(clippy::unwrap_used)]
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn lines(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.line).collect()
    }
}

impl CommandRunner for FakeRunner {
    async fn run(&self, invocation: &Invocation) -> Result<CommandOutput, ProvisionError> {
        let line = invocation.to_string();
        let call = RecordedCall {
            line: line.clone(),
            env: invocation.env_vars().to_vec(),
            secret_env: invocation
                .secret_env_vars()
                .iter()
                .map(|(k, v)| (k.clone(), v.expose_secret().to_owned()))
                .collect(),
        };
        #[allow(clippy::unwrap_used)]
        self.calls.lock().unwrap().push(call);
        Ok((self.respond)(&line))
    }
}

/// State of the single reserved container on a simulated Docker host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FakeContainer {
    /// Monotonic creation counter, standing in for a creation timestamp.
    pub created: u32,
    pub running: bool,
}

/// A simulated host tracking volumes and one named container, driven by
/// the same command lines the real tools receive.
#[derive(Debug, Default)]
pub struct FakeHost {
    pub volume_exists: bool,
    pub container: Option<FakeContainer>,
    pub creations: u32,
    /// Base64 payload returned by the secret store.
    pub secret_payload: String,
}

impl FakeHost {
    pub fn with_secret(payload: &str) -> Arc<Mutex<Self>> {
        Arc::new(Mutex::new(Self {
            secret_payload: payload.to_owned(),
            ..Self::default()
        }))
    }

    /// Answer a command line and apply its effect to the host.
    pub fn handle(&mut self, line: &str) -> CommandOutput {
        let id = |c: Option<FakeContainer>| c.map(|c| format!("{:012x}\n", c.created));
        if line.starts_with("docker volume create") {
            self.volume_exists = true;
            CommandOutput::ok("postgres-data\n")
        } else if line.starts_with("docker ps -a") {
            CommandOutput::ok(id(self.container).unwrap_or_default())
        } else if line.starts_with("docker ps") {
            CommandOutput::ok(id(self.container.filter(|c| c.running)).unwrap_or_default())
        } else if line.starts_with("docker stop") {
            match self.container.as_mut() {
                Some(c) => {
                    c.running = false;
                    CommandOutput::ok("surf-postgres\n")
                }
                None => CommandOutput::failed(1, "Error response from daemon: No such container"),
            }
        } else if line.starts_with("docker rm") {
            match self.container.take() {
                Some(c) if c.running => {
                    self.container = Some(c);
                    CommandOutput::failed(1, "cannot remove a running container")
                }
                Some(_) => CommandOutput::ok("surf-postgres\n"),
                None => CommandOutput::failed(1, "Error response from daemon: No such container"),
            }
        } else if line.starts_with("docker run") {
            if self.container.is_some() {
                return CommandOutput::failed(125, "Conflict. The container name is already in use");
            }
            self.creations += 1;
            self.container = Some(FakeContainer {
                created: self.creations,
                running: true,
            });
            CommandOutput::ok(format!("{:064x}\n", self.creations))
        } else if line.starts_with("gcloud secrets versions access") {
            CommandOutput::ok(format!("{}\n", self.secret_payload))
        } else {
            CommandOutput::ok("")
        }
    }

    /// A runner that forwards every command to `host`.
    #[allow(clippy::unwrap_used)]
    pub fn runner(host: &Arc<Mutex<Self>>) -> FakeRunner {
        let host = Arc::clone(host);
        FakeRunner::new(move |line| host.lock().unwrap().handle(line))
    }
}
