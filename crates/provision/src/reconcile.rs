//! Replace-by-name reconciliation for singleton external resources.
//!
//! A [`NamedResource`] is anything addressed by a fixed name that can be
//! inspected, stopped, removed and created. [`reconcile`] drives it to
//! "exactly one fresh instance" regardless of what existed before: prior
//! instances are never reused or patched in place.

use std::fmt;
use std::future::Future;

use crate::error::ProvisionError;

/// Observed state of a named resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceState {
    Absent,
    Stopped,
    Running,
}

impl fmt::Display for ResourceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Absent => "absent",
            Self::Stopped => "stopped",
            Self::Running => "running",
        })
    }
}

/// A singleton resource managed by name.
pub trait NamedResource: Sync {
    /// Desired-state description passed to [`NamedResource::create`].
    type Spec: Sync;

    /// The reserved name.
    fn name(&self) -> &str;

    /// Look up the current state.
    fn state(&self) -> impl Future<Output = Result<ResourceState, ProvisionError>> + Send;

    /// Stop a running instance.
    fn stop(&self) -> impl Future<Output = Result<(), ProvisionError>> + Send;

    /// Remove a stopped instance.
    fn remove(&self) -> impl Future<Output = Result<(), ProvisionError>> + Send;

    /// Create and start a fresh instance.
    fn create(&self, spec: &Self::Spec) -> impl Future<Output = Result<(), ProvisionError>> + Send;
}

/// What [`reconcile`] had to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// Nothing existed under the name.
    Created,
    /// A prior instance was removed first.
    Replaced { was_running: bool },
}

/// Stop and remove whatever exists under the resource's name, then create
/// it from `spec`.
///
/// # Errors
///
/// Returns the first `ProvisionError` raised by any step. A failure after
/// removal leaves nothing under the name; the next run creates it.
pub async fn reconcile<T: NamedResource>(
    resource: &T,
    spec: &T::Spec,
) -> Result<ReconcileOutcome, ProvisionError> {
    let state = resource.state().await?;
    tracing::info!(name = resource.name(), %state, "Reconciling resource");

    if state == ResourceState::Running {
        resource.stop().await?;
        tracing::info!(name = resource.name(), "Stopped previous instance");
    }
    if state != ResourceState::Absent {
        resource.remove().await?;
        tracing::info!(name = resource.name(), "Removed previous instance");
    }

    resource.create(spec).await?;
    tracing::info!(name = resource.name(), "Created fresh instance");

    Ok(match state {
        ResourceState::Absent => ReconcileOutcome::Created,
        ResourceState::Stopped => ReconcileOutcome::Replaced { was_running: false },
        ResourceState::Running => ReconcileOutcome::Replaced { was_running: true },
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    /// Resource whose state is a plain field, recording the calls made.
    struct Slot {
        state: Mutex<ResourceState>,
        calls: Mutex<Vec<String>>,
        fail_create: bool,
    }

    impl Slot {
        fn new(state: ResourceState) -> Self {
            Self {
                state: Mutex::new(state),
                calls: Mutex::new(Vec::new()),
                fail_create: false,
            }
        }

        fn record(&self, call: &str) {
            self.calls.lock().unwrap().push(call.to_owned());
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn current(&self) -> ResourceState {
            *self.state.lock().unwrap()
        }
    }

    impl NamedResource for Slot {
        type Spec = ();

        fn name(&self) -> &str {
            "slot"
        }

        async fn state(&self) -> Result<ResourceState, ProvisionError> {
            Ok(self.current())
        }

        async fn stop(&self) -> Result<(), ProvisionError> {
            self.record("stop");
            *self.state.lock().unwrap() = ResourceState::Stopped;
            Ok(())
        }

        async fn remove(&self) -> Result<(), ProvisionError> {
            self.record("remove");
            assert_eq!(self.current(), ResourceState::Stopped, "removed while running");
            *self.state.lock().unwrap() = ResourceState::Absent;
            Ok(())
        }

        async fn create(&self, _spec: &()) -> Result<(), ProvisionError> {
            self.record("create");
            if self.fail_create {
                return Err(ProvisionError::CommandFailed {
                    command: "create slot".to_owned(),
                    code: Some(125),
                    stderr: String::new(),
                });
            }
            assert_eq!(self.current(), ResourceState::Absent, "name still taken");
            *self.state.lock().unwrap() = ResourceState::Running;
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_absent_is_created() {
        let slot = Slot::new(ResourceState::Absent);
        let outcome = reconcile(&slot, &()).await.unwrap();
        assert_eq!(outcome, ReconcileOutcome::Created);
        assert_eq!(slot.calls(), vec!["create"]);
        assert_eq!(slot.current(), ResourceState::Running);
    }

    #[tokio::test]
    async fn test_stopped_is_removed_then_created() {
        let slot = Slot::new(ResourceState::Stopped);
        let outcome = reconcile(&slot, &()).await.unwrap();
        assert_eq!(outcome, ReconcileOutcome::Replaced { was_running: false });
        assert_eq!(slot.calls(), vec!["remove", "create"]);
    }

    #[tokio::test]
    async fn test_running_is_stopped_removed_then_created() {
        let slot = Slot::new(ResourceState::Running);
        let outcome = reconcile(&slot, &()).await.unwrap();
        assert_eq!(outcome, ReconcileOutcome::Replaced { was_running: true });
        assert_eq!(slot.calls(), vec!["stop", "remove", "create"]);
        assert_eq!(slot.current(), ResourceState::Running);
    }

    #[tokio::test]
    async fn test_create_failure_is_returned() {
        let slot = Slot {
            fail_create: true,
            ..Slot::new(ResourceState::Running)
        };
        let err = reconcile(&slot, &()).await.unwrap_err();
        assert_eq!(err.exit_code(), 125);
        assert_eq!(slot.current(), ResourceState::Absent);
    }
}
