//! Full bootstrap against the local machine.
//!
//! These tests require:
//! - root on a Debian/Ubuntu host with network access
//! - gcloud credentials able to read the database password secret
//!
//! They replace any existing `surf-postgres` container.

#![allow(clippy::unwrap_used)]

use surf_bot_provision::config::CONTAINER_NAME;
use surf_bot_provision::{
    BootstrapConfig, Bootstrapper, CommandRunner, Invocation, ReconcileOutcome, SystemRunner,
};

/// IDs of containers named `surf-postgres`, running or not.
async fn container_ids() -> Vec<String> {
    let filter = format!("name=^{CONTAINER_NAME}$");
    let output = SystemRunner
        .run(&Invocation::new("docker").args([
            "ps",
            "-a",
            "--no-trunc",
            "--filter",
            filter.as_str(),
            "--format",
            "{{.ID}} {{.State}}",
        ]))
        .await
        .unwrap();
    assert!(output.success(), "docker ps failed: {}", output.stderr);
    output.stdout.lines().map(str::to_owned).collect()
}

#[tokio::test]
#[ignore = "Requires root, Docker and Secret Manager access; replaces surf-postgres"]
async fn test_repeated_bootstrap_replaces_container() {
    let bootstrapper = Bootstrapper::new(BootstrapConfig::from_env().unwrap(), SystemRunner);

    bootstrapper.run().await.unwrap();
    let first = container_ids().await;
    assert_eq!(first.len(), 1);

    let report = bootstrapper.run().await.unwrap();
    let second = container_ids().await;

    assert_eq!(
        report.container,
        ReconcileOutcome::Replaced { was_running: true }
    );
    assert_eq!(second.len(), 1);
    assert_ne!(first, second);
    assert!(second.first().unwrap().ends_with(" running"));
}
