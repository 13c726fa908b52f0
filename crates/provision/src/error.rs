//! Provisioning errors.
//!
//! Two kinds of failure exist: an external tool that could not be started
//! or exited non-zero, and a fetched credential that failed validation.
//! Neither is recovered locally.

use thiserror::Error;

use crate::config::ConfigError;

/// Errors that abort a bootstrap run.
#[derive(Debug, Error)]
pub enum ProvisionError {
    /// The external program could not be started (e.g. not installed).
    #[error("failed to launch `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The external program ran and exited unsuccessfully.
    #[error("`{command}` failed with {}: {}", describe_code(*.code), .stderr.trim())]
    CommandFailed {
        /// The command line, without secret values.
        command: String,
        /// Exit code, or `None` if the process was killed by a signal.
        code: Option<i32>,
        stderr: String,
    },

    /// The secret store returned an empty credential.
    #[error("secret `{name}` is empty; refusing to start the database without a password")]
    EmptySecret { name: String },

    /// The secret payload was not valid base64.
    #[error("secret `{name}` payload is not valid base64: {source}")]
    SecretEncoding {
        name: String,
        #[source]
        source: base64::DecodeError,
    },

    /// The decoded secret was not valid UTF-8.
    #[error("secret `{name}` is not valid UTF-8")]
    SecretUtf8 { name: String },

    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

fn describe_code(code: Option<i32>) -> String {
    code.map_or_else(
        || "no exit code (terminated by signal)".to_owned(),
        |c| format!("exit code {c}"),
    )
}

impl ProvisionError {
    /// Process exit status to report for this error.
    ///
    /// A failing external command propagates its own non-zero code; every
    /// other failure, including an empty credential, exits with `1`.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::CommandFailed {
                code: Some(code), ..
            } if *code != 0 => *code,
            _ => 1,
        }
    }
}
