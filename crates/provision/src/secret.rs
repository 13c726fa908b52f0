//! Secret store access (Google Secret Manager via `gcloud`).
//!
//! The password is read as the base64 `payload.data` of the latest secret
//! version and decoded in process, so the plaintext never passes through a
//! shell or an argument list. It is returned as a [`SecretString`] and
//! lives only as long as the caller keeps it.

use base64::Engine;
use base64::engine::general_purpose::{STANDARD, STANDARD_NO_PAD, URL_SAFE, URL_SAFE_NO_PAD};
use secrecy::SecretString;

use crate::command::{CommandRunner, Invocation, run_checked};
use crate::config::SecretRef;
use crate::error::ProvisionError;

/// Read-only client for the secret store.
pub struct SecretStore<'a, R> {
    runner: &'a R,
}

impl<'a, R: CommandRunner> SecretStore<'a, R> {
    #[must_use]
    pub const fn new(runner: &'a R) -> Self {
        Self { runner }
    }

    /// Fetch and decode the latest version of `secret`.
    ///
    /// # Errors
    ///
    /// Returns `ProvisionError::CommandFailed` if `gcloud` fails,
    /// `ProvisionError::EmptySecret` if the value is empty, and
    /// `ProvisionError::SecretEncoding`/`SecretUtf8` if it cannot be decoded.
    pub async fn fetch_latest(&self, secret: &SecretRef) -> Result<SecretString, ProvisionError> {
        let mut invocation = Invocation::new("gcloud")
            .args(["secrets", "versions", "access", "latest"])
            .arg(format!("--secret={}", secret.name));
        if let Some(project) = &secret.project {
            invocation = invocation.arg(format!("--project={project}"));
        }
        let invocation = invocation.arg("--format=get(payload.data)");

        let output = run_checked(self.runner, &invocation).await?;
        decode_payload(&secret.name, &output.stdout)
    }
}

/// Decode a base64 secret payload into a non-empty credential.
///
/// gcloud prints URL-safe base64; the standard alphabet and unpadded forms
/// are accepted as well. Trailing line breaks in the decoded value are
/// dropped, matching what a shell command substitution would keep.
///
/// # Errors
///
/// Returns `ProvisionError::EmptySecret` if the payload or the decoded
/// value is empty or whitespace, `ProvisionError::SecretEncoding` if the
/// payload is not base64 and `ProvisionError::SecretUtf8` if the decoded
/// bytes are not UTF-8.
pub fn decode_payload(name: &str, payload: &str) -> Result<SecretString, ProvisionError> {
    let payload = payload.trim();
    if payload.is_empty() {
        return Err(ProvisionError::EmptySecret {
            name: name.to_owned(),
        });
    }

    let bytes = [URL_SAFE, STANDARD, URL_SAFE_NO_PAD]
        .iter()
        .find_map(|engine| engine.decode(payload).ok())
        .map_or_else(|| STANDARD_NO_PAD.decode(payload), Ok)
        .map_err(|source| ProvisionError::SecretEncoding {
            name: name.to_owned(),
            source,
        })?;

    let text = String::from_utf8(bytes).map_err(|_| ProvisionError::SecretUtf8 {
        name: name.to_owned(),
    })?;

    let password = text.trim_end_matches(['\r', '\n']);
    if password.trim().is_empty() {
        return Err(ProvisionError::EmptySecret {
            name: name.to_owned(),
        });
    }

    Ok(SecretString::from(password.to_owned()))
}
