//! External lookup command execution

use crate::authority::error::{AuthorityError, AuthorityResult};
use crate::core::sync::handle_mutex_poison;
use std::collections::HashSet;
use std::sync::Mutex;
use std::time::SystemTime;
use tokio::process::Command;

/// Client for the external inventory authority.
///
/// The authority's standard output is newline-delimited content identifiers;
/// each maps to an expected descriptor filename `<identifier><suffix>`. A
/// zero exit with no output is a legitimate "authority currently wants
/// nothing", distinct from a failed lookup.
pub struct AuthorityClient {
    command: Vec<String>,
    suffix: String,
    last_contact: Mutex<Option<SystemTime>>,
}

impl AuthorityClient {
    /// `command` is the program followed by its arguments
    pub fn new(command: Vec<String>, suffix: String) -> Self {
        Self {
            command,
            suffix,
            last_contact: Mutex::new(None),
        }
    }

    /// Run the lookup and derive the expected descriptor filename set.
    ///
    /// Advances the last-contact timestamp only on success, empty result
    /// included; failures leave it untouched.
    pub async fn fetch_expected_names(&self) -> AuthorityResult<HashSet<String>> {
        let program = self.command.first().ok_or_else(|| AuthorityError::Internal {
            message: "authority command is empty".to_string(),
        })?;

        let output = Command::new(program)
            .args(&self.command[1..])
            .output()
            .await
            .map_err(|e| AuthorityError::Spawn {
                program: program.clone(),
                source: e,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            if !stderr.trim().is_empty() {
                log::error!("Authority lookup stderr: {}", stderr.trim());
            }
            return Err(AuthorityError::Unavailable {
                status: output.status,
            });
        }

        self.touch_last_contact()?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        if stdout.trim().is_empty() {
            // A valid state, not an error: nothing is expected right now.
            log::debug!("Authority reports an empty inventory");
            return Ok(HashSet::new());
        }

        log::debug!("Authority lookup stdout: {}", stdout.trim());
        let expected = stdout
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|identifier| format!("{}{}", identifier, self.suffix))
            .collect();
        Ok(expected)
    }

    /// Timestamp of the last successful lookup. Reserved for retention
    /// policy; currently informational.
    pub fn last_contact(&self) -> AuthorityResult<Option<SystemTime>> {
        let guard = handle_mutex_poison(self.last_contact.lock(), |message| {
            AuthorityError::Internal { message }
        })?;
        Ok(*guard)
    }

    fn touch_last_contact(&self) -> AuthorityResult<()> {
        let mut guard = handle_mutex_poison(self.last_contact.lock(), |message| {
            AuthorityError::Internal { message }
        })?;
        *guard = Some(SystemTime::now());
        Ok(())
    }
}
