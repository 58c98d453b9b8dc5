//! Reload pipeline: validate → mutate → reload.
//!
//! Each call is a linear pipeline; the outcome enum is the only place where
//! typed failures become user-facing text.

use std::fmt;
use std::io;
use std::sync::Arc;
use std::time::Instant;

use crate::caddyfile::{CaddyfileMutator, MutatorError, MutatorResult};
use crate::config::BotConfig;
use crate::docker::{DockerClient, DockerError};
use crate::observability::metrics;
use crate::security::is_valid_address;

/// Result of one submitted address.
#[derive(Debug)]
pub enum ReloadOutcome {
    /// The text is not an IP address.
    InvalidAddress(String),
    /// A rule for the address already exists; nothing was changed.
    AlreadyPresent(String),
    /// The Caddyfile could not be updated; no reload was attempted.
    UpdateFailed(MutatorError),
    /// The rule was written but the proxy was not reloaded.
    ReloadFailed { address: String, error: DockerError },
    /// Rule written and reload started.
    Reloaded(String),
}

impl ReloadOutcome {
    /// Short label used for metrics and logs.
    pub fn label(&self) -> &'static str {
        match self {
            ReloadOutcome::InvalidAddress(_) => "invalid_address",
            ReloadOutcome::AlreadyPresent(_) => "already_present",
            ReloadOutcome::UpdateFailed(_) => "update_failed",
            ReloadOutcome::ReloadFailed { .. } => "reload_failed",
            ReloadOutcome::Reloaded(_) => "reloaded",
        }
    }

    /// Whether the submitted address is now in effect (or already was).
    pub fn is_success(&self) -> bool {
        matches!(
            self,
            ReloadOutcome::AlreadyPresent(_) | ReloadOutcome::Reloaded(_)
        )
    }
}

impl fmt::Display for ReloadOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReloadOutcome::InvalidAddress(text) => write!(f, "Invalid IP address: {:?}", text),
            ReloadOutcome::AlreadyPresent(address) => write!(f, "IP {} already present", address),
            ReloadOutcome::UpdateFailed(error) => write!(f, "Failed to update Caddyfile: {}", error),
            ReloadOutcome::ReloadFailed { address, error } => {
                write!(f, "Added {} but reload failed: {}", address, error)
            }
            ReloadOutcome::Reloaded(address) => {
                write!(f, "Added {} to Caddyfile, Caddy reload successful ✅", address)
            }
        }
    }
}

/// Sequences the Caddyfile mutation and the in-container reload.
pub struct ReloadOrchestrator {
    mutator: Arc<CaddyfileMutator>,
    docker: DockerClient,
    container_name: String,
}

impl ReloadOrchestrator {
    pub fn new(config: &BotConfig) -> Self {
        Self::from_parts(
            Arc::new(CaddyfileMutator::new(&config.caddyfile)),
            DockerClient::new(&config.docker),
            config.docker.container_name.clone(),
        )
    }

    pub fn from_parts(
        mutator: Arc<CaddyfileMutator>,
        docker: DockerClient,
        container_name: String,
    ) -> Self {
        Self {
            mutator,
            docker,
            container_name,
        }
    }

    pub fn mutator(&self) -> &CaddyfileMutator {
        &self.mutator
    }

    pub fn docker(&self) -> &DockerClient {
        &self.docker
    }

    pub fn container_name(&self) -> &str {
        &self.container_name
    }

    /// Run the pipeline for a candidate address submitted from `chat_id`.
    pub async fn handle_candidate_address(&self, chat_id: i64, raw_text: &str) -> ReloadOutcome {
        let address = raw_text.trim();
        if !is_valid_address(address) {
            tracing::info!(chat_id, candidate = %address, "Rejected invalid address");
            return ReloadOutcome::InvalidAddress(address.to_string());
        }

        let inserted = match self.add_rule(address.to_string()).await {
            Ok(inserted) => inserted,
            Err(error) => {
                tracing::error!(chat_id, address = %address, error = %error, "Caddyfile update failed");
                return ReloadOutcome::UpdateFailed(error);
            }
        };
        if !inserted {
            return ReloadOutcome::AlreadyPresent(address.to_string());
        }
        metrics::record_rule_added();

        let start = Instant::now();
        let result = self.docker.reload(&self.container_name).await;
        metrics::record_reload(result.is_ok(), start);

        match result {
            Ok(()) => {
                tracing::info!(chat_id, address = %address, "Address added and proxy reloaded");
                ReloadOutcome::Reloaded(address.to_string())
            }
            Err(error) => {
                tracing::error!(
                    chat_id,
                    address = %address,
                    container = %self.container_name,
                    error = %error,
                    "Reload failed after Caddyfile update"
                );
                ReloadOutcome::ReloadFailed {
                    address: address.to_string(),
                    error,
                }
            }
        }
    }

    /// Run the blocking mutation off the async workers.
    async fn add_rule(&self, address: String) -> MutatorResult<bool> {
        let mutator = self.mutator.clone();
        match tokio::task::spawn_blocking(move || mutator.add_rule(&address)).await {
            Ok(result) => result,
            Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
            Err(e) => Err(MutatorError::ConfigUnreadable {
                path: self.mutator.path().to_path_buf(),
                source: io::Error::new(io::ErrorKind::Interrupted, e),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_outcome_messages() {
        assert_eq!(
            ReloadOutcome::InvalidAddress("nope".into()).to_string(),
            "Invalid IP address: \"nope\""
        );
        assert_eq!(
            ReloadOutcome::AlreadyPresent("10.0.0.5".into()).to_string(),
            "IP 10.0.0.5 already present"
        );
        let update = ReloadOutcome::UpdateFailed(MutatorError::MarkerNotFound {
            marker: "# add here".into(),
            path: PathBuf::from("/etc/caddy/Caddyfile"),
        });
        assert_eq!(
            update.to_string(),
            "Failed to update Caddyfile: no '# add here' marker found in /etc/caddy/Caddyfile"
        );
        let reload = ReloadOutcome::ReloadFailed {
            address: "10.0.0.5".into(),
            error: DockerError::ContainerNotFound("caddy".into()),
        };
        assert_eq!(
            reload.to_string(),
            "Added 10.0.0.5 but reload failed: container \"caddy\" not found"
        );
    }

    #[test]
    fn test_success_classification() {
        assert!(ReloadOutcome::Reloaded("::1".into()).is_success());
        assert!(ReloadOutcome::AlreadyPresent("::1".into()).is_success());
        assert!(!ReloadOutcome::InvalidAddress("x".into()).is_success());
        assert_eq!(ReloadOutcome::Reloaded("::1".into()).label(), "reloaded");
    }

    #[tokio::test]
    async fn test_invalid_address_touches_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = BotConfig::default();
        config.caddyfile.path = dir.path().join("Caddyfile").to_string_lossy().into_owned();
        config.docker.socket_path = dir.path().join("docker.sock").to_string_lossy().into_owned();

        let orchestrator = ReloadOrchestrator::new(&config);
        let outcome = orchestrator.handle_candidate_address(1, "999.1.1.1").await;
        assert!(matches!(outcome, ReloadOutcome::InvalidAddress(ref a) if a == "999.1.1.1"));
    }
}
