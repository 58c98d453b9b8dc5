//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, addresses parse)
//! - Check the rule template can actually be rendered
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: BotConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::{BotConfig, ADDRESS_PLACEHOLDER};

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Validate a loaded configuration.
pub fn validate_config(config: &BotConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let caddy = &config.caddyfile;
    if caddy.path.trim().is_empty() {
        errors.push(ValidationError::new("caddyfile.path", "must not be empty"));
    }
    if caddy.marker.is_empty() {
        errors.push(ValidationError::new("caddyfile.marker", "must not be empty"));
    }
    if caddy.marker.contains('\n') {
        errors.push(ValidationError::new("caddyfile.marker", "must be a single line"));
    }
    if !caddy.rule_template.contains(ADDRESS_PLACEHOLDER) {
        errors.push(ValidationError::new(
            "caddyfile.rule_template",
            format!("must contain the {} placeholder", ADDRESS_PLACEHOLDER),
        ));
    }
    if caddy.rule_template.contains('\n') || caddy.rule_template.contains('\r') {
        errors.push(ValidationError::new(
            "caddyfile.rule_template",
            "must render to a single line",
        ));
    }

    let docker = &config.docker;
    if docker.socket_path.trim().is_empty() {
        errors.push(ValidationError::new("docker.socket_path", "must not be empty"));
    }
    if docker.container_name.trim().is_empty() {
        errors.push(ValidationError::new("docker.container_name", "must not be empty"));
    }
    if docker.reload_command.is_empty() || docker.reload_command[0].is_empty() {
        errors.push(ValidationError::new(
            "docker.reload_command",
            "must name a program to run",
        ));
    }
    if docker.timeout_secs == 0 {
        errors.push(ValidationError::new("docker.timeout_secs", "must be greater than 0"));
    }

    if let Err(e) = url::Url::parse(&config.telegram.api_base_url) {
        errors.push(ValidationError::new(
            "telegram.api_base_url",
            format!("invalid URL: {}", e),
        ));
    }
    if config.telegram.poll_timeout_secs == 0 {
        errors.push(ValidationError::new(
            "telegram.poll_timeout_secs",
            "must be greater than 0",
        ));
    }

    let obs = &config.observability;
    if obs.metrics_enabled && obs.metrics_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("'{}' is not a socket address", obs.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
