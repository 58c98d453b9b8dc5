//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::BotConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid environment variable {key}: {message}")]
    Env { key: &'static str, message: String },

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load configuration: optional TOML file, then environment overrides, then validation.
pub fn load_config(path: Option<&Path>) -> Result<BotConfig, ConfigError> {
    let config = match path {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            toml::from_str(&content)?
        }
        None => BotConfig::default(),
    };

    let config = apply_env_overrides(config, |key| std::env::var(key).ok())?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Apply the deployment environment variables on top of a config.
///
/// Empty values are treated as unset.
pub fn apply_env_overrides<F>(mut config: BotConfig, lookup: F) -> Result<BotConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(v) = get("CADDYFILE_PATH") {
        config.caddyfile.path = v;
    }
    if let Some(v) = get("CADDY_CONTAINER") {
        config.docker.container_name = v;
    }
    if let Some(v) = get("DOCKER_SOCK") {
        config.docker.socket_path = v;
    }
    if let Some(v) = get("TELEGRAM_TOKEN") {
        config.telegram.token = v;
    }
    if let Some(v) = get("LOG_LEVEL") {
        config.observability.log_level = v;
    }
    if let Some(v) = get("ALLOWED_CHAT_ID") {
        let id: i64 = v.trim().parse().map_err(|e| ConfigError::Env {
            key: "ALLOWED_CHAT_ID",
            message: format!("'{}' is not a chat id: {}", v, e),
        })?;
        // 0 means "no filter", matching how the deployment has always treated it.
        config.telegram.allowed_chat_id = (id != 0).then_some(id);
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_env_overrides() {
        let config = apply_env_overrides(
            BotConfig::default(),
            env(&[
                ("CADDYFILE_PATH", "/srv/Caddyfile"),
                ("CADDY_CONTAINER", "edge"),
                ("DOCKER_SOCK", "/run/podman.sock"),
                ("ALLOWED_CHAT_ID", "-1001234"),
                ("TELEGRAM_TOKEN", "123:abc"),
            ]),
        )
        .unwrap();

        assert_eq!(config.caddyfile.path, "/srv/Caddyfile");
        assert_eq!(config.docker.container_name, "edge");
        assert_eq!(config.docker.socket_path, "/run/podman.sock");
        assert_eq!(config.telegram.allowed_chat_id, Some(-1001234));
        assert_eq!(config.telegram.token, "123:abc");
    }

    #[test]
    fn test_empty_env_keeps_defaults() {
        let config =
            apply_env_overrides(BotConfig::default(), env(&[("CADDY_CONTAINER", "")])).unwrap();
        assert_eq!(config.docker.container_name, "caddy");
        assert_eq!(config.telegram.allowed_chat_id, None);
    }

    #[test]
    fn test_zero_chat_id_disables_filter() {
        let config =
            apply_env_overrides(BotConfig::default(), env(&[("ALLOWED_CHAT_ID", "0")])).unwrap();
        assert_eq!(config.telegram.allowed_chat_id, None);
    }

    #[test]
    fn test_malformed_chat_id_rejected() {
        let err = apply_env_overrides(BotConfig::default(), env(&[("ALLOWED_CHAT_ID", "abc")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Env { key: "ALLOWED_CHAT_ID", .. }));
    }

    #[test]
    fn test_partial_toml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[caddyfile]\nmarker = \"# allow-list\"\n\n[docker]\ntimeout_secs = 5\n"
        )
        .unwrap();

        let content = fs::read_to_string(file.path()).unwrap();
        let config: BotConfig = toml::from_str(&content).unwrap();
        assert_eq!(config.caddyfile.marker, "# allow-list");
        assert_eq!(config.caddyfile.path, "/etc/caddy/Caddyfile");
        assert_eq!(config.docker.timeout_secs, 5);
        assert_eq!(config.docker.container_name, "caddy");
    }
}
