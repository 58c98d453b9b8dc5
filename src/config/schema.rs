//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the bot.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Placeholder substituted with the address when rendering a rule line.
pub const ADDRESS_PLACEHOLDER: &str = "{address}";

/// Root configuration for the bot.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct BotConfig {
    /// Caddyfile location and rule layout.
    pub caddyfile: CaddyfileConfig,

    /// Container runtime connection and reload command.
    pub docker: DockerConfig,

    /// Chat transport settings.
    pub telegram: TelegramConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Caddyfile mutation settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CaddyfileConfig {
    /// Path of the Caddyfile on this host.
    pub path: String,

    /// Substring identifying insertion points.
    pub marker: String,

    /// Rule line template; `{address}` is replaced with the submitted IP.
    pub rule_template: String,
}

impl Default for CaddyfileConfig {
    fn default() -> Self {
        Self {
            path: "/etc/caddy/Caddyfile".to_string(),
            marker: "# add here".to_string(),
            rule_template: "\t\t\tnot remote_ip {address}".to_string(),
        }
    }
}

/// Container runtime configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DockerConfig {
    /// Unix socket exposed by the runtime.
    pub socket_path: String,

    /// Display name of the proxy container (not its ID).
    pub container_name: String,

    /// Command executed inside the container to reload the proxy.
    pub reload_command: Vec<String>,

    /// Per round-trip timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for DockerConfig {
    fn default() -> Self {
        Self {
            socket_path: "/var/run/docker.sock".to_string(),
            container_name: "caddy".to_string(),
            reload_command: [
                "caddy",
                "reload",
                "--config",
                "/etc/caddy/Caddyfile",
                "--adapter",
                "caddyfile",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            timeout_secs: 10,
        }
    }
}

/// Telegram Bot API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TelegramConfig {
    /// Bot token. Usually supplied through `TELEGRAM_TOKEN`.
    pub token: String,

    /// When set, messages from any other chat are ignored.
    pub allowed_chat_id: Option<i64>,

    /// Bot API base URL.
    pub api_base_url: String,

    /// Long-poll timeout passed to `getUpdates`.
    pub poll_timeout_secs: u64,

    /// On shutdown, how long in-flight messages may keep running.
    pub drain_timeout_secs: u64,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            allowed_chat_id: None,
            api_base_url: "https://api.telegram.org".to_string(),
            poll_timeout_secs: 30,
            drain_timeout_secs: 30,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
