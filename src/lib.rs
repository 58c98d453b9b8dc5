//! Chat-driven Caddy allow-list manager.
//!
//! Appends `remote_ip` rules to a live Caddyfile and reloads Caddy inside its
//! container through the Docker API, on request from an authorized chat.

pub mod bot;
pub mod caddyfile;
pub mod config;
pub mod docker;
pub mod lifecycle;
pub mod observability;
pub mod resilience;
pub mod security;

pub use bot::{ReloadOrchestrator, ReloadOutcome};
pub use config::BotConfig;
pub use lifecycle::Shutdown;
