//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → environment overrides (CADDYFILE_PATH, DOCKER_SOCK, ...)
//!     → validation.rs (semantic checks)
//!     → BotConfig (validated, immutable)
//!     → passed by value/Arc to each component
//! ```
//!
//! # Design Decisions
//! - Config is built once at startup and never read from globals
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::BotConfig;
pub use schema::CaddyfileConfig;
pub use schema::DockerConfig;
pub use schema::ObservabilityConfig;
pub use schema::TelegramConfig;
