//! Structured logging.
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - `RUST_LOG` wins over the configured level when set
//! - Each chat message gets its own span with a correlation id

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use uuid::Uuid;

/// Default filter directive for a configured level.
pub fn default_directive(log_level: &str) -> String {
    format!("ipgate={},warn", log_level)
}

/// Initialize the global subscriber. Call once, from `main`.
pub fn init_logging(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(log_level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Span wrapping the handling of one inbound chat message.
pub fn message_span(chat_id: i64) -> tracing::Span {
    tracing::info_span!("message", chat_id, correlation_id = %Uuid::new_v4())
}
