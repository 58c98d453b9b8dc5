//! Resilience for the chat transport.
//!
//! # Design Decisions
//! - Poll failures back off exponentially with jitter and never stop the bot
//! - The core pipeline (mutate, reload) does not retry; the user resends

pub mod backoff;

pub use backoff::{calculate_backoff, PollBackoff};
