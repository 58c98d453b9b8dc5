//! Caddyfile mutation subsystem.
//!
//! # Data Flow
//! ```text
//! validated address
//!     → rule.rs (render rule line, insert after each marker)
//!     → mutator.rs (lock → read → dedupe → backup → write → unlock)
//!     → inserted: bool
//! ```
//!
//! # Design Decisions
//! - The document is re-read on every call, never cached
//! - Duplicates are found by exact rendered-line match; changing the rule
//!   template makes earlier lines invisible to that check
//! - A timestamped backup always precedes a write

pub mod mutator;
pub mod rule;

pub use mutator::{CaddyfileMutator, MutatorError, MutatorResult};
pub use rule::RuleTemplate;
