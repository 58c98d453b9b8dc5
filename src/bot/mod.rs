//! Chat bot subsystem.
//!
//! # Data Flow
//! ```text
//! Telegram getUpdates (runner.rs, telegram.rs)
//!     → one task per message
//!     → dispatcher.rs (allowed chat, command parsing)
//!     → orchestrator.rs (validate → Caddyfile → container reload)
//!     → ReloadOutcome rendered as reply text
//!     → Telegram sendMessage
//! ```

pub mod dispatcher;
pub mod orchestrator;
pub mod runner;
pub mod telegram;

pub use dispatcher::Dispatcher;
pub use orchestrator::{ReloadOrchestrator, ReloadOutcome};
pub use runner::BotRunner;
pub use telegram::{TelegramClient, TelegramError};
