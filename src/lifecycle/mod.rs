//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Load config → Validate → Init logging/metrics → Build components → Poll
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Shutdown::trigger
//!
//! Shutdown (shutdown.rs):
//!     Broadcast → poll loop exits → drain message tasks (bounded) → return
//! ```

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
