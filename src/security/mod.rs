//! Input validation for chat-submitted data.
//!
//! Sender authorization (single allowed chat) lives in the dispatcher;
//! this module only decides whether text is an address we may write
//! into the Caddyfile.

pub mod address;

pub use address::is_valid_address;
