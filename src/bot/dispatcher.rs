//! Inbound message dispatch.
//!
//! Filters senders, extracts the candidate address and turns the
//! orchestrator outcome into reply text.

use std::sync::Arc;

use crate::bot::orchestrator::ReloadOrchestrator;
use crate::observability::metrics;

pub const HELP_TEXT: &str = "Send an IP address or /addip <ip>";
pub const USAGE_TEXT: &str = "Usage: /addip <IP address>";

/// What a message asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command<'a> {
    Help,
    Usage,
    Candidate(&'a str),
}

/// Parse message text.
///
/// `/addip` matches as a prefix so `/addip@SomeBot 1.2.3.4` works in groups.
pub fn parse_command(text: &str) -> Command<'_> {
    let mut fields = text.split_whitespace();
    let Some(first) = fields.next() else {
        return Command::Help;
    };

    if first.starts_with("/addip") {
        return match fields.next() {
            Some(candidate) => Command::Candidate(candidate),
            None => Command::Usage,
        };
    }
    if first.starts_with("/start") || first.starts_with("/help") {
        return Command::Help;
    }
    Command::Candidate(first)
}

pub struct Dispatcher {
    orchestrator: Arc<ReloadOrchestrator>,
    allowed_chat_id: Option<i64>,
}

impl Dispatcher {
    pub fn new(orchestrator: Arc<ReloadOrchestrator>, allowed_chat_id: Option<i64>) -> Self {
        Self {
            orchestrator,
            allowed_chat_id,
        }
    }

    pub fn is_allowed(&self, chat_id: i64) -> bool {
        self.allowed_chat_id.map_or(true, |allowed| allowed == chat_id)
    }

    /// Handle one message; `None` means the sender is ignored.
    pub async fn handle_message(&self, chat_id: i64, text: &str) -> Option<String> {
        if !self.is_allowed(chat_id) {
            tracing::debug!(chat_id, "Ignoring message from unauthorized chat");
            metrics::record_message("ignored");
            return None;
        }

        let reply = match parse_command(text) {
            Command::Help => {
                metrics::record_message("help");
                HELP_TEXT.to_string()
            }
            Command::Usage => {
                metrics::record_message("usage");
                USAGE_TEXT.to_string()
            }
            Command::Candidate(candidate) => {
                let outcome = self
                    .orchestrator
                    .handle_candidate_address(chat_id, candidate)
                    .await;
                metrics::record_message(outcome.label());
                outcome.to_string()
            }
        };
        Some(reply)
    }
}
