//! Update poll loop.
//!
//! # Responsibilities
//! - Long-poll the Bot API and advance the update offset
//! - Spawn one task per message (dispatch + reply)
//! - Back off on poll failures, stop on shutdown
//!
//! # Shutdown
//! Stop polling → drain in-flight message tasks (bounded) → return.
//! A task past its Caddyfile write still gets to reload and reply.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::task::{JoinError, JoinSet};
use tracing::Instrument;

use crate::bot::dispatcher::Dispatcher;
use crate::bot::telegram::{TelegramClient, Update};
use crate::observability::logging::message_span;
use crate::resilience::PollBackoff;

pub struct BotRunner {
    client: TelegramClient,
    dispatcher: Arc<Dispatcher>,
    poll_timeout_secs: u64,
    drain_timeout: Duration,
    backoff: PollBackoff,
    tasks: JoinSet<()>,
}

impl BotRunner {
    pub fn new(client: TelegramClient, dispatcher: Arc<Dispatcher>, poll_timeout_secs: u64) -> Self {
        Self {
            client,
            dispatcher,
            poll_timeout_secs,
            drain_timeout: Duration::from_secs(30),
            backoff: PollBackoff::default(),
            tasks: JoinSet::new(),
        }
    }

    /// How long shutdown waits for in-flight messages before aborting them.
    pub fn with_drain_timeout(mut self, drain_timeout: Duration) -> Self {
        self.drain_timeout = drain_timeout;
        self
    }

    /// Override the poll failure backoff.
    pub fn with_backoff(mut self, backoff: PollBackoff) -> Self {
        self.backoff = backoff;
        self
    }

    pub async fn run(mut self, mut shutdown: broadcast::Receiver<()>) {
        tracing::info!(poll_timeout_secs = self.poll_timeout_secs, "Bot started");
        let mut offset: i64 = 0;

        loop {
            let result = tokio::select! {
                _ = shutdown.recv() => break,
                result = self.client.get_updates(offset, self.poll_timeout_secs) => result,
            };

            while let Some(joined) = self.tasks.try_join_next() {
                log_join(joined);
            }

            match result {
                Ok(updates) => {
                    self.backoff.reset();
                    for update in updates {
                        offset = offset.max(update.update_id + 1);
                        self.spawn_handler(update);
                    }
                }
                Err(e) => {
                    let delay = self.backoff.next_delay();
                    tracing::warn!(
                        error = %e,
                        failures = self.backoff.failures(),
                        retry_in_ms = delay.as_millis() as u64,
                        "Polling updates failed"
                    );
                    tokio::select! {
                        _ = shutdown.recv() => break,
                        _ = tokio::time::sleep(delay) => {}
                    }
                }
            }
        }

        tracing::info!("Bot stopped polling");
        self.drain().await;
    }

    /// Wait for in-flight message tasks, aborting whatever outlasts the timeout.
    async fn drain(&mut self) {
        if self.tasks.is_empty() {
            return;
        }
        tracing::info!(in_flight = self.tasks.len(), "Waiting for in-flight messages");

        let tasks = &mut self.tasks;
        let drained = tokio::time::timeout(self.drain_timeout, async {
            while let Some(joined) = tasks.join_next().await {
                log_join(joined);
            }
        })
        .await;

        if drained.is_err() {
            tracing::warn!(
                aborted = self.tasks.len(),
                timeout_secs = self.drain_timeout.as_secs(),
                "Drain timed out, aborting remaining messages"
            );
            self.tasks.shutdown().await;
        }
    }

    fn spawn_handler(&mut self, update: Update) {
        let Some(message) = update.message else {
            return;
        };
        let chat_id = message.chat.id;
        let text = message.text.unwrap_or_default();
        let dispatcher = self.dispatcher.clone();
        let client = self.client.clone();

        self.tasks.spawn(
            async move {
                let Some(reply) = dispatcher.handle_message(chat_id, &text).await else {
                    return;
                };
                if let Err(e) = client.send_message(chat_id, &reply).await {
                    tracing::warn!(error = %e, "Failed to send reply");
                }
            }
            .instrument(message_span(chat_id)),
        );
    }
}

fn log_join(joined: Result<(), JoinError>) {
    if let Err(e) = joined {
        if e.is_panic() {
            tracing::error!(error = %e, "Message handler panicked");
        }
    }
}
