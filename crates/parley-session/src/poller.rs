// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Background driver for the poll channel.
//!
//! [`HistoryPoller`] asks the [`Conversation`] for a ticket on every tick,
//! fetches history without holding the conversation lock, and hands the
//! response back. Ticks are skipped while the stream is producing; a session
//! switch during the fetch makes the response stale.

use std::sync::Arc;
use std::time::Duration;

use parley_config::model::PollConfig;
use parley_core::HistorySource;
use tokio::sync::Mutex;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::session::{Conversation, PollOutcome};

pub struct HistoryPoller {
    source: Arc<dyn HistorySource>,
    conversation: Arc<Mutex<Conversation>>,
    interval: Duration,
}

impl HistoryPoller {
    pub fn new(
        source: Arc<dyn HistorySource>,
        conversation: Arc<Mutex<Conversation>>,
        interval: Duration,
    ) -> Self {
        Self {
            source,
            conversation,
            interval,
        }
    }

    pub fn from_config(
        source: Arc<dyn HistorySource>,
        conversation: Arc<Mutex<Conversation>>,
        config: &PollConfig,
    ) -> Self {
        Self::new(source, conversation, config.interval())
    }

    /// Run one poll cycle. `None` means the tick was skipped.
    pub async fn poll_once(&self) -> Option<PollOutcome> {
        let ticket = self.conversation.lock().await.begin_poll()?;

        debug!(
            source = self.source.name(),
            session_key = %ticket.session_key(),
            "polling history"
        );
        let response = self.source.history(ticket.request()).await;

        let outcome = self.conversation.lock().await.apply_poll(&ticket, response);
        Some(outcome)
    }

    /// Poll on a fixed interval until `cancel` fires.
    ///
    /// The first poll happens immediately. A fetch still in flight when the
    /// token is cancelled is abandoned.
    pub async fn run(self, cancel: CancellationToken) {
        let mut interval = tokio::time::interval(self.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(
            source = self.source.name(),
            interval_ms = self.interval.as_millis() as u64,
            "history poller started"
        );

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = interval.tick() => {
                    tokio::select! {
                        _ = cancel.cancelled() => break,
                        outcome = self.poll_once() => {
                            if let Some(outcome) = outcome {
                                debug!(?outcome, "history poll finished");
                            }
                        }
                    }
                }
            }
        }

        info!("history poller stopped");
    }
}
