// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock history source for deterministic poll testing.
//!
//! `MockHistory` implements `HistorySource` with queued responses and
//! captured requests. A gated mock holds every response until the test
//! releases it, which lets a test change session while a poll is in flight.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, Notify};

use parley_core::{HistoryRequest, HistorySnapshot, HistorySource, ParleyError};

type Response = Result<Vec<HistorySnapshot>, ParleyError>;

/// A scripted poll channel.
///
/// Responses are returned in the order they were pushed. With an empty
/// queue the source answers with no snapshots.
pub struct MockHistory {
    responses: Arc<Mutex<VecDeque<Response>>>,
    requests: Arc<Mutex<Vec<HistoryRequest>>>,
    gate: Option<Arc<Notify>>,
}

impl MockHistory {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
            gate: None,
        }
    }

    /// A mock whose `history()` waits for [`MockHistory::release`] before answering.
    pub fn gated() -> Self {
        Self {
            gate: Some(Arc::new(Notify::new())),
            ..Self::new()
        }
    }

    pub async fn push_response(&self, response: Response) {
        self.responses.lock().await.push_back(response);
    }

    /// Let one pending (or the next) `history()` call answer.
    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.notify_one();
        }
    }

    /// Every request received so far.
    pub async fn requests(&self) -> Vec<HistoryRequest> {
        self.requests.lock().await.clone()
    }
}

impl Default for MockHistory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HistorySource for MockHistory {
    fn name(&self) -> &str {
        "mock-history"
    }

    async fn history(&self, request: HistoryRequest) -> Result<Vec<HistorySnapshot>, ParleyError> {
        self.requests.lock().await.push(request);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.responses
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}
