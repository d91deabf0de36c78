// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Poll channel port: fetches full-snapshot conversation history.

use async_trait::async_trait;

use crate::error::ParleyError;
use crate::types::{HistoryRequest, HistorySnapshot};

/// Source of periodic conversation-history snapshots.
///
/// Implementations own the transport (HTTP, IPC, a fixture file) and its
/// timeout policy. The returned list is ordered most recent first; callers
/// only read the embedded message list of the first snapshot.
#[async_trait]
pub trait HistorySource: Send + Sync + 'static {
    /// Returns the human-readable name of this source, used in logs.
    fn name(&self) -> &str;

    /// Fetches up to `request.limit` snapshots for `request.session_key`.
    async fn history(&self, request: HistoryRequest) -> Result<Vec<HistorySnapshot>, ParleyError>;
}
