// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Port traits for the external channels that feed a conversation.
//!
//! Ports use `#[async_trait]` for dynamic dispatch compatibility.

pub mod history;

pub use history::HistorySource;
