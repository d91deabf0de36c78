// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session state for the Parley conversation client.
//!
//! A conversation is fed by two eventually-consistent channels: a live token
//! stream and a periodic history poll. This crate merges them into one
//! message list ([`reconcile`]), keeps that list from visibly regressing,
//! projects the transcript, and maintains the per-session Q/A summary
//! ([`QaCache`]).
//!
//! All merging and projection is synchronous; only [`HistoryPoller`] is async.

pub mod cache;
pub mod errors;
pub mod poller;
pub mod projector;
pub mod reconcile;
pub mod session;
pub mod submit;

pub use cache::QaCache;
pub use errors::ErrorReporter;
pub use poller::HistoryPoller;
pub use projector::{TranscriptEntry, latest_qa, project_transcript};
pub use reconcile::{ReconcileSource, choose_source, preserve_displayed, reconcile};
pub use session::{Conversation, ConversationView, PollOutcome, PollTicket};
pub use submit::{Submission, build_submission};
