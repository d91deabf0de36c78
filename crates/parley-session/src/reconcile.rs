// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Merging the live stream with the polled history snapshot.
//!
//! [`reconcile`] is a pure choice between the two lists. [`preserve_displayed`]
//! is applied on top of it by the session so that a shorter candidate never
//! removes a turn that is already on screen.

use std::collections::HashSet;

use parley_core::{Message, MessageId};

/// Which channel the reconciled list was taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileSource {
    Stream,
    Poll,
}

/// Decide which channel is authoritative right now.
///
/// - an active stream always wins
/// - otherwise a longer poll wins
/// - at equal non-zero length the poll wins if its last message differs
pub fn choose_source(
    stream: &[Message],
    polled: &[Message],
    is_stream_active: bool,
) -> ReconcileSource {
    if is_stream_active {
        return ReconcileSource::Stream;
    }
    if polled.len() > stream.len() {
        return ReconcileSource::Poll;
    }
    if polled.len() == stream.len() {
        if let (Some(last_stream), Some(last_polled)) = (stream.last(), polled.last()) {
            if last_stream.content_fingerprint() != last_polled.content_fingerprint() {
                return ReconcileSource::Poll;
            }
        }
    }
    ReconcileSource::Stream
}

/// The list to treat as ground truth for this instant.
pub fn reconcile<'a>(
    stream: &'a [Message],
    polled: &'a [Message],
    is_stream_active: bool,
) -> &'a [Message] {
    match choose_source(stream, polled, is_stream_active) {
        ReconcileSource::Stream => stream,
        ReconcileSource::Poll => polled,
    }
}

/// Fold `candidate` into the currently displayed list without losing turns.
///
/// If the candidate still carries every displayed identity it is returned
/// as is, so a backfilling poll keeps its own order. Otherwise the result
/// follows the candidate, and each displayed message the candidate lacks is
/// put back right after the message that preceded it on screen.
pub fn preserve_displayed(displayed: &[Message], candidate: &[Message]) -> Vec<Message> {
    let present: HashSet<&MessageId> = candidate.iter().map(|message| &message.id).collect();
    if displayed.iter().all(|message| present.contains(&message.id)) {
        return candidate.to_vec();
    }

    let mut merged = candidate.to_vec();
    let mut cursor = 0;
    for message in displayed {
        if present.contains(&message.id) {
            if let Some(pos) = merged.iter().rposition(|m| m.id == message.id) {
                cursor = pos + 1;
            }
        } else {
            merged.insert(cursor, message.clone());
            cursor += 1;
        }
    }
    merged
}
