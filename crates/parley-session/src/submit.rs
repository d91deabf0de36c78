// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Optimistic projection of a human submission.

use chrono::Utc;
use parley_core::{Message, Role};
use parley_vetting::QaExtractor;
use serde::Serialize;

use crate::projector::{TranscriptEntry, project_transcript};

/// A pending human turn and the view it produces before any acknowledgement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Submission {
    /// The new message to hand to the transport.
    pub message: Message,
    /// Current reconciled list with the new message appended.
    pub messages: Vec<Message>,
    /// Transcript projected from `messages`.
    pub transcript: Vec<TranscriptEntry>,
}

/// Build the human message for `text`; blank input yields `None`.
pub fn human_message(text: &str) -> Option<Message> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    let id = format!("local-{}", uuid::Uuid::new_v4());
    Some(Message::new(id, Role::Human, text).with_created_at(Utc::now()))
}

/// Append a new human turn to `current` and project the result.
pub fn build_submission(
    current: &[Message],
    text: &str,
    extractor: &QaExtractor,
    hint: Option<&str>,
) -> Option<Submission> {
    let message = human_message(text)?;
    let mut messages = current.to_vec();
    messages.push(message.clone());
    let transcript = project_transcript(&messages, extractor, hint);
    Some(Submission {
        message,
        messages,
        transcript,
    })
}
