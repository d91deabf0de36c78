// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Derives the on-screen transcript and the Q/A summary from a reconciled
//! message list.

use std::collections::HashMap;

use parley_core::{Message, MessageId, QaExtraction, Role};
use parley_vetting::{QaExtractor, dedupe_extraction, extract_addendum};
use serde::Serialize;

/// One transcript row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranscriptEntry {
    pub message: Message,
    /// Replacement text when only part of the message belongs in the
    /// transcript (the addendum of a Q/A message).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_text: Option<String>,
}

impl TranscriptEntry {
    /// Text to render for this row.
    pub fn text(&self) -> String {
        match &self.display_text {
            Some(text) => text.clone(),
            None => self.message.text_content(),
        }
    }
}

/// Build the transcript for `messages`.
///
/// Internal messages and tool results are dropped. Assistant messages that
/// hold a Q/A block are dropped too unless they carry an addendum, in which
/// case only the addendum is shown. Entries sharing an identity collapse to
/// the last one, at its position.
pub fn project_transcript(
    messages: &[Message],
    extractor: &QaExtractor,
    hint: Option<&str>,
) -> Vec<TranscriptEntry> {
    collapse_by_identity(messages)
        .filter_map(|message| project_message(message, extractor, hint))
        .collect()
}

/// The most recent Q/A extraction in `messages`, deduplicated.
///
/// Assistant messages are scanned newest first and the first one yielding an
/// extraction wins.
pub fn latest_qa(
    messages: &[Message],
    extractor: &QaExtractor,
    hint: Option<&str>,
) -> Option<QaExtraction> {
    messages
        .iter()
        .rev()
        .filter(|message| message.role == Role::Assistant)
        .find_map(|message| extractor.extract(&message.text_content(), hint))
        .map(dedupe_extraction)
}

fn project_message(
    message: &Message,
    extractor: &QaExtractor,
    hint: Option<&str>,
) -> Option<TranscriptEntry> {
    if message.role == Role::Internal || message.is_tool_result() {
        return None;
    }

    let mut entry = TranscriptEntry {
        message: message.clone(),
        display_text: None,
    };
    if message.role != Role::Assistant {
        return Some(entry);
    }

    let text = message.text_content();
    if extractor.extract(&text, hint).is_none() {
        return Some(entry);
    }
    // The Q/A block itself is surfaced through the summary.
    let addendum = extract_addendum(&text)?;
    entry.display_text = Some(addendum.to_string());
    Some(entry)
}

/// Messages in order, keeping only the last occurrence of each identity.
fn collapse_by_identity(messages: &[Message]) -> impl Iterator<Item = &Message> {
    let last: HashMap<&MessageId, usize> = messages
        .iter()
        .enumerate()
        .map(|(index, message)| (&message.id, index))
        .collect();
    messages
        .iter()
        .enumerate()
        .filter(move |(index, message)| last.get(&message.id) == Some(index))
        .map(|(_, message)| message)
}
