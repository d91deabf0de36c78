// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Splits a trailing counterparty addendum off a Q/A message.
//!
//! Shape: `[Q/A block]` + blank line + `the counterparty has answered your
//! question: ...`. The addendum is shown in the transcript as ordinary text;
//! the block before it is what the extractor parses.

use std::sync::LazyLock;

use regex::Regex;

/// Phrase that opens an addendum segment (matched case-insensitively).
pub const ADDENDUM_MARKER: &str = "the counterparty has answered your question:";

/// Two consecutive line breaks, tolerating CRLF and whitespace-only lines.
static SEGMENT_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\r?\n[ \t]*\r?\n").unwrap());

/// A message split at the start of its addendum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddendumSplit<'a> {
    /// Everything before the split point (the Q/A block, untrimmed).
    pub head: &'a str,
    /// The addendum segment, trimmed.
    pub addendum: &'a str,
}

/// Split `text` if its last blank-line-separated segment is an addendum.
pub fn split_addendum(text: &str) -> Option<AddendumSplit<'_>> {
    let text = text.trim_end();
    let (head, segment) = match SEGMENT_BREAK.find_iter(text).last() {
        Some(m) => (&text[..m.start()], &text[m.end()..]),
        None => ("", text),
    };

    let segment = segment.trim();
    opens_with_marker(segment).then_some(AddendumSplit {
        head,
        addendum: segment,
    })
}

/// The addendum segment alone, trimmed, if present.
pub fn extract_addendum(text: &str) -> Option<&str> {
    split_addendum(text).map(|split| split.addendum)
}

/// The portion of `text` that may hold a Q/A block.
pub(crate) fn qa_portion(text: &str) -> &str {
    split_addendum(text).map_or(text, |split| split.head)
}

fn opens_with_marker(segment: &str) -> bool {
    let segment = segment.trim_start_matches(['*', '_']);
    segment
        .get(..ADDENDUM_MARKER.len())
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(ADDENDUM_MARKER))
}
