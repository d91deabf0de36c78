// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Vetting Q/A extraction from assistant message text.
//!
//! Grammar (case-insensitive, `\s+` between words, markdown emphasis around
//! headers and entries ignored):
//!
//! ```text
//! disclosed_header := "here are" N "vetting answer(s)" "from the matched" PARTY ":"
//! teaser_header    := "the matched" PARTY "has answered" N "vetting question(s)" ["."]
//! PARTY            := "landlord" | "tenant" | "counterparty"
//! entry            := LINE_START ["**"] n ("." | ")") question ["**"] LINE_END
//! ```
//!
//! In a disclosed section the lines following an entry, up to the next entry,
//! are its answer. In a teaser section entries carry no answer. A block with
//! no header is only accepted when it opens with a bold entry and every
//! surviving entry has an answer; plain numbered lists are left alone.
//!
//! Any trailing counterparty addendum is cut off before parsing.

use std::sync::LazyLock;

use parley_config::model::VettingConfig;
use parley_core::{Counterparty, DisclosureMode, QaExtraction, QaItem};
use regex::{Match, Regex};
use tracing::debug;

use crate::addendum;

static DISCLOSED_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)here\s+are\s+(?P<count>\d+)\s+vetting\s+answers?(?:\(s\))?\s+from\s+the\s+matched\s+(?P<party>landlord|tenant|counterparty)\b[*_]*\s*:",
    )
    .unwrap()
});

static TEASER_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)the\s+matched\s+(?P<party>landlord|tenant|counterparty)\s+has\s+answered\s+(?P<count>\d+)\s+vetting\s+questions?(?:\(s\))?",
    )
    .unwrap()
});

static ENTRY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?P<open>\*\*|__)?\s*(?P<num>\d{1,3})[.)]\s+(?P<rest>.*)$").unwrap()
});

/// One numbered entry with the answer lines that followed it.
#[derive(Debug)]
struct Entry {
    question: String,
    answer: Vec<String>,
}

impl Entry {
    fn answer_text(&self) -> String {
        self.answer.join("\n")
    }
}

/// A header occurrence and the text it governs.
struct Section<'a> {
    party: &'a str,
    declared: usize,
    body: &'a str,
}

/// Recognizes vetting Q/A blocks and classifies their disclosure mode.
#[derive(Debug, Clone, Copy, Default)]
pub struct QaExtractor {
    /// Identity used when the header names the generic placeholder and the
    /// caller's hint is missing or unusable.
    default_counterparty: Counterparty,
}

impl QaExtractor {
    /// Extractor falling back to [`Counterparty::Landlord`].
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_default_counterparty(default_counterparty: Counterparty) -> Self {
        Self {
            default_counterparty,
        }
    }

    pub fn from_config(config: &VettingConfig) -> Self {
        Self::with_default_counterparty(config.default_counterparty)
    }

    pub fn default_counterparty(&self) -> Counterparty {
        self.default_counterparty
    }

    /// Extract a Q/A block from one assistant message's text.
    ///
    /// Disclosed mode is tried first, then teaser mode on the same text, then
    /// a headerless bold block. `hint` names the counterparty when the header
    /// only says "counterparty".
    pub fn extract(&self, text: &str, hint: Option<&str>) -> Option<QaExtraction> {
        let text = addendum::qa_portion(text);
        self.disclosed(text, hint)
            .or_else(|| self.withheld(text, hint))
            .or_else(|| self.headerless(text, hint))
    }

    fn disclosed(&self, text: &str, hint: Option<&str>) -> Option<QaExtraction> {
        let section = section(&DISCLOSED_HEADER, &TEASER_HEADER, text)?;
        let items = answered_items(scan_entries(section.body));
        if items.is_empty() {
            debug!("disclosed vetting header without answered entries");
            return None;
        }
        note_count_mismatch(section.declared, items.len(), DisclosureMode::Disclosed);
        Some(QaExtraction {
            items,
            counterparty: self.resolve(section.party, hint),
            mode: DisclosureMode::Disclosed,
        })
    }

    fn withheld(&self, text: &str, hint: Option<&str>) -> Option<QaExtraction> {
        let section = section(&TEASER_HEADER, &DISCLOSED_HEADER, text)?;
        let items: Vec<QaItem> = scan_entries(section.body)
            .into_iter()
            .map(|entry| QaItem::new(entry.question, ""))
            .collect();
        if items.is_empty() {
            debug!("teaser vetting header without entries");
            return None;
        }
        note_count_mismatch(section.declared, items.len(), DisclosureMode::Withheld);
        Some(QaExtraction {
            items,
            counterparty: self.resolve(section.party, hint),
            mode: DisclosureMode::Withheld,
        })
    }

    fn headerless(&self, text: &str, hint: Option<&str>) -> Option<QaExtraction> {
        let first = text.lines().find(|line| !line.trim().is_empty())?;
        let opens_bold = ENTRY
            .captures(first)
            .is_some_and(|caps| caps.name("open").is_some());
        if !opens_bold {
            return None;
        }

        let entries = scan_entries(text);
        let total = entries.len();
        let items = answered_items(entries);
        // Every entry must be answered, otherwise this is just a bold list.
        if items.is_empty() || items.len() != total {
            return None;
        }
        Some(QaExtraction {
            items,
            counterparty: self.resolve("", hint),
            mode: DisclosureMode::Disclosed,
        })
    }

    /// Header literal, then hint, then the configured default.
    fn resolve(&self, party: &str, hint: Option<&str>) -> Counterparty {
        Counterparty::from_hint(party)
            .or_else(|| hint.and_then(Counterparty::from_hint))
            .unwrap_or(self.default_counterparty)
    }
}

/// Extract with the default fallback identity.
pub fn extract_qa(text: &str, hint: Option<&str>) -> Option<QaExtraction> {
    QaExtractor::new().extract(text, hint)
}

/// Locate `header` and return the text it governs, which ends where a header
/// of the `other` kind begins.
fn section<'a>(header: &Regex, other: &Regex, text: &'a str) -> Option<Section<'a>> {
    let caps = header.captures(text)?;
    let whole = caps.get(0)?;
    let rest = &text[whole.end()..];
    let body = other.find(rest).map_or(rest, |m| &rest[..m.start()]);
    Some(Section {
        party: caps.name("party").map_or("", |m| m.as_str()),
        declared: caps
            .name("count")
            .and_then(|m: Match<'_>| m.as_str().parse().ok())
            .unwrap_or(0),
        body,
    })
}

fn scan_entries(body: &str) -> Vec<Entry> {
    let mut entries: Vec<Entry> = Vec::new();

    for line in body.lines() {
        if let Some((question, inline)) = parse_entry(line) {
            let answer = if inline.is_empty() {
                Vec::new()
            } else {
                vec![inline.to_string()]
            };
            entries.push(Entry {
                question: question.to_string(),
                answer,
            });
            continue;
        }

        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        // Text before the first entry is preamble.
        if let Some(current) = entries.last_mut() {
            current.answer.push(line.to_string());
        }
    }

    entries
}

/// Split an entry line into its question and any answer text that follows a
/// closing bold marker on the same line.
fn parse_entry(line: &str) -> Option<(&str, &str)> {
    let caps = ENTRY.captures(line)?;
    let rest = caps.name("rest")?.as_str().trim();

    let (question, inline) = match caps.name("open") {
        Some(open) => match rest.find(open.as_str()) {
            Some(close) => (&rest[..close], &rest[close + open.as_str().len()..]),
            None => (rest, ""),
        },
        None => (rest, ""),
    };

    let question = strip_emphasis(question);
    if question.is_empty() {
        return None;
    }
    Some((question, inline.trim()))
}

fn strip_emphasis(text: &str) -> &str {
    text.trim().trim_matches(['*', '_']).trim()
}

fn answered_items(entries: Vec<Entry>) -> Vec<QaItem> {
    entries
        .into_iter()
        .filter(|entry| !entry.answer.is_empty())
        .map(|entry| {
            let answer = entry.answer_text();
            QaItem::new(entry.question, answer)
        })
        .collect()
}

fn note_count_mismatch(declared: usize, parsed: usize, mode: DisclosureMode) {
    if declared != parsed {
        debug!(declared, parsed, %mode, "vetting header count differs from parsed entries");
    }
}
