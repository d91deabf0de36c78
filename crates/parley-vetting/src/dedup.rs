// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Question deduplication.
//!
//! A question restated in a later turn (typically a teaser answered in full
//! afterwards) keeps the slot of its first appearance, so the summary never
//! reorders, while the latest answer replaces the earlier one.

use std::collections::HashMap;

use parley_core::{QaExtraction, QaItem};

/// Collapse items sharing a normalized question (trimmed, case-folded).
///
/// The surviving item sits at the first occurrence's position and keeps that
/// occurrence's question wording; its answer comes from the last occurrence.
pub fn dedupe_questions(items: impl IntoIterator<Item = QaItem>) -> Vec<QaItem> {
    let mut slots: HashMap<String, usize> = HashMap::new();
    let mut out: Vec<QaItem> = Vec::new();

    for item in items {
        let key = item.normalized_question();
        if let Some(&slot) = slots.get(&key) {
            out[slot].answer = item.answer;
        } else {
            slots.insert(key, out.len());
            out.push(item);
        }
    }

    out
}

/// [`dedupe_questions`] applied to an extraction's items.
pub fn dedupe_extraction(extraction: QaExtraction) -> QaExtraction {
    QaExtraction {
        items: dedupe_questions(extraction.items),
        ..extraction
    }
}
