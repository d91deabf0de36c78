// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Structured vetting question/answer data recovered from assistant text.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// The matched party whose vetting answers are relayed to the user.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Counterparty {
    #[default]
    Landlord,
    Tenant,
}

impl Counterparty {
    /// Parses a free-form identity hint (`" Tenant "` → `Tenant`).
    pub fn from_hint(hint: &str) -> Option<Self> {
        hint.trim().parse().ok()
    }
}

/// How much of the vetting exchange the message reveals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DisclosureMode {
    /// Questions and answers are both shown.
    Disclosed,
    /// Only the questions are shown; answers are pending.
    Withheld,
}

/// One vetting question with its answer (empty while withheld).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QaItem {
    pub question: String,
    #[serde(default)]
    pub answer: String,
}

impl QaItem {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }

    /// Deduplication identity: trimmed, case-folded question text.
    pub fn normalized_question(&self) -> String {
        self.question.trim().to_lowercase()
    }
}

/// Result of scanning one message for a vetting Q/A block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QaExtraction {
    pub items: Vec<QaItem>,
    pub counterparty: Counterparty,
    pub mode: DisclosureMode,
}
