// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-session store of the last successful Q/A extraction.
//!
//! A slot is only ever overwritten by a newer extraction; a message list with
//! no Q/A block leaves it alone so the summary outlives the message that
//! produced it. Slots are removed explicitly on session change.

use dashmap::DashMap;
use parley_core::{QaExtraction, SessionKey};

#[derive(Debug, Default)]
pub struct QaCache {
    slots: DashMap<SessionKey, QaExtraction>,
}

impl QaCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &SessionKey) -> Option<QaExtraction> {
        self.slots.get(key).map(|slot| slot.value().clone())
    }

    /// Store `extraction` for `key` if there is one.
    ///
    /// Returns whether the slot's content changed.
    pub fn update(&self, key: &SessionKey, extraction: Option<QaExtraction>) -> bool {
        let Some(extraction) = extraction else {
            return false;
        };
        match self.slots.insert(key.clone(), extraction.clone()) {
            Some(previous) => previous != extraction,
            None => true,
        }
    }

    /// Drop the slot for `key`, returning what it held.
    pub fn clear(&self, key: &SessionKey) -> Option<QaExtraction> {
        self.slots.remove(key).map(|(_, extraction)| extraction)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
