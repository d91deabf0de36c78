// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Suppression of repeated live-stream error notifications.

use std::collections::HashSet;

use tracing::error;

/// Reports each distinct stream error once until the stream recovers.
///
/// The stream re-sends its current error on every tick; only the first
/// sighting of a given message is logged. A tick without an error forgets
/// everything reported so far.
#[derive(Debug, Default)]
pub struct ErrorReporter {
    reported: HashSet<String>,
}

impl ErrorReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the error carried by one stream tick.
    ///
    /// Returns `true` when the error was reported by this call.
    pub fn observe(&mut self, current: Option<&str>) -> bool {
        let Some(message) = current else {
            self.reported.clear();
            return false;
        };
        if self.reported.contains(message) {
            return false;
        }
        error!(error = message, "live stream error");
        self.reported.insert(message.to_string());
        true
    }
}
