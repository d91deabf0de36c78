// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Parley conversation client.
//!
//! This crate provides the message model shared by every other crate in the
//! workspace, the [`ParleyError`] type, and the port traits through which the
//! external channels (live stream, history poll) feed the client.

pub mod error;
pub mod qa;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::ParleyError;
pub use qa::{Counterparty, DisclosureMode, QaExtraction, QaItem};
pub use traits::HistorySource;
pub use types::{
    ContentBlock, HistoryRequest, HistorySnapshot, Message, MessageContent, MessageId, Role,
    SessionKey, StreamUpdate,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parley_error_has_all_variants() {
        let _config = ParleyError::Config("test".into());
        let _transport = ParleyError::Transport {
            message: "test".into(),
            source: None,
        };
        let _decode = ParleyError::Decode {
            message: "test".into(),
            source: Some(Box::new(std::io::Error::other("test"))),
        };
        let _timeout = ParleyError::Timeout {
            duration: std::time::Duration::from_secs(30),
        };
        let _io = ParleyError::Io(std::io::Error::other("test"));
        let _internal = ParleyError::Internal("test".into());
    }

    #[test]
    fn history_source_is_object_safe() {
        fn _assert_history_source(_: &dyn HistorySource) {}
    }
}
