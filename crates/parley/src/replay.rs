// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `parley replay`: drive a [`Conversation`] from a recorded event script.
//!
//! The script is a JSON array of channel events:
//!
//! ```json
//! [
//!   {"type": "switch", "session_key": "s1"},
//!   {"type": "stream", "messages": [...], "is_loading": true},
//!   {"type": "poll_start"},
//!   {"type": "poll", "snapshots": [{"messages": [...]}]},
//!   {"type": "poll_error", "message": "503"},
//!   {"type": "hint", "counterparty": "tenant"},
//!   {"type": "submit", "text": "Is parking included?"}
//! ]
//! ```
//!
//! A `poll` or `poll_error` answers the ticket taken by the last unanswered
//! `poll_start`, or starts a fresh poll when none is pending. Events between
//! the two (a `switch`, say) replay a response that arrives late.

use std::path::Path;

use parley_core::{HistorySnapshot, ParleyError, SessionKey, StreamUpdate};
use parley_session::{Conversation, ConversationView, PollOutcome, PollTicket, Submission};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReplayEvent {
    Switch { session_key: SessionKey },
    Stream(StreamUpdate),
    PollStart,
    Poll { snapshots: Vec<HistorySnapshot> },
    PollError { message: String },
    Hint { counterparty: Option<String> },
    Submit { text: String },
}

/// Final state after a replay.
#[derive(Debug, Serialize)]
pub struct ReplayReport {
    #[serde(flatten)]
    pub view: ConversationView,
    pub submissions: Vec<Submission>,
    pub skipped_polls: usize,
    pub stale_polls: usize,
}

pub fn replay(
    conversation: &mut Conversation,
    events: impl IntoIterator<Item = ReplayEvent>,
) -> ReplayReport {
    let mut submissions = Vec::new();
    let mut skipped_polls = 0;
    let mut stale_polls = 0;
    let mut pending: Option<PollTicket> = None;

    for event in events {
        let response = match event {
            ReplayEvent::Switch { session_key } => {
                conversation.switch_session(session_key);
                continue;
            }
            ReplayEvent::Stream(update) => {
                conversation.apply_stream(update);
                continue;
            }
            ReplayEvent::Hint { counterparty } => {
                conversation.set_counterparty_hint(counterparty);
                continue;
            }
            ReplayEvent::Submit { text } => {
                submissions.extend(conversation.submit(&text));
                continue;
            }
            ReplayEvent::PollStart => {
                pending = conversation.begin_poll();
                if pending.is_none() {
                    skipped_polls += 1;
                }
                continue;
            }
            ReplayEvent::Poll { snapshots } => Ok(snapshots),
            ReplayEvent::PollError { message } => Err(ParleyError::transport(message)),
        };

        let Some(ticket) = pending.take().or_else(|| conversation.begin_poll()) else {
            skipped_polls += 1;
            continue;
        };
        let outcome = conversation.apply_poll(&ticket, response);
        debug!(?outcome, "replayed poll");
        if outcome == PollOutcome::Stale {
            stale_polls += 1;
        }
    }

    ReplayReport {
        view: conversation.view(),
        submissions,
        skipped_polls,
        stale_polls,
    }
}

/// Load the script at `path`, replay it, and print the report as JSON.
pub fn run_replay(path: &Path, conversation: &mut Conversation) -> Result<(), ParleyError> {
    let content = std::fs::read_to_string(path)?;
    let events: Vec<ReplayEvent> = serde_json::from_str(&content)?;
    let report = replay(conversation, events);
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley_core::DisclosureMode;

    fn events(json: &str) -> Vec<ReplayEvent> {
        serde_json::from_str(json).expect("script should parse")
    }

    #[test]
    fn replays_stream_poll_and_submit() {
        let script = events(
            r#"[
                {"type": "switch", "session_key": "s1"},
                {"type": "stream", "messages": [
                    {"id": "h1", "role": "user", "content": "any answers?"}
                ], "is_loading": true},
                {"type": "poll", "snapshots": [{"messages": []}]},
                {"type": "stream", "messages": [
                    {"id": "h1", "role": "user", "content": "any answers?"},
                    {"id": "a1", "role": "ai", "content": [
                        {"type": "text", "text": "Here are 1 vetting answers from the matched landlord:\n1. Pets?\nNo"}
                    ]}
                ], "is_loading": false},
                {"type": "poll_error", "message": "503"},
                {"type": "submit", "text": "ok thanks"}
            ]"#,
        );

        let mut conversation = Conversation::default();
        let report = replay(&mut conversation, script);

        assert_eq!(report.skipped_polls, 1);
        assert_eq!(report.stale_polls, 0);
        assert_eq!(report.view.transcript.len(), 1);
        assert_eq!(
            report.view.summary.as_ref().map(|s| s.mode),
            Some(DisclosureMode::Disclosed)
        );
        assert_eq!(report.submissions.len(), 1);
        assert_eq!(report.submissions[0].transcript.len(), 2);
    }

    #[test]
    fn report_serializes_flat() {
        let mut conversation = Conversation::default();
        let report = replay(
            &mut conversation,
            events(r#"[{"type": "switch", "session_key": "s1"}]"#),
        );
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["session_key"], "s1");
        assert!(json["transcript"].as_array().unwrap().is_empty());
    }

    #[test]
    fn poll_before_any_session_is_skipped() {
        let mut conversation = Conversation::default();
        let report = replay(
            &mut conversation,
            events(r#"[{"type": "poll", "snapshots": []}]"#),
        );
        assert_eq!(report.skipped_polls, 1);
        assert_eq!(report.view.session_key, None);
    }

    #[test]
    fn late_poll_response_after_switch_is_stale() {
        let script = events(
            r#"[
                {"type": "switch", "session_key": "s1"},
                {"type": "poll_start"},
                {"type": "switch", "session_key": "s2"},
                {"type": "poll", "snapshots": [{"messages": [
                    {"id": "h1", "role": "user", "content": "from s1"}
                ]}]},
                {"type": "poll", "snapshots": [{"messages": [
                    {"id": "h9", "role": "user", "content": "from s2"}
                ]}]}
            ]"#,
        );

        let mut conversation = Conversation::default();
        let report = replay(&mut conversation, script);

        assert_eq!(report.stale_polls, 1);
        assert_eq!(report.view.session_key, Some(SessionKey::new("s2")));
        let ids: Vec<&str> = report
            .view
            .transcript
            .iter()
            .map(|e| e.message.id.as_str())
            .collect();
        assert_eq!(ids, vec!["h9"]);
    }

    #[test]
    fn unknown_event_type_is_rejected() {
        assert!(serde_json::from_str::<Vec<ReplayEvent>>(r#"[{"type": "reboot"}]"#).is_err());
    }
}
