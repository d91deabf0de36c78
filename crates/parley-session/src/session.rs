// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation controller: the single owner of per-session channel state.
//!
//! The stream channel writes through [`Conversation::apply_stream`], the poll
//! channel through [`Conversation::begin_poll`] / [`Conversation::apply_poll`].
//! Every write re-runs reconciliation and refreshes the Q/A summary; readers
//! only see the result through [`Conversation::messages`] and
//! [`Conversation::view`].

use std::sync::Arc;

use parley_config::ParleyConfig;
use parley_core::{
    HistoryRequest, HistorySnapshot, Message, ParleyError, QaExtraction, SessionKey, StreamUpdate,
};
use parley_vetting::QaExtractor;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::cache::QaCache;
use crate::errors::ErrorReporter;
use crate::projector::{TranscriptEntry, latest_qa, project_transcript};
use crate::reconcile::{preserve_displayed, reconcile};
use crate::submit::{Submission, build_submission};

/// Default number of snapshots requested per poll.
pub const DEFAULT_HISTORY_LIMIT: usize = 10;

/// Proof that a poll was started for a specific session generation.
///
/// A response is only applied if the conversation is still on the same
/// generation when it arrives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollTicket {
    session_key: SessionKey,
    generation: u64,
    limit: usize,
}

impl PollTicket {
    pub fn session_key(&self) -> &SessionKey {
        &self.session_key
    }

    /// The request to send to the history source.
    pub fn request(&self) -> HistoryRequest {
        HistoryRequest {
            session_key: self.session_key.clone(),
            limit: self.limit,
        }
    }
}

/// What happened to a poll response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// The most recent snapshot replaced the polled list.
    Applied,
    /// The session changed while the poll was in flight; the response was dropped.
    Stale,
    /// The source failed; the polled list is unchanged.
    Failed,
    /// The source returned no snapshots; the polled list is unchanged.
    Empty,
}

/// Everything a consumer renders for the active session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversationView {
    pub session_key: Option<SessionKey>,
    pub transcript: Vec<TranscriptEntry>,
    pub summary: Option<QaExtraction>,
}

#[derive(Debug)]
struct SessionState {
    key: SessionKey,
    stream: Vec<Message>,
    polled: Vec<Message>,
    is_stream_active: bool,
    displayed: Vec<Message>,
    errors: ErrorReporter,
}

impl SessionState {
    fn new(key: SessionKey) -> Self {
        Self {
            key,
            stream: Vec::new(),
            polled: Vec::new(),
            is_stream_active: false,
            displayed: Vec::new(),
            errors: ErrorReporter::new(),
        }
    }
}

pub struct Conversation {
    extractor: QaExtractor,
    cache: Arc<QaCache>,
    history_limit: usize,
    hint: Option<String>,
    generation: u64,
    session: Option<SessionState>,
}

impl Conversation {
    pub fn new(extractor: QaExtractor) -> Self {
        Self::with_cache(extractor, Arc::new(QaCache::new()))
    }

    /// A conversation writing its summaries into a shared cache.
    pub fn with_cache(extractor: QaExtractor, cache: Arc<QaCache>) -> Self {
        Self {
            extractor,
            cache,
            history_limit: DEFAULT_HISTORY_LIMIT,
            hint: None,
            generation: 0,
            session: None,
        }
    }

    pub fn from_config(config: &ParleyConfig) -> Self {
        let mut conversation = Self::new(QaExtractor::from_config(&config.vetting));
        conversation.history_limit = config.poll.history_limit;
        conversation
    }

    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit.max(1);
        self
    }

    pub fn session_key(&self) -> Option<&SessionKey> {
        self.session.as_ref().map(|s| &s.key)
    }

    pub fn cache(&self) -> &Arc<QaCache> {
        &self.cache
    }

    pub fn is_stream_active(&self) -> bool {
        self.session.as_ref().is_some_and(|s| s.is_stream_active)
    }

    /// Open `key`, discarding all state of the previous session.
    ///
    /// Switching to the key already open is a no-op. Any poll started before
    /// the switch is invalidated.
    pub fn switch_session(&mut self, key: SessionKey) {
        if self.session_key() == Some(&key) {
            return;
        }

        self.generation += 1;
        if let Some(previous) = self.session.take() {
            self.cache.clear(&previous.key);
            info!(from = %previous.key, to = %key, "switching session");
        } else {
            info!(session_key = %key, "opening session");
        }
        self.cache.clear(&key);
        self.session = Some(SessionState::new(key));
    }

    /// Close the current session without opening another.
    pub fn close(&mut self) {
        if let Some(previous) = self.session.take() {
            self.generation += 1;
            self.cache.clear(&previous.key);
            info!(session_key = %previous.key, "session closed");
        }
    }

    /// Counterparty hint forwarded to the extractor.
    pub fn set_counterparty_hint(&mut self, hint: Option<String>) {
        self.hint = hint;
        self.refresh_summary();
    }

    /// Apply one tick of the live stream.
    ///
    /// Returns `false` when no session is open.
    pub fn apply_stream(&mut self, update: StreamUpdate) -> bool {
        let Some(session) = self.session.as_mut() else {
            debug!("stream update without an open session ignored");
            return false;
        };
        session.errors.observe(update.error.as_deref());
        session.stream = update.messages;
        session.is_stream_active = update.is_loading;
        self.refresh();
        true
    }

    /// Start a poll, unless no session is open or the stream is producing.
    pub fn begin_poll(&self) -> Option<PollTicket> {
        let session = self.session.as_ref()?;
        if session.is_stream_active {
            debug!(session_key = %session.key, "poll skipped while streaming");
            return None;
        }
        Some(PollTicket {
            session_key: session.key.clone(),
            generation: self.generation,
            limit: self.history_limit,
        })
    }

    /// Apply the response to a poll started with [`Conversation::begin_poll`].
    pub fn apply_poll(
        &mut self,
        ticket: &PollTicket,
        response: Result<Vec<HistorySnapshot>, ParleyError>,
    ) -> PollOutcome {
        let generation = self.generation;
        let current = self
            .session
            .as_mut()
            .filter(|s| ticket.generation == generation && s.key == ticket.session_key);
        let Some(session) = current else {
            debug!(session_key = %ticket.session_key, "stale poll response dropped");
            return PollOutcome::Stale;
        };

        let snapshots = match response {
            Ok(snapshots) => snapshots,
            Err(e) => {
                warn!(session_key = %session.key, error = %e, "history poll failed");
                return PollOutcome::Failed;
            }
        };
        let Some(latest) = snapshots.into_iter().next() else {
            debug!(session_key = %session.key, "history poll returned no snapshots");
            return PollOutcome::Empty;
        };

        session.polled = latest.messages;
        self.refresh();
        PollOutcome::Applied
    }

    /// The reconciled message list currently on display.
    pub fn messages(&self) -> &[Message] {
        self.session
            .as_ref()
            .map(|s| s.displayed.as_slice())
            .unwrap_or_default()
    }

    /// The cached Q/A summary for the active session.
    pub fn summary(&self) -> Option<QaExtraction> {
        self.session_key().and_then(|key| self.cache.get(key))
    }

    pub fn transcript(&self) -> Vec<TranscriptEntry> {
        project_transcript(self.messages(), &self.extractor, self.hint.as_deref())
    }

    pub fn view(&self) -> ConversationView {
        ConversationView {
            session_key: self.session_key().cloned(),
            transcript: self.transcript(),
            summary: self.summary(),
        }
    }

    /// Optimistic projection of submitting `text`.
    ///
    /// Nothing is recorded here: the submitted turn reaches the session when
    /// the stream echoes it back. Returns `None` without an open session or
    /// for blank input.
    pub fn submit(&self, text: &str) -> Option<Submission> {
        self.session.as_ref()?;
        build_submission(self.messages(), text, &self.extractor, self.hint.as_deref())
    }

    fn refresh(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let candidate = reconcile(&session.stream, &session.polled, session.is_stream_active);
        session.displayed = preserve_displayed(&session.displayed, candidate);
        self.refresh_summary();
    }

    fn refresh_summary(&self) {
        let Some(session) = self.session.as_ref() else {
            return;
        };
        let qa = latest_qa(&session.displayed, &self.extractor, self.hint.as_deref());
        if self.cache.update(&session.key, qa) {
            debug!(session_key = %session.key, "q/a summary updated");
        }
    }
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new(QaExtractor::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley_core::Role;
    use tracing_test::traced_test;

    fn msg(id: &str, role: Role, text: &str) -> Message {
        Message::new(id, role, text)
    }

    fn turns(n: usize) -> Vec<Message> {
        (0..n)
            .map(|i| msg(&format!("m{i}"), Role::Assistant, &format!("turn {i}")))
            .collect()
    }

    fn stream(messages: Vec<Message>, is_loading: bool) -> StreamUpdate {
        StreamUpdate {
            messages,
            is_loading,
            error: None,
        }
    }

    fn snapshot(messages: Vec<Message>) -> Vec<HistorySnapshot> {
        vec![HistorySnapshot {
            messages,
            created_at: None,
        }]
    }

    fn open(key: &str) -> Conversation {
        let mut conversation = Conversation::default();
        conversation.switch_session(SessionKey::new(key));
        conversation
    }

    #[test]
    fn stream_without_session_is_ignored() {
        let mut conversation = Conversation::default();
        assert!(!conversation.apply_stream(stream(turns(1), false)));
        assert!(conversation.messages().is_empty());
        assert!(conversation.begin_poll().is_none());
    }

    #[test]
    fn poll_is_skipped_while_streaming() {
        let mut conversation = open("s1");
        conversation.apply_stream(stream(turns(1), true));
        assert!(conversation.begin_poll().is_none());
        conversation.apply_stream(stream(turns(1), false));
        assert!(conversation.begin_poll().is_some());
    }

    #[test]
    fn longer_poll_is_displayed_when_idle() {
        let mut conversation = open("s1");
        conversation.apply_stream(stream(turns(3), false));
        let ticket = conversation.begin_poll().unwrap();
        assert_eq!(
            conversation.apply_poll(&ticket, Ok(snapshot(turns(5)))),
            PollOutcome::Applied
        );
        assert_eq!(conversation.messages(), turns(5).as_slice());
    }

    #[test]
    fn ticket_request_carries_key_and_limit() {
        let mut conversation = Conversation::default().with_history_limit(3);
        conversation.switch_session(SessionKey::new("s9"));
        let request = conversation.begin_poll().unwrap().request();
        assert_eq!(request.session_key, SessionKey::new("s9"));
        assert_eq!(request.limit, 3);
    }

    #[test]
    fn only_the_most_recent_snapshot_is_used() {
        let mut conversation = open("s1");
        let ticket = conversation.begin_poll().unwrap();
        let snapshots = vec![
            HistorySnapshot {
                messages: turns(2),
                created_at: None,
            },
            HistorySnapshot {
                messages: turns(4),
                created_at: None,
            },
        ];
        conversation.apply_poll(&ticket, Ok(snapshots));
        assert_eq!(conversation.messages().len(), 2);
    }

    #[traced_test]
    #[test]
    fn failed_poll_keeps_previous_snapshot() {
        let mut conversation = open("s1");
        let ticket = conversation.begin_poll().unwrap();
        conversation.apply_poll(&ticket, Ok(snapshot(turns(2))));

        let ticket = conversation.begin_poll().unwrap();
        let outcome = conversation.apply_poll(&ticket, Err(ParleyError::transport("unreachable")));
        assert_eq!(outcome, PollOutcome::Failed);
        assert_eq!(conversation.messages(), turns(2).as_slice());
        assert!(logs_contain("history poll failed"));

        let ticket = conversation.begin_poll().unwrap();
        assert_eq!(conversation.apply_poll(&ticket, Ok(Vec::new())), PollOutcome::Empty);
        assert_eq!(conversation.messages(), turns(2).as_slice());
    }

    #[test]
    fn poll_for_previous_session_is_stale() {
        let mut conversation = open("s1");
        let ticket = conversation.begin_poll().unwrap();
        conversation.switch_session(SessionKey::new("s2"));
        assert_eq!(
            conversation.apply_poll(&ticket, Ok(snapshot(turns(3)))),
            PollOutcome::Stale
        );
        assert!(conversation.messages().is_empty());
    }

    #[test]
    fn poll_across_round_trip_switch_is_stale() {
        let mut conversation = open("s1");
        let ticket = conversation.begin_poll().unwrap();
        conversation.switch_session(SessionKey::new("s2"));
        conversation.switch_session(SessionKey::new("s1"));
        assert_eq!(
            conversation.apply_poll(&ticket, Ok(snapshot(turns(3)))),
            PollOutcome::Stale
        );
    }

    #[test]
    fn switching_to_same_key_keeps_state() {
        let mut conversation = open("s1");
        conversation.apply_stream(stream(turns(2), false));
        let ticket = conversation.begin_poll().unwrap();
        conversation.switch_session(SessionKey::new("s1"));
        assert_eq!(conversation.messages().len(), 2);
        assert_eq!(
            conversation.apply_poll(&ticket, Ok(snapshot(turns(3)))),
            PollOutcome::Applied
        );
    }

    #[test]
    fn displayed_turns_never_regress() {
        let mut conversation = open("s1");
        let ticket = conversation.begin_poll().unwrap();
        conversation.apply_poll(&ticket, Ok(snapshot(turns(4))));
        // A reconnecting stream starts over with fewer messages.
        conversation.apply_stream(stream(turns(2), true));
        assert_eq!(conversation.messages().len(), 4);
    }

    #[test]
    fn poll_backfill_keeps_polled_order() {
        let old_qa = "Here are 1 vetting answers from the matched landlord:\n1. Pets?\nNo";
        let new_qa = "Here are 1 vetting answers from the matched landlord:\n1. Pets?\nOne cat";
        let mut conversation = open("s1");
        conversation.apply_stream(stream(
            vec![
                msg("h2", Role::Human, "and now?"),
                msg("a2", Role::Assistant, new_qa),
            ],
            false,
        ));

        let polled = vec![
            msg("h1", Role::Human, "any answers?"),
            msg("a1", Role::Assistant, old_qa),
            msg("h2", Role::Human, "and now?"),
            msg("a2", Role::Assistant, new_qa),
        ];
        let ticket = conversation.begin_poll().unwrap();
        conversation.apply_poll(&ticket, Ok(snapshot(polled.clone())));

        assert_eq!(conversation.messages(), polled.as_slice());
        assert_eq!(
            conversation.summary().unwrap().items,
            vec![parley_core::QaItem::new("Pets?", "One cat")]
        );
    }

    #[test]
    fn stream_edits_replace_by_identity() {
        let mut conversation = open("s1");
        conversation.apply_stream(stream(vec![msg("a", Role::Assistant, "Hel")], true));
        conversation.apply_stream(stream(vec![msg("a", Role::Assistant, "Hello")], false));
        assert_eq!(conversation.messages().len(), 1);
        assert_eq!(conversation.messages()[0].text_content(), "Hello");
    }

    #[test]
    fn summary_persists_after_qa_message_leaves() {
        let qa = "Here are 1 vetting answers from the matched landlord:\n1. Pets?\nYes";
        let mut conversation = open("s1");
        conversation.apply_stream(stream(vec![msg("a", Role::Assistant, qa)], false));
        let summary = conversation.summary().expect("summary cached");

        // The same identity is regenerated without the Q/A block.
        conversation.apply_stream(stream(vec![msg("a", Role::Assistant, "Let me check.")], false));
        assert_eq!(conversation.summary(), Some(summary));
        assert!(conversation.transcript().iter().any(|e| e.text() == "Let me check."));
    }

    #[test]
    fn session_reset_clears_everything() {
        let qa = "Here are 1 vetting answers from the matched landlord:\n1. Pets?\nYes";
        let mut conversation = open("s1");
        conversation.apply_stream(StreamUpdate {
            messages: vec![msg("a", Role::Assistant, qa)],
            is_loading: true,
            error: Some("blip".into()),
        });
        assert!(conversation.summary().is_some());

        conversation.switch_session(SessionKey::new("s2"));
        let view = conversation.view();
        assert_eq!(view.session_key, Some(SessionKey::new("s2")));
        assert!(view.transcript.is_empty());
        assert!(view.summary.is_none());
        assert!(conversation.messages().is_empty());
        assert!(!conversation.is_stream_active());
        assert!(conversation.cache().is_empty());
    }

    #[test]
    fn incoming_session_slot_is_cleared_on_switch() {
        let cache = Arc::new(QaCache::new());
        let stale = QaExtraction {
            items: Vec::new(),
            counterparty: parley_core::Counterparty::Tenant,
            mode: parley_core::DisclosureMode::Withheld,
        };
        cache.update(&SessionKey::new("s2"), Some(stale));

        let mut conversation = Conversation::with_cache(QaExtractor::new(), Arc::clone(&cache));
        conversation.switch_session(SessionKey::new("s2"));
        assert_eq!(conversation.summary(), None);
    }

    #[test]
    fn hint_resolves_placeholder_party() {
        let qa = "Here are 1 vetting answers from the matched counterparty:\n1. Pets?\nYes";
        let mut conversation = open("s1");
        conversation.apply_stream(stream(vec![msg("a", Role::Assistant, qa)], false));
        assert_eq!(
            conversation.summary().unwrap().counterparty,
            parley_core::Counterparty::Landlord
        );

        conversation.set_counterparty_hint(Some("tenant".into()));
        assert_eq!(
            conversation.summary().unwrap().counterparty,
            parley_core::Counterparty::Tenant
        );
    }

    #[test]
    fn submit_does_not_mutate_conversation() {
        let mut conversation = open("s1");
        conversation.apply_stream(stream(turns(1), false));
        let submission = conversation.submit("hello").unwrap();
        assert_eq!(submission.messages.len(), 2);
        assert_eq!(conversation.messages().len(), 1);
        assert!(Conversation::default().submit("hello").is_none());
    }

    #[test]
    fn close_invalidates_inflight_poll() {
        let mut conversation = open("s1");
        let ticket = conversation.begin_poll().unwrap();
        conversation.close();
        assert_eq!(conversation.session_key(), None);
        assert_eq!(
            conversation.apply_poll(&ticket, Ok(snapshot(turns(1)))),
            PollOutcome::Stale
        );
    }
}
