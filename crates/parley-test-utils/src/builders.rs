// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Message and channel payload builders.

use parley_core::{ContentBlock, HistorySnapshot, Message, MessageContent, Role, StreamUpdate};

pub fn human(id: &str, text: &str) -> Message {
    Message::new(id, Role::Human, text)
}

pub fn assistant(id: &str, text: &str) -> Message {
    Message::new(id, Role::Assistant, text)
}

pub fn internal(id: &str, text: &str) -> Message {
    Message::new(id, Role::Internal, text)
}

/// An assistant message made only of a tool-result block.
pub fn tool_result(id: &str) -> Message {
    Message::new(
        id,
        Role::Assistant,
        MessageContent::Blocks(vec![ContentBlock::ToolResult {
            tool_use_id: Some(format!("call-{id}")),
            content: serde_json::json!({ "ok": true }),
        }]),
    )
}

/// `n` assistant turns with ids `{prefix}0..{prefix}{n-1}`.
pub fn turns(prefix: &str, n: usize) -> Vec<Message> {
    (0..n)
        .map(|i| assistant(&format!("{prefix}{i}"), &format!("turn {i}")))
        .collect()
}

pub fn snapshot(messages: Vec<Message>) -> HistorySnapshot {
    HistorySnapshot {
        messages,
        created_at: Some(chrono::Utc::now()),
    }
}

pub fn streaming(messages: Vec<Message>) -> StreamUpdate {
    StreamUpdate {
        messages,
        is_loading: true,
        error: None,
    }
}

pub fn settled(messages: Vec<Message>) -> StreamUpdate {
    StreamUpdate {
        messages,
        is_loading: false,
        error: None,
    }
}

/// Disclosed vetting block from `(question, answer)` pairs.
pub fn disclosed_qa(party: &str, pairs: &[(&str, &str)]) -> String {
    let mut text = format!(
        "Here are {} vetting answers from the matched {party}:\n",
        pairs.len()
    );
    for (n, (question, answer)) in pairs.iter().enumerate() {
        text.push_str(&format!("\n**{}. {question}**\n{answer}\n", n + 1));
    }
    text
}

/// Teaser vetting block listing `questions`.
pub fn teaser_qa(party: &str, questions: &[&str]) -> String {
    let mut text = format!(
        "The matched {party} has answered {} vetting questions.\n",
        questions.len()
    );
    for (n, question) in questions.iter().enumerate() {
        text.push_str(&format!("\n{}. {question}", n + 1));
    }
    text
}
