// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Vetting Q/A sub-protocol embedded in assistant text.
//!
//! Assistant messages relay the matched party's vetting answers as plain
//! text. This crate recovers that structure:
//! - [`QaExtractor`] recognizes the disclosed and withheld (teaser) headers
//!   and their numbered entries
//! - [`dedupe_questions`] collapses restated questions to one slot each
//! - [`split_addendum`] separates a trailing "the counterparty has answered
//!   your question:" segment from the Q/A block
//!
//! Everything here is a pure function over `&str`; nothing allocates state.

pub mod addendum;
pub mod dedup;
pub mod extract;

pub use addendum::{ADDENDUM_MARKER, AddendumSplit, extract_addendum, split_addendum};
pub use dedup::{dedupe_extraction, dedupe_questions};
pub use extract::{QaExtractor, extract_qa};
