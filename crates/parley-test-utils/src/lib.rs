// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Parley integration tests.
//!
//! Provides a scripted history source and message builders for fast,
//! deterministic tests without a backend.
//!
//! # Components
//!
//! - [`MockHistory`] - Mock poll channel with queued responses and request capture
//! - [`builders`] - Terse constructors for messages, snapshots, and stream ticks

pub mod builders;
pub mod mock_history;

pub use mock_history::MockHistory;
