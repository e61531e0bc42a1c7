// SPDX-FileCopyrightText: 2026 Zaman Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Zaman tests.
//!
//! Provides deterministic stand-ins for the network and the clock so the
//! request pipeline can be exercised without a backend or real waits.
//!
//! # Components
//!
//! - [`ScriptedTransport`] - Transport replaying a FIFO script of replies
//! - [`RecordingDelay`] - Delay that records waits and returns immediately

pub mod recording_delay;
pub mod scripted_transport;

pub use recording_delay::RecordingDelay;
pub use scripted_transport::{json_response, RecordedCall, ScriptedReply, ScriptedTransport};
