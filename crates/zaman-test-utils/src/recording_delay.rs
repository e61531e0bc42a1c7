// SPDX-FileCopyrightText: 2026 Zaman Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! A [`Delay`] that records requested waits instead of sleeping.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use zaman_core::Delay;

/// Records every requested wait and returns immediately.
#[derive(Debug, Default)]
pub struct RecordingDelay {
    waits: Mutex<Vec<Duration>>,
}

impl RecordingDelay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits requested so far, in order.
    pub fn waits(&self) -> Vec<Duration> {
        self.waits.lock().expect("waits lock").clone()
    }

    /// Waits requested so far, in whole milliseconds.
    pub fn waits_ms(&self) -> Vec<u128> {
        self.waits().iter().map(Duration::as_millis).collect()
    }
}

#[async_trait]
impl Delay for RecordingDelay {
    async fn sleep(&self, duration: Duration) {
        self.waits.lock().expect("waits lock").push(duration);
    }
}
