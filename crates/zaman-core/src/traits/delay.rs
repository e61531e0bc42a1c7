// SPDX-FileCopyrightText: 2026 Zaman Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Delay abstraction for the waits between retry attempts.

use std::time::Duration;

use async_trait::async_trait;

/// Suspends the caller between attempts.
///
/// Swapping the implementation lets tests observe the cold-start and backoff
/// schedule without waiting on real timers.
#[async_trait]
pub trait Delay: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// [`Delay`] backed by the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioDelay;

#[async_trait]
impl Delay for TokioDelay {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
