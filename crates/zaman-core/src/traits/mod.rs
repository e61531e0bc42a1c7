// SPDX-FileCopyrightText: 2026 Zaman Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Seam traits between the request pipeline, its environment, and storage.
//!
//! All traits use `#[async_trait]` for dynamic dispatch compatibility.

pub mod delay;
pub mod session_store;
pub mod transport;

pub use delay::{Delay, TokioDelay};
pub use session_store::SessionStore;
pub use transport::Transport;
