// SPDX-FileCopyrightText: 2026 Zaman Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session token persistence for the Zaman client.
//!
//! Two [`SessionStore`](zaman_core::SessionStore) implementations:
//! [`FileSessionStore`] for durable storage between runs and
//! [`InMemorySessionStore`] for tests and ephemeral sessions.

pub mod file;
pub mod memory;

pub use file::FileSessionStore;
pub use memory::InMemorySessionStore;
