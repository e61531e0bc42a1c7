// SPDX-FileCopyrightText: 2026 Zaman Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session store trait for the persisted session token.

use async_trait::async_trait;

use crate::error::ZamanError;
use crate::types::Session;

/// Durable home of the session token.
///
/// Written once at login/register, read once at startup, cleared on logout.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Loads and decodes the stored session.
    ///
    /// Returns `None` when nothing is stored or the stored token does not
    /// carry a decodable user id.
    async fn load(&self) -> Result<Option<Session>, ZamanError>;

    /// Persists the session token, replacing any previous one.
    async fn save(&self, session: &Session) -> Result<(), ZamanError>;

    /// Removes the stored token. Clearing an empty store is not an error.
    async fn clear(&self) -> Result<(), ZamanError>;
}
