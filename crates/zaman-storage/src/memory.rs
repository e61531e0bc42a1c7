// SPDX-FileCopyrightText: 2026 Zaman Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-process session store.

use async_trait::async_trait;
use tokio::sync::Mutex;
use zaman_core::{Session, SessionStore, ZamanError};

/// Keeps the token in memory only. Nothing survives the process.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    token: Mutex<Option<String>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-seeded with a raw token, as if written by an earlier run.
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(token.into())),
        }
    }

    /// The raw stored token, if any.
    pub async fn raw_token(&self) -> Option<String> {
        self.token.lock().await.clone()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn load(&self) -> Result<Option<Session>, ZamanError> {
        Ok(self
            .token
            .lock()
            .await
            .as_deref()
            .and_then(Session::from_token))
    }

    async fn save(&self, session: &Session) -> Result<(), ZamanError> {
        *self.token.lock().await = Some(session.token().to_string());
        Ok(())
    }

    async fn clear(&self) -> Result<(), ZamanError> {
        *self.token.lock().await = None;
        Ok(())
    }
}
