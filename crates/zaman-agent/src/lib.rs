// SPDX-FileCopyrightText: 2026 Zaman Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Screen logic of the Zaman assistant, without rendering.
//!
//! [`ZamanAgent`] wires the auth flow, the chat session, and profile loading
//! to one backend client and one session store.

pub mod auth;
pub mod chat;
pub mod messages;
pub mod profile;

use std::sync::Arc;

use tracing::info;
use zaman_client::ZamanApi;
use zaman_config::ZamanConfig;
use zaman_core::{AudioClip, Session, SessionStore, UserId, ZamanError};
use zaman_storage::FileSessionStore;

pub use auth::{validate_credentials, AuthFlow, AuthMode, Credentials};
pub use chat::{ChatSession, ChatState, Conversation, TurnOutcome};
pub use profile::{load_profile, Profile, ProfileUnavailable};

/// The assistant as seen from a front end.
pub struct ZamanAgent {
    api: ZamanApi,
    auth: AuthFlow,
    chat: ChatSession,
    profile: Option<Profile>,
}

impl ZamanAgent {
    pub fn new(api: ZamanApi, store: Arc<dyn SessionStore>, fallback_user_id: i64) -> Self {
        Self {
            auth: AuthFlow::new(api.clone(), store),
            chat: ChatSession::new(api.clone(), fallback_user_id),
            api,
            profile: None,
        }
    }

    /// Builds an agent talking HTTP to the configured backend, with the
    /// session token kept at `session.token_path`.
    pub fn from_config(config: &ZamanConfig) -> Result<Self, ZamanError> {
        let api = ZamanApi::from_config(&config.client)?;
        let store = Arc::new(FileSessionStore::from_config(&config.session));
        info!(base_url = %config.client.base_url, "agent initialized");
        Ok(Self::new(api, store, config.agent.fallback_user_id))
    }

    pub fn auth(&self) -> &AuthFlow {
        &self.auth
    }

    pub fn chat(&self) -> &ChatSession {
        &self.chat
    }

    pub fn session(&self) -> Option<&Session> {
        self.auth.session()
    }

    pub fn user_id(&self) -> Option<&UserId> {
        self.auth.user_id()
    }

    /// Restores a persisted session, if one is decodable. No network access.
    pub async fn restore(&mut self) -> Result<Option<&Session>, ZamanError> {
        let user_id = self.auth.restore().await?.map(|s| s.user_id().clone());
        self.chat.set_user(user_id);
        Ok(self.auth.session())
    }

    /// Restores a persisted session and loads its profile.
    ///
    /// A profile failure only sets the chat banner.
    pub async fn start(&mut self) -> Result<Option<&Session>, ZamanError> {
        if self.restore().await?.is_some() {
            self.refresh_profile().await;
        }
        Ok(self.auth.session())
    }

    /// Signs in, then loads the profile of the new session.
    pub async fn sign_in(
        &mut self,
        mode: AuthMode,
        creds: &Credentials,
    ) -> Result<&Session, ZamanError> {
        let user_id = self.auth.submit(mode, creds).await?.user_id().clone();
        self.chat.set_user(Some(user_id));
        self.refresh_profile().await;
        self.auth.session().ok_or_else(|| {
            ZamanError::Internal("session missing after successful sign-in".into())
        })
    }

    /// Clears the stored token and starts a fresh anonymous conversation.
    pub async fn logout(&mut self) -> Result<(), ZamanError> {
        self.auth.logout().await?;
        self.profile = None;
        self.chat.set_user(None);
        self.chat.reset();
        Ok(())
    }

    /// Profile of the signed-in user, as last loaded.
    pub fn profile(&self) -> Option<&Profile> {
        self.profile.as_ref()
    }

    /// Fetches the signed-in user's profile again. `None` without a session.
    ///
    /// On failure the cached profile is dropped and the chat banner shows
    /// [`messages::PROFILE_UNAVAILABLE`].
    pub async fn refresh_profile(&mut self) -> Option<Result<&Profile, ProfileUnavailable>> {
        let user_id = self.auth.user_id()?.clone();
        match load_profile(&self.api, &user_id).await {
            Ok(profile) => {
                let profile: &Profile = self.profile.insert(profile);
                Some(Ok(profile))
            }
            Err(unavailable) => {
                self.profile = None;
                self.chat.show_banner(unavailable.to_string());
                Some(Err(unavailable))
            }
        }
    }

    pub async fn send_text(&mut self, input: &str) -> TurnOutcome {
        self.chat.send_text(input).await
    }

    pub async fn send_audio(&mut self, clip: AudioClip) -> TurnOutcome {
        self.chat.send_audio(clip).await
    }
}
