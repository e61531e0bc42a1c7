// SPDX-FileCopyrightText: 2026 Zaman Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Login/registration flow and session lifecycle.
//!
//! Credentials are validated locally first; invalid forms never reach the
//! backend. A successful submission persists the session token through the
//! injected [`SessionStore`].

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use strum::{Display, EnumString};
use tracing::{debug, info, warn};
use zaman_client::ZamanApi;
use zaman_core::{Session, SessionStore, UserId, ZamanError};

use crate::messages;

/// Minimum password length, counted in characters.
pub const MIN_PASSWORD_CHARS: usize = 5;

/// Which form is being submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum AuthMode {
    #[default]
    Login,
    Register,
}

/// Contents of the auth form.
#[derive(Debug)]
pub struct Credentials {
    pub username: String,
    pub password: SecretString,
    /// Only consulted in [`AuthMode::Register`].
    pub confirmation: Option<SecretString>,
}

impl Credentials {
    pub fn login(username: impl Into<String>, password: SecretString) -> Self {
        Self {
            username: username.into(),
            password,
            confirmation: None,
        }
    }

    pub fn register(
        username: impl Into<String>,
        password: SecretString,
        confirmation: SecretString,
    ) -> Self {
        Self {
            username: username.into(),
            password,
            confirmation: Some(confirmation),
        }
    }
}

/// Checks the form before any network call.
///
/// Rules apply in order and the first violation wins: password length, then
/// (register only) confirmation length, then equality.
pub fn validate_credentials(mode: AuthMode, creds: &Credentials) -> Result<(), ZamanError> {
    let password = creds.password.expose_secret();
    if password.chars().count() < MIN_PASSWORD_CHARS {
        return Err(ZamanError::Validation(messages::PASSWORD_TOO_SHORT.into()));
    }

    if mode == AuthMode::Register {
        let confirmation = creds
            .confirmation
            .as_ref()
            .map(|c| c.expose_secret())
            .unwrap_or_default();
        if confirmation.chars().count() < MIN_PASSWORD_CHARS {
            return Err(ZamanError::Validation(
                messages::CONFIRMATION_TOO_SHORT.into(),
            ));
        }
        if password != confirmation {
            return Err(ZamanError::Validation(messages::PASSWORDS_MISMATCH.into()));
        }
    }
    Ok(())
}

/// Owns the current session and the form-level error.
pub struct AuthFlow {
    api: ZamanApi,
    store: Arc<dyn SessionStore>,
    session: Option<Session>,
    error: Option<String>,
}

impl AuthFlow {
    pub fn new(api: ZamanApi, store: Arc<dyn SessionStore>) -> Self {
        Self {
            api,
            store,
            session: None,
            error: None,
        }
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn user_id(&self) -> Option<&UserId> {
        self.session.as_ref().map(Session::user_id)
    }

    /// Inline message of the last failed submission.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Restores the session persisted by an earlier run.
    pub async fn restore(&mut self) -> Result<Option<&Session>, ZamanError> {
        self.session = self.store.load().await?;
        match &self.session {
            Some(session) => debug!(user_id = %session.user_id(), "session restored"),
            None => debug!("no restorable session"),
        }
        Ok(self.session.as_ref())
    }

    /// Validates and submits the form, persisting the session on success.
    ///
    /// On failure the normalized message is also kept in [`AuthFlow::error`].
    pub async fn submit(
        &mut self,
        mode: AuthMode,
        creds: &Credentials,
    ) -> Result<&Session, ZamanError> {
        self.error = None;
        match self.try_submit(mode, creds).await {
            Ok(session) => {
                info!(mode = %mode, user_id = %session.user_id(), "signed in");
                let session = self.session.insert(session);
                Ok(&*session)
            }
            Err(e) => {
                if !matches!(e, ZamanError::Validation(_)) {
                    warn!(mode = %mode, error = %e, "authentication failed");
                }
                self.error = Some(e.user_message());
                Err(e)
            }
        }
    }

    async fn try_submit(
        &self,
        mode: AuthMode,
        creds: &Credentials,
    ) -> Result<Session, ZamanError> {
        validate_credentials(mode, creds)?;
        let session = match mode {
            AuthMode::Login => self.api.login(&creds.username, &creds.password).await?,
            AuthMode::Register => self.api.register(&creds.username, &creds.password).await?,
        };
        self.store.save(&session).await?;
        Ok(session)
    }

    /// Forgets the session locally and in the store. Safe to call twice.
    pub async fn logout(&mut self) -> Result<(), ZamanError> {
        self.store.clear().await?;
        if let Some(session) = self.session.take() {
            info!(user_id = %session.user_id(), "signed out");
        }
        self.error = None;
        Ok(())
    }
}
