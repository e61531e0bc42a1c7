// SPDX-FileCopyrightText: 2026 Zaman Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Backend client for the Zaman assistant.
//!
//! [`ApiClient`] is the resilient request pipeline (per-attempt timeout,
//! cold-start tolerance, linear backoff). [`ZamanApi`] layers one thin
//! adapter per backend route on top of it.

pub mod client;
pub mod retry;
pub mod transport;
pub mod types;

use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::info;
use zaman_config::ClientConfig;
use zaman_core::{ApiRequest, AudioClip, Route, Session, UserId, ZamanError};

pub use client::ApiClient;
pub use retry::{AttemptKind, AttemptOutcome, RequestAttempt, RetryPolicy, RetryState};
pub use transport::ReqwestTransport;
pub use types::{ChatReply, ChatTurn, Transcription};

use crate::types::{AuthRequest, AuthResponse, ChatRequest, ChatResponse, TranscribeResponse};

/// Typed adapters for the backend routes.
#[derive(Debug, Clone)]
pub struct ZamanApi {
    client: ApiClient,
}

impl ZamanApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Builds the adapters over an HTTP client for `config`.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ZamanError> {
        Ok(Self::new(ApiClient::new(config)?))
    }

    /// `POST /login`.
    pub async fn login(
        &self,
        username: &str,
        password: &SecretString,
    ) -> Result<Session, ZamanError> {
        self.authenticate(Route::Login, username, password).await
    }

    /// `POST /register`.
    pub async fn register(
        &self,
        username: &str,
        password: &SecretString,
    ) -> Result<Session, ZamanError> {
        self.authenticate(Route::Register, username, password).await
    }

    async fn authenticate(
        &self,
        route: Route,
        username: &str,
        password: &SecretString,
    ) -> Result<Session, ZamanError> {
        let body = to_json(&AuthRequest {
            username,
            password: password.expose_secret(),
        })?;
        let resp: AuthResponse = self.call(ApiRequest::json(route, body)).await?;
        let session = Session::new(resp.user_id, resp.token)?;
        info!(route = %route, user_id = %session.user_id(), "authenticated");
        Ok(session)
    }

    /// `GET /user?user_id=<id>`. The profile shape is backend-defined.
    pub async fn fetch_user_data(&self, user_id: &UserId) -> Result<Value, ZamanError> {
        let request = ApiRequest::new(Route::User).with_query("user_id", user_id.to_string());
        self.client.call(&request).await
    }

    /// `POST /chat` with the full history.
    pub async fn send_chat(
        &self,
        messages: &[ChatTurn],
        user_id: &UserId,
    ) -> Result<ChatReply, ZamanError> {
        let body = to_json(&ChatRequest { messages, user_id })?;
        let resp: ChatResponse = self.call(ApiRequest::json(Route::Chat, body)).await?;
        Ok(resp.into())
    }

    /// `POST /transcribe` as a multipart upload.
    pub async fn transcribe_audio(&self, clip: AudioClip) -> Result<Transcription, ZamanError> {
        let resp: TranscribeResponse = self
            .call(ApiRequest::audio(Route::Transcribe, clip))
            .await?;
        Ok(resp.into())
    }

    async fn call<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ZamanError> {
        let body = self.client.call(&request).await?;
        serde_json::from_value(body).map_err(|e| ZamanError::Decode {
            message: format!("unexpected {} response: {e}", request.route),
            source: Some(Box::new(e)),
        })
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<Value, ZamanError> {
    serde_json::to_value(value)
        .map_err(|e| ZamanError::Internal(format!("failed to encode request: {e}")))
}
