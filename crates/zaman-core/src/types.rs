// SPDX-FileCopyrightText: 2026 Zaman Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by the request client, session storage, and agent.

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::ZamanError;

/// Prefix of locally decodable session tokens (`user_<id>`).
const TOKEN_USER_PREFIX: &str = "user";

/// Identifier of a backend user.
///
/// The backend issues numeric ids, but opaque string ids are tolerated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserId {
    Numeric(i64),
    Opaque(String),
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserId::Numeric(id) => write!(f, "{id}"),
            UserId::Opaque(id) => f.write_str(id),
        }
    }
}

impl From<i64> for UserId {
    fn from(id: i64) -> Self {
        UserId::Numeric(id)
    }
}

/// An authenticated user context.
///
/// The token is non-empty by construction. `Debug` output redacts it.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    user_id: UserId,
    token: String,
}

impl Session {
    /// Creates a session from a login/register response.
    pub fn new(user_id: UserId, token: impl Into<String>) -> Result<Self, ZamanError> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(ZamanError::Validation(
                "session token must not be empty".into(),
            ));
        }
        Ok(Self { user_id, token })
    }

    /// Restores a session from a persisted token of the form `user_<id>`.
    ///
    /// Returns `None` for tokens that do not carry a decodable user id.
    pub fn from_token(token: &str) -> Option<Self> {
        let token = token.trim();
        let mut parts = token.split('_');
        if parts.next() != Some(TOKEN_USER_PREFIX) {
            return None;
        }
        let raw_id = parts.next().filter(|id| !id.is_empty())?;
        let user_id = match raw_id.parse::<i64>() {
            Ok(id) => UserId::Numeric(id),
            Err(_) => UserId::Opaque(raw_id.to_string()),
        };
        Some(Self {
            user_id,
            token: token.to_string(),
        })
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn token(&self) -> &str {
        &self.token
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("user_id", &self.user_id)
            .field("token", &"[REDACTED]")
            .finish()
    }
}

/// Author of a conversation turn.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// Identifier of a message within one conversation, assigned monotonically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MessageId(pub u64);

/// One turn in a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: MessageId,
    pub role: Role,
    pub text: String,
    /// True while this is the placeholder for a reply still in flight.
    pub pending: bool,
}

/// HTTP method used by a backend route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
}

/// The backend routes the client knows how to call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Route {
    Login,
    Register,
    User,
    Chat,
    Transcribe,
}

impl Route {
    /// Path of the route relative to the backend origin.
    pub fn path(&self) -> &'static str {
        match self {
            Route::Login => "/login",
            Route::Register => "/register",
            Route::User => "/user",
            Route::Chat => "/chat",
            Route::Transcribe => "/transcribe",
        }
    }

    pub fn method(&self) -> Method {
        match self {
            Route::User => Method::Get,
            Route::Login | Route::Register | Route::Chat | Route::Transcribe => Method::Post,
        }
    }
}

/// Container formats produced by browser and desktop recorders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFormat {
    /// WebM container with Opus audio.
    WebmOpus,
    /// WebM container, codec unspecified.
    Webm,
    /// MP4/M4A container.
    Mp4,
}

impl AudioFormat {
    pub fn mime_type(&self) -> &'static str {
        match self {
            AudioFormat::WebmOpus => "audio/webm;codecs=opus",
            AudioFormat::Webm => "audio/webm",
            AudioFormat::Mp4 => "audio/mp4",
        }
    }

    /// File name attached to the multipart `file` field.
    pub fn file_name(&self) -> &'static str {
        match self {
            AudioFormat::WebmOpus | AudioFormat::Webm => "recording.webm",
            AudioFormat::Mp4 => "recording.m4a",
        }
    }

    /// Infers the format from a file extension (case-insensitive, without the dot).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "webm" => Some(AudioFormat::Webm),
            "ogg" | "opus" => Some(AudioFormat::WebmOpus),
            "m4a" | "mp4" => Some(AudioFormat::Mp4),
            _ => None,
        }
    }
}

/// A recorded voice message awaiting transcription.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioClip {
    pub data: Vec<u8>,
    pub format: AudioFormat,
}

/// Body of an outbound request.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    Json(serde_json::Value),
    /// Multipart upload with the clip in the `file` field.
    Audio(AudioClip),
}

/// A fully described call against one backend route.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub route: Route,
    pub query: Vec<(String, String)>,
    pub body: RequestBody,
}

impl ApiRequest {
    /// A request with no body and no query parameters.
    pub fn new(route: Route) -> Self {
        Self {
            route,
            query: Vec::new(),
            body: RequestBody::Empty,
        }
    }

    pub fn json(route: Route, body: serde_json::Value) -> Self {
        Self {
            body: RequestBody::Json(body),
            ..Self::new(route)
        }
    }

    pub fn audio(route: Route, clip: AudioClip) -> Self {
        Self {
            body: RequestBody::Audio(clip),
            ..Self::new(route)
        }
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }
}

/// A raw response as delivered by a [`Transport`](crate::traits::Transport).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}
