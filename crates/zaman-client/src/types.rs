// SPDX-FileCopyrightText: 2026 Zaman Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Backend request/response contracts.

use serde::{Deserialize, Serialize};
use zaman_core::{Role, UserId};

// --- Auth ---

/// Body of `POST /login` and `POST /register`.
///
/// Borrows the password only for the duration of serialization.
#[derive(Debug, Serialize)]
pub struct AuthRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// Success body of `/login` and `/register`.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub user_id: UserId,
    pub token: String,
}

// --- Chat ---

/// One turn of the history sent to `/chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
}

impl ChatTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Body of `POST /chat`.
#[derive(Debug, Serialize)]
pub struct ChatRequest<'a> {
    pub messages: &'a [ChatTurn],
    pub user_id: &'a UserId,
}

/// Success body of `/chat`.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    pub response: String,
}

// --- Transcription ---

/// Success body of `/transcribe`.
#[derive(Debug, Clone, Deserialize)]
pub struct TranscribeResponse {
    pub transcribed: String,
    pub response: String,
}

// --- Domain results ---

/// Assistant reply to a chat history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatReply {
    pub response_text: String,
}

/// Result of a voice message: what was heard and what the assistant answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcription {
    pub transcribed_text: String,
    pub response_text: String,
}

impl From<ChatResponse> for ChatReply {
    fn from(resp: ChatResponse) -> Self {
        Self {
            response_text: resp.response,
        }
    }
}

impl From<TranscribeResponse> for Transcription {
    fn from(resp: TranscribeResponse) -> Self {
        Self {
            transcribed_text: resp.transcribed,
            response_text: resp.response,
        }
    }
}
