// SPDX-FileCopyrightText: 2026 Zaman Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scripted transport for deterministic request pipeline tests.
//!
//! `ScriptedTransport` implements `Transport` by replaying a FIFO script of
//! replies, recording every request it receives together with the
//! cancellation token the caller attached.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use zaman_core::{ApiRequest, ApiResponse, Transport, ZamanError};

/// One scripted reaction to an incoming request.
#[derive(Debug, Clone)]
pub enum ScriptedReply {
    /// Answer immediately.
    Respond(ApiResponse),
    /// Answer after the given (virtual) delay.
    RespondAfter(Duration, ApiResponse),
    /// Never answer; only cancellation ends the exchange.
    Hang,
    /// Fail at the transport level with the given message.
    Fail(String),
}

impl ScriptedReply {
    /// Immediate reply with a JSON body.
    pub fn json(status: u16, body: serde_json::Value) -> Self {
        ScriptedReply::Respond(json_response(status, body))
    }

    /// Immediate reply with an empty body.
    pub fn status(status: u16) -> Self {
        ScriptedReply::Respond(ApiResponse::new(status, Vec::new()))
    }
}

/// Builds an [`ApiResponse`] carrying `body` serialized as JSON.
pub fn json_response(status: u16, body: serde_json::Value) -> ApiResponse {
    ApiResponse::new(status, body.to_string().into_bytes())
}

/// A request observed by [`ScriptedTransport`].
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub request: ApiRequest,
    /// Token handed in by the caller; cancelled iff the attempt timed out.
    pub cancel: CancellationToken,
    pub started_at: tokio::time::Instant,
}

/// A transport that replays pre-configured replies.
///
/// When the script runs out, every further request fails with a transport
/// error so that over-eager retries show up in assertions.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    script: Mutex<VecDeque<ScriptedReply>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedTransport {
    pub fn new(replies: Vec<ScriptedReply>) -> Self {
        Self {
            script: Mutex::new(VecDeque::from(replies)),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Script that answers every one of `n` requests with the same reply.
    pub fn repeating(reply: ScriptedReply, n: usize) -> Self {
        Self::new(vec![reply; n])
    }

    /// Every request received so far, in arrival order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().expect("calls lock").clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().expect("calls lock").len()
    }

    fn next_reply(&self) -> Option<ScriptedReply> {
        self.script.lock().expect("script lock").pop_front()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn execute(
        &self,
        request: &ApiRequest,
        cancel: CancellationToken,
    ) -> Result<ApiResponse, ZamanError> {
        self.calls.lock().expect("calls lock").push(RecordedCall {
            request: request.clone(),
            cancel: cancel.clone(),
            started_at: tokio::time::Instant::now(),
        });

        match self.next_reply() {
            Some(ScriptedReply::Respond(response)) => Ok(response),
            Some(ScriptedReply::RespondAfter(delay, response)) => {
                tokio::time::sleep(delay).await;
                Ok(response)
            }
            Some(ScriptedReply::Hang) => {
                cancel.cancelled().await;
                Err(ZamanError::Timeout)
            }
            Some(ScriptedReply::Fail(message)) => Err(ZamanError::Transport {
                message,
                source: None,
            }),
            None => Err(ZamanError::Transport {
                message: "script exhausted".into(),
                source: None,
            }),
        }
    }
}
