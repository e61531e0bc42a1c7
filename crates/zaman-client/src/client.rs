// SPDX-FileCopyrightText: 2026 Zaman Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Resilient request client for the Zaman backend.
//!
//! [`ApiClient`] drives the retry state machine from [`crate::retry`]: it owns
//! the per-attempt abort timer and cancellation token, classifies responses,
//! and performs the cold-start and backoff waits through an injected [`Delay`].

use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use zaman_config::ClientConfig;
use zaman_core::{ApiRequest, ApiResponse, Delay, TokioDelay, Transport, ZamanError};

use crate::retry::{AttemptOutcome, RequestAttempt, RetryPolicy, RetryState};
use crate::transport::ReqwestTransport;

/// Error body convention of the backend: `{ "error": "..." }`.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
}

/// Client performing backend calls with timeout, cold-start tolerance, and backoff.
///
/// Cloning is cheap; clones share the transport and delay.
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    delay: Arc<dyn Delay>,
    policy: RetryPolicy,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Creates a client talking HTTP to `config.base_url`.
    pub fn new(config: &ClientConfig) -> Result<Self, ZamanError> {
        let transport = ReqwestTransport::new(&config.base_url)?;
        Ok(Self::with_parts(
            Arc::new(transport),
            Arc::new(TokioDelay),
            RetryPolicy::from_config(config),
        ))
    }

    /// Creates a client from explicit parts (custom transport or clock).
    pub fn with_parts(
        transport: Arc<dyn Transport>,
        delay: Arc<dyn Delay>,
        policy: RetryPolicy,
    ) -> Self {
        Self {
            transport,
            delay,
            policy,
        }
    }

    /// Performs the call with the configured attempt limit.
    ///
    /// Returns the parsed JSON body of the first 2xx response, or the last
    /// normalized error once attempts are exhausted.
    pub async fn call(&self, request: &ApiRequest) -> Result<Value, ZamanError> {
        self.call_with_retries(request, self.policy.max_retries)
            .await
    }

    /// Performs the call with an explicit attempt limit.
    pub async fn call_with_retries(
        &self,
        request: &ApiRequest,
        max_retries: u32,
    ) -> Result<Value, ZamanError> {
        if max_retries == 0 {
            return Err(ZamanError::Config(
                "max_retries must be at least 1".into(),
            ));
        }
        let policy = RetryPolicy {
            max_retries,
            ..self.policy.clone()
        };

        let mut state = RetryState::Attempting { attempt: 1 };
        loop {
            state = match state {
                RetryState::Attempting { attempt } => {
                    let outcome = self.attempt(request, &policy).await;
                    let next = policy.transition(attempt, outcome);
                    let record = RequestAttempt::new(request, attempt, &next);
                    debug!(
                        route = %record.route,
                        method = %record.method,
                        attempt = record.attempt_number,
                        outcome = %record.outcome,
                        "request attempt finished"
                    );
                    next
                }
                RetryState::WaitingColdStart {
                    next_attempt,
                    delay,
                    cause,
                } => {
                    warn!(
                        route = %request.route,
                        attempt = next_attempt - 1,
                        error = %cause,
                        delay_ms = delay.as_millis() as u64,
                        "backend not ready (404), waiting for cold start"
                    );
                    self.delay.sleep(delay).await;
                    RetryState::Attempting {
                        attempt: next_attempt,
                    }
                }
                RetryState::WaitingBackoff {
                    next_attempt,
                    delay,
                    cause,
                } => {
                    warn!(
                        route = %request.route,
                        attempt = next_attempt - 1,
                        error = %cause,
                        delay_ms = delay.as_millis() as u64,
                        "request attempt failed, retrying"
                    );
                    self.delay.sleep(delay).await;
                    RetryState::Attempting {
                        attempt: next_attempt,
                    }
                }
                RetryState::Succeeded(body) => return Ok(body),
                RetryState::Failed(err) => return Err(err),
            };
        }
    }

    /// Runs one attempt under the abort timer.
    ///
    /// Whichever of response and timer finishes first wins; the other future is
    /// dropped, so a late response can never surface after a timeout.
    async fn attempt(&self, request: &ApiRequest, policy: &RetryPolicy) -> AttemptOutcome {
        let cancel = CancellationToken::new();
        let result = tokio::select! {
            biased;
            result = self.transport.execute(request, cancel.clone()) => result,
            _ = tokio::time::sleep(policy.attempt_timeout) => {
                cancel.cancel();
                Err(ZamanError::Timeout)
            }
        };

        match result {
            Ok(response) => classify(response),
            Err(err) => AttemptOutcome::Failure(err),
        }
    }
}

/// Maps a raw response onto an attempt outcome.
fn classify(response: ApiResponse) -> AttemptOutcome {
    if response.is_success() {
        return match serde_json::from_slice::<Value>(&response.body) {
            Ok(body) => AttemptOutcome::Success(body),
            Err(e) => AttemptOutcome::Failure(ZamanError::Decode {
                message: format!("response body is not JSON: {e}"),
                source: Some(Box::new(e)),
            }),
        };
    }

    let backend_message = serde_json::from_slice::<ErrorBody>(&response.body)
        .unwrap_or_default()
        .error;
    let err = ZamanError::http(response.status, backend_message);
    if response.status == 404 {
        AttemptOutcome::ColdStart(err)
    } else {
        AttemptOutcome::Failure(err)
    }
}
