// SPDX-FileCopyrightText: 2026 Zaman Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Retry state machine for backend calls.
//!
//! Each call moves through `Attempting -> (WaitingColdStart | WaitingBackoff)*
//! -> (Succeeded | Failed)`. Transitions are a pure function of the attempt
//! number and the classified attempt outcome, so the schedule is testable
//! without timers.
//!
//! Two wait policies exist and never combine within one attempt:
//! - a 404 before the final attempt is a cold-start signal followed by a fixed wait;
//! - any other retriable failure before the final attempt waits `backoff_base * attempt`.

use std::time::Duration;

use serde_json::Value;
use strum::Display;
use zaman_config::ClientConfig;
use zaman_core::{ApiRequest, Method, Route, ZamanError};

/// Timing and attempt limits of the request pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts per call, including the first one. At least 1.
    pub max_retries: u32,
    /// Abort timer for one attempt.
    pub attempt_timeout: Duration,
    /// Fixed wait after a cold-start 404.
    pub cold_start_delay: Duration,
    /// Unit of the linear backoff schedule.
    pub backoff_base: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            attempt_timeout: Duration::from_millis(15_000),
            cold_start_delay: Duration::from_millis(3_000),
            backoff_base: Duration::from_millis(2_000),
        }
    }
}

impl RetryPolicy {
    pub fn from_config(config: &ClientConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            attempt_timeout: config.request_timeout(),
            cold_start_delay: config.cold_start_delay(),
            backoff_base: config.backoff_base(),
        }
    }

    /// Wait inserted after generic failure of attempt `attempt` (1-based).
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        self.backoff_base
            .checked_mul(attempt)
            .unwrap_or(Duration::MAX)
    }

    /// Computes the next state after attempt `attempt` produced `outcome`.
    pub fn transition(&self, attempt: u32, outcome: AttemptOutcome) -> RetryState {
        let is_final = attempt >= self.max_retries;
        match outcome {
            AttemptOutcome::Success(body) => RetryState::Succeeded(body),
            AttemptOutcome::ColdStart(cause) if !is_final => RetryState::WaitingColdStart {
                next_attempt: attempt + 1,
                delay: self.cold_start_delay,
                cause,
            },
            AttemptOutcome::Failure(cause) if !is_final && cause.is_retriable() => {
                RetryState::WaitingBackoff {
                    next_attempt: attempt + 1,
                    delay: self.backoff_delay(attempt),
                    cause,
                }
            }
            AttemptOutcome::ColdStart(cause) | AttemptOutcome::Failure(cause) => {
                RetryState::Failed(cause)
            }
        }
    }
}

/// Classified result of a single attempt.
#[derive(Debug)]
pub enum AttemptOutcome {
    /// 2xx with a JSON body.
    Success(Value),
    /// 404, read as "backend still waking up".
    ColdStart(ZamanError),
    /// Any other failure: non-2xx status, timeout, transport or decode error.
    Failure(ZamanError),
}

/// States of one logical call.
#[derive(Debug)]
pub enum RetryState {
    Attempting {
        attempt: u32,
    },
    WaitingColdStart {
        next_attempt: u32,
        delay: Duration,
        cause: ZamanError,
    },
    WaitingBackoff {
        next_attempt: u32,
        delay: Duration,
        cause: ZamanError,
    },
    Succeeded(Value),
    Failed(ZamanError),
}

/// How an attempt ended, from the pipeline's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum AttemptKind {
    Success,
    RetriableFailure,
    FatalFailure,
}

/// Record of one try of an outbound call. Logged, never retained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestAttempt {
    pub route: Route,
    pub method: Method,
    pub attempt_number: u32,
    pub outcome: AttemptKind,
}

impl RequestAttempt {
    pub fn new(request: &ApiRequest, attempt_number: u32, next: &RetryState) -> Self {
        let outcome = match next {
            RetryState::Succeeded(_) => AttemptKind::Success,
            RetryState::WaitingColdStart { .. } | RetryState::WaitingBackoff { .. } => {
                AttemptKind::RetriableFailure
            }
            RetryState::Failed(_) | RetryState::Attempting { .. } => AttemptKind::FatalFailure,
        };
        Self {
            route: request.route,
            method: request.route.method(),
            attempt_number,
            outcome,
        }
    }
}
