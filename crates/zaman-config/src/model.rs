// SPDX-FileCopyrightText: 2026 Zaman Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Zaman client.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Top-level Zaman configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ZamanConfig {
    /// Backend origin and request pipeline tuning.
    #[serde(default)]
    pub client: ClientConfig,

    /// Session token persistence.
    #[serde(default)]
    pub session: SessionConfig,

    /// Front-end behavior and logging.
    #[serde(default)]
    pub agent: AgentConfig,
}

impl ZamanConfig {
    /// Renders the effective configuration as a TOML document.
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

/// Request pipeline configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ClientConfig {
    /// Backend origin all routes are resolved against.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Total attempts per call, including the first one.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Abort timer for a single attempt, in milliseconds.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    /// Fixed wait after a 404 cold-start signal, in milliseconds.
    #[serde(default = "default_cold_start_delay_ms")]
    pub cold_start_delay_ms: u64,

    /// Backoff unit: the wait before attempt `k + 1` is `backoff_base_ms * k`.
    #[serde(default = "default_backoff_base_ms")]
    pub backoff_base_ms: u64,
}

impl ClientConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn cold_start_delay(&self) -> Duration {
        Duration::from_millis(self.cold_start_delay_ms)
    }

    pub fn backoff_base(&self) -> Duration {
        Duration::from_millis(self.backoff_base_ms)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            max_retries: default_max_retries(),
            request_timeout_ms: default_request_timeout_ms(),
            cold_start_delay_ms: default_cold_start_delay_ms(),
            backoff_base_ms: default_backoff_base_ms(),
        }
    }
}

fn default_base_url() -> String {
    "https://zaman-ai.onrender.com".to_string()
}

fn default_max_retries() -> u32 {
    3
}

fn default_request_timeout_ms() -> u64 {
    15_000
}

fn default_cold_start_delay_ms() -> u64 {
    3_000
}

fn default_backoff_base_ms() -> u64 {
    2_000
}

/// Session token persistence configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SessionConfig {
    /// File holding the session token.
    #[serde(default = "default_token_path")]
    pub token_path: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            token_path: default_token_path(),
        }
    }
}

fn default_token_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("zaman").join("session_token"))
        .unwrap_or_else(|| std::path::PathBuf::from("zaman_token"))
        .display()
        .to_string()
}

/// Front-end behavior configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// User id sent with chat requests when no session is active.
    #[serde(default = "default_fallback_user_id")]
    pub fallback_user_id: i64,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            fallback_user_id: default_fallback_user_id(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_fallback_user_id() -> i64 {
    1
}
