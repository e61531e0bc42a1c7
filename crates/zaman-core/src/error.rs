// SPDX-FileCopyrightText: 2026 Zaman Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Zaman client.
//!
//! The `Display` output of the network variants is the normalized, human-readable
//! message surfaced to the user: `"Request timeout"`, the backend's `error` field,
//! or `"HTTP <status>"`.

use thiserror::Error;

/// The primary error type used across all Zaman crates.
#[derive(Debug, Error)]
pub enum ZamanError {
    /// Configuration errors (invalid TOML, bad values, unusable client settings).
    #[error("configuration error: {0}")]
    Config(String),

    /// Local form validation failure. Never sent to the backend.
    #[error("{0}")]
    Validation(String),

    /// The backend answered with a non-success status.
    ///
    /// `message` is the backend-provided `error` field, or `HTTP <status>`.
    #[error("{message}")]
    Http { status: u16, message: String },

    /// The per-attempt abort timer fired before the response arrived.
    #[error("Request timeout")]
    Timeout,

    /// Transport-level failure (DNS, connection refused, reset, TLS).
    #[error("network error: {message}")]
    Transport {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A response body could not be decoded into the expected shape.
    #[error("invalid response: {message}")]
    Decode {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Session storage errors (unreadable token file, failed write).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ZamanError {
    /// Builds an [`ZamanError::Http`] from a status and an optional backend message.
    ///
    /// An absent or empty backend message falls back to `HTTP <status>`.
    pub fn http(status: u16, backend_message: Option<String>) -> Self {
        let message = backend_message
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| format!("HTTP {status}"));
        ZamanError::Http { status, message }
    }

    /// Returns true for failures the request pipeline retries.
    ///
    /// Client errors (4xx) are retried the same way as server errors.
    pub fn is_retriable(&self) -> bool {
        matches!(
            self,
            ZamanError::Http { .. }
                | ZamanError::Timeout
                | ZamanError::Transport { .. }
                | ZamanError::Decode { .. }
        )
    }

    /// Returns the HTTP status carried by this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            ZamanError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Text shown to the user in banners and inline form errors.
    ///
    /// Network failures keep their normalized message; local failures are
    /// reported without the internal category prefix.
    pub fn user_message(&self) -> String {
        match self {
            ZamanError::Config(msg) | ZamanError::Internal(msg) => msg.clone(),
            ZamanError::Storage { source } => source.to_string(),
            other => other.to_string(),
        }
    }
}
