// SPDX-FileCopyrightText: 2026 Zaman Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Transport trait performing a single HTTP exchange with the backend.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::ZamanError;
use crate::types::{ApiRequest, ApiResponse};

/// Performs exactly one HTTP exchange. Retry policy lives above this trait.
///
/// The caller owns the cancellation token and cancels it when the attempt
/// timer fires; implementations must abandon the exchange at that point and
/// never deliver its result.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends the request and returns the status and full body.
    ///
    /// Non-success statuses are returned as `Ok`; only transport-level
    /// failures produce an error.
    async fn execute(
        &self,
        request: &ApiRequest,
        cancel: CancellationToken,
    ) -> Result<ApiResponse, ZamanError>;
}
