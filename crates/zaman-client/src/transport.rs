// SPDX-FileCopyrightText: 2026 Zaman Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP transport backed by reqwest.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Url;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use zaman_core::{ApiRequest, ApiResponse, Method, RequestBody, Transport, ZamanError};

/// Multipart field carrying the audio recording.
const AUDIO_FIELD: &str = "file";

/// [`Transport`] performing real HTTP exchanges against the backend.
///
/// No per-request timeout is configured on the underlying client; the
/// attempt timer lives in [`crate::ApiClient`] and reaches this transport
/// through the cancellation token.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    base_url: String,
}

impl ReqwestTransport {
    pub fn new(base_url: &str) -> Result<Self, ZamanError> {
        Url::parse(base_url)
            .map_err(|e| ZamanError::Config(format!("invalid base_url '{base_url}': {e}")))?;

        let client = reqwest::Client::builder()
            .user_agent(concat!("zaman/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ZamanError::Transport {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url_for(&self, request: &ApiRequest) -> Result<Url, ZamanError> {
        let mut url = Url::parse(&format!("{}{}", self.base_url, request.route.path()))
            .map_err(|e| ZamanError::Internal(format!("cannot build request URL: {e}")))?;
        if !request.query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(request.query.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        }
        Ok(url)
    }

    fn build(&self, request: &ApiRequest) -> Result<reqwest::RequestBuilder, ZamanError> {
        let url = self.url_for(request)?;
        let builder = match request.route.method() {
            Method::Get => self.client.get(url),
            Method::Post => self.client.post(url),
        };

        Ok(match &request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(value),
            RequestBody::Audio(clip) => {
                let part = Part::bytes(clip.data.clone())
                    .file_name(clip.format.file_name())
                    .mime_str(clip.format.mime_type())
                    .map_err(|e| ZamanError::Internal(format!("invalid audio MIME type: {e}")))?;
                builder.multipart(Form::new().part(AUDIO_FIELD, part))
            }
        })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(
        &self,
        request: &ApiRequest,
        cancel: CancellationToken,
    ) -> Result<ApiResponse, ZamanError> {
        let builder = self.build(request)?;

        let exchange = async {
            let response = builder.send().await.map_err(transport_error)?;
            let status = response.status().as_u16();
            // Body read counts against the same attempt.
            let body = response.bytes().await.map_err(transport_error)?;
            debug!(route = %request.route, status, bytes = body.len(), "response received");
            Ok(ApiResponse::new(status, body.to_vec()))
        };

        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(ZamanError::Timeout),
            result = exchange => result,
        }
    }
}

fn transport_error(e: reqwest::Error) -> ZamanError {
    if e.is_timeout() {
        return ZamanError::Timeout;
    }
    ZamanError::Transport {
        message: e.to_string(),
        source: Some(Box::new(e)),
    }
}
