// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP implementation of [`Remote`] using reqwest.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

use rp_core::{Attachment, ReportDispatch, ServiceCreateRequest};

use super::{Credentials, FileRef, RecordRef, Remote, RemoteError, RemoteFuture, RemoteResult};

/// Longest error body excerpt carried in an error message.
const MAX_MESSAGE_LEN: usize = 200;

/// Connect timeout cap, independent of the per-request timeout.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Classify a non-success HTTP status.
///
/// `refreshing` is true for the credential refresh endpoint, where any
/// client error means the refresh token is unusable.
pub fn classify_status(status: u16, message: &str, refreshing: bool) -> RemoteError {
    let message = message.to_string();
    match status {
        400..=499 if refreshing => RemoteError::InvalidRefreshToken(message),
        401 => RemoteError::AuthExpired,
        // Request timeout and rate limiting clear up on their own
        408 | 429 => RemoteError::Transient(format!("HTTP {status}: {message}")),
        400..=499 => RemoteError::Validation { status, message },
        500..=599 => RemoteError::Transient(format!("HTTP {status}: {message}")),
        _ => RemoteError::Fatal(format!("unexpected HTTP {status}: {message}")),
    }
}

/// Map a reqwest failure that happened before a status was available.
fn classify_reqwest(e: reqwest::Error) -> RemoteError {
    if e.is_decode() {
        RemoteError::Fatal(format!("invalid response: {e}"))
    } else if e.is_builder() {
        RemoteError::Fatal(format!("invalid request: {e}"))
    } else {
        // Connect errors, timeouts and dropped bodies
        RemoteError::Transient(e.to_string())
    }
}

/// Pull a readable message out of an error body.
///
/// Understands `{"message": "..."}` and `{"message": ["...", ...]}` bodies and
/// falls back to the raw text.
fn error_message(body: &str) -> String {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Message {
        One(String),
        Many(Vec<String>),
    }

    #[derive(Deserialize)]
    struct ErrorBody {
        message: Message,
    }

    let message = match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody { message: Message::One(m) }) => m,
        Ok(ErrorBody { message: Message::Many(m) }) => m.join("; "),
        Err(_) => body.trim().to_string(),
    };
    match message.char_indices().nth(MAX_MESSAGE_LEN) {
        Some((idx, _)) => format!("{}...", &message[..idx]),
        None => message,
    }
}

/// Response of the refresh endpoint. Servers may keep the refresh token.
#[derive(Deserialize)]
struct RefreshResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
}

/// Remote implementation talking to the service API over HTTP.
#[derive(Debug, Clone)]
pub struct HttpRemote {
    client: reqwest::Client,
    base_url: String,
}

impl HttpRemote {
    /// Create a client for the API at `base_url` with a per-request timeout.
    pub fn new(base_url: &str, timeout: Duration) -> RemoteResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout.min(CONNECT_TIMEOUT))
            .user_agent(concat!("reporta/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| RemoteError::Fatal(format!("failed to build HTTP client: {e}")))?;
        Ok(HttpRemote { client, base_url: base_url.trim_end_matches('/').to_string() })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(
        &self,
        request: reqwest::RequestBuilder,
        refreshing: bool,
    ) -> RemoteResult<reqwest::Response> {
        let response = request.send().await.map_err(classify_reqwest)?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(classify_status(status.as_u16(), &error_message(&body), refreshing))
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> RemoteResult<T> {
        response.json::<T>().await.map_err(classify_reqwest)
    }
}

impl Remote for HttpRemote {
    fn create_record<'a>(
        &'a self,
        token: &'a str,
        request: &'a ServiceCreateRequest,
    ) -> RemoteFuture<'a, RecordRef> {
        Box::pin(async move {
            tracing::debug!(service_uid = %request.service_uid, "POST /services");
            let builder =
                self.client.post(self.url("/services")).bearer_auth(token).json(request);
            let response = self.send(builder, false).await?;
            Self::decode(response).await
        })
    }

    fn upload_file<'a>(
        &'a self,
        token: &'a str,
        record_id: &'a str,
        attachment: &'a Attachment,
    ) -> RemoteFuture<'a, FileRef> {
        Box::pin(async move {
            tracing::debug!(
                record_id,
                file = %attachment.file_name,
                kind = %attachment.category,
                bytes = attachment.content.len(),
                "POST /services/:id/files"
            );
            let part = reqwest::multipart::Part::bytes(attachment.content.clone())
                .file_name(attachment.file_name.clone())
                .mime_str(attachment.category.mime_type(&attachment.file_name))
                .map_err(classify_reqwest)?;
            let form = reqwest::multipart::Form::new().part("file", part);
            let builder = self
                .client
                .post(self.url(&format!("/services/{record_id}/files")))
                .query(&[("kind", attachment.category.as_str())])
                .bearer_auth(token)
                .multipart(form);
            let response = self.send(builder, false).await?;
            Self::decode(response).await
        })
    }

    fn send_report<'a>(
        &'a self,
        token: &'a str,
        record_id: &'a str,
        dispatch: &'a ReportDispatch,
    ) -> RemoteFuture<'a, ()> {
        Box::pin(async move {
            tracing::debug!(record_id, "PATCH /services/:id/sign-and-send");
            let builder = self
                .client
                .patch(self.url(&format!("/services/{record_id}/sign-and-send")))
                .bearer_auth(token)
                .json(dispatch);
            self.send(builder, false).await?;
            Ok(())
        })
    }

    fn refresh_credentials<'a>(&'a self, refresh_token: &'a str) -> RemoteFuture<'a, Credentials> {
        Box::pin(async move {
            tracing::debug!("POST /auth/refresh");
            let builder = self
                .client
                .post(self.url("/auth/refresh"))
                .json(&serde_json::json!({ "refresh_token": refresh_token }));
            let response = self.send(builder, true).await?;
            let body: RefreshResponse = Self::decode(response).await?;
            Ok(Credentials {
                access_token: body.access_token,
                refresh_token: body.refresh_token.unwrap_or_else(|| refresh_token.to_string()),
            })
        })
    }

    fn health(&self) -> RemoteFuture<'_, ()> {
        Box::pin(async move {
            self.send(self.client.get(self.url("/health")), false).await?;
            Ok(())
        })
    }
}

#[cfg(test)]
#[path = "http_tests.rs"]
mod tests;
