// SPDX-FileCopyrightText: 2026 Watari Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP reply delivery against the platform's reply API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use serde::Serialize;
use tracing::debug;

use watari_core::{MessagingChannel, ReplyMessage, WatariError};

/// Reply API client.
///
/// One POST per reply token; the token is single-use, so there is no retry
/// here. Callers treat delivery failure as non-fatal.
#[derive(Debug, Clone)]
pub struct ReplyClient {
    client: reqwest::Client,
    endpoint: String,
}

/// Reply API request body.
#[derive(Debug, Serialize)]
struct ReplyRequest<'a> {
    #[serde(rename = "replyToken")]
    reply_token: &'a str,
    messages: &'a [ReplyMessage],
}

impl ReplyClient {
    /// Creates a new reply client.
    ///
    /// # Arguments
    /// * `access_token` - bearer token for the reply API
    /// * `endpoint` - full reply endpoint URL
    pub fn new(access_token: &str, endpoint: &str) -> Result<Self, WatariError> {
        let mut headers = HeaderMap::new();
        let bearer = format!("Bearer {access_token}");
        headers.insert(
            "authorization",
            HeaderValue::from_str(&bearer).map_err(|e| {
                WatariError::Config(format!("invalid access token header value: {e}"))
            })?,
        );
        headers.insert("content-type", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| WatariError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
        })
    }
}

#[async_trait]
impl MessagingChannel for ReplyClient {
    async fn send_reply(
        &self,
        reply_token: &str,
        messages: &[ReplyMessage],
    ) -> Result<(), WatariError> {
        let body = ReplyRequest {
            reply_token,
            messages,
        };
        let response = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| WatariError::Channel {
                message: format!("reply request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(WatariError::Channel {
                message: format!("reply API returned {status}: {body}"),
                source: None,
            });
        }
        debug!(reply_token, count = messages.len(), "reply delivered");
        Ok(())
    }
}
