// SPDX-FileCopyrightText: 2026 Watari Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP model backend for the Gemini generateContent API.
//!
//! One endpoint per model identifier. The response status is classified
//! into a [`CompletionOutcome`] tag here; retry and fallback policy live
//! in the translation client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use tracing::debug;

use watari_core::{CompletionOutcome, ModelBackend, WatariError};

/// HTTP client for Gemini generateContent calls.
#[derive(Debug, Clone)]
pub struct GeminiBackend {
    client: reqwest::Client,
    base_url: String,
    max_output_tokens: u32,
}

impl GeminiBackend {
    /// Creates a new backend.
    ///
    /// # Arguments
    /// * `api_key` - Gemini API key for authentication
    /// * `base_url` - API base (e.g. `https://generativelanguage.googleapis.com/v1beta`)
    /// * `max_output_tokens` - generation cap passed on every request
    pub fn new(
        api_key: &str,
        base_url: &str,
        max_output_tokens: u32,
    ) -> Result<Self, WatariError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-goog-api-key",
            HeaderValue::from_str(api_key).map_err(|e| {
                WatariError::Config(format!("invalid API key header value: {e}"))
            })?,
        );
        headers.insert("content-type", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| WatariError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            max_output_tokens,
        })
    }

    /// Overrides the base URL (for testing with wiremock).
    #[cfg(test)]
    pub fn with_base_url(mut self, url: String) -> Self {
        self.base_url = url;
        self
    }
}

#[async_trait]
impl ModelBackend for GeminiBackend {
    async fn complete(
        &self,
        model: &str,
        prompt: &str,
    ) -> Result<CompletionOutcome, WatariError> {
        let url = format!("{}/models/{}:generateContent", self.base_url, model);
        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                max_output_tokens: self.max_output_tokens,
            },
        };

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| WatariError::Transport {
                model: model.to_string(),
                source: Box::new(e),
            })?;

        let status = response.status();
        debug!(model, status = %status, "generateContent response received");

        if status.is_success() {
            let parsed: GenerateContentResponse =
                response.json().await.map_err(|e| WatariError::Transport {
                    model: model.to_string(),
                    source: Box::new(e),
                })?;
            let text = parsed.first_text();
            if text.is_empty() {
                return Err(WatariError::EmptyCompletion {
                    model: model.to_string(),
                });
            }
            return Ok(CompletionOutcome::Success { text });
        }

        let body = response.text().await.unwrap_or_default();
        let message = match serde_json::from_str::<ApiErrorResponse>(&body) {
            Ok(api_err) => api_err.error.message,
            Err(_) => body,
        };

        Ok(match status.as_u16() {
            503 => CompletionOutcome::Transient {
                status: 503,
                message,
            },
            429 => CompletionOutcome::QuotaExceeded {
                status: 429,
                message,
            },
            s => CompletionOutcome::Fatal { status: s, message },
        })
    }
}

// --- Wire types ---

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate, or empty.
    fn first_text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .map(|p| p.text.as_str())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_backend(base_url: &str) -> GeminiBackend {
        GeminiBackend::new("test-api-key", "https://unused.invalid", 1024)
            .unwrap()
            .with_base_url(base_url.to_string())
    }

    fn success_body(text: &str) -> serde_json::Value {
        serde_json::json!({
            "candidates": [
                {"content": {"parts": [{"text": text}], "role": "model"}}
            ]
        })
    }

    #[tokio::test]
    async fn success_yields_candidate_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/gemini-2.0-flash:generateContent"))
            .respond_with(ResponseTemplate::new(200).set_body_json(success_body("こんにちは")))
            .mount(&server)
            .await;

        let outcome = test_backend(&server.uri())
            .complete("gemini-2.0-flash", "prompt")
            .await
            .unwrap();
        assert_eq!(
            outcome,
            CompletionOutcome::Success {
                text: "こんにちは".into()
            }
        );
    }

    #[tokio::test]
    async fn multiple_parts_are_concatenated() {
        let server = MockServer::start().await;
        let body = serde_json::json!({
            "candidates": [
                {"content": {"parts": [{"text": "Polish: Cześć\n"}, {"text": "English: Hi"}]}}
            ]
        });
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;

        let outcome = test_backend(&server.uri())
            .complete("gemini-2.0-flash", "prompt")
            .await
            .unwrap();
        assert_eq!(
            outcome,
            CompletionOutcome::Success {
                text: "Polish: Cześć\nEnglish: Hi".into()
            }
        );
    }

    #[tokio::test]
    async fn status_503_classifies_as_transient() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_json(serde_json::json!({
                "error": {"code": 503, "message": "The model is overloaded.", "status": "UNAVAILABLE"}
            })))
            .mount(&server)
            .await;

        let outcome = test_backend(&server.uri())
            .complete("gemini-1.5-pro", "prompt")
            .await
            .unwrap();
        assert_eq!(
            outcome,
            CompletionOutcome::Transient {
                status: 503,
                message: "The model is overloaded.".into()
            }
        );
    }

    #[tokio::test]
    async fn status_429_classifies_as_quota_exceeded() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_json(serde_json::json!({
                "error": {"code": 429, "message": "Resource has been exhausted", "status": "RESOURCE_EXHAUSTED"}
            })))
            .mount(&server)
            .await;

        let outcome = test_backend(&server.uri())
            .complete("gemini-1.5-flash", "prompt")
            .await
            .unwrap();
        assert!(matches!(
            outcome,
            CompletionOutcome::QuotaExceeded { status: 429, .. }
        ));
    }

    #[tokio::test]
    async fn other_status_classifies_as_fatal() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "error": {"code": 400, "message": "API key not valid", "status": "INVALID_ARGUMENT"}
            })))
            .mount(&server)
            .await;

        let outcome = test_backend(&server.uri())
            .complete("gemini-2.0-flash", "prompt")
            .await
            .unwrap();
        assert_eq!(
            outcome,
            CompletionOutcome::Fatal {
                status: 400,
                message: "API key not valid".into()
            }
        );
    }

    #[tokio::test]
    async fn empty_candidates_are_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"candidates": []})),
            )
            .mount(&server)
            .await;

        let err = test_backend(&server.uri())
            .complete("gemini-2.0-flash", "prompt")
            .await
            .unwrap_err();
        assert!(matches!(err, WatariError::EmptyCompletion { .. }));
    }

    #[tokio::test]
    async fn sends_api_key_header_and_prompt_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(header("x-goog-api-key", "test-api-key"))
            .and(body_partial_json(serde_json::json!({
                "contents": [{"parts": [{"text": "the prompt"}]}],
                "generationConfig": {"maxOutputTokens": 1024}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(success_body("ok")))
            .mount(&server)
            .await;

        let outcome = test_backend(&server.uri())
            .complete("gemini-2.0-flash", "the prompt")
            .await;
        assert!(outcome.is_ok(), "headers/body should match: {outcome:?}");
    }
}
