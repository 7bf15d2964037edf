// SPDX-FileCopyrightText: 2026 Watari Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Multi-model translation client with transient retry and quota fallback.
//!
//! Model candidates are tried in fixed priority order. Per model, transient
//! "service unavailable" responses are retried in place with a randomized
//! backoff; a rate-limit response advances to the next candidate without
//! retrying; any other failure is terminal for the whole call. Fallback
//! exists only to route around per-model quota exhaustion.

use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use tracing::{debug, warn};

use watari_core::{CompletionOutcome, ModelBackend, WatariError};

/// Retry behavior for transient backend failures.
///
/// The defaults bound the worst case per model to
/// `max_attempts * backoff_max` (~15 s), inside the platform's
/// request-timeout budget. Tests inject millisecond backoffs.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Attempts per model for transient failures (including the first call).
    pub max_attempts: u32,
    /// Lower bound of the randomized backoff between attempts.
    pub backoff_min: Duration,
    /// Upper bound of the randomized backoff between attempts.
    pub backoff_max: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff_min: Duration::from_millis(2000),
            backoff_max: Duration::from_millis(5000),
        }
    }
}

impl RetryPolicy {
    /// A uniformly random delay in `[backoff_min, backoff_max]`.
    fn backoff(&self) -> Duration {
        let min = self.backoff_min.as_millis() as u64;
        let max = self.backoff_max.as_millis() as u64;
        if max <= min {
            return self.backoff_min;
        }
        Duration::from_millis(rand::thread_rng().gen_range(min..=max))
    }
}

/// Drives one prompt through the ordered model candidate list.
pub struct TranslationClient {
    backend: Arc<dyn ModelBackend>,
    models: Vec<String>,
    retry: RetryPolicy,
}

impl TranslationClient {
    pub fn new(backend: Arc<dyn ModelBackend>, models: Vec<String>) -> Self {
        Self {
            backend,
            models,
            retry: RetryPolicy::default(),
        }
    }

    /// Overrides the retry policy (tests use millisecond backoffs).
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Sends `prompt` to the first candidate that accepts it.
    ///
    /// Returns the trimmed completion text, or [`WatariError::AllModelsExhausted`]
    /// when every candidate was rate limited. Any non-quota failure
    /// propagates immediately without trying further models.
    pub async fn translate_prompt(&self, prompt: &str) -> Result<String, WatariError> {
        let mut last_quota: Option<String> = None;

        for model in &self.models {
            let mut outcome = self.backend.complete(model, prompt).await?;

            // Inner retry loop for transient unavailability only.
            let mut attempt = 1;
            while let CompletionOutcome::Transient { status, message } = &outcome {
                if attempt >= self.retry.max_attempts {
                    break;
                }
                let delay = self.retry.backoff();
                warn!(
                    model = model.as_str(),
                    status,
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    message = message.as_str(),
                    "backend unavailable, retrying same model"
                );
                tokio::time::sleep(delay).await;
                outcome = self.backend.complete(model, prompt).await?;
                attempt += 1;
            }

            match outcome {
                CompletionOutcome::Success { text } => {
                    debug!(model = model.as_str(), "completion succeeded");
                    return Ok(text.trim().to_string());
                }
                CompletionOutcome::QuotaExceeded { status, message } => {
                    warn!(
                        model = model.as_str(),
                        status, "rate limited, advancing to next candidate"
                    );
                    last_quota = Some(format!("{status} from {model}: {message}"));
                    continue;
                }
                // A transient failure that survived all retries, or any other
                // non-success status: terminal, no model fallback.
                CompletionOutcome::Transient { status, message }
                | CompletionOutcome::Fatal { status, message } => {
                    return Err(WatariError::Backend {
                        model: model.clone(),
                        status,
                        message,
                    });
                }
            }
        }

        Err(WatariError::AllModelsExhausted {
            last: last_quota
                .unwrap_or_else(|| "no model candidates configured".to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use watari_test_utils::MockBackend;

    fn fast_retry() -> RetryPolicy {
        RetryPolicy {
            max_attempts: 3,
            backoff_min: Duration::from_millis(1),
            backoff_max: Duration::from_millis(3),
        }
    }

    fn models() -> Vec<String> {
        vec!["model-a".into(), "model-b".into(), "model-c".into()]
    }

    fn quota() -> CompletionOutcome {
        CompletionOutcome::QuotaExceeded {
            status: 429,
            message: "quota exhausted".into(),
        }
    }

    fn transient() -> CompletionOutcome {
        CompletionOutcome::Transient {
            status: 503,
            message: "overloaded".into(),
        }
    }

    fn success(text: &str) -> CompletionOutcome {
        CompletionOutcome::Success { text: text.into() }
    }

    #[tokio::test]
    async fn rate_limit_falls_back_and_stops_at_first_success() {
        let backend = Arc::new(MockBackend::new());
        backend.script("model-a", quota()).await;
        backend.script("model-b", success("przetłumaczone")).await;

        let client =
            TranslationClient::new(backend.clone(), models()).with_retry_policy(fast_retry());
        let text = client.translate_prompt("p").await.unwrap();

        assert_eq!(text, "przetłumaczone");
        // model-c is never invoked once model-b succeeds.
        assert_eq!(backend.calls().await, vec!["model-a", "model-b"]);
    }

    #[tokio::test]
    async fn fatal_error_aborts_without_fallback() {
        let backend = Arc::new(MockBackend::new());
        backend
            .script(
                "model-a",
                CompletionOutcome::Fatal {
                    status: 400,
                    message: "bad request".into(),
                },
            )
            .await;

        let client =
            TranslationClient::new(backend.clone(), models()).with_retry_policy(fast_retry());
        let err = client.translate_prompt("p").await.unwrap_err();

        match err {
            WatariError::Backend { model, status, .. } => {
                assert_eq!(model, "model-a");
                assert_eq!(status, 400);
            }
            other => panic!("expected Backend error, got {other:?}"),
        }
        assert_eq!(backend.calls().await, vec!["model-a"]);
    }

    #[tokio::test]
    async fn transient_retries_same_model_then_succeeds() {
        let backend = Arc::new(MockBackend::new());
        backend.script("model-a", transient()).await;
        backend.script("model-a", transient()).await;
        backend.script("model-a", success("done")).await;

        let client =
            TranslationClient::new(backend.clone(), models()).with_retry_policy(fast_retry());
        let text = client.translate_prompt("p").await.unwrap();

        assert_eq!(text, "done");
        // Three attempts against model-a, no fallback.
        assert_eq!(backend.calls().await, vec!["model-a", "model-a", "model-a"]);
    }

    #[tokio::test]
    async fn transient_exhaustion_is_terminal_not_fallback() {
        let backend = Arc::new(MockBackend::new());
        backend.script("model-a", transient()).await;
        backend.script("model-a", transient()).await;
        backend.script("model-a", transient()).await;

        let client =
            TranslationClient::new(backend.clone(), models()).with_retry_policy(fast_retry());
        let err = client.translate_prompt("p").await.unwrap_err();

        match err {
            WatariError::Backend { model, status, .. } => {
                assert_eq!(model, "model-a");
                assert_eq!(status, 503);
            }
            other => panic!("expected Backend error, got {other:?}"),
        }
        assert_eq!(backend.calls().await.len(), 3);
    }

    #[tokio::test]
    async fn all_candidates_rate_limited_surfaces_exhaustion() {
        let backend = Arc::new(MockBackend::new());
        backend.script("model-a", quota()).await;
        backend.script("model-b", quota()).await;
        backend.script("model-c", quota()).await;

        let client =
            TranslationClient::new(backend.clone(), models()).with_retry_policy(fast_retry());
        let err = client.translate_prompt("p").await.unwrap_err();

        assert!(err.is_quota_exhausted());
        match err {
            WatariError::AllModelsExhausted { last } => {
                assert!(last.contains("model-c"), "got: {last}");
            }
            other => panic!("expected AllModelsExhausted, got {other:?}"),
        }
        assert_eq!(backend.calls().await, vec!["model-a", "model-b", "model-c"]);
    }

    #[tokio::test]
    async fn success_text_is_trimmed() {
        let backend = Arc::new(MockBackend::new());
        backend.script("model-a", success("  こんにちは \n")).await;

        let client =
            TranslationClient::new(backend.clone(), vec!["model-a".into()])
                .with_retry_policy(fast_retry());
        assert_eq!(client.translate_prompt("p").await.unwrap(), "こんにちは");
    }

    #[tokio::test]
    async fn transport_error_propagates() {
        let backend = Arc::new(MockBackend::new());
        backend
            .script_err(
                "model-a",
                WatariError::Internal("connection refused".into()),
            )
            .await;

        let client =
            TranslationClient::new(backend.clone(), models()).with_retry_policy(fast_retry());
        let err = client.translate_prompt("p").await.unwrap_err();
        assert!(matches!(err, WatariError::Internal(_)));
        assert_eq!(backend.calls().await, vec!["model-a"]);
    }
}
