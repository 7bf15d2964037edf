// SPDX-FileCopyrightText: 2026 Watari Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock model backend with scripted per-model outcomes.
//!
//! Outcomes are popped from a FIFO queue per model identifier. When a
//! model's queue is empty, a default success text is returned. Every call
//! is recorded so tests can assert candidate ordering.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use watari_core::{CompletionOutcome, ModelBackend, WatariError};

type Scripted = Result<CompletionOutcome, WatariError>;

/// A mock [`ModelBackend`] that returns pre-scripted outcomes.
pub struct MockBackend {
    scripts: Arc<Mutex<HashMap<String, VecDeque<Scripted>>>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockBackend {
    /// Creates a mock with no scripted outcomes.
    pub fn new() -> Self {
        Self {
            scripts: Arc::new(Mutex::new(HashMap::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queues an outcome for the named model.
    pub async fn script(&self, model: &str, outcome: CompletionOutcome) {
        self.scripts
            .lock()
            .await
            .entry(model.to_string())
            .or_default()
            .push_back(Ok(outcome));
    }

    /// Queues a transport-level error for the named model.
    pub async fn script_err(&self, model: &str, err: WatariError) {
        self.scripts
            .lock()
            .await
            .entry(model.to_string())
            .or_default()
            .push_back(Err(err));
    }

    /// Model identifiers in call order.
    pub async fn calls(&self) -> Vec<String> {
        self.calls.lock().await.clone()
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ModelBackend for MockBackend {
    async fn complete(
        &self,
        model: &str,
        _prompt: &str,
    ) -> Result<CompletionOutcome, WatariError> {
        self.calls.lock().await.push(model.to_string());
        let scripted = self
            .scripts
            .lock()
            .await
            .get_mut(model)
            .and_then(|queue| queue.pop_front());
        match scripted {
            Some(outcome) => outcome,
            // Queue exhausted (or never scripted): default success.
            None => Ok(CompletionOutcome::Success {
                text: "mock translation".to_string(),
            }),
        }
    }
}
