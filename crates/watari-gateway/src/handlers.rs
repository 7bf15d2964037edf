// SPDX-FileCopyrightText: 2026 Watari Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the webhook gateway.
//!
//! The webhook endpoint always acknowledges deliveries it could read:
//! malformed payloads and per-event failures are logged and answered with
//! 200 so the platform does not start redelivering. Only a signature
//! mismatch is rejected outright.

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::warn;

use watari_core::InboundEvent;

use crate::server::GatewayState;
use crate::signature;
use crate::webhook::{self, WebhookPayload};

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Health status string.
    pub status: String,
    /// Binary version.
    pub version: String,
    /// Seconds since process start.
    pub uptime_secs: u64,
}

/// POST /webhook
///
/// Verifies the delivery signature against the raw body, parses the event
/// batch, and hands it to the dispatcher.
pub async fn post_webhook(
    State(state): State<GatewayState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if let Some(ref secret) = state.channel_secret {
        let provided = headers
            .get(signature::SIGNATURE_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");
        if !signature::verify(secret, &body, provided) {
            warn!("webhook signature mismatch, rejecting delivery");
            return StatusCode::UNAUTHORIZED.into_response();
        }
    }

    let payload: WebhookPayload = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(e) => {
            // Acknowledge anyway; a parse failure must not trigger platform
            // redelivery.
            warn!(error = %e, "malformed webhook payload, acknowledging");
            return StatusCode::OK.into_response();
        }
    };

    let events: Vec<InboundEvent> = payload
        .events
        .iter()
        .filter_map(webhook::to_inbound_event)
        .collect();
    state.dispatcher.handle(events).await;

    StatusCode::OK.into_response()
}

/// GET /health
pub async fn get_health(State(state): State<GatewayState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_response_serializes() {
        let resp = HealthResponse {
            status: "ok".to_string(),
            version: "0.1.0".to_string(),
            uptime_secs: 42,
        };
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("\"status\":\"ok\""));
        assert!(json.contains("\"uptime_secs\":42"));
    }
}
