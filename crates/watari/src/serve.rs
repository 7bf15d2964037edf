// SPDX-FileCopyrightText: 2026 Watari Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `watari serve` command implementation.
//!
//! Wires SQLite storage, the Gemini backend, the translation pipeline, the
//! reply client, and the webhook dispatcher, then runs the axum gateway
//! until the process exits.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{info, warn};

use watari_config::model::WatariConfig;
use watari_core::{KeyValueStore, RowStore, WatariError};
use watari_gateway::{
    start_server, EventDeduplicator, GatewayState, ReplyClient, ServerConfig,
    WebhookDispatcher,
};
use watari_storage::SqliteStore;
use watari_translate::{GeminiBackend, HistoryStore, TranslationClient, TranslationService};

/// Runs the `watari serve` command.
pub async fn run_serve(config: WatariConfig) -> Result<(), WatariError> {
    init_tracing(&config.agent.log_level);

    info!("starting watari serve");

    // Storage first; everything downstream hangs off it.
    let store = Arc::new(SqliteStore::open(&config.storage).await?);
    info!(path = config.storage.database_path.as_str(), "storage ready");

    // Backend credentials: config first, then environment.
    let api_key = config
        .backend
        .api_key
        .clone()
        .or_else(|| std::env::var("GEMINI_API_KEY").ok())
        .ok_or_else(|| {
            WatariError::Config(
                "backend API key required. Set backend.api_key or the GEMINI_API_KEY env var"
                    .to_string(),
            )
        })?;
    let backend = Arc::new(GeminiBackend::new(
        &api_key,
        &config.backend.endpoint,
        config.backend.max_output_tokens,
    )?);

    let access_token = config.channel.access_token.clone().ok_or_else(|| {
        WatariError::Config(
            "reply access token required. Set channel.access_token".to_string(),
        )
    })?;
    let reply_client = Arc::new(ReplyClient::new(
        &access_token,
        &config.channel.reply_endpoint,
    )?);

    if config.channel.channel_secret.is_none() {
        warn!("channel.channel_secret not set, webhook signature verification disabled");
    }

    let history = HistoryStore::new(store.clone() as Arc<dyn KeyValueStore>);
    let client = TranslationClient::new(backend, config.backend.models.clone());
    let service = Arc::new(TranslationService::new(history.clone(), client));
    info!(
        models = config.backend.models.join(", ").as_str(),
        "translation pipeline ready"
    );

    let dispatcher = Arc::new(WebhookDispatcher::new(
        service,
        history,
        store.clone() as Arc<dyn RowStore>,
        reply_client,
        EventDeduplicator::new(Duration::from_secs(config.dispatch.dedup_ttl_secs)),
        config.dispatch.results_base_url.clone(),
    ));

    let state = GatewayState {
        dispatcher,
        channel_secret: config.channel.channel_secret.clone(),
        start_time: Instant::now(),
    };
    let server_config = ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
    };
    start_server(&server_config, state).await?;

    store.close().await?;
    info!("watari serve shutdown complete");
    Ok(())
}

/// Initializes the tracing subscriber with the given log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("watari={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
