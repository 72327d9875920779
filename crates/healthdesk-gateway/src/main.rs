//! Healthdesk gateway binary: intake form and FAQ chatbot HTTP service over a local sled store.

use std::sync::Arc;

use anyhow::Context;
use healthdesk_core::{
    ChatResponder, GatewayConfig, OpenRouterOracle, Oracle, SessionCache, SledStore,
    SubmissionService,
};
use healthdesk_gateway::{build_app, AppState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("[healthdesk-gateway] .env not loaded: {} (using system environment)", e);
    }

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = GatewayConfig::load().context("loading gateway config")?;

    let store = SledStore::open(Some(config.store_path.as_str()))
        .with_context(|| format!("opening store at {}", config.store_path))?
        .with_call_timeout(config.persist_timeout());
    tracing::info!("[SYSTEM] Store open at {}", config.store_path);

    let oracle: Option<Arc<dyn Oracle>> = config
        .oracle_api_key
        .as_deref()
        .and_then(|key| OpenRouterOracle::new(key, config.oracle_timeout()))
        .map(|o| {
            Arc::new(
                o.with_model(&config.oracle_model)
                    .with_base_url(&config.oracle_base_url),
            ) as Arc<dyn Oracle>
        });
    match &oracle {
        Some(_) => tracing::info!("[SYSTEM] Chatbot oracle enabled ({})", config.oracle_model),
        None => tracing::info!("[SYSTEM] No oracle key set; chatbot runs on the FAQ fallback table"),
    }

    let sessions = Arc::new(SessionCache::new(config.session_ttl(), config.session_max_turns));
    spawn_session_sweeper(Arc::clone(&sessions), config.session_ttl());

    let chatbot = ChatResponder::new(oracle, sessions).with_oracle_timeout(config.oracle_timeout());
    let state = AppState {
        submissions: SubmissionService::new(Arc::new(store)),
        chatbot: Arc::new(chatbot),
    };
    let app = build_app(state, &config.public_dir);

    let addr = config.listen_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    tracing::info!("[SYSTEM] Server running on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving http")?;

    tracing::info!("[SYSTEM] Shut down");
    Ok(())
}

/// Drops idle chat sessions at least once a minute.
fn spawn_session_sweeper(sessions: Arc<SessionCache>, ttl: std::time::Duration) {
    let period = ttl.min(std::time::Duration::from_secs(60)).max(std::time::Duration::from_secs(1));
    tokio::spawn(async move {
        let mut tick = tokio::time::interval(period);
        loop {
            tick.tick().await;
            let removed = sessions.purge_expired();
            if removed > 0 {
                tracing::debug!("[SYSTEM] Purged {} idle chat sessions", removed);
            }
        }
    });
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("[SYSTEM] Ctrl-C handler unavailable: {}", e);
        std::future::pending::<()>().await;
    }
}
