//! Erasmus Architect HTTP server.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use erasmus_architect::adapters::ai::GeminiProvider;
use erasmus_architect::adapters::http::{api_router, ConceptAppState, ProposalAppState};
use erasmus_architect::adapters::storage::{FileStateStorage, InMemoryStateStorage};
use erasmus_architect::adapters::web::{HttpWebFetcher, DEFAULT_FETCH_TIMEOUT};
use erasmus_architect::config::AppConfig;
use erasmus_architect::ports::{AIProvider, StateStorage, WebFetcher};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let config = AppConfig::load()?;
    init_tracing(&config.server.log_level, config.server.log_json || config.is_production());

    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        std::process::exit(1);
    }

    let provider = GeminiProvider::new(config.gemini.to_provider_config())?;
    let info = provider.provider_info();
    let ai_provider: Arc<dyn AIProvider> = Arc::new(provider);

    let storage: Arc<dyn StateStorage> = if config.storage.in_memory {
        Arc::new(InMemoryStateStorage::new())
    } else {
        Arc::new(FileStateStorage::new(&config.storage.data_dir))
    };
    let web_fetcher: Arc<dyn WebFetcher> = Arc::new(HttpWebFetcher::new(DEFAULT_FETCH_TIMEOUT)?);

    let app = api_router(
        ConceptAppState::new(storage, ai_provider.clone()),
        ProposalAppState::new(ai_provider, web_fetcher),
        &config.server.cors_origins_list(),
        config.server.request_timeout(),
    );

    let addr = config.server.socket_addr()?;
    info!(
        addr = %addr,
        environment = ?config.server.environment,
        model = %info.model,
        configured_keys = config.gemini.key_count(),
        storage = if config.storage.in_memory { "memory" } else { "file" },
        "Starting Erasmus Architect"
    );
    if config.gemini.key_count() == 0 {
        warn!("No Gemini API key configured; requests must send x-gemini-api-key");
    }

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

fn init_tracing(default_filter: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
