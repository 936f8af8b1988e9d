mod api;
mod middleware;

use std::time::Duration;

use tracing_subscriber::EnvFilter;
use vidsense_analysis::{Analyzer, ScoringClient};
use vidsense_store::StoreClient;

use crate::api::{build_app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = vidsense_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    tracing::debug!(?config, "configuration loaded");

    let store = StoreClient::new(
        &config.elasticsearch_url,
        &config.elasticsearch_index,
        config.store_timeout_secs,
    )?;
    let scorer = ScoringClient::new(&config.scoring_url, config.scoring_timeout_secs)?;

    match store.ping().await {
        Ok(()) => tracing::info!(index = %config.elasticsearch_index, "document store reachable"),
        Err(e) => tracing::warn!(
            error = %e,
            "document store unreachable at startup; requests will fail until it recovers"
        ),
    }

    let analyzer = Analyzer::new(store, scorer)
        .with_search_max_results(config.search_max_results)
        .with_deadline(config.analyze_deadline_secs.map(Duration::from_secs))
        .with_retry(config.analyze_max_retries, config.retry_backoff_base_ms);

    let state = AppState {
        analyzer,
        search_max_results: config.search_max_results,
    };
    let app = build_app(state, config.allowed_origins.clone());

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, env = %config.env, "vidsense server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
