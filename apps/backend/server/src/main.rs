#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use overlord_api::{
    config::ApiConfig,
    construct_router,
    mock::spawn_mock_reporter,
    state::State,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    tracing::info!("Starting Overlord error report service");

    let config = config::Config::from_env()?;
    tracing::info!(
        "Loaded configuration: port={} store={} strict_user_agent={} mock_mode={}",
        config.port,
        config.store.backend()?,
        config.strict_user_agent,
        config.mock_mode
    );

    let reporter_script = match &config.reporter_script {
        Some(path) => {
            let script = std::fs::read_to_string(path)?;
            tracing::info!("Serving reporter script from {}", path.display());
            Some(script)
        }
        None => None,
    };

    let store = config.store.build_store().await?;

    let api_config = ApiConfig {
        auth: config.auth.clone(),
        strict_user_agent: config.strict_user_agent,
        mock_mode: config.mock_mode,
        reporter_script,
    };
    let state = Arc::new(State::new(api_config, store));

    if state.config.mock_mode {
        spawn_mock_reporter(state.clone());
    }

    let app = construct_router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for ctrl+c: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!("Failed to listen for SIGTERM: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("Shutting down...");
}
