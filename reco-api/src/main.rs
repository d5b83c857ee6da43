use anyhow::Context;
use reco_api::{app, AppState};
use reco_store::app_config::Config;
use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "reco_api=debug,reco_core=info,reco_store=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().context("Failed to load config")?;
    tracing::info!("Starting reco API on port {}", config.server.port);

    // Chosen once; shared read-only by every request
    let geo = reco_store::resolver_from_config(&config.geography);

    let app_state = AppState {
        geo,
        rates_path: config.rates.path.clone(),
        max_body_bytes: config.payload.max_bytes,
    };

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app(app_state)).await?;
    Ok(())
}
