use std::net::SocketAddr;
use skyfare_api::{app, AppState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "skyfare_api=debug,skyfare_catalog=debug,skyfare_order=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = skyfare_store::Config::load()?;
    tracing::info!(
        "Starting Skyfare API on port {} (opening balance {}, surge after {} attempts)",
        config.server.port,
        config.wallet.initial_balance,
        config.pricing.surge_threshold
    );

    let app = app(AppState::from_config(&config));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
