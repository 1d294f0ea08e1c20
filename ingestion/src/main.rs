use std::sync::Arc;

use service_common::{init_tracing, shutdown_signal};

use ingestion::config::Config;
use ingestion::gateway::CloudinaryGateway;
use ingestion::{router, AppState};
use video_store::{PgVideoStore, SharedStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    init_tracing();

    let config = Config::from_env()?;

    let store: SharedStore = Arc::new(PgVideoStore::connect(&config.database_url, config.database_pool_size)?);
    let gateway = Arc::new(CloudinaryGateway::new(config.gateway.clone())?);

    let app = router(AppState { store: store.clone(), gateway });

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await?;
    tracing::info!("Ingestion service listening on port {}", config.port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shutting down, releasing record store");
    drop(store);
    Ok(())
}
