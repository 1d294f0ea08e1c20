use std::sync::Arc;

use service_common::{init_tracing, shutdown_signal};

use resource_server::config::Config;
use resource_server::urls::MediaUrls;
use resource_server::{router, AppState};
use video_store::{PgVideoStore, SharedStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    init_tracing();

    let config = Config::from_env()?;

    let store: SharedStore = Arc::new(PgVideoStore::connect(&config.database_url, config.database_pool_size)?);
    let urls = MediaUrls::with_delivery_base(&config.delivery_base, &config.cloud_name);

    let app = router(AppState { store: store.clone(), urls });

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await?;
    tracing::info!("Resource server listening on port {}", config.port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shutting down, releasing record store");
    drop(store);
    Ok(())
}
