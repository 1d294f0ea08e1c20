pub mod config;
pub mod error;
pub mod gateway;
pub mod upload;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;

use video_store::SharedStore;

use gateway::MediaGateway;
use upload::MAX_UPLOAD_SIZE;

// room for the text fields and multipart framing around the file
const MULTIPART_OVERHEAD: usize = 1024 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub store: SharedStore,
    pub gateway: Arc<dyn MediaGateway>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/video-upload/health", get(|| async { "ok" }))
        .route("/api/video-upload", post(upload::upload_video))
        .layer(
            ServiceBuilder::new()
                .layer(DefaultBodyLimit::max(MAX_UPLOAD_SIZE + MULTIPART_OVERHEAD))
        )
        .with_state(state)
}
