pub mod config;
pub mod model;
pub mod urls;

use axum::{
    extract::{Json, State},
    http::StatusCode,
    routing::get,
    Router,
};

use video_store::SharedStore;

use model::Video;
use urls::MediaUrls;

#[derive(Clone)]
pub struct AppState {
    pub store: SharedStore,
    pub urls: MediaUrls,
}

/// List every uploaded video, newest first.
///
/// An empty store yields an empty array. A store failure is a 500 with an
/// `error` body, never an empty list.
async fn list_videos(
    State(state): State<AppState>,
) -> Result<Json<Vec<Video>>, (StatusCode, Json<serde_json::Value>)> {
    let records = video_store::list_videos(&state.store).await.map_err(|err| {
        tracing::error!("Error fetching videos: {}", err);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "error": "Error fetching videos" })),
        )
    })?;

    tracing::debug!("Listing {} videos", records.len());
    let videos = records
        .into_iter()
        .map(|record| Video::new(record, &state.urls))
        .collect();
    Ok(Json(videos))
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/videos/health", get(|| async { "OK" }))
        .route("/api/videos", get(list_videos))
        .with_state(state)
}
