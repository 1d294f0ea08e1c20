use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use resource_server::urls::MediaUrls;
use resource_server::{router, AppState};
use video_store::{MemoryVideoStore, NewVideoRecord, SharedStore, StoreError, VideoRecord, VideoStore};

struct UnreachableStore;

impl VideoStore for UnreachableStore {
    fn insert_video(&self, _new_video: NewVideoRecord) -> Result<VideoRecord, StoreError> {
        Err(StoreError::Blocking("connection refused".to_string()))
    }

    fn list_videos(&self) -> Result<Vec<VideoRecord>, StoreError> {
        Err(StoreError::Blocking("connection refused".to_string()))
    }
}

fn new_video(title: &str, public_id: &str) -> NewVideoRecord {
    NewVideoRecord {
        title: title.to_string(),
        description: None,
        public_id: public_id.to_string(),
        original_size: 10_485_760,
        compressed_size: 2_621_440,
        duration: 61.0,
    }
}

async fn get_videos(store: SharedStore) -> (StatusCode, serde_json::Value) {
    let app = router(AppState { store, urls: MediaUrls::new("demo") });
    let response = app
        .oneshot(Request::builder().uri("/api/videos").body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn empty_store_lists_empty_array() {
    let (status, body) = get_videos(Arc::new(MemoryVideoStore::new())).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!([]));
}

#[tokio::test]
async fn lists_newest_first_with_derived_fields() {
    let store = Arc::new(MemoryVideoStore::new());
    store.insert_video(new_video("First", "video-uploads/first")).unwrap();
    store.insert_video(new_video("Second", "video-uploads/second")).unwrap();

    let (status, body) = get_videos(store).await;
    assert_eq!(status, StatusCode::OK);

    let videos = body.as_array().unwrap();
    assert_eq!(videos.len(), 2);
    assert_eq!(videos[0]["title"], "Second");
    assert_eq!(videos[1]["title"], "First");

    let newest = &videos[0];
    assert_eq!(newest["publicId"], "video-uploads/second");
    assert_eq!(newest["originalSize"], 10_485_760);
    assert_eq!(newest["compressionPercentage"], 75);
    assert_eq!(
        newest["downloadUrl"],
        "https://res.cloudinary.com/demo/video/upload/c_limit,h_1080,w_1920/video-uploads/second"
    );
    assert!(newest["thumbnailUrl"].as_str().unwrap().ends_with("/video-uploads/second"));
    assert!(newest["previewUrl"].as_str().unwrap().contains("e_preview"));
}

#[tokio::test]
async fn store_failure_is_an_error_not_an_empty_list() {
    let (status, body) = get_videos(Arc::new(UnreachableStore)).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Error fetching videos");
}
