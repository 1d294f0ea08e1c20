use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::time::Instant;

use video_client::download::download_video;
use video_client::{
    ClientConfig, DownloadError, HttpTransport, QueryError, UploadError, UploadFile, UploadRequest, UploadState,
    UploadTransport, UploadWorkflow, VideoListClient,
};

const TEN_MIB: usize = 10 * 1024 * 1024;

#[derive(Clone, Default)]
struct Received {
    fields: Arc<Mutex<HashMap<String, String>>>,
    file_len: Arc<Mutex<usize>>,
}

async fn accept_upload(State(received): State<Received>, mut multipart: Multipart) -> (StatusCode, Json<serde_json::Value>) {
    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().unwrap().to_string();
        if name == "file" {
            *received.file_len.lock().unwrap() = field.bytes().await.unwrap().len();
        } else {
            let value = field.text().await.unwrap();
            received.fields.lock().unwrap().insert(name, value);
        }
    }

    let fields = received.fields.lock().unwrap().clone();
    let original_size: i64 = fields["originalSize"].parse().unwrap();
    (
        StatusCode::CREATED,
        Json(serde_json::json!({
            "id": "7d8a3c52-2f7e-4b61-9a55-4b0b8c1f2e10",
            "title": fields["title"],
            "description": null,
            "publicId": "video-uploads/demo",
            "originalSize": original_size,
            "compressedSize": original_size / 4,
            "duration": 12.0,
            "createdAt": "2025-01-01T00:00:00Z",
        })),
    )
}

async fn spawn(app: Router) -> ClientConfig {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    ClientConfig::new(format!("http://{addr}"))
}

async fn upload_server() -> (ClientConfig, Received) {
    let received = Received::default();
    let app = Router::new()
        .route("/api/video-upload", post(accept_upload))
        .layer(DefaultBodyLimit::disable())
        .with_state(received.clone());
    (spawn(app).await, received)
}

fn request(size: usize, title: &str) -> UploadRequest {
    UploadRequest {
        file: UploadFile::new("demo.mp4", vec![3u8; size]),
        title: title.to_string(),
        description: None,
    }
}

fn workflow(config: &ClientConfig) -> UploadWorkflow<HttpTransport> {
    UploadWorkflow::new(HttpTransport::new(config.http_client().unwrap(), config))
}

#[tokio::test]
async fn transport_reports_every_byte_and_sends_original_size() {
    let (config, received) = upload_server().await;
    let transport = HttpTransport::new(config.http_client().unwrap(), &config);

    let reports = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&reports);
    let video = transport
        .send(request(TEN_MIB, "Demo"), Arc::new(move |sent, total| sink.lock().unwrap().push((sent, total))))
        .await
        .unwrap();

    assert_eq!(video.original_size, TEN_MIB as i64);

    let reports = reports.lock().unwrap();
    assert_eq!(reports.last(), Some(&(TEN_MIB as u64, TEN_MIB as u64)));
    assert!(reports.windows(2).all(|pair| pair[0].0 <= pair[1].0));

    let fields = received.fields.lock().unwrap();
    assert_eq!(fields["title"], "Demo");
    assert_eq!(fields["description"], "");
    assert_eq!(fields["originalSize"], "10485760");
    assert_eq!(*received.file_len.lock().unwrap(), TEN_MIB);
}

#[tokio::test]
async fn successful_upload_schedules_redirect() {
    let (config, _) = upload_server().await;
    let mut workflow = workflow(&config);

    let receipt = workflow.submit(request(TEN_MIB, "Demo")).await.unwrap();

    assert_eq!(receipt.video.title, "Demo");
    assert_eq!(receipt.video.original_size, 10_485_760);
    let remaining = receipt.redirect_at.saturating_duration_since(Instant::now());
    assert!(remaining <= Duration::from_millis(1500));
    assert!(remaining > Duration::from_millis(1000));
    assert!(matches!(workflow.state(), UploadState::Succeeded { .. }));
}

#[tokio::test]
async fn server_error_message_is_surfaced() {
    let app = Router::new().route(
        "/api/video-upload",
        post(|| async {
            (StatusCode::BAD_GATEWAY, Json(serde_json::json!({ "error": "Upload video failed" })))
        }),
    );
    let config = spawn(app).await;
    let mut workflow = workflow(&config);

    let err = workflow.submit(request(16, "Demo")).await.unwrap_err();

    match err {
        UploadError::Transfer(err) => {
            assert_eq!(err.status, Some(502));
            assert_eq!(err.message, "Upload video failed");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(workflow.state(), UploadState::Failed { message: "Upload video failed".to_string() });
}

#[tokio::test]
async fn plain_error_falls_back_to_status_line() {
    let app = Router::new().route(
        "/api/video-upload",
        post(|| async { (StatusCode::SERVICE_UNAVAILABLE, "maintenance") }),
    );
    let config = spawn(app).await;

    let err = workflow(&config).submit(request(16, "Demo")).await.unwrap_err();
    assert_eq!(err.to_string(), "Request failed with status code 503");
}

#[tokio::test]
async fn unreachable_server_is_a_transfer_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let config = ClientConfig::new(format!("http://{addr}"));
    let mut workflow = workflow(&config);

    let err = workflow.submit(request(16, "Demo")).await.unwrap_err();
    match err {
        UploadError::Transfer(err) => {
            assert_eq!(err.status, None);
            assert!(!err.message.is_empty());
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(matches!(workflow.state(), UploadState::Failed { .. }));
    assert_eq!(workflow.state().progress(), 0);
}

#[tokio::test]
async fn connection_dropped_mid_transfer() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buffer = vec![0u8; 64 * 1024];
        let _ = socket.read(&mut buffer).await;
        // hang up without answering
    });

    let config = ClientConfig::new(format!("http://{addr}"));
    let mut workflow = workflow(&config);

    let err = workflow.submit(request(4 * 1024 * 1024, "Demo")).await.unwrap_err();
    assert!(matches!(err, UploadError::Transfer(_)));
    assert!(matches!(workflow.state(), UploadState::Failed { .. }));
    assert_eq!(workflow.state().progress(), 0);
    assert!(workflow.state().accepts_submission());
}

async fn listing_server(status: StatusCode, body: &'static str) -> VideoListClient {
    let app = Router::new().route(
        "/api/videos",
        get(move || async move { (status, [("content-type", "application/json")], body) }),
    );
    let config = spawn(app).await;
    VideoListClient::new(config.http_client().unwrap(), &config)
}

#[tokio::test]
async fn empty_listing_is_ok() {
    let client = listing_server(StatusCode::OK, "[]").await;
    assert!(client.fetch().await.unwrap().is_empty());
}

#[tokio::test]
async fn listing_keeps_server_order() {
    let client = listing_server(
        StatusCode::OK,
        r#"[
            {"id":"b","title":"Newer","publicId":"p/b","originalSize":100,"compressedSize":40,"duration":3.0,"createdAt":"2025-01-02T00:00:00Z","compressionPercentage":60},
            {"id":"a","title":"Older","description":"first","publicId":"p/a","originalSize":100,"compressedSize":50,"duration":4.0,"createdAt":"2025-01-01T00:00:00Z"}
        ]"#,
    )
    .await;

    let videos = client.fetch().await.unwrap();
    let titles: Vec<&str> = videos.iter().map(|v| v.title.as_str()).collect();
    assert_eq!(titles, vec!["Newer", "Older"]);
    assert_eq!(videos[0].compression_percentage, Some(60));
    assert_eq!(videos[1].description.as_deref(), Some("first"));
}

#[tokio::test]
async fn non_array_listing_is_an_error() {
    let client = listing_server(StatusCode::OK, r#"{"videos":[]}"#).await;
    assert!(matches!(client.fetch().await, Err(QueryError::UnexpectedFormat)));
}

#[tokio::test]
async fn listing_failure_is_distinct_from_empty() {
    let client = listing_server(StatusCode::INTERNAL_SERVER_ERROR, r#"{"error":"Error fetching videos"}"#).await;

    match client.fetch().await {
        Err(QueryError::Server { status, message }) => {
            assert_eq!(status, 500);
            assert_eq!(message, "Error fetching videos");
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[tokio::test]
async fn downloads_full_asset_named_after_title() {
    let app = Router::new()
        .route("/media/demo", get(|| async { vec![9u8; 200_000] }))
        .route("/media/missing", get(|| async { StatusCode::NOT_FOUND }));
    let config = spawn(app).await;
    let client = config.http_client().unwrap();
    let dir = tempfile::tempdir().unwrap();

    let path = download_video(&client, &format!("{}/media/demo", config.base_url), dir.path(), "Demo")
        .await
        .unwrap();
    assert_eq!(path, dir.path().join("Demo.mp4"));
    assert_eq!(tokio::fs::read(&path).await.unwrap(), vec![9u8; 200_000]);

    let err = download_video(&client, &format!("{}/media/missing", config.base_url), dir.path(), "Gone")
        .await
        .unwrap_err();
    assert!(matches!(err, DownloadError::Status(404)));
}

#[tokio::test]
async fn interrupted_download_leaves_no_partial_file() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buffer = vec![0u8; 4096];
        let _ = socket.read(&mut buffer).await;
        socket
            .write_all(b"HTTP/1.1 200 OK\r\ncontent-length: 100000\r\n\r\npartial")
            .await
            .unwrap();
        // hang up before the promised body is complete
    });

    let client = ClientConfig::new(format!("http://{addr}")).http_client().unwrap();
    let dir = tempfile::tempdir().unwrap();

    let err = download_video(&client, &format!("http://{addr}/media/demo"), dir.path(), "Demo")
        .await
        .unwrap_err();
    assert!(matches!(err, DownloadError::Transport(_)));
    assert!(!dir.path().join("Demo.mp4").exists());
}
