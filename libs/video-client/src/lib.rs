//! Client side of the video site: the upload workflow with its validation and
//! progress reporting, the listing query and downloads of finished videos.

pub mod display;
pub mod download;
pub mod error;
pub mod listing;
pub mod progress;
pub mod request;
pub mod transport;
pub mod validation;
pub mod workflow;

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use reqwest;

pub use error::{DownloadError, FileError, QueryError, TransferError, UploadError, ValidationError};
pub use listing::VideoListClient;
pub use request::{UploadFile, UploadRequest};
pub use transport::{HttpTransport, ProgressFn, UploadTransport};
pub use validation::MAX_UPLOAD_SIZE;
pub use workflow::{UploadReceipt, UploadState, UploadWorkflow};

/// A video as the server reports it, after creation or in a listing. The
/// derived fields are only present in listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub public_id: String,
    pub original_size: i64,
    pub compressed_size: i64,
    pub duration: f64,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub preview_url: Option<String>,
    #[serde(default)]
    pub download_url: Option<String>,
    #[serde(default)]
    pub compression_percentage: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub connect_timeout: Duration,
    /// Upper bound for a whole request, including the upload body.
    pub request_timeout: Duration,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        ClientConfig {
            base_url: base_url.into(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(600),
        }
    }

    pub fn http_client(&self) -> reqwest::Result<reqwest::Client> {
        reqwest::Client::builder()
            .connect_timeout(self.connect_timeout)
            .timeout(self.request_timeout)
            .build()
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}
