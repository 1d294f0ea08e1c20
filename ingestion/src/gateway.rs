use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("media gateway request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("media gateway rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },
    #[error("media gateway returned an invalid response: {0}")]
    InvalidResponse(String),
}

#[derive(Debug, Clone)]
pub struct IngestRequest {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

/// What the media service reports back once the upload is compressed.
#[derive(Debug, Clone, PartialEq)]
pub struct IngestedMedia {
    pub public_id: String,
    pub duration: f64,
    pub compressed_size: i64,
}

/// External service that stores, compresses and serves the uploaded media.
#[async_trait]
pub trait MediaGateway: Send + Sync {
    async fn ingest(&self, request: IngestRequest) -> Result<IngestedMedia, GatewayError>;

    /// Remove an ingested asset, used when the record for it could not be saved.
    async fn discard(&self, public_id: &str) -> Result<(), GatewayError>;
}

#[derive(Debug, Clone)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    pub upload_folder: String,
    pub api_base: String,
    pub timeout: Duration,
}

pub struct CloudinaryGateway {
    config: CloudinaryConfig,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    public_id: String,
    duration: Option<f64>,
    bytes: i64,
}

#[derive(Debug, Deserialize)]
struct DestroyResponse {
    result: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorMessage,
}

#[derive(Debug, Deserialize)]
struct ErrorMessage {
    message: String,
}

// compress on ingest, always deliver mp4
const UPLOAD_TRANSFORMATION: &str = "q_auto,f_mp4";

impl CloudinaryGateway {
    pub fn new(config: CloudinaryConfig) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(CloudinaryGateway { config, client })
    }

    fn endpoint(&self, action: &str) -> String {
        format!(
            "{}/v1_1/{}/video/{}",
            self.config.api_base.trim_end_matches('/'),
            self.config.cloud_name,
            action
        )
    }

    /// The asset was stored but its response can't be recorded, so nothing
    /// would ever reference it.
    async fn discard_unusable(&self, public_id: &str) {
        tracing::warn!("Discarding {}, media gateway response is unusable", public_id);
        if let Err(err) = self.discard(public_id).await {
            tracing::warn!("Failed to discard {}: {}", public_id, err);
        }
    }

    /// Adds `timestamp`, `signature` and credentials to the given parameters.
    fn signed(&self, mut params: BTreeMap<&'static str, String>) -> BTreeMap<&'static str, String> {
        params.insert("timestamp", chrono::Utc::now().timestamp().to_string());
        let signature = sign(&params, &self.config.api_secret);
        params.insert("signature", signature);
        params.insert("signature_algorithm", "sha256".to_string());
        params.insert("api_key", self.config.api_key.clone());
        params
    }
}

/// SHA-256 request signature: `k1=v1&k2=v2...` in key order, followed by the secret.
pub fn sign(params: &BTreeMap<&'static str, String>, api_secret: &str) -> String {
    let to_sign = params
        .iter()
        .map(|(key, value)| format!("{}={}", key, value))
        .collect::<Vec<String>>()
        .join("&");

    let mut hasher = Sha256::new();
    hasher.update(to_sign.as_bytes());
    hasher.update(api_secret.as_bytes());
    hex::encode(hasher.finalize())
}

async fn rejection(response: reqwest::Response) -> GatewayError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    let message = match serde_json::from_str::<ErrorResponse>(&body) {
        Ok(err) => err.error.message,
        Err(_) if body.is_empty() => "no response body".to_string(),
        Err(_) => body,
    };
    GatewayError::Rejected { status, message }
}

#[async_trait]
impl MediaGateway for CloudinaryGateway {
    async fn ingest(&self, request: IngestRequest) -> Result<IngestedMedia, GatewayError> {
        let size = request.bytes.len() as u64;
        tracing::info!("Sending {} ({} bytes) to media gateway", request.file_name, size);

        let params = self.signed(BTreeMap::from([
            ("folder", self.config.upload_folder.clone()),
            ("transformation", UPLOAD_TRANSFORMATION.to_string()),
        ]));

        let mut file_part = Part::stream_with_length(reqwest::Body::from(request.bytes), size)
            .file_name(request.file_name);
        if let Some(content_type) = request.content_type {
            file_part = file_part.mime_str(&content_type)?;
        }

        let mut form = Form::new().part("file", file_part);
        for (key, value) in params {
            form = form.text(key, value);
        }

        let response = self.client
            .post(self.endpoint("upload"))
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(rejection(response).await);
        }

        let uploaded: UploadResponse = response.json().await?;
        if uploaded.public_id.trim().is_empty() {
            return Err(GatewayError::InvalidResponse("missing public_id".to_string()));
        }
        let Some(duration) = uploaded.duration else {
            self.discard_unusable(&uploaded.public_id).await;
            return Err(GatewayError::InvalidResponse(format!("no duration for {}", uploaded.public_id)));
        };

        tracing::info!(
            "Media gateway stored {} ({} bytes after compression, {:.1}s)",
            uploaded.public_id, uploaded.bytes, duration
        );

        Ok(IngestedMedia {
            public_id: uploaded.public_id,
            duration,
            compressed_size: uploaded.bytes,
        })
    }

    async fn discard(&self, public_id: &str) -> Result<(), GatewayError> {
        let params = self.signed(BTreeMap::from([
            ("invalidate", "true".to_string()),
            ("public_id", public_id.to_string()),
        ]));

        let response = self.client
            .post(self.endpoint("destroy"))
            .form(&params)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(rejection(response).await);
        }

        let destroyed: DestroyResponse = response.json().await?;
        if destroyed.result != "ok" {
            return Err(GatewayError::InvalidResponse(format!("destroy of {} returned {}", public_id, destroyed.result)));
        }

        tracing::info!("Discarded {} from media gateway", public_id);
        Ok(())
    }
}
