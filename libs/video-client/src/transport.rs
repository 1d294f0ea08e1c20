use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::StreamExt;
use reqwest::multipart::{Form, Part};

use crate::error::TransferError;
use crate::request::UploadRequest;
use crate::{ClientConfig, Video};

pub const UPLOAD_PATH: &str = "/api/video-upload";

// granularity of progress reports
const CHUNK_SIZE: usize = 64 * 1024;

/// Called with `(bytes_sent, bytes_total)` as the file body goes out.
pub type ProgressFn = Arc<dyn Fn(u64, u64) + Send + Sync>;

/// Sends one upload to the create-video endpoint.
#[async_trait]
pub trait UploadTransport: Send + Sync {
    async fn send(&self, request: UploadRequest, progress: ProgressFn) -> Result<Video, TransferError>;
}

/// Multipart upload over HTTP. Progress counts file bytes handed to the
/// connection.
pub struct HttpTransport {
    client: reqwest::Client,
    upload_url: String,
}

impl HttpTransport {
    pub fn new(client: reqwest::Client, config: &ClientConfig) -> Self {
        HttpTransport {
            client,
            upload_url: config.url(UPLOAD_PATH),
        }
    }
}

fn split_chunks(bytes: Bytes) -> Vec<Bytes> {
    let mut chunks = Vec::with_capacity(bytes.len() / CHUNK_SIZE + 1);
    let mut rest = bytes;
    while rest.len() > CHUNK_SIZE {
        chunks.push(rest.split_to(CHUNK_SIZE));
    }
    if !rest.is_empty() {
        chunks.push(rest);
    }
    chunks
}

#[async_trait]
impl UploadTransport for HttpTransport {
    async fn send(&self, request: UploadRequest, progress: ProgressFn) -> Result<Video, TransferError> {
        let total = request.file.size();
        tracing::info!("Uploading {} ({} bytes) to {}", request.file.file_name, total, self.upload_url);

        let mut sent = 0u64;
        let body = futures_util::stream::iter(split_chunks(request.file.bytes)).map(move |chunk| {
            sent += chunk.len() as u64;
            progress(sent, total);
            Ok::<Bytes, std::io::Error>(chunk)
        });

        let file_part = Part::stream_with_length(reqwest::Body::wrap_stream(body), total)
            .file_name(request.file.file_name)
            .mime_str(&request.file.content_type)
            .map_err(|err| TransferError::from_transport(&err))?;

        let form = Form::new()
            .part("file", file_part)
            .text("title", request.title)
            .text("description", request.description.unwrap_or_default())
            .text("originalSize", total.to_string());

        let response = self.client
            .post(&self.upload_url)
            .multipart(form)
            .send()
            .await
            .map_err(|err| TransferError::from_transport(&err))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TransferError::from_response(status.as_u16(), &body));
        }

        response.json::<Video>().await.map_err(|err| TransferError::from_transport(&err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_into_fixed_chunks() {
        let chunks = split_chunks(Bytes::from(vec![1u8; CHUNK_SIZE * 2 + 10]));
        let sizes: Vec<usize> = chunks.iter().map(Bytes::len).collect();
        assert_eq!(sizes, vec![CHUNK_SIZE, CHUNK_SIZE, 10]);
    }

    #[test]
    fn exact_multiple_has_no_empty_tail() {
        assert_eq!(split_chunks(Bytes::from(vec![1u8; CHUNK_SIZE])).len(), 1);
        assert!(split_chunks(Bytes::new()).is_empty());
    }
}
