use serde::Deserialize;
use thiserror::Error;

use crate::display::format_size;

/// Local checks that failed before anything was sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("File size exceeds {} limit", format_size(*limit))]
    FileTooLarge { size: u64, limit: u64 },
    #[error("Please select a video file")]
    EmptyFile,
    #[error("Please enter a title")]
    MissingTitle,
}

pub const TRANSFER_FALLBACK_MESSAGE: &str = "Upload failed";

/// The upload request failed in transit or was rejected by the server.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct TransferError {
    pub status: Option<u16>,
    pub message: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// `error` field of a `{ "error": ... }` body, if the body has one.
pub(crate) fn server_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .map(|body| body.error)
        .filter(|message| !message.trim().is_empty())
}

impl TransferError {
    /// Server message first, then the status line, then the generic fallback.
    pub fn from_response(status: u16, body: &str) -> Self {
        let message = server_message(body)
            .unwrap_or_else(|| format!("Request failed with status code {}", status));
        TransferError { status: Some(status), message }
    }

    pub fn from_transport(err: &reqwest::Error) -> Self {
        Self::from_message(err.status().map(|status| status.as_u16()), err.to_string())
    }

    /// Uses the generic fallback when `message` is blank.
    pub fn from_message(status: Option<u16>, message: impl Into<String>) -> Self {
        let message = message.into();
        TransferError {
            status,
            message: if message.trim().is_empty() {
                TRANSFER_FALLBACK_MESSAGE.to_string()
            } else {
                message
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Transfer(#[from] TransferError),
    #[error("An upload is already in progress")]
    Busy,
}

/// A video file could not be loaded for upload.
#[derive(Debug, Error)]
pub enum FileError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("failed to read video file: {0}")]
    Io(#[from] std::io::Error),
}

/// Listing failed. Distinct from an empty listing, which is `Ok(vec![])`.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("Failed to fetch videos: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("{message}")]
    Server { status: u16, message: String },
    #[error("Unexpected response format")]
    UnexpectedFormat,
}

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("download request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("download failed with status code {0}")]
    Status(u16),
    #[error("failed to write video file: {0}")]
    Io(#[from] std::io::Error),
    #[error("video {0} not found")]
    NotFound(String),
    #[error("video {0} has no download url")]
    NoDownloadUrl(String),
}
