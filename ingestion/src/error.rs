use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use video_store::StoreError;

use crate::gateway::GatewayError;

/// Failures of the create-video endpoint. Each one becomes a `{ "error": ... }`
/// body, none of them leave a record behind.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("File size exceeds {0} limit")]
    FileTooLarge(String),
    #[error("{message}")]
    Multipart { status: StatusCode, message: String },
    #[error("Upload video failed")]
    Gateway(#[source] GatewayError),
    #[error("Failed to save video")]
    Store(#[source] StoreError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::FileTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Multipart { status, .. } => *status,
            ApiError::Gateway(_) => StatusCode::BAD_GATEWAY,
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        ApiError::Multipart {
            status: err.status(),
            message: err.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            ApiError::Gateway(source) => tracing::error!("Media gateway failure: {}", source),
            ApiError::Store(source) => tracing::error!("Record store failure: {}", source),
            other => tracing::warn!("Rejected upload ({}): {}", status, other),
        }

        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}
