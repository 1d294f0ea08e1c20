use axum::extract::multipart::Field;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::Json;
use bytes::{Bytes, BytesMut};

use video_store::{NewVideoRecord, VideoRecord};

use crate::error::ApiError;
use crate::gateway::IngestRequest;
use crate::AppState;

pub const MAX_UPLOAD_SIZE: usize = 70 * 1024 * 1024;
pub const MAX_UPLOAD_SIZE_LABEL: &str = "70 MiB";

#[derive(Debug)]
struct UploadedFile {
    file_name: String,
    content_type: Option<String>,
    bytes: Bytes,
}

#[derive(Debug, Default)]
struct UploadForm {
    file: Option<UploadedFile>,
    title: Option<String>,
    description: Option<String>,
    original_size: Option<String>,
}

/// A form that passed validation, ready to be ingested.
#[derive(Debug)]
struct Submission {
    file: UploadedFile,
    title: String,
    description: Option<String>,
    original_size: i64,
}

impl UploadForm {
    async fn read(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut form = UploadForm::default();

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or("not set").to_string();
            match name.as_str() {
                "file" => form.file = Some(read_file(field).await?),
                "title" => form.title = Some(field.text().await?),
                "description" => form.description = Some(field.text().await?),
                "originalSize" => form.original_size = Some(field.text().await?),
                _ => tracing::debug!("Ignoring unexpected field {}", name),
            }
        }

        Ok(form)
    }

    fn validate(self) -> Result<Submission, ApiError> {
        let file = self.file
            .ok_or_else(|| ApiError::BadRequest("File not found".to_string()))?;

        let title = self.title.unwrap_or_default().trim().to_string();
        if title.is_empty() {
            return Err(ApiError::BadRequest("Title is required".to_string()));
        }

        let original_size = self.original_size
            .ok_or_else(|| ApiError::BadRequest("originalSize is required".to_string()))?;
        let original_size = original_size
            .trim()
            .parse::<i64>()
            .ok()
            .filter(|size| *size >= 0)
            .ok_or_else(|| ApiError::BadRequest(format!("Invalid originalSize: {}", original_size)))?;

        let description = self.description
            .map(|description| description.trim().to_string())
            .filter(|description| !description.is_empty());

        Ok(Submission { file, title, description, original_size })
    }
}

async fn read_file(mut field: Field<'_>) -> Result<UploadedFile, ApiError> {
    let content_type = field.content_type().map(|ct| ct.to_string());
    let file_name = field.file_name().unwrap_or("upload").to_string();

    tracing::info!("Receiving file: filename={}, content_type={:?}", file_name, content_type);

    let mut buffer = BytesMut::new();
    while let Some(chunk) = field.chunk().await? {
        if buffer.len() + chunk.len() > MAX_UPLOAD_SIZE {
            return Err(ApiError::FileTooLarge(MAX_UPLOAD_SIZE_LABEL.to_string()));
        }
        buffer.extend_from_slice(&chunk);
    }

    Ok(UploadedFile { file_name, content_type, bytes: buffer.freeze() })
}

/// Ingest the uploaded file, then persist its record in one write.
///
/// If the record cannot be saved the ingested asset is discarded again, so a
/// failed request never leaves a record (or, best-effort, an orphaned asset).
pub async fn upload_video(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<VideoRecord>), ApiError> {
    let submission = UploadForm::read(multipart).await?.validate()?;
    tracing::info!(
        "Upload accepted: title={:?}, original_size={}, received={}",
        submission.title, submission.original_size, submission.file.bytes.len()
    );

    let media = state.gateway
        .ingest(IngestRequest {
            file_name: submission.file.file_name,
            content_type: submission.file.content_type,
            bytes: submission.file.bytes,
        })
        .await
        .map_err(ApiError::Gateway)?;

    let new_video = NewVideoRecord {
        title: submission.title,
        description: submission.description,
        public_id: media.public_id.clone(),
        original_size: submission.original_size,
        compressed_size: media.compressed_size,
        duration: media.duration,
    };

    match video_store::insert_video(&state.store, new_video).await {
        Ok(record) => {
            tracing::info!("Created video {} ({})", record.id, record.public_id);
            Ok((StatusCode::CREATED, Json(record)))
        }
        Err(err) => {
            if let Err(discard_err) = state.gateway.discard(&media.public_id).await {
                tracing::error!("Failed to discard orphaned asset {}: {}", media.public_id, discard_err);
            }
            Err(ApiError::Store(err))
        }
    }
}
