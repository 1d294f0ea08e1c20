use std::path::Path;

use bytes::Bytes;

use crate::error::{FileError, ValidationError};
use crate::validation::MAX_UPLOAD_SIZE;

#[derive(Debug, Clone)]
pub struct UploadFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

impl UploadFile {
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        let file_name = file_name.into();
        UploadFile {
            content_type: content_type_for(&file_name).to_string(),
            file_name,
            bytes: bytes.into(),
        }
    }

    /// Reads the file at `path`. Files over the upload limit are rejected
    /// from their metadata without being read.
    pub async fn from_path(path: &Path) -> Result<Self, FileError> {
        let size = tokio::fs::metadata(path).await?.len();
        if size > MAX_UPLOAD_SIZE {
            return Err(ValidationError::FileTooLarge { size, limit: MAX_UPLOAD_SIZE }.into());
        }

        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        Ok(UploadFile::new(file_name, bytes))
    }

    /// Size at submission time, sent along as `originalSize`.
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

fn content_type_for(file_name: &str) -> &'static str {
    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "mp4" | "m4v" => "video/mp4",
        "mov" => "video/quicktime",
        "webm" => "video/webm",
        "mkv" => "video/x-matroska",
        "avi" => "video/x-msvideo",
        "mpeg" | "mpg" => "video/mpeg",
        _ => "application/octet-stream",
    }
}

#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub file: UploadFile,
    pub title: String,
    pub description: Option<String>,
}
