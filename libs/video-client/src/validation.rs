use crate::error::ValidationError;
use crate::request::UploadRequest;

pub const MAX_UPLOAD_SIZE: u64 = 70 * 1024 * 1024;

/// Checks run before any network call.
pub fn validate(request: &UploadRequest) -> Result<(), ValidationError> {
    let size = request.file.size();
    if size > MAX_UPLOAD_SIZE {
        return Err(ValidationError::FileTooLarge { size, limit: MAX_UPLOAD_SIZE });
    }
    if size == 0 {
        return Err(ValidationError::EmptyFile);
    }
    if request.title.trim().is_empty() {
        return Err(ValidationError::MissingTitle);
    }
    Ok(())
}
