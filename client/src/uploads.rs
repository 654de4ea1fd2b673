//! Image upload policy checks shared by task attachments and profile
//! pictures.

use shared::types::ImageUpload;
use shared::types::client_config::UploadConfig;

use crate::error::ClientError;

pub(crate) fn validate_upload(
    policy: &UploadConfig,
    upload: &ImageUpload,
) -> Result<(), ClientError> {
    if upload.bytes.len() > policy.max_bytes {
        return Err(ClientError::Validation(format!(
            "File is too large. Maximum size is {} MB.",
            policy.max_bytes / (1024 * 1024)
        )));
    }

    if !policy.allowed_types.contains(&upload.content_type) {
        return Err(ClientError::Validation(format!(
            "Invalid file type: {}. Please upload a JPEG, PNG, or GIF.",
            upload.content_type
        )));
    }

    Ok(())
}
