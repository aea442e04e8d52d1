//! Multipart file extraction shared by the file detection endpoints.

use axum::extract::Multipart;
use verity_core::{AppError, FileInput};

use crate::error::HttpAppError;

/// Accepted names for the file part.
pub const FILE_FIELDS: [&str; 2] = ["file", "media"];

/// Declared type when the client sends none.
const UNKNOWN_MIME: &str = "application/octet-stream";

/// Read the first `file` (or `media`) part. Other parts are skipped.
pub async fn read_file_part(multipart: &mut Multipart) -> Result<FileInput, HttpAppError> {
    while let Some(field) = multipart.next_field().await? {
        let is_file = field
            .name()
            .map(|name| FILE_FIELDS.contains(&name))
            .unwrap_or(false);
        if !is_file {
            continue;
        }

        let file_name = field.file_name().map(str::to_string);
        let mime_type = field
            .content_type()
            .map(str::to_string)
            .unwrap_or_else(|| UNKNOWN_MIME.to_string());
        let data = field.bytes().await?;

        tracing::debug!(
            file_name = ?file_name,
            mime_type = %mime_type,
            size = data.len(),
            "Received upload"
        );
        return Ok(FileInput::new(file_name, mime_type, data));
    }

    Err(AppError::BadRequest("Missing multipart part 'file'".to_string()).into())
}
