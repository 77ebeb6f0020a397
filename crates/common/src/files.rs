//! Uploaded file handling shared by the pipelines

use crate::{Error, Result};

/// Maximum accepted image upload size (5 MiB)
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// Accepted image content types
pub const ACCEPTED_IMAGE_TYPES: &[&str] = &["image/jpeg", "image/jpg", "image/png"];

/// Replace every character outside `[A-Za-z0-9.]` with `_`.
pub fn clean_file_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// An image received from a multipart form
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    /// Check type and size limits for product and clothing photos
    pub fn validate(&self) -> Result<()> {
        if self.bytes.is_empty() {
            return Err(Error::Validation("Please select an image".to_string()));
        }
        let content_type = self.content_type.to_ascii_lowercase();
        if !ACCEPTED_IMAGE_TYPES.contains(&content_type.as_str()) {
            return Err(Error::Validation(format!(
                "Unsupported image type '{}': only JPEG and PNG are accepted",
                self.content_type
            )));
        }
        if self.bytes.len() > MAX_IMAGE_BYTES {
            return Err(Error::Validation(format!(
                "Image is {} bytes; the limit is {} bytes",
                self.bytes.len(),
                MAX_IMAGE_BYTES
            )));
        }
        Ok(())
    }

    /// File name safe for use inside a storage path. Names without a
    /// letter or digit (including `.` and `..`) become "upload".
    pub fn clean_name(&self) -> String {
        let cleaned = clean_file_name(&self.file_name);
        if !cleaned.chars().any(|c| c.is_ascii_alphanumeric()) {
            "upload".to_string()
        } else {
            cleaned
        }
    }
}

/// Multipart body limit for routes taking image uploads
pub const UPLOAD_BODY_LIMIT: usize = 2 * MAX_IMAGE_BYTES + 1024 * 1024;

/// Map a multipart read failure to a 400
pub fn multipart_error(err: axum::extract::multipart::MultipartError) -> Error {
    Error::Validation(format!("Invalid multipart body: {}", err.body_text()))
}

/// Read a multipart file field into an [`ImageUpload`]
pub async fn read_image_field(field: axum::extract::multipart::Field<'_>) -> Result<ImageUpload> {
    let file_name = field.file_name().unwrap_or("upload").to_string();
    let content_type = field
        .content_type()
        .unwrap_or("application/octet-stream")
        .to_string();
    let bytes = field.bytes().await.map_err(multipart_error)?;

    Ok(ImageUpload {
        file_name,
        content_type,
        bytes: bytes.to_vec(),
    })
}
