use std::collections::HashMap;

use axum::extract::Multipart;
use uuid::Uuid;

use crate::config;
use crate::error::ApiError;

const ACCEPTED_IMAGE_TYPES: &[&str] = &["image/jpeg", "image/png", "image/webp", "image/gif"];

/// A file part pulled out of a multipart request.
pub struct UploadedFile {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    /// Object key for this upload under the given prefix, named by a fresh
    /// uuid so concurrent uploads of the same filename never collide.
    pub fn object_key(&self, prefix: &str) -> String {
        let ext = self
            .filename
            .rsplit_once('.')
            .map(|(_, e)| e.to_ascii_lowercase())
            .filter(|e| !e.is_empty() && e.len() <= 5)
            .unwrap_or_else(|| "bin".to_string());
        format!("{}/{}.{}", prefix, Uuid::new_v4(), ext)
    }
}

/// Split a multipart body into text fields and file parts.
///
/// Every file part must be an image within the configured size cap;
/// anything else is rejected before a byte reaches the object store.
pub async fn parse_multipart(
    mut multipart: Multipart,
) -> Result<(HashMap<String, String>, Vec<UploadedFile>), ApiError> {
    let max_bytes = config::config().api.max_upload_bytes;
    let mut fields = HashMap::new();
    let mut files = Vec::new();

    while let Some(part) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Malformed multipart body: {}", e)))?
    {
        let name = part.name().unwrap_or("").to_string();

        if part.file_name().is_some() {
            let filename = part.file_name().unwrap_or("upload").to_string();
            let content_type = part
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();

            if !ACCEPTED_IMAGE_TYPES.contains(&content_type.as_str()) {
                return Err(ApiError::validation_error(
                    "Only JPEG, PNG, WebP and GIF uploads are accepted",
                    None,
                ));
            }

            let bytes = part
                .bytes()
                .await
                .map_err(|e| ApiError::bad_request(format!("Failed to read upload: {}", e)))?;
            if bytes.len() > max_bytes {
                return Err(ApiError::validation_error(
                    format!("Upload exceeds the {} byte limit", max_bytes),
                    None,
                ));
            }

            files.push(UploadedFile {
                filename,
                content_type,
                bytes: bytes.to_vec(),
            });
        } else {
            let value = part
                .text()
                .await
                .map_err(|e| ApiError::bad_request(format!("Malformed multipart field: {}", e)))?;
            fields.insert(name, value);
        }
    }

    Ok((fields, files))
}

/// Like `parse_multipart` but requires exactly one file part.
pub async fn parse_single_upload(
    multipart: Multipart,
) -> Result<(HashMap<String, String>, UploadedFile), ApiError> {
    let (fields, mut files) = parse_multipart(multipart).await?;
    match files.len() {
        1 => Ok((fields, files.remove(0))),
        0 => Err(ApiError::validation_error("An image file is required", None)),
        _ => Err(ApiError::validation_error(
            "Exactly one image file is expected",
            None,
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_key_keeps_extension_and_prefix() {
        let file = UploadedFile {
            filename: "IMG_2041.JPG".to_string(),
            content_type: "image/jpeg".to_string(),
            bytes: vec![],
        };
        let key = file.object_key("designs");
        assert!(key.starts_with("designs/"));
        assert!(key.ends_with(".jpg"));
    }

    #[test]
    fn object_key_falls_back_without_extension() {
        let file = UploadedFile {
            filename: "upload".to_string(),
            content_type: "image/png".to_string(),
            bytes: vec![],
        };
        assert!(file.object_key("designs").ends_with(".bin"));
    }
}
