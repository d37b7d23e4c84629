//! Upload validation invariants and object naming.
//!
//! Everything here runs before the first byte leaves the process: a payload
//! that fails these checks must never reach the storage backend.

use std::path::Path;

use thiserror::Error;

/// Hard ceiling for a single uploaded image.
pub const MAX_UPLOAD_BYTES: u64 = 5 * 1024 * 1024;

/// Validation failures reported to the editor before any network call.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UploadValidationError {
    #[error("please select an image file")]
    NotAnImage { content_type: String },
    #[error("file too large")]
    TooLarge { size_bytes: u64 },
}

/// Reject payloads whose declared MIME type is not an image kind.
pub fn ensure_image_mime(content_type: &str) -> Result<(), UploadValidationError> {
    if content_type.starts_with("image/") {
        Ok(())
    } else {
        Err(UploadValidationError::NotAnImage {
            content_type: content_type.to_string(),
        })
    }
}

/// Reject payloads above [`MAX_UPLOAD_BYTES`].
pub fn ensure_within_size(size_bytes: u64) -> Result<(), UploadValidationError> {
    if size_bytes <= MAX_UPLOAD_BYTES {
        Ok(())
    } else {
        Err(UploadValidationError::TooLarge { size_bytes })
    }
}

/// Build a collision-resistant object filename: millisecond timestamp,
/// caller-supplied random suffix, and the original extension (falling back to
/// one guessed from the MIME type).
pub fn object_filename(
    original_name: &str,
    content_type: &str,
    timestamp_millis: i128,
    random_suffix: &str,
) -> String {
    let extension = extension_for(original_name, content_type);
    format!("{timestamp_millis}-{random_suffix}.{extension}")
}

fn extension_for(original_name: &str, content_type: &str) -> String {
    let from_name = Path::new(original_name)
        .extension()
        .and_then(|value| value.to_str())
        .map(|value| value.to_ascii_lowercase())
        .filter(|value| !value.is_empty() && value.chars().all(|ch| ch.is_ascii_alphanumeric()));

    if let Some(ext) = from_name {
        return ext;
    }

    mime_guess::get_mime_extensions_str(content_type)
        .and_then(|candidates| candidates.first())
        .map(|ext| ext.to_string())
        .unwrap_or_else(|| "bin".to_string())
}
