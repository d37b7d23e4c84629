//! Media upload pass-through: validate locally, store remotely, return the
//! public URL. The adapter keeps no state between calls and never retries.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use metrics::counter;
use thiserror::Error;
use time::OffsetDateTime;
use tracing::info;
use uuid::Uuid;

use crate::domain::uploads::{
    UploadValidationError, ensure_image_mime, ensure_within_size, object_filename,
};

/// Bucket folders the editor writes into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadFolder {
    /// Post cover images.
    Covers,
    /// Images embedded in post bodies.
    Content,
}

impl UploadFolder {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Covers => "covers",
            Self::Content => "content",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "covers" => Some(Self::Covers),
            "content" => Some(Self::Content),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage backend rejected upload: {message}")]
    Backend { status: u16, message: String },
    #[error("storage unreachable: {0}")]
    Transport(String),
}

#[derive(Debug, Error)]
pub enum UploadError {
    #[error(transparent)]
    Validation(#[from] UploadValidationError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Object storage the upload service writes through.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    async fn put(&self, path: &str, content_type: &str, bytes: Bytes) -> Result<(), StorageError>;

    fn public_url(&self, path: &str) -> String;
}

/// A file as received from the editor.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub filename: String,
    pub content_type: String,
    pub bytes: Bytes,
}

#[derive(Clone)]
pub struct MediaUploadService {
    storage: Arc<dyn ObjectStorage>,
}

impl MediaUploadService {
    pub fn new(storage: Arc<dyn ObjectStorage>) -> Self {
        Self { storage }
    }

    /// Validate and store one file, returning its public URL.
    pub async fn upload(
        &self,
        request: UploadRequest,
        folder: UploadFolder,
    ) -> Result<String, UploadError> {
        if let Err(err) = ensure_image_mime(&request.content_type) {
            counter!("kalem_uploads_total", "outcome" => "rejected_type").increment(1);
            return Err(err.into());
        }
        if let Err(err) = ensure_within_size(request.bytes.len() as u64) {
            counter!("kalem_uploads_total", "outcome" => "rejected_size").increment(1);
            return Err(err.into());
        }

        let timestamp = OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000;
        let suffix = Uuid::new_v4().simple().to_string();
        let filename = object_filename(&request.filename, &request.content_type, timestamp, &suffix);
        let path = format!("{}/{}", folder.as_str(), filename);

        self.storage
            .put(&path, &request.content_type, request.bytes)
            .await?;

        let url = self.storage.public_url(&path);
        counter!("kalem_uploads_total", "outcome" => "stored").increment(1);
        info!(path, content_type = %request.content_type, "stored upload");

        Ok(url)
    }
}
