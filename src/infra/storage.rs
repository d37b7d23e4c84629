//! HTTP client for the hosted object-storage service.
//!
//! Objects land at `{endpoint}/object/{bucket}/{path}` and resolve publicly
//! at `{endpoint}/object/public/{bucket}/{path}`. Failures come back to the
//! caller with the backend's own message; there is no retry here.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::StatusCode;
use tracing::warn;
use url::Url;

use crate::application::uploads::{ObjectStorage, StorageError};

const CACHE_CONTROL_SECONDS: &str = "3600";

pub struct HttpObjectStorage {
    http: reqwest::Client,
    endpoint: Url,
    bucket: String,
    api_key: String,
}

impl HttpObjectStorage {
    pub fn new(http: reqwest::Client, endpoint: Url, bucket: String, api_key: String) -> Self {
        Self {
            http,
            endpoint,
            bucket,
            api_key,
        }
    }

    fn object_url(&self, path: &str) -> String {
        let base = self.endpoint.as_str().trim_end_matches('/');
        format!("{base}/object/{}/{path}", self.bucket)
    }
}

#[async_trait]
impl ObjectStorage for HttpObjectStorage {
    async fn put(&self, path: &str, content_type: &str, bytes: Bytes) -> Result<(), StorageError> {
        let response = self
            .http
            .post(self.object_url(path))
            .bearer_auth(&self.api_key)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .header(reqwest::header::CACHE_CONTROL, CACHE_CONTROL_SECONDS)
            .header("x-upsert", "false")
            .body(bytes)
            .send()
            .await
            .map_err(|err| StorageError::Transport(err.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let message = backend_message(status, response.text().await.ok());
        warn!(path, status = status.as_u16(), %message, "storage rejected upload");
        Err(StorageError::Backend {
            status: status.as_u16(),
            message,
        })
    }

    fn public_url(&self, path: &str) -> String {
        let base = self.endpoint.as_str().trim_end_matches('/');
        format!("{base}/object/public/{}/{path}", self.bucket)
    }
}

fn backend_message(status: StatusCode, body: Option<String>) -> String {
    body.map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
        .unwrap_or_else(|| format!("upload failed with status {status}"))
}
