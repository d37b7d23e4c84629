//! Multipart image upload for the editor.

use axum::Json;
use axum::extract::{Multipart, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::{Deserialize, Serialize};

use crate::application::uploads::{UploadFolder, UploadRequest};

use crate::infra::http::error::ApiError;
use crate::infra::http::state::AppState;

#[derive(Debug, Deserialize)]
pub struct UploadQuery {
    pub folder: String,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub url: String,
}

pub async fn upload_file(
    State(state): State<AppState>,
    Query(query): Query<UploadQuery>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let Some(folder) = UploadFolder::parse(&query.folder) else {
        return Err(ApiError::bad_request(format!(
            "unknown upload folder `{}`",
            query.folder
        )));
    };

    let request = read_file_field(&mut multipart).await?;
    let url = state.uploads.upload(request, folder).await?;

    Ok((StatusCode::CREATED, Json(UploadResponse { url })))
}

async fn read_file_field(multipart: &mut Multipart) -> Result<UploadRequest, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| ApiError::bad_request(format!("invalid multipart payload: {err}")))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field
            .file_name()
            .map(|value| value.to_string())
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| "upload.bin".to_string());

        let content_type = field
            .content_type()
            .map(|mime| mime.to_string())
            .unwrap_or_else(|| "application/octet-stream".to_string());

        let bytes = field
            .bytes()
            .await
            .map_err(|err| ApiError::bad_request(format!("failed to read upload: {err}")))?;

        return Ok(UploadRequest {
            filename,
            content_type,
            bytes,
        });
    }

    Err(ApiError::bad_request("missing `file` field"))
}
