use crate::api::error::AppError;
use crate::models::{IncomingFile, UploadBatchResponse};
use axum::{
    Json,
    extract::{
        Multipart, State,
        multipart::{MultipartError, MultipartRejection},
    },
    http::StatusCode,
};

#[utoipa::path(
    post,
    path = "/api/upload",
    request_body(
        content = Multipart,
        description = "One or more file parts under the `files` field"
    ),
    responses(
        (status = 200, description = "Files uploaded successfully", body = UploadBatchResponse),
        (status = 400, description = "No files uploaded", body = ErrorResponse),
        (status = 413, description = "Request body too large", body = ErrorResponse),
        (status = 500, description = "Failed to upload files", body = ErrorResponse)
    ),
    tag = "upload"
)]
pub async fn upload_files(
    State(state): State<crate::AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadBatchResponse>, AppError> {
    let mut multipart = multipart.map_err(|e| AppError::BadRequest(e.body_text()))?;

    let files = read_files(&mut multipart, &state.config.field_name).await?;
    tracing::info!("📥 Received batch of {} file(s)", files.len());

    let uploaded = state.upload_service.upload_batch(files).await?;

    Ok(Json(UploadBatchResponse {
        message: "Files uploaded successfully".to_string(),
        files: uploaded,
    }))
}

/// Collect the file parts under `field_name`, in the order they were sent.
async fn read_files(
    multipart: &mut Multipart,
    field_name: &str,
) -> Result<Vec<IncomingFile>, AppError> {
    let mut files = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();

        if name != field_name {
            // Drain unrelated fields
            field.bytes().await.map_err(multipart_error)?;
            continue;
        }

        let Some(file_name) = field.file_name().map(str::to_string) else {
            tracing::warn!("Ignoring non-file value under '{}'", field_name);
            field.bytes().await.map_err(multipart_error)?;
            continue;
        };

        let content_type = field
            .content_type()
            .map(str::to_string)
            .unwrap_or_else(|| mime::APPLICATION_OCTET_STREAM.to_string());

        let data = field.bytes().await.map_err(multipart_error)?;
        files.push(IncomingFile::new(file_name, content_type, data));
    }

    Ok(files)
}

fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge("Request body exceeds the maximum allowed limit".to_string())
    } else {
        AppError::BadRequest(e.body_text())
    }
}
