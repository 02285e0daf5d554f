use crate::services::upload_service::UploadError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Payload Too Large: {0}")]
    PayloadTooLarge(String),

    #[error("Upload error: {0}")]
    Upload(#[from] UploadError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::PayloadTooLarge(msg) => (StatusCode::PAYLOAD_TOO_LARGE, msg),
            AppError::Upload(UploadError::NoFiles) => {
                (StatusCode::BAD_REQUEST, "No files uploaded".to_string())
            }
            AppError::Upload(UploadError::Storage {
                index,
                key,
                stored_keys,
                source,
            }) => {
                tracing::error!("Storage error on file #{} ({}): {:?}", index, key, source);
                if !stored_keys.is_empty() {
                    tracing::warn!(
                        "Batch aborted, {} object(s) left in storage: {:?}",
                        stored_keys.len(),
                        stored_keys
                    );
                }
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to upload files".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}
