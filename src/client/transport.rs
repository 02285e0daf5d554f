use crate::client::staging::LocalFile;
use crate::models::{ErrorResponse, UploadBatchResponse};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use thiserror::Error;
use url::Url;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Upload rejected with status {status}: {message}")]
    Status {
        status: reqwest::StatusCode,
        message: String,
    },

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid content type '{0}'")]
    ContentType(String),
}

/// Sends one batch to the upload endpoint.
#[async_trait]
pub trait UploadTransport: Send + Sync {
    async fn send_batch(&self, files: &[LocalFile]) -> Result<UploadBatchResponse, ClientError>;
}

pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: Url,
    field_name: String,
}

impl HttpTransport {
    pub fn new(endpoint: Url) -> Self {
        Self::with_client(reqwest::Client::new(), endpoint)
    }

    pub fn with_client(client: reqwest::Client, endpoint: Url) -> Self {
        Self {
            client,
            endpoint,
            field_name: "files".to_string(),
        }
    }

    pub fn field_name(mut self, field_name: impl Into<String>) -> Self {
        self.field_name = field_name.into();
        self
    }

    fn build_form(&self, files: &[LocalFile]) -> Result<Form, ClientError> {
        let mut form = Form::new();
        for file in files {
            let part = Part::stream_with_length(file.data.clone(), file.size())
                .file_name(file.name.clone())
                .mime_str(&file.content_type)
                .map_err(|_| ClientError::ContentType(file.content_type.clone()))?;
            form = form.part(self.field_name.clone(), part);
        }
        Ok(form)
    }
}

#[async_trait]
impl UploadTransport for HttpTransport {
    async fn send_batch(&self, files: &[LocalFile]) -> Result<UploadBatchResponse, ClientError> {
        let form = self.build_form(files)?;

        let response = self
            .client
            .post(self.endpoint.clone())
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ErrorResponse>()
                .await
                .map(|body| body.error)
                .unwrap_or_else(|_| status.canonical_reason().unwrap_or("").to_string());
            return Err(ClientError::Status { status, message });
        }

        Ok(response.json::<UploadBatchResponse>().await?)
    }
}
