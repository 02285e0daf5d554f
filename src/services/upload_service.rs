use crate::models::{IncomingFile, UploadedFile};
use crate::services::keys::StorageKeyGenerator;
use crate::services::storage::{PutOptions, StorageService};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum UploadError {
    #[error("No files uploaded")]
    NoFiles,

    /// Objects listed in `stored_keys` were written before the failure and are
    /// left in place.
    #[error("Failed to store file #{index} ({key}): {source}")]
    Storage {
        index: usize,
        key: String,
        stored_keys: Vec<String>,
        #[source]
        source: anyhow::Error,
    },
}

pub struct UploadService {
    storage: Arc<dyn StorageService>,
    keys: StorageKeyGenerator,
}

impl UploadService {
    pub fn new(storage: Arc<dyn StorageService>, keys: StorageKeyGenerator) -> Self {
        Self { storage, keys }
    }

    /// Store every file of a batch, one after another, in submission order.
    pub async fn upload_batch(
        &self,
        files: Vec<IncomingFile>,
    ) -> Result<Vec<UploadedFile>, UploadError> {
        if files.is_empty() {
            return Err(UploadError::NoFiles);
        }

        let total = files.len();
        let mut uploaded = Vec::with_capacity(total);
        let mut stored_keys = Vec::with_capacity(total);

        for (index, file) in files.into_iter().enumerate() {
            let key = self.keys.next_key(&file.file_name);
            let size = file.size();
            let options = PutOptions::public(file.content_type.clone());

            let stored = match self.storage.put_object(&key, file.data, &options).await {
                Ok(stored) => stored,
                Err(source) => {
                    return Err(UploadError::Storage {
                        index,
                        key,
                        stored_keys,
                        source,
                    });
                }
            };

            debug!(
                "Stored {}/{}: {} ({} bytes) -> {}",
                index + 1,
                total,
                stored.key,
                size,
                stored.url
            );
            stored_keys.push(stored.key);

            uploaded.push(UploadedFile {
                name: file.file_name,
                path: stored.url,
                size,
                content_type: file.content_type,
            });
        }

        info!("📦 Stored batch of {} file(s)", uploaded.len());
        Ok(uploaded)
    }
}
