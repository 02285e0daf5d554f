#![allow(dead_code)]

use async_trait::async_trait;
use bytes::Bytes;
use photo_upload::config::UploadConfig;
use photo_upload::services::storage::{PutOptions, StorageService, StoredObject};
use photo_upload::{AppState, create_app};
use std::sync::{Arc, Mutex};

pub struct StoredEntry {
    pub key: String,
    pub data: Bytes,
    pub options: PutOptions,
}

/// In-memory object store. `fail_at` makes the n-th put (0-based) fail.
pub struct MockStorageService {
    pub objects: Mutex<Vec<StoredEntry>>,
    pub calls: Mutex<usize>,
    fail_at: Option<usize>,
    reachable: bool,
}

impl MockStorageService {
    pub fn new() -> Self {
        Self {
            objects: Mutex::new(Vec::new()),
            calls: Mutex::new(0),
            fail_at: None,
            reachable: true,
        }
    }

    pub fn failing_at(index: usize) -> Self {
        Self {
            fail_at: Some(index),
            ..Self::new()
        }
    }

    pub fn unreachable() -> Self {
        Self {
            reachable: false,
            ..Self::new()
        }
    }

    pub fn keys(&self) -> Vec<String> {
        self.objects
            .lock()
            .unwrap()
            .iter()
            .map(|o| o.key.clone())
            .collect()
    }

    pub fn call_count(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl StorageService for MockStorageService {
    async fn put_object(
        &self,
        key: &str,
        data: Bytes,
        options: &PutOptions,
    ) -> anyhow::Result<StoredObject> {
        let call = {
            let mut calls = self.calls.lock().unwrap();
            *calls += 1;
            *calls - 1
        };
        if self.fail_at == Some(call) {
            return Err(anyhow::anyhow!("simulated storage outage"));
        }

        self.objects.lock().unwrap().push(StoredEntry {
            key: key.to_string(),
            data,
            options: options.clone(),
        });

        Ok(StoredObject {
            key: key.to_string(),
            url: format!("https://blob.test/{}", key),
        })
    }

    async fn ping(&self) -> anyhow::Result<()> {
        if !self.reachable {
            return Err(anyhow::anyhow!("unreachable"));
        }
        Ok(())
    }
}

pub fn app_with(storage: Arc<MockStorageService>) -> axum::Router {
    create_app(AppState::new(storage, UploadConfig::default()))
}

pub const BOUNDARY: &str = "---------------------------123456789012345678901234567";

/// (field, filename, content type, body) parts
pub fn multipart_body(parts: &[(&str, Option<&str>, Option<&str>, Vec<u8>)]) -> Vec<u8> {
    let mut body = Vec::new();
    for (field, filename, content_type, data) in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match filename {
            Some(filename) => body.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                    field, filename
                )
                .as_bytes(),
            ),
            None => body.extend_from_slice(
                format!("Content-Disposition: form-data; name=\"{}\"\r\n", field).as_bytes(),
            ),
        }
        if let Some(content_type) = content_type {
            body.extend_from_slice(format!("Content-Type: {}\r\n", content_type).as_bytes());
        }
        body.extend_from_slice(b"\r\n");
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}
