use anyhow::Result;
use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::ObjectCannedAcl;
use bytes::Bytes;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use url::Url;

/// Characters left as-is in the path segment of a public object URL.
const KEY_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

#[derive(Debug, Clone, Default)]
pub struct PutOptions {
    pub public_read: bool,
    pub content_type: Option<String>,
}

impl PutOptions {
    pub fn public(content_type: impl Into<String>) -> Self {
        Self {
            public_read: true,
            content_type: Some(content_type.into()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct StoredObject {
    pub key: String,
    pub url: String,
}

#[async_trait]
pub trait StorageService: Send + Sync {
    /// Persist `data` under `key` and return where it can be fetched from.
    async fn put_object(&self, key: &str, data: Bytes, options: &PutOptions)
    -> Result<StoredObject>;

    /// Cheap reachability check.
    async fn ping(&self) -> Result<()>;
}

pub struct S3StorageService {
    client: Client,
    bucket: String,
    public_base_url: Url,
}

impl S3StorageService {
    pub fn new(client: Client, bucket: String, public_base_url: Url) -> Self {
        Self {
            client,
            bucket,
            public_base_url,
        }
    }

    pub fn public_url(&self, key: &str) -> String {
        public_url(&self.public_base_url, key)
    }
}

pub fn public_url(base: &Url, key: &str) -> String {
    let base = base.as_str().trim_end_matches('/');
    format!("{}/{}", base, utf8_percent_encode(key, KEY_SEGMENT))
}

#[async_trait]
impl StorageService for S3StorageService {
    async fn put_object(
        &self,
        key: &str,
        data: Bytes,
        options: &PutOptions,
    ) -> Result<StoredObject> {
        let mut request = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(data));

        if options.public_read {
            request = request.acl(ObjectCannedAcl::PublicRead);
        }
        if let Some(content_type) = &options.content_type {
            request = request.content_type(content_type);
        }

        if let Err(e) = request.send().await {
            tracing::error!(
                "S3 put_object failed: bucket={}, key={}, error={:?}",
                self.bucket,
                key,
                e
            );
            return Err(anyhow::anyhow!(e));
        }

        Ok(StoredObject {
            key: key.to_string(),
            url: self.public_url(key),
        })
    }

    async fn ping(&self) -> Result<()> {
        self.client.head_bucket().bucket(&self.bucket).send().await?;
        Ok(())
    }
}
