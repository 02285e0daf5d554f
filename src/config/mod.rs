use anyhow::{Context, Result, anyhow};
use std::env;
use url::Url;

/// Upload endpoint configuration
#[derive(Debug, Clone)]
pub struct UploadConfig {
    /// Maximum request body size in bytes (default: 50 MB)
    pub max_upload_size: usize,

    /// Multipart field name carrying the files (default: "files")
    pub field_name: String,

    /// Route of the upload endpoint (default: "/api/upload")
    pub upload_path: String,

    /// Allowed CORS origins; empty means any origin
    pub allowed_origins: Vec<String>,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_upload_size: 50 * 1024 * 1024, // 50 MB
            field_name: "files".to_string(),
            upload_path: "/api/upload".to_string(),
            allowed_origins: Vec::new(),
        }
    }
}

impl UploadConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let default = Self::default();

        Self {
            max_upload_size: lookup("MAX_UPLOAD_SIZE")
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.max_upload_size),

            field_name: lookup("UPLOAD_FIELD_NAME")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(default.field_name),

            upload_path: lookup("UPLOAD_PATH")
                .filter(|v| v.starts_with('/'))
                .unwrap_or(default.upload_path),

            allowed_origins: lookup("ALLOWED_ORIGINS")
                .map(|v| parse_origins(&v))
                .unwrap_or(default.allowed_origins),
        }
    }
}

fn parse_origins(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty() && *o != "*")
        .map(str::to_string)
        .collect()
}

/// Object store connection settings
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub endpoint: String,
    pub bucket: String,
    pub access_key: String,
    pub secret_key: String,
    pub region: String,

    /// Base that public object URLs are built from
    pub public_base_url: Url,
}

impl StorageConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| lookup(key).ok_or_else(|| anyhow!("{} must be set", key));

        let endpoint = required("S3_ENDPOINT")?;
        let bucket = required("S3_BUCKET")?;
        let access_key = required("S3_ACCESS_KEY")?;
        let secret_key = required("S3_SECRET_KEY")?;
        let region = lookup("S3_REGION").unwrap_or_else(|| "us-east-1".to_string());

        let base = lookup("S3_PUBLIC_URL").unwrap_or_else(|| {
            format!("{}/{}", endpoint.trim_end_matches('/'), bucket)
        });
        let public_base_url =
            Url::parse(&base).with_context(|| format!("Invalid public URL base: {}", base))?;

        Ok(Self {
            endpoint,
            bucket,
            access_key,
            secret_key,
            region,
            public_base_url,
        })
    }
}
