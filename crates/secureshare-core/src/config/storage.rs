//! Object store configuration.

use serde::{Deserialize, Serialize};

/// Top-level object store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Backend: `"s3"` or `"memory"`.
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Bucket every object key lives in.
    #[serde(default = "default_bucket")]
    pub bucket: String,
    /// Maximum upload size in bytes (default 100 MB).
    #[serde(default = "default_max_upload")]
    pub max_upload_size_bytes: u64,
    /// S3-compatible storage configuration.
    #[serde(default)]
    pub s3: S3StorageConfig,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            bucket: default_bucket(),
            max_upload_size_bytes: default_max_upload(),
            s3: S3StorageConfig::default(),
        }
    }
}

/// S3-compatible object storage configuration (AWS S3 or MinIO).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct S3StorageConfig {
    /// Endpoint URL for non-AWS services such as MinIO.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Region.
    #[serde(default = "default_region")]
    pub region: String,
    /// Access key ID.
    #[serde(default = "default_credential")]
    pub access_key: String,
    /// Secret access key.
    #[serde(default = "default_credential")]
    pub secret_key: String,
    /// Use path-style addressing (required by MinIO).
    #[serde(default = "default_true")]
    pub force_path_style: bool,
    /// Create the bucket at startup when it does not exist.
    #[serde(default = "default_true")]
    pub create_bucket: bool,
}

impl Default for S3StorageConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            region: default_region(),
            access_key: default_credential(),
            secret_key: default_credential(),
            force_path_style: true,
            create_bucket: true,
        }
    }
}

fn default_provider() -> String {
    "s3".to_string()
}

fn default_bucket() -> String {
    "secure-files".to_string()
}

fn default_max_upload() -> u64 {
    104_857_600 // 100 MB
}

fn default_endpoint() -> String {
    "http://localhost:9000".to_string()
}

fn default_region() -> String {
    "us-east-1".to_string()
}

fn default_credential() -> String {
    "minioadmin".to_string()
}

fn default_true() -> bool {
    true
}
