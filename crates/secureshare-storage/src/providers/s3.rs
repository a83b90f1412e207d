//! S3-compatible object store provider.
//!
//! Works against AWS S3 and MinIO. Download URLs are presigned `GET`
//! requests; extra query parameters are attached before signing so they
//! are covered by the signature.

use std::time::Duration;

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::Client;
use aws_sdk_s3::config::{Credentials, Region};
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{BucketLocationConstraint, CreateBucketConfiguration};
use bytes::Bytes;
use tracing::{debug, info};

use secureshare_core::config::StorageConfig;
use secureshare_core::error::{AppError, ErrorKind};
use secureshare_core::result::AppResult;
use secureshare_core::traits::object_store::{ObjectStore, PresignParams};

use super::encode_query_component;

/// Object store provider over the AWS SDK client.
#[derive(Debug, Clone)]
pub struct S3ObjectStore {
    client: Client,
    bucket: String,
    region: String,
}

fn storage_err<E>(context: String) -> impl FnOnce(E) -> AppError
where
    E: std::error::Error + Send + Sync + 'static,
{
    move |e| {
        let detail = DisplayErrorContext(&e).to_string();
        AppError::with_source(ErrorKind::Storage, format!("{context}: {detail}"), e)
    }
}

impl S3ObjectStore {
    /// Build a client from configuration and make sure the bucket exists.
    pub async fn connect(config: &StorageConfig) -> AppResult<Self> {
        let s3 = &config.s3;
        info!(
            endpoint = %s3.endpoint,
            region = %s3.region,
            bucket = %config.bucket,
            "Initializing S3 object store"
        );

        let credentials = Credentials::new(
            &s3.access_key,
            &s3.secret_key,
            None,
            None,
            "secureshare",
        );
        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(s3.region.clone()))
            .credentials_provider(credentials)
            .load()
            .await;

        let mut builder =
            aws_sdk_s3::config::Builder::from(&sdk_config).force_path_style(s3.force_path_style);
        if !s3.endpoint.is_empty() {
            builder = builder.endpoint_url(&s3.endpoint);
        }

        let store = Self {
            client: Client::from_conf(builder.build()),
            bucket: config.bucket.clone(),
            region: s3.region.clone(),
        };
        if s3.create_bucket {
            store.ensure_bucket().await?;
        }
        Ok(store)
    }

    /// Create the bucket when it does not exist yet.
    async fn ensure_bucket(&self) -> AppResult<()> {
        match self.client.head_bucket().bucket(&self.bucket).send().await {
            Ok(_) => return Ok(()),
            Err(err) => {
                let service_err = err.into_service_error();
                if !service_err.is_not_found() {
                    return Err(storage_err(format!("Failed to probe bucket {}", self.bucket))(
                        service_err,
                    ));
                }
            }
        }

        let mut request = self.client.create_bucket().bucket(&self.bucket);
        if self.region != "us-east-1" {
            request = request.create_bucket_configuration(
                CreateBucketConfiguration::builder()
                    .location_constraint(BucketLocationConstraint::from(self.region.as_str()))
                    .build(),
            );
        }
        request
            .send()
            .await
            .map_err(storage_err(format!("Failed to create bucket {}", self.bucket)))?;

        info!(bucket = %self.bucket, "Created bucket");
        Ok(())
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    fn provider_type(&self) -> &str {
        "s3"
    }

    fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn health_check(&self) -> AppResult<bool> {
        self.client
            .head_bucket()
            .bucket(&self.bucket)
            .send()
            .await
            .map(|_| true)
            .map_err(storage_err(format!("Health check on bucket {} failed", self.bucket)))
    }

    async fn put(&self, key: &str, data: Bytes, content_type: &str) -> AppResult<()> {
        let size = data.len();
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .content_length(size as i64)
            .body(ByteStream::from(data))
            .send()
            .await
            .map_err(storage_err(format!("Failed to put object {key}")))?;

        debug!(key, size, "Stored object");
        Ok(())
    }

    async fn remove(&self, key: &str) -> AppResult<()> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(storage_err(format!("Failed to remove object {key}")))?;

        debug!(key, "Removed object");
        Ok(())
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        match self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
        {
            Ok(_) => Ok(true),
            Err(err) => {
                let service_err = err.into_service_error();
                if service_err.is_not_found() {
                    Ok(false)
                } else {
                    Err(storage_err(format!("Failed to stat object {key}"))(
                        service_err,
                    ))
                }
            }
        }
    }

    async fn presigned_get(
        &self,
        key: &str,
        ttl: Duration,
        extra_params: &PresignParams,
    ) -> AppResult<String> {
        let presigning = PresigningConfig::expires_in(ttl)
            .map_err(storage_err(format!("Invalid presign lifetime for {key}")))?;

        let extra_query = extra_params
            .iter()
            .map(|(k, v)| {
                format!(
                    "{}={}",
                    encode_query_component(k),
                    encode_query_component(v)
                )
            })
            .collect::<Vec<_>>()
            .join("&");

        let request = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .customize()
            .mutate_request(move |req| {
                if extra_query.is_empty() {
                    return;
                }
                let separator = if req.uri().contains('?') { '&' } else { '?' };
                let uri = format!("{}{separator}{extra_query}", req.uri());
                if let Err(e) = req.set_uri(uri) {
                    tracing::warn!(error = %e, "Failed to attach presign parameters");
                }
            })
            .presigned(presigning)
            .await
            .map_err(storage_err(format!("Failed to presign {key}")))?;

        Ok(request.uri().to_string())
    }
}
