use crate::traits::{ObjectSummary, Storage, StorageError, StorageResult};
use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;
use http::Method;
use object_store::aws::{AmazonS3, AmazonS3Builder};
use object_store::path::Path;
use object_store::signer::Signer;
use object_store::Error as ObjectStoreError;
use object_store::{ObjectStore, ObjectStoreExt, PutPayload, Result as ObjectResult};
use std::time::Duration;
use vidrop_core::StorageBackend;

/// S3 storage implementation
#[derive(Clone)]
pub struct S3Storage {
    store: AmazonS3,
    bucket: String,
}

impl S3Storage {
    /// Create a new S3Storage instance
    ///
    /// # Arguments
    /// * `bucket` - S3 bucket name
    /// * `region` - AWS region (or region identifier for S3-compatible providers)
    /// * `endpoint_url` - Optional custom endpoint URL for S3-compatible providers
    ///   (e.g., "http://localhost:9000" for MinIO)
    pub async fn new(
        bucket: String,
        region: String,
        endpoint_url: Option<String>,
    ) -> StorageResult<Self> {
        // Build AmazonS3 object store from environment and explicit settings.
        let mut builder = AmazonS3Builder::from_env()
            .with_region(region)
            .with_bucket_name(bucket.clone());

        if let Some(ref endpoint) = endpoint_url {
            let allow_http = endpoint.starts_with("http://");
            builder = builder
                .with_endpoint(endpoint.clone())
                .with_allow_http(allow_http);
        }

        let store = builder
            .build()
            .map_err(|e| StorageError::ConfigError(e.to_string()))?;

        Ok(S3Storage { store, bucket })
    }

    /// Objects whose keys start with `prefix`, matched on the raw string.
    ///
    /// `object_store` evaluates listing prefixes per path segment, while
    /// callers pass S3-style string prefixes that may end mid-filename. The
    /// listing therefore starts from the last segment boundary and filters
    /// the remainder here.
    fn list_stream<'a>(
        &'a self,
        prefix: &'a str,
    ) -> impl futures::Stream<Item = StorageResult<ObjectSummary>> + 'a {
        let parent = prefix.rfind('/').map(|idx| Path::from(&prefix[..idx]));

        self.store
            .list(parent.as_ref())
            .filter_map(move |entry| async move {
                match entry {
                    Ok(meta) => {
                        let key = meta.location.to_string();
                        key.starts_with(prefix).then_some(Ok(ObjectSummary {
                            key,
                            size: meta.size,
                            last_modified: meta.last_modified,
                        }))
                    }
                    Err(e) => Some(Err(StorageError::ListFailed(e.to_string()))),
                }
            })
    }
}

#[async_trait]
impl Storage for S3Storage {
    async fn presigned_put_url(&self, key: &str, expires_in: Duration) -> StorageResult<String> {
        let location = Path::from(key);
        let url_result: ObjectResult<_> = self
            .store
            .signed_url(Method::PUT, &location, expires_in)
            .await;

        let url = url_result
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    bucket = %self.bucket,
                    key = %key,
                    "S3 presigned PUT URL generation failed"
                );
                StorageError::BackendError(e.to_string())
            })?
            .to_string();

        Ok(url)
    }

    async fn presigned_get_url(&self, key: &str, expires_in: Duration) -> StorageResult<String> {
        let location = Path::from(key);
        let url_result: ObjectResult<_> = self
            .store
            .signed_url(Method::GET, &location, expires_in)
            .await;

        let url = url_result
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    bucket = %self.bucket,
                    key = %key,
                    "S3 presigned GET URL generation failed"
                );
                StorageError::BackendError(e.to_string())
            })?
            .to_string();

        Ok(url)
    }

    async fn upload(&self, key: &str, data: Bytes) -> bool {
        let size = data.len() as u64;
        let location = Path::from(key);
        let start = std::time::Instant::now();

        let result: ObjectResult<_> = self.store.put(&location, PutPayload::from(data)).await;

        match result {
            Ok(_) => {
                tracing::info!(
                    bucket = %self.bucket,
                    key = %key,
                    size_bytes = size,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "S3 upload successful"
                );
                true
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    bucket = %self.bucket,
                    key = %key,
                    size_bytes = size,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "S3 upload failed"
                );
                false
            }
        }
    }

    async fn download(&self, key: &str) -> StorageResult<Bytes> {
        let start = std::time::Instant::now();
        let location = Path::from(key);

        let result: ObjectResult<_> = self.store.get(&location).await;

        let result = result.map_err(|e| match e {
            ObjectStoreError::NotFound { .. } => StorageError::NotFound(key.to_string()),
            other => {
                tracing::error!(
                    error = %other,
                    bucket = %self.bucket,
                    key = %key,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "S3 download failed"
                );
                StorageError::DownloadFailed(other.to_string())
            }
        })?;

        let bytes = result
            .bytes()
            .await
            .map_err(|e| StorageError::DownloadFailed(e.to_string()))?;

        tracing::info!(
            bucket = %self.bucket,
            key = %key,
            size_bytes = bytes.len() as u64,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 download successful"
        );

        Ok(bytes)
    }

    async fn delete(&self, key: &str) -> bool {
        let start = std::time::Instant::now();
        let location = Path::from(key);

        let result: ObjectResult<_> = self.store.delete(&location).await;

        match result {
            Ok(_) | Err(ObjectStoreError::NotFound { .. }) => {
                tracing::info!(
                    bucket = %self.bucket,
                    key = %key,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "S3 delete successful"
                );
                true
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    bucket = %self.bucket,
                    key = %key,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "S3 delete failed"
                );
                false
            }
        }
    }

    async fn list(&self, prefix: &str) -> StorageResult<Vec<ObjectSummary>> {
        let start = std::time::Instant::now();
        let mut objects = Vec::new();
        let mut stream = std::pin::pin!(self.list_stream(prefix));

        // The stream yields pages lazily and cannot be restarted; collect
        // into the external accumulator until it ends.
        while let Some(entry) = stream.next().await {
            objects.push(entry?);
        }

        tracing::debug!(
            bucket = %self.bucket,
            prefix = %prefix,
            count = objects.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 list complete"
        );

        Ok(objects)
    }

    async fn usage(&self, prefix: &str) -> StorageResult<u64> {
        let mut total: u64 = 0;
        let mut stream = std::pin::pin!(self.list_stream(prefix));

        while let Some(entry) = stream.next().await {
            total += entry?.size;
        }

        Ok(total)
    }

    async fn first_with_prefix(&self, prefix: &str) -> StorageResult<Option<ObjectSummary>> {
        let mut stream = std::pin::pin!(self.list_stream(prefix));
        stream.next().await.transpose()
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::S3
    }
}
