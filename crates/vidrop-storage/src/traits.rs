//! Storage abstraction trait
//!
//! This module defines the Storage trait that all storage backends must
//! implement. Presigned URL issuance and listing surface their underlying
//! errors; `upload` and `delete` instead degrade to a boolean so callers at
//! non-critical sites (best-effort cleanup) can pick fallback behavior
//! without an error path.

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use std::time::Duration;
use thiserror::Error;
use vidrop_core::constants::{GENERIC_UPLOAD_PRESIGN_TTL, MEDIA_PRESIGN_TTL};
use vidrop_core::StorageBackend;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("List failed: {0}")]
    ListFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// One object in a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectSummary {
    pub key: String,
    pub size: u64,
    pub last_modified: DateTime<Utc>,
}

/// Storage abstraction trait
///
/// All storage backends (S3, local filesystem) must implement this trait.
/// Handlers work against `Arc<dyn Storage>`, constructed once at process
/// start; backends are never rebuilt per request.
///
/// **Key format:** keys are user-scoped: `users/{user_id}/uploads/{filename}`
/// for direct uploads, `users/{user_id}/{path}` otherwise. See the `keys`
/// module.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Generate a presigned PUT URL authorizing one direct upload to `key`.
    ///
    /// No content type is pinned server-side; the client supplies it with the
    /// PUT request.
    async fn presigned_put_url(&self, key: &str, expires_in: Duration) -> StorageResult<String>;

    /// Generate a presigned GET URL for temporary read access to `key`.
    async fn presigned_get_url(&self, key: &str, expires_in: Duration) -> StorageResult<String>;

    /// Short-lived presigned PUT URL for small ad-hoc uploads.
    async fn generic_upload_url(&self, key: &str) -> StorageResult<String> {
        self.presigned_put_url(key, GENERIC_UPLOAD_PRESIGN_TTL).await
    }

    /// Best-effort upload of `data` to `key`. Logs the underlying error and
    /// returns `false` on failure instead of propagating it.
    async fn upload(&self, key: &str, data: Bytes) -> bool;

    /// Download an object's bytes.
    async fn download(&self, key: &str) -> StorageResult<Bytes>;

    /// Download an object and decode it as UTF-8 text.
    async fn download_string(&self, key: &str) -> StorageResult<String> {
        let bytes = self.download(key).await?;
        String::from_utf8(bytes.to_vec())
            .map_err(|e| StorageError::DownloadFailed(format!("object is not valid UTF-8: {}", e)))
    }

    /// Best-effort delete. Logs the underlying error and returns `false` on
    /// failure; deleting a missing object is a success.
    async fn delete(&self, key: &str) -> bool;

    /// List every object under `prefix` as one logical sequence.
    ///
    /// Pagination is followed transparently until exhausted. The page source
    /// is consumed lazily and is not restartable; calling `list` again
    /// re-executes pagination from the start.
    async fn list(&self, prefix: &str) -> StorageResult<Vec<ObjectSummary>>;

    /// Total size in bytes of all objects under `prefix`.
    ///
    /// Folds page-by-page sizes with the accumulator outside the iteration.
    /// An empty prefix yields 0, not an error.
    async fn usage(&self, prefix: &str) -> StorageResult<u64> {
        let mut total: u64 = 0;
        for object in self.list(prefix).await? {
            total += object.size;
        }
        Ok(total)
    }

    /// First object whose key starts with `prefix`, if any. Cheap existence
    /// probe used to gate media URL issuance.
    async fn first_with_prefix(&self, prefix: &str) -> StorageResult<Option<ObjectSummary>>;

    /// Presigned download URL for the first object under `prefix`, or `None`
    /// when nothing matches.
    ///
    /// The existence probe runs first so callers never hand out URLs to
    /// missing media; matches are issued at the longer media TTL.
    async fn media_download_url(&self, prefix: &str) -> StorageResult<Option<String>> {
        match self.first_with_prefix(prefix).await? {
            Some(object) => {
                let url = self.presigned_get_url(&object.key, MEDIA_PRESIGN_TTL).await?;
                Ok(Some(url))
            }
            None => Ok(None),
        }
    }

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}
