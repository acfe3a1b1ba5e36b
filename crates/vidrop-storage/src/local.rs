use crate::traits::{ObjectSummary, Storage, StorageError, StorageResult};
use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use vidrop_core::StorageBackend;

/// Local filesystem storage implementation
///
/// Used for development and tests. "Presigned" URLs are plain URLs under the
/// configured base URL; there is no signature to verify locally.
#[derive(Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
    base_url: String,
}

impl LocalStorage {
    /// Create a new LocalStorage instance
    ///
    /// # Arguments
    /// * `base_path` - Root directory for file storage (e.g., "/var/lib/vidrop/objects")
    /// * `base_url` - Base URL for serving files (e.g., "http://localhost:3000/objects")
    pub async fn new(base_path: impl Into<PathBuf>, base_url: String) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalStorage {
            base_path,
            base_url,
        })
    }

    /// Convert storage key to filesystem path with security validation
    ///
    /// Keys with traversal sequences or absolute components would escape the
    /// base directory; they are rejected before any filesystem access.
    fn key_to_path(&self, key: &str) -> StorageResult<PathBuf> {
        if key.contains("..") || key.starts_with('/') || key.contains('\\') {
            return Err(StorageError::InvalidKey(
                "Storage key contains invalid characters".to_string(),
            ));
        }

        Ok(self.base_path.join(key))
    }

    /// Relative key for a file inside the base directory.
    fn path_to_key(&self, path: &Path) -> Option<String> {
        path.strip_prefix(&self.base_path)
            .ok()
            .map(|relative| relative.to_string_lossy().into_owned())
    }

    fn url_for(&self, key: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), key)
    }

    /// Ensure parent directory exists
    async fn ensure_parent_dir(&self, path: &Path) -> StorageResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        Ok(())
    }

    async fn write_object(&self, key: &str, data: &[u8]) -> StorageResult<()> {
        let path = self.key_to_path(key)?;
        self.ensure_parent_dir(&path).await?;

        let mut file = fs::File::create(&path).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to create file {}: {}", path.display(), e))
        })?;

        file.write_all(data).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to write file {}: {}", path.display(), e))
        })?;

        file.sync_all().await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to sync file {}: {}", path.display(), e))
        })?;

        Ok(())
    }

    /// Every regular file under the base directory, found with an iterative
    /// walk over a pending-directory stack.
    async fn walk_files(&self) -> StorageResult<Vec<PathBuf>> {
        let mut files = Vec::new();
        let mut pending = vec![self.base_path.clone()];

        while let Some(dir) = pending.pop() {
            let mut entries = fs::read_dir(&dir).await?;
            while let Some(entry) = entries.next_entry().await? {
                let file_type = entry.file_type().await?;
                if file_type.is_dir() {
                    pending.push(entry.path());
                } else if file_type.is_file() {
                    files.push(entry.path());
                }
            }
        }

        Ok(files)
    }
}

#[async_trait]
impl Storage for LocalStorage {
    async fn presigned_put_url(&self, key: &str, _expires_in: Duration) -> StorageResult<String> {
        self.key_to_path(key)?;
        Ok(self.url_for(key))
    }

    async fn presigned_get_url(&self, key: &str, _expires_in: Duration) -> StorageResult<String> {
        self.key_to_path(key)?;
        Ok(self.url_for(key))
    }

    async fn upload(&self, key: &str, data: Bytes) -> bool {
        let size = data.len();
        let start = std::time::Instant::now();

        match self.write_object(key, &data).await {
            Ok(()) => {
                tracing::info!(
                    key = %key,
                    size_bytes = size,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Local storage upload successful"
                );
                true
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    key = %key,
                    size_bytes = size,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Local storage upload failed"
                );
                false
            }
        }
    }

    async fn download(&self, key: &str) -> StorageResult<Bytes> {
        let path = self.key_to_path(key)?;
        let start = std::time::Instant::now();

        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Err(StorageError::NotFound(key.to_string()));
        }

        let data = fs::read(&path).await.map_err(|e| {
            StorageError::DownloadFailed(format!("Failed to read file {}: {}", path.display(), e))
        })?;

        tracing::info!(
            path = %path.display(),
            key = %key,
            size_bytes = data.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage download successful"
        );

        Ok(Bytes::from(data))
    }

    async fn delete(&self, key: &str) -> bool {
        let path = match self.key_to_path(key) {
            Ok(path) => path,
            Err(e) => {
                tracing::error!(error = %e, key = %key, "Local storage delete rejected");
                return false;
            }
        };

        if !fs::try_exists(&path).await.unwrap_or(false) {
            return true;
        }

        match fs::remove_file(&path).await {
            Ok(()) => {
                tracing::info!(key = %key, "Local storage delete successful");
                true
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    path = %path.display(),
                    key = %key,
                    "Local storage delete failed"
                );
                false
            }
        }
    }

    async fn list(&self, prefix: &str) -> StorageResult<Vec<ObjectSummary>> {
        let mut objects = Vec::new();

        for path in self.walk_files().await? {
            let Some(key) = self.path_to_key(&path) else {
                continue;
            };
            if !key.starts_with(prefix) {
                continue;
            }

            let meta = fs::metadata(&path).await?;
            let last_modified = meta
                .modified()
                .map(DateTime::<Utc>::from)
                .unwrap_or_else(|_| Utc::now());

            objects.push(ObjectSummary {
                key,
                size: meta.len(),
                last_modified,
            });
        }

        // Object stores list keys in lexicographic order; match it so both
        // backends page identically.
        objects.sort_by(|a, b| a.key.cmp(&b.key));

        Ok(objects)
    }

    async fn first_with_prefix(&self, prefix: &str) -> StorageResult<Option<ObjectSummary>> {
        Ok(self.list(prefix).await?.into_iter().next())
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}
