//! Storage abstraction trait

use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use gallery_core::AppError;
use std::pin::Pin;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

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

/// Chunked file contents.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, StorageError>> + Send>>;

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(key) => AppError::NotFound(format!("File {} not found", key)),
            StorageError::InvalidKey(msg) => AppError::BadRequest(msg),
            other => AppError::Storage(other.to_string()),
        }
    }
}

/// Client for the store holding media bytes.
///
/// Handlers only ever see `Arc<dyn Storage>`, so the backend is chosen once at startup.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Write `data` under `storage_key`, replacing any existing file.
    async fn put(&self, storage_key: &str, content_type: &str, data: Vec<u8>) -> StorageResult<()>;

    /// Download a file by its storage key
    async fn download(&self, storage_key: &str) -> StorageResult<Vec<u8>>;

    /// Download a file as a stream of chunks
    async fn download_stream(&self, storage_key: &str) -> StorageResult<ByteStream>;

    /// Delete a file; deleting a missing file succeeds
    async fn delete(&self, storage_key: &str) -> StorageResult<()>;

    /// Check if a file exists
    async fn exists(&self, storage_key: &str) -> StorageResult<bool>;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}

#[cfg(test)]
mod tests {
    use super::*;
    use gallery_core::ErrorMetadata;

    #[test]
    fn test_storage_error_to_app_error() {
        let err: AppError = StorageError::NotFound("1/img.jpg".to_string()).into();
        assert_eq!(err.http_status_code(), 404);

        let err: AppError = StorageError::InvalidKey("bad".to_string()).into();
        assert_eq!(err.http_status_code(), 400);

        let err: AppError = StorageError::DownloadFailed("timeout".to_string()).into();
        assert_eq!(err.error_code(), "STORAGE_ERROR");
    }
}
