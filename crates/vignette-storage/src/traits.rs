//! Blob store abstraction trait
//!
//! This module defines the BlobStore trait that all storage backends must implement.

use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;
use vignette_core::{ErrorMetadata, LogLevel};

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

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

impl ErrorMetadata for StorageError {
    fn error_code(&self) -> &'static str {
        match self {
            StorageError::UploadFailed(_) => "STORAGE_UPLOAD_FAILED",
            StorageError::DownloadFailed(_) => "STORAGE_DOWNLOAD_FAILED",
            StorageError::NotFound(_) => "STORAGE_NOT_FOUND",
            StorageError::InvalidKey(_) => "STORAGE_INVALID_KEY",
            StorageError::BackendError(_) => "STORAGE_BACKEND_ERROR",
            StorageError::IoError(_) => "STORAGE_IO_ERROR",
            StorageError::ConfigError(_) => "STORAGE_CONFIG_ERROR",
        }
    }

    fn is_recoverable(&self) -> bool {
        matches!(
            self,
            StorageError::UploadFailed(_)
                | StorageError::DownloadFailed(_)
                | StorageError::BackendError(_)
                | StorageError::IoError(_)
        )
    }

    fn log_level(&self) -> LogLevel {
        match self {
            StorageError::NotFound(_) | StorageError::InvalidKey(_) => LogLevel::Debug,
            _ => LogLevel::Error,
        }
    }

    fn client_message(&self) -> String {
        match self {
            StorageError::InvalidKey(msg) => format!("Invalid file name: {}", msg),
            StorageError::NotFound(key) => format!("File not found: {}", key),
            _ => "Failed to access storage".to_string(),
        }
    }
}

/// Blob store abstraction
///
/// The pipeline only needs whole-object writes, reads and existence checks
/// under caller-chosen keys. Writes to an existing key overwrite it.
/// Implementations must be safe for concurrent writes to distinct keys.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Write `data` under `key`, replacing any existing object
    async fn put(&self, key: &str, data: Bytes) -> StorageResult<()>;

    /// Read the object stored under `key`
    async fn get(&self, key: &str) -> StorageResult<Bytes>;

    /// Check if an object exists under `key`
    async fn exists(&self, key: &str) -> StorageResult<bool>;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}
