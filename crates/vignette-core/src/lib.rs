//! Vignette Core Library
//!
//! This crate provides the configuration, error metadata, and shared value types
//! used by every Vignette component.

pub mod config;
pub mod error;
pub mod image_mime;
pub mod storage_types;

// Re-export commonly used types
pub use config::{Config, LogFormat};
pub use error::{log_error, ErrorMetadata, LogLevel};
pub use image_mime::ImageMime;
pub use storage_types::StorageBackend;
