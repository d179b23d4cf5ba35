//! Thumbnail pipeline errors

use thiserror::Error;
use vignette_core::{ErrorMetadata, LogLevel};
use vignette_storage::StorageError;

#[derive(Debug, Error)]
pub enum ThumbnailError {
    /// Input bytes are not a decodable raster image
    #[error("Failed to decode image: {0}")]
    DecodeFailure(String),

    /// The image type has no encoder in the supported set
    #[error("Unsupported image format: {0}")]
    UnsupportedFormat(String),

    /// A crop rectangle would extend past the image bounds
    #[error(
        "Crop {crop_width}x{crop_height} does not fit inside {image_width}x{image_height} image"
    )]
    GeometryPrecondition {
        image_width: u32,
        image_height: u32,
        crop_width: u32,
        crop_height: u32,
    },

    #[error("Invalid thumbnail target {width}x{height}: both dimensions must be positive")]
    InvalidTarget { width: u32, height: u32 },

    #[error("Failed to encode {mime} thumbnail: {message}")]
    EncodeFailure { mime: String, message: String },

    #[error("Image {operation} exceeded the {timeout_secs}s deadline")]
    CodecTimeout {
        operation: &'static str,
        timeout_secs: u64,
    },

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<tokio::task::JoinError> for ThumbnailError {
    fn from(err: tokio::task::JoinError) -> Self {
        ThumbnailError::Internal(format!("Image task failed: {}", err))
    }
}

impl ErrorMetadata for ThumbnailError {
    fn error_code(&self) -> &'static str {
        match self {
            ThumbnailError::DecodeFailure(_) => "DECODE_FAILURE",
            ThumbnailError::UnsupportedFormat(_) => "UNSUPPORTED_FORMAT",
            ThumbnailError::GeometryPrecondition { .. } => "GEOMETRY_PRECONDITION",
            ThumbnailError::InvalidTarget { .. } => "INVALID_TARGET",
            ThumbnailError::EncodeFailure { .. } => "ENCODE_FAILURE",
            ThumbnailError::CodecTimeout { .. } => "CODEC_TIMEOUT",
            ThumbnailError::Storage(e) => e.error_code(),
            ThumbnailError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    fn is_recoverable(&self) -> bool {
        match self {
            ThumbnailError::Storage(e) => e.is_recoverable(),
            ThumbnailError::Internal(_) => true,
            _ => false,
        }
    }

    fn log_level(&self) -> LogLevel {
        match self {
            ThumbnailError::DecodeFailure(_)
            | ThumbnailError::UnsupportedFormat(_)
            | ThumbnailError::CodecTimeout { .. } => LogLevel::Warn,
            ThumbnailError::InvalidTarget { .. } => LogLevel::Debug,
            ThumbnailError::Storage(e) => e.log_level(),
            ThumbnailError::GeometryPrecondition { .. }
            | ThumbnailError::EncodeFailure { .. }
            | ThumbnailError::Internal(_) => LogLevel::Error,
        }
    }

    fn client_message(&self) -> String {
        match self {
            ThumbnailError::DecodeFailure(_) => "File is not a readable image".to_string(),
            ThumbnailError::UnsupportedFormat(mime) => {
                format!("Image type {} is not supported", mime)
            }
            ThumbnailError::InvalidTarget { .. } => self.to_string(),
            ThumbnailError::CodecTimeout { .. } => "Image took too long to process".to_string(),
            ThumbnailError::Storage(e) => e.client_message(),
            _ => "Failed to create thumbnail".to_string(),
        }
    }
}
