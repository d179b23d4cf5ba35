//! Configuration module
//!
//! Settings for storage, thumbnail defaults, codec limits and logging, read
//! from the environment (and a `.env` file when present).

use std::env;

use crate::storage_types::StorageBackend;

const THUMBNAIL_WIDTH: u32 = 200;
const THUMBNAIL_HEIGHT: u32 = 200;
const JPEG_QUALITY: u8 = 85;
const WEBP_QUALITY: f32 = 80.0;
const CODEC_TIMEOUT_SECS: u64 = 30;
const MAX_IMAGE_DIMENSION: u32 = 16_384;
const MAX_DECODE_ALLOC_MB: u64 = 512;
const LOCAL_STORAGE_PATH: &str = "./storage";

/// Log output format for the subscriber installed by binaries
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub environment: String,
    // Storage configuration
    pub storage_backend: StorageBackend,
    pub local_storage_path: String,
    pub s3_bucket: Option<String>,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>, // Custom endpoint for S3-compatible providers (MinIO, etc.)
    pub aws_region: Option<String>,
    // Thumbnail defaults
    pub thumbnail_width: u32,
    pub thumbnail_height: u32,
    // Codec configuration
    pub jpeg_quality: u8,
    pub webp_quality: f32,
    pub codec_timeout_secs: u64,
    pub max_image_dimension: u32,
    pub max_decode_alloc_bytes: u64,
    pub log_format: LogFormat,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary variable source.
    ///
    /// Unset variables fall back to defaults; set but malformed numeric
    /// variables are an error rather than being silently replaced.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = lookup("ENVIRONMENT")
            .or_else(|| lookup("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let storage_backend = match lookup("STORAGE_BACKEND") {
            Some(raw) => raw.parse::<StorageBackend>()?,
            None => StorageBackend::Local,
        };

        let log_format = match lookup("VIGNETTE_LOG_FORMAT")
            .map(|s| s.trim().to_lowercase())
            .as_deref()
        {
            None | Some("") | Some("text") | Some("pretty") => LogFormat::Text,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(anyhow::anyhow!(
                    "VIGNETTE_LOG_FORMAT must be 'text' or 'json', got '{}'",
                    other
                ))
            }
        };

        let max_decode_alloc_mb: u64 =
            parse_or(&lookup, "MAX_DECODE_ALLOC_MB", MAX_DECODE_ALLOC_MB)?;
        let max_decode_alloc_bytes = max_decode_alloc_mb
            .checked_mul(1024 * 1024)
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "MAX_DECODE_ALLOC_MB is too large: {}",
                    max_decode_alloc_mb
                )
            })?;

        let config = Config {
            environment,
            storage_backend,
            local_storage_path: lookup("LOCAL_STORAGE_PATH")
                .unwrap_or_else(|| LOCAL_STORAGE_PATH.to_string()),
            s3_bucket: lookup("S3_BUCKET"),
            s3_region: lookup("S3_REGION"),
            s3_endpoint: lookup("S3_ENDPOINT"),
            aws_region: lookup("AWS_REGION"),
            thumbnail_width: parse_or(&lookup, "THUMBNAIL_WIDTH", THUMBNAIL_WIDTH)?,
            thumbnail_height: parse_or(&lookup, "THUMBNAIL_HEIGHT", THUMBNAIL_HEIGHT)?,
            jpeg_quality: parse_or(&lookup, "JPEG_QUALITY", JPEG_QUALITY)?,
            webp_quality: parse_or(&lookup, "WEBP_QUALITY", WEBP_QUALITY)?,
            codec_timeout_secs: parse_or(&lookup, "VIGNETTE_CODEC_TIMEOUT_SECS", CODEC_TIMEOUT_SECS)?,
            max_image_dimension: parse_or(&lookup, "MAX_IMAGE_DIMENSION", MAX_IMAGE_DIMENSION)?,
            max_decode_alloc_bytes,
            log_format,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.thumbnail_width == 0 || self.thumbnail_height == 0 {
            return Err(anyhow::anyhow!(
                "THUMBNAIL_WIDTH and THUMBNAIL_HEIGHT must be greater than zero"
            ));
        }

        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(anyhow::anyhow!("JPEG_QUALITY must be between 1 and 100"));
        }

        if !(0.0..=100.0).contains(&self.webp_quality) {
            return Err(anyhow::anyhow!("WEBP_QUALITY must be between 0 and 100"));
        }

        if self.codec_timeout_secs == 0 {
            return Err(anyhow::anyhow!(
                "VIGNETTE_CODEC_TIMEOUT_SECS must be greater than zero"
            ));
        }

        if self.storage_backend == StorageBackend::S3 {
            if self.s3_bucket.is_none() {
                return Err(anyhow::anyhow!("STORAGE_BACKEND=s3 requires S3_BUCKET"));
            }
            if self.s3_region.is_none() && self.aws_region.is_none() {
                return Err(anyhow::anyhow!(
                    "STORAGE_BACKEND=s3 requires S3_REGION or AWS_REGION"
                ));
            }
        }

        Ok(())
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    /// S3 region, preferring the storage-specific setting over the AWS default
    pub fn s3_effective_region(&self) -> Option<&str> {
        self.s3_region.as_deref().or(self.aws_region.as_deref())
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, anyhow::Error>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<T>()
            .map_err(|_| anyhow::anyhow!("{} must be a valid number, got '{}'", key, raw)),
        _ => Ok(default),
    }
}
