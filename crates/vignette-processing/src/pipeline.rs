//! Thumbnail pipeline: persist an upload and a center-cropped thumbnail of it.
//!
//! Each call walks the stages in [`PipelineStage`] order. Pixel work runs on
//! the blocking pool under the configured codec deadline; storage goes through
//! the injected [`BlobStore`].

use crate::codec::{self, DecodeLimits, EncodeOptions, SourceImage};
use crate::error::ThumbnailError;
use crate::filename::{self, Clock, SystemClock};
use crate::geometry::{self, ThumbnailPlan};
use crate::resize::ImageResize;
use crate::upload::UploadedFile;
use image::DynamicImage;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use vignette_core::{Config, ErrorMetadata, ImageMime};
use vignette_storage::{original_key, thumbnail_key, BlobStore};

/// Progress of one thumbnail run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Received,
    Decoded,
    Resized,
    Cropped,
    Encoded,
    PersistedOriginal,
    PersistedThumbnail,
    Verified,
    Failed,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineStage::Received => "received",
            PipelineStage::Decoded => "decoded",
            PipelineStage::Resized => "resized",
            PipelineStage::Cropped => "cropped",
            PipelineStage::Encoded => "encoded",
            PipelineStage::PersistedOriginal => "persisted_original",
            PipelineStage::PersistedThumbnail => "persisted_thumbnail",
            PipelineStage::Verified => "verified",
            PipelineStage::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Codec settings shared by every run of a pipeline
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThumbnailOptions {
    pub encode: EncodeOptions,
    pub limits: DecodeLimits,
    pub codec_timeout: Duration,
}

impl Default for ThumbnailOptions {
    fn default() -> Self {
        Self {
            encode: EncodeOptions::default(),
            limits: DecodeLimits::default(),
            codec_timeout: Duration::from_secs(30),
        }
    }
}

impl ThumbnailOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            encode: EncodeOptions::from_config(config),
            limits: DecodeLimits::from_config(config),
            codec_timeout: Duration::from_secs(config.codec_timeout_secs),
        }
    }
}

pub struct ThumbnailPipeline {
    store: Arc<dyn BlobStore>,
    clock: Arc<dyn Clock>,
    options: ThumbnailOptions,
}

impl ThumbnailPipeline {
    pub fn new(store: Arc<dyn BlobStore>, clock: Arc<dyn Clock>, options: ThumbnailOptions) -> Self {
        Self {
            store,
            clock,
            options,
        }
    }

    /// Pipeline on the system clock with codec settings taken from `config`.
    pub fn from_config(store: Arc<dyn BlobStore>, config: &Config) -> Self {
        Self::new(
            store,
            Arc::new(SystemClock),
            ThumbnailOptions::from_config(config),
        )
    }

    pub fn store(&self) -> &Arc<dyn BlobStore> {
        &self.store
    }

    pub fn options(&self) -> &ThumbnailOptions {
        &self.options
    }

    pub fn generate_filename(&self, upload: &UploadedFile) -> String {
        filename::generate_filename(self.clock.as_ref(), upload)
    }

    /// Store `upload` and a `width` x `height` thumbnail of it under a freshly
    /// generated name.
    ///
    /// Returns true only when both blobs exist afterwards. Failures are
    /// logged, not returned; an original written before a thumbnail failure
    /// stays in place.
    pub async fn store_and_thumbnail(&self, upload: &UploadedFile, width: u32, height: u32) -> bool {
        let name = self.generate_filename(upload);
        self.store_and_thumbnail_as(upload, &name, width, height)
            .await
    }

    /// [`store_and_thumbnail`](Self::store_and_thumbnail) with a caller-chosen name.
    #[tracing::instrument(
        skip(self, upload),
        fields(
            original_name = %upload.original_name,
            size_bytes = upload.len(),
            operation = "store_and_thumbnail"
        )
    )]
    pub async fn store_and_thumbnail_as(
        &self,
        upload: &UploadedFile,
        name: &str,
        width: u32,
        height: u32,
    ) -> bool {
        let start = Instant::now();

        if width == 0 || height == 0 {
            let err = ThumbnailError::InvalidTarget { width, height };
            tracing::warn!(
                stage = %PipelineStage::Failed,
                code = err.error_code(),
                error = %err,
                "Rejected thumbnail request before storing anything"
            );
            return false;
        }

        let original = original_key(name);
        let thumbnail = thumbnail_key(name);

        match self.store.put(&original, upload.bytes.clone()).await {
            Ok(()) => {
                tracing::debug!(
                    stage = %PipelineStage::PersistedOriginal,
                    key = %original,
                    "Original stored"
                );
                if let Err(e) = self.create_thumbnail(upload, width, height, name).await {
                    tracing::warn!(
                        code = e.error_code(),
                        error = %e,
                        key = %thumbnail,
                        "Thumbnail not created; original left in place"
                    );
                }
            }
            Err(e) => {
                tracing::warn!(
                    stage = %PipelineStage::Failed,
                    code = e.error_code(),
                    error = %e,
                    key = %original,
                    "Failed to store original image"
                );
            }
        }

        let verified = self.blob_exists(&original).await && self.blob_exists(&thumbnail).await;
        let duration_ms = start.elapsed().as_millis() as u64;

        if verified {
            tracing::info!(
                stage = %PipelineStage::Verified,
                name = %name,
                duration_ms = duration_ms,
                "Image and thumbnail stored"
            );
        } else {
            tracing::warn!(
                stage = %PipelineStage::Failed,
                name = %name,
                duration_ms = duration_ms,
                "Image and thumbnail could not both be verified"
            );
        }

        verified
    }

    /// Decode `upload`, cut a `width` x `height` center thumbnail in the same
    /// format and store it at `images/thumbnails/<name>`.
    ///
    /// Nothing is written unless every step before the final put succeeds.
    pub async fn create_thumbnail(
        &self,
        upload: &UploadedFile,
        width: u32,
        height: u32,
        name: &str,
    ) -> Result<(), ThumbnailError> {
        let start = Instant::now();
        let mut stage = PipelineStage::Received;

        let result = self
            .run_thumbnail(upload, width, height, name, &mut stage)
            .await;

        match &result {
            Ok(()) => tracing::info!(
                stage = %stage,
                key = %thumbnail_key(name),
                width = width,
                height = height,
                duration_ms = start.elapsed().as_millis() as u64,
                "Thumbnail created"
            ),
            Err(e) => tracing::warn!(
                stage = %stage,
                code = e.error_code(),
                error = %e,
                name = %name,
                "Thumbnail generation failed"
            ),
        }

        result
    }

    /// Encode `img` as `mime` and store it as the thumbnail for `name`.
    ///
    /// An unsupported `mime` fails before anything is encoded or written.
    pub async fn save_image_to_storage(
        &self,
        img: &DynamicImage,
        name: &str,
        mime: &str,
    ) -> Result<(), ThumbnailError> {
        let mut stage = PipelineStage::Cropped;
        let mime = ImageMime::from_mime(mime);
        self.encode_and_put(img.clone(), name, mime, &mut stage)
            .await
    }

    async fn run_thumbnail(
        &self,
        upload: &UploadedFile,
        width: u32,
        height: u32,
        name: &str,
        stage: &mut PipelineStage,
    ) -> Result<(), ThumbnailError> {
        if width == 0 || height == 0 {
            return Err(ThumbnailError::InvalidTarget { width, height });
        }

        let bytes = upload.bytes.clone();
        let limits = self.options.limits;
        let source: SourceImage = self
            .run_blocking("decode", move || codec::decode(&bytes, limits))
            .await?;
        *stage = PipelineStage::Decoded;

        let plan: ThumbnailPlan =
            geometry::plan_thumbnail(source.width, source.height, width, height)?;
        tracing::debug!(
            natural_width = source.width,
            natural_height = source.height,
            resize_width = plan.resize_width,
            resize_height = plan.resize_height,
            crop_x = plan.crop.x,
            crop_y = plan.crop.y,
            "Thumbnail planned"
        );

        let image = source.image;
        let resized = self
            .run_blocking("resize", move || {
                Ok(ImageResize::resize_exact(
                    &image,
                    plan.resize_width,
                    plan.resize_height,
                ))
            })
            .await?;
        *stage = PipelineStage::Resized;

        let cropped = ImageResize::crop(&resized, plan.crop);
        *stage = PipelineStage::Cropped;

        self.encode_and_put(cropped, name, source.mime, stage)
            .await
    }

    async fn encode_and_put(
        &self,
        image: DynamicImage,
        name: &str,
        mime: ImageMime,
        stage: &mut PipelineStage,
    ) -> Result<(), ThumbnailError> {
        if !mime.is_supported() {
            return Err(ThumbnailError::UnsupportedFormat(mime.as_mime().to_string()));
        }

        let options = self.options.encode;
        let encoded = self
            .run_blocking("encode", move || codec::encode(&image, &mime, &options))
            .await?;
        *stage = PipelineStage::Encoded;

        self.store.put(&thumbnail_key(name), encoded).await?;
        *stage = PipelineStage::PersistedThumbnail;
        Ok(())
    }

    /// Run CPU-bound image work off the async pool, bounded by the codec deadline.
    ///
    /// On timeout the blocking task is abandoned and runs to completion unobserved.
    async fn run_blocking<T, F>(&self, operation: &'static str, work: F) -> Result<T, ThumbnailError>
    where
        F: FnOnce() -> Result<T, ThumbnailError> + Send + 'static,
        T: Send + 'static,
    {
        let deadline = self.options.codec_timeout;
        match tokio::time::timeout(deadline, tokio::task::spawn_blocking(work)).await {
            Ok(joined) => joined?,
            Err(_) => Err(ThumbnailError::CodecTimeout {
                operation,
                timeout_secs: deadline.as_secs(),
            }),
        }
    }

    async fn blob_exists(&self, key: &str) -> bool {
        match self.store.exists(key).await {
            Ok(exists) => exists,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Existence check failed");
                false
            }
        }
    }
}
