//! Vignette Processing Library
//!
//! Turns an uploaded image into a stored original plus a center-cropped
//! thumbnail in the same format. The pieces are usable on their own:
//!
//! - [`geometry`]: resize and crop arithmetic, no pixels involved
//! - [`resize`]: pixel resampling and cropping
//! - [`codec`]: format detection, bounded decoding, encoding
//! - [`filename`]: timestamped storage names from an injected [`Clock`]
//! - [`pipeline`]: the end-to-end store-and-thumbnail flow

pub mod codec;
pub mod error;
pub mod filename;
pub mod geometry;
pub mod pipeline;
pub mod resize;
pub mod upload;

pub use codec::{decode, detect_mime, encode, DecodeLimits, EncodeOptions, SourceImage};
pub use error::ThumbnailError;
pub use filename::{generate_filename, Clock, FixedClock, SystemClock};
pub use geometry::{center_crop_rect, plan_thumbnail, resize_dimension_for, CropRect, ThumbnailPlan};
pub use pipeline::{PipelineStage, ThumbnailOptions, ThumbnailPipeline};
pub use resize::ImageResize;
pub use upload::UploadedFile;
pub use vignette_core::ImageMime;
