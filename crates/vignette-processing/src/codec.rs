//! Decode and encode glue between raw upload bytes and pixel buffers.
//!
//! Decoding sniffs the real format from the content and records it as an
//! [`ImageMime`]; encoding writes a buffer back out in one of the five
//! supported formats and never converts between families.

use crate::error::ThumbnailError;
use bytes::Bytes;
use image::codecs::bmp::BmpEncoder;
use image::codecs::gif::GifEncoder;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{ColorType, DynamicImage, Frame, GenericImageView, ImageError, ImageReader, Limits};
use std::io::Cursor;
use vignette_core::{Config, ImageMime};

/// Largest width or height libwebp can encode
pub const WEBP_MAX_DIMENSION: u32 = 16_383;

/// A decoded upload
#[derive(Debug, Clone)]
pub struct SourceImage {
    pub image: DynamicImage,
    pub mime: ImageMime,
    pub width: u32,
    pub height: u32,
}

/// Bounds applied while decoding untrusted input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeLimits {
    pub max_dimension: u32,
    pub max_alloc_bytes: u64,
}

impl Default for DecodeLimits {
    fn default() -> Self {
        Self {
            max_dimension: 16_384,
            max_alloc_bytes: 512 * 1024 * 1024,
        }
    }
}

impl DecodeLimits {
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_dimension: config.max_image_dimension,
            max_alloc_bytes: config.max_decode_alloc_bytes,
        }
    }

    fn to_image_limits(self) -> Limits {
        let mut limits = Limits::default();
        limits.max_image_width = Some(self.max_dimension);
        limits.max_image_height = Some(self.max_dimension);
        limits.max_alloc = Some(self.max_alloc_bytes);
        limits
    }
}

/// Quality knobs for the lossy encoders
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EncodeOptions {
    pub jpeg_quality: u8,
    pub webp_quality: f32,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            jpeg_quality: 85,
            webp_quality: 80.0,
        }
    }
}

impl EncodeOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            jpeg_quality: config.jpeg_quality,
            webp_quality: config.webp_quality,
        }
    }
}

/// Detect the MIME type of `data` from its content, without decoding pixels.
pub fn detect_mime(data: &[u8]) -> Option<ImageMime> {
    image::guess_format(data)
        .ok()
        .map(|format| ImageMime::from_mime(format.to_mime_type()))
}

/// Decode `data` into a [`SourceImage`].
///
/// Formats outside the supported five fail with `UnsupportedFormat`; bytes that
/// are not an image, or exceed `limits`, fail with `DecodeFailure`.
pub fn decode(data: &[u8], limits: DecodeLimits) -> Result<SourceImage, ThumbnailError> {
    let mut reader = ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| ThumbnailError::DecodeFailure(e.to_string()))?;

    let format = reader.format().ok_or_else(|| {
        ThumbnailError::DecodeFailure("unrecognized image data".to_string())
    })?;
    let mime = ImageMime::from_mime(format.to_mime_type());
    if !mime.is_supported() {
        return Err(ThumbnailError::UnsupportedFormat(mime.as_mime().to_string()));
    }

    reader.limits(limits.to_image_limits());
    let image = reader.decode().map_err(|e| match e {
        ImageError::Unsupported(u) => ThumbnailError::UnsupportedFormat(u.to_string()),
        other => ThumbnailError::DecodeFailure(other.to_string()),
    })?;

    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(ThumbnailError::DecodeFailure(format!(
            "image has empty dimensions {}x{}",
            width, height
        )));
    }

    tracing::debug!(
        mime = %mime,
        width = width,
        height = height,
        size_bytes = data.len(),
        "Image decoded"
    );

    Ok(SourceImage {
        image,
        mime,
        width,
        height,
    })
}

/// Encode `img` as `mime`.
pub fn encode(
    img: &DynamicImage,
    mime: &ImageMime,
    options: &EncodeOptions,
) -> Result<Bytes, ThumbnailError> {
    let (width, height) = img.dimensions();
    let estimated_size = (width as usize) * (height as usize) * 3;
    let mut buffer = Vec::with_capacity(estimated_size);

    let encode_err = |e: ImageError| ThumbnailError::EncodeFailure {
        mime: mime.as_mime().to_string(),
        message: e.to_string(),
    };

    match mime {
        ImageMime::Jpeg => {
            let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
            let encoder = JpegEncoder::new_with_quality(&mut buffer, options.jpeg_quality);
            rgb.write_with_encoder(encoder).map_err(encode_err)?;
        }
        ImageMime::Png => {
            let png_ready = match img.color() {
                ColorType::Rgb32F | ColorType::Rgba32F => DynamicImage::ImageRgba16(img.to_rgba16()),
                _ => img.clone(),
            };
            png_ready
                .write_with_encoder(PngEncoder::new(&mut buffer))
                .map_err(encode_err)?;
        }
        ImageMime::Bmp => {
            let bmp_ready = if img.color().has_alpha() {
                DynamicImage::ImageRgba8(img.to_rgba8())
            } else {
                DynamicImage::ImageRgb8(img.to_rgb8())
            };
            bmp_ready
                .write_with_encoder(BmpEncoder::new(&mut buffer))
                .map_err(encode_err)?;
        }
        ImageMime::Gif => {
            // Single frame only; the encoder writes the trailer when dropped
            let mut encoder = GifEncoder::new(&mut buffer);
            encoder
                .encode_frame(Frame::new(img.to_rgba8()))
                .map_err(encode_err)?;
            drop(encoder);
        }
        ImageMime::WebP => {
            if width > WEBP_MAX_DIMENSION || height > WEBP_MAX_DIMENSION {
                return Err(ThumbnailError::EncodeFailure {
                    mime: mime.as_mime().to_string(),
                    message: format!(
                        "{}x{} exceeds the WebP limit of {} pixels per side",
                        width, height, WEBP_MAX_DIMENSION
                    ),
                });
            }
            let webp_err = |e: webp::WebPEncodingError| ThumbnailError::EncodeFailure {
                mime: mime.as_mime().to_string(),
                message: format!("{:?}", e),
            };
            let memory = if img.color().has_alpha() {
                let rgba = img.to_rgba8();
                webp::Encoder::from_rgba(&rgba, width, height)
                    .encode_simple(false, options.webp_quality)
                    .map_err(webp_err)?
            } else {
                let rgb = img.to_rgb8();
                webp::Encoder::from_rgb(&rgb, width, height)
                    .encode_simple(false, options.webp_quality)
                    .map_err(webp_err)?
            };
            buffer.extend_from_slice(&memory);
        }
        ImageMime::Unsupported(other) => {
            return Err(ThumbnailError::UnsupportedFormat(other.clone()));
        }
    }

    tracing::debug!(
        mime = %mime,
        width = width,
        height = height,
        size_bytes = buffer.len(),
        "Image encoded"
    );

    Ok(Bytes::from(buffer))
}
