//! Shared fixtures for pipeline integration tests

#![allow(dead_code)]

use chrono::NaiveDate;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use std::io::Cursor;
use std::sync::Arc;
use vignette_processing::{FixedClock, ThumbnailOptions, ThumbnailPipeline, UploadedFile};
use vignette_storage::{BlobStore, MemoryBlobStore};

/// Name prefix produced by [`fixed_clock`]
pub const STAMP: &str = "20240615-093000";

/// Every format the pipeline accepts, with its MIME type and file extension
pub const FORMATS: [(ImageFormat, &str, &str); 5] = [
    (ImageFormat::Jpeg, "image/jpeg", "jpg"),
    (ImageFormat::Png, "image/png", "png"),
    (ImageFormat::Bmp, "image/bmp", "bmp"),
    (ImageFormat::Gif, "image/gif", "gif"),
    (ImageFormat::WebP, "image/webp", "webp"),
];

pub fn fixed_clock() -> FixedClock {
    FixedClock(
        NaiveDate::from_ymd_opt(2024, 6, 15)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap(),
    )
}

/// Encode a `width` x `height` test pattern in `format`
pub fn image_bytes(format: ImageFormat, width: u32, height: u32) -> Vec<u8> {
    let img = DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
        if (x / 16 + y / 16) % 2 == 0 {
            Rgb([230, 40, 40])
        } else {
            Rgb([20, 20, 200])
        }
    }));
    let mut buffer = Vec::new();
    img.write_to(&mut Cursor::new(&mut buffer), format)
        .expect("fixture encodes");
    buffer
}

pub fn upload(format: ImageFormat, name: &str, width: u32, height: u32) -> UploadedFile {
    UploadedFile::new(name, image_bytes(format, width, height))
}

pub fn memory_pipeline() -> (ThumbnailPipeline, MemoryBlobStore) {
    let store = MemoryBlobStore::new();
    let pipeline = pipeline_with(Arc::new(store.clone()));
    (pipeline, store)
}

pub fn pipeline_with(store: Arc<dyn BlobStore>) -> ThumbnailPipeline {
    ThumbnailPipeline::new(store, Arc::new(fixed_clock()), ThumbnailOptions::default())
}
