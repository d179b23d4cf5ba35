mod helpers;

use helpers::{fixed_clock, memory_pipeline, pipeline_with, upload, FORMATS, STAMP};
use image::{GenericImageView, ImageFormat};
use std::sync::Arc;
use vignette_processing::{
    detect_mime, generate_filename, ImageMime, ThumbnailError, UploadedFile,
};
use vignette_storage::{original_key, thumbnail_key, BlobStore, LocalBlobStore};

#[tokio::test]
async fn test_jpeg_landscape_thumbnail() {
    let (pipeline, store) = memory_pipeline();
    let file = upload(ImageFormat::Jpeg, "photo.jpg", 800, 600);

    assert!(pipeline.store_and_thumbnail(&file, 200, 200).await);

    let name = format!("{}-photo.jpg", STAMP);
    let original = store.get(&original_key(&name)).await.unwrap();
    assert_eq!(original, file.bytes);

    let thumbnail = store.get(&thumbnail_key(&name)).await.unwrap();
    assert_eq!(detect_mime(&thumbnail), Some(ImageMime::Jpeg));
    let decoded = image::load_from_memory(&thumbnail).unwrap();
    assert_eq!(decoded.dimensions(), (200, 200));
}

#[tokio::test]
async fn test_every_supported_format_keeps_its_family() {
    for (format, mime, extension) in FORMATS {
        let (pipeline, store) = memory_pipeline();
        let name = format!("pattern.{}", extension);
        let file = upload(format, &name, 320, 480);

        pipeline
            .create_thumbnail(&file, 120, 90, &name)
            .await
            .unwrap_or_else(|e| panic!("{}: {}", mime, e));

        let thumbnail = store.get(&thumbnail_key(&name)).await.unwrap();
        assert_eq!(detect_mime(&thumbnail), Some(ImageMime::from_mime(mime)), "{}", mime);
        let decoded = image::load_from_memory(&thumbnail).unwrap();
        assert_eq!(decoded.dimensions(), (120, 90), "{}", mime);
    }
}

#[tokio::test]
async fn test_portrait_and_square_sources() {
    let (pipeline, store) = memory_pipeline();
    for (width, height) in [(600, 800), (500, 500), (64, 1000)] {
        let name = format!("{}x{}.png", width, height);
        let file = upload(ImageFormat::Png, &name, width, height);
        pipeline.create_thumbnail(&file, 50, 50, &name).await.unwrap();

        let thumbnail = store.get(&thumbnail_key(&name)).await.unwrap();
        let decoded = image::load_from_memory(&thumbnail).unwrap();
        assert_eq!(decoded.dimensions(), (50, 50), "{}", name);
    }
}

#[tokio::test]
async fn test_target_wider_than_source_aspect() {
    let (pipeline, store) = memory_pipeline();
    let file = upload(ImageFormat::Png, "wide.png", 800, 600);

    pipeline
        .create_thumbnail(&file, 400, 100, "wide.png")
        .await
        .unwrap();
    let thumbnail = store.get(&thumbnail_key("wide.png")).await.unwrap();
    let decoded = image::load_from_memory(&thumbnail).unwrap();
    assert_eq!(decoded.dimensions(), (400, 100));
}

#[tokio::test]
async fn test_unsupported_format_writes_no_thumbnail() {
    let (pipeline, store) = memory_pipeline();
    // TIFF signature; recognized but outside the supported set
    let file = UploadedFile::new("scan.tiff", b"MM\x00*\x00\x00\x00\x08\x00\x00".to_vec());

    let err = pipeline
        .create_thumbnail(&file, 100, 100, "scan.tiff")
        .await
        .unwrap_err();
    assert!(matches!(err, ThumbnailError::UnsupportedFormat(ref m) if m == "image/tiff"));
    assert_eq!(store.put_count(), 0);
}

#[tokio::test]
async fn test_undecodable_upload_keeps_original_only() {
    let (pipeline, store) = memory_pipeline();
    let file = UploadedFile::new("notes.png", b"definitely not a png".to_vec());

    assert!(!pipeline.store_and_thumbnail(&file, 100, 100).await);

    let name = format!("{}-notes.png", STAMP);
    assert!(store.exists(&original_key(&name)).await.unwrap());
    assert!(!store.exists(&thumbnail_key(&name)).await.unwrap());
    assert_eq!(store.put_count(), 1);
}

#[tokio::test]
async fn test_same_second_uploads_overwrite() {
    let (pipeline, store) = memory_pipeline();
    let first = upload(ImageFormat::Png, "dup.png", 100, 100);
    let second = upload(ImageFormat::Png, "dup.png", 300, 200);

    assert_eq!(
        generate_filename(&fixed_clock(), &first),
        generate_filename(&fixed_clock(), &second)
    );

    assert!(pipeline.store_and_thumbnail(&first, 40, 40).await);
    assert!(pipeline.store_and_thumbnail(&second, 40, 40).await);

    let name = format!("{}-dup.png", STAMP);
    assert_eq!(store.get(&original_key(&name)).await.unwrap(), second.bytes);
    assert_eq!(store.keys().await.len(), 2);
    assert_eq!(store.put_count(), 4);
}

#[tokio::test]
async fn test_double_dots_in_filename_are_stored() {
    let (pipeline, store) = memory_pipeline();
    for original_name in ["holiday..final.png", "..hidden.png"] {
        let file = upload(ImageFormat::Png, original_name, 100, 80);
        assert!(
            pipeline.store_and_thumbnail(&file, 40, 40).await,
            "{}",
            original_name
        );

        let name = format!("{}-{}", STAMP, original_name);
        assert!(store.exists(&original_key(&name)).await.unwrap());
        assert!(store.exists(&thumbnail_key(&name)).await.unwrap());
    }
}

#[tokio::test]
async fn test_webp_target_beyond_encoder_limit_is_an_encode_failure() {
    let (pipeline, store) = memory_pipeline();
    let file = upload(ImageFormat::WebP, "strip.webp", 16_000, 4);

    let err = pipeline
        .create_thumbnail(&file, 16_400, 4, "strip.webp")
        .await
        .unwrap_err();
    assert!(
        matches!(err, ThumbnailError::EncodeFailure { ref mime, .. } if mime == "image/webp"),
        "{:?}",
        err
    );
    assert_eq!(store.put_count(), 0);
}

#[tokio::test]
async fn test_local_store_end_to_end() {
    let dir = tempfile::TempDir::new().unwrap();
    let store = Arc::new(LocalBlobStore::new(dir.path()).await.unwrap());
    let pipeline = pipeline_with(store.clone());
    let file = upload(ImageFormat::Gif, "anim.gif", 90, 60);

    assert!(pipeline.store_and_thumbnail(&file, 30, 30).await);

    let name = format!("{}-anim.gif", STAMP);
    assert!(dir.path().join("images").join(&name).is_file());
    let thumbnail_path = dir.path().join("images").join("thumbnails").join(&name);
    let decoded = image::open(&thumbnail_path).unwrap();
    assert_eq!(decoded.dimensions(), (30, 30));
}
