//! Vignette Storage Library
//!
//! This crate provides the blob store abstraction the thumbnail pipeline
//! writes through, plus filesystem, S3 and in-memory implementations.
//!
//! # Storage key format
//!
//! Every backend uses the same two logical prefixes:
//!
//! - **Originals**: `images/{name}`
//! - **Thumbnails**: `images/thumbnails/{name}`
//!
//! Keys must not contain `..` or a leading `/`. Key generation is centralized in the
//! `keys` module so all callers stay consistent.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
pub mod memory;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::create_store;
pub use keys::{original_key, thumbnail_key, ORIGINALS_PREFIX, THUMBNAILS_PREFIX};
#[cfg(feature = "storage-local")]
pub use local::LocalBlobStore;
pub use memory::MemoryBlobStore;
#[cfg(feature = "storage-s3")]
pub use s3::S3BlobStore;
pub use traits::{BlobStore, StorageError, StorageResult};
pub use vignette_core::StorageBackend;
