//! Shared key generation for blob stores.
//!
//! Originals live under `images/{name}` and thumbnails under
//! `images/thumbnails/{name}`, so one generated name addresses both blobs.

pub const ORIGINALS_PREFIX: &str = "images";
pub const THUMBNAILS_PREFIX: &str = "images/thumbnails";

/// Storage key for an uploaded original.
pub fn original_key(name: &str) -> String {
    format!("{}/{}", ORIGINALS_PREFIX, name)
}

/// Storage key for the thumbnail derived from the original stored as `name`.
pub fn thumbnail_key(name: &str) -> String {
    format!("{}/{}", THUMBNAILS_PREFIX, name)
}

/// Reject keys that could escape a backend's root.
///
/// Dots inside a segment (`holiday..final.png`) are fine; a segment that is
/// empty, `.` or `..` is not.
pub(crate) fn validate_key(key: &str) -> bool {
    !key.is_empty()
        && !key.starts_with('/')
        && !key
            .split('/')
            .any(|segment| segment.is_empty() || segment == "." || segment == "..")
}
