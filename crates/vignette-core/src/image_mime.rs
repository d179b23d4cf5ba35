//! Supported image MIME types
//!
//! The thumbnail pipeline only re-encodes into the format family it decoded
//! from, so the set of formats is closed. Anything else is carried as
//! [`ImageMime::Unsupported`] and rejected at the encode step.

use std::fmt::{Display, Formatter, Result as FmtResult};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ImageMime {
    Jpeg,
    Png,
    Bmp,
    Gif,
    WebP,
    /// Any other declared or detected type, kept verbatim for error reporting
    Unsupported(String),
}

impl ImageMime {
    /// The five MIME types the pipeline can encode.
    pub const SUPPORTED: [&'static str; 5] = [
        "image/jpeg",
        "image/png",
        "image/bmp",
        "image/gif",
        "image/webp",
    ];

    /// Map a MIME string to the enumeration. Matching ignores ASCII case and
    /// surrounding whitespace; `image/jpg` is accepted as an alias.
    pub fn from_mime(mime: &str) -> Self {
        match mime.trim().to_ascii_lowercase().as_str() {
            "image/jpeg" | "image/jpg" => ImageMime::Jpeg,
            "image/png" => ImageMime::Png,
            "image/bmp" => ImageMime::Bmp,
            "image/gif" => ImageMime::Gif,
            "image/webp" => ImageMime::WebP,
            _ => ImageMime::Unsupported(mime.to_string()),
        }
    }

    pub fn as_mime(&self) -> &str {
        match self {
            ImageMime::Jpeg => "image/jpeg",
            ImageMime::Png => "image/png",
            ImageMime::Bmp => "image/bmp",
            ImageMime::Gif => "image/gif",
            ImageMime::WebP => "image/webp",
            ImageMime::Unsupported(mime) => mime,
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, ImageMime::Unsupported(_))
    }

    /// Conventional file extension, if the type is supported
    pub fn extension(&self) -> Option<&'static str> {
        match self {
            ImageMime::Jpeg => Some("jpg"),
            ImageMime::Png => Some("png"),
            ImageMime::Bmp => Some("bmp"),
            ImageMime::Gif => Some("gif"),
            ImageMime::WebP => Some("webp"),
            ImageMime::Unsupported(_) => None,
        }
    }
}

impl Display for ImageMime {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_mime())
    }
}
