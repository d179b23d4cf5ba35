//! Upload handle passed into the thumbnail pipeline.

use bytes::Bytes;
use std::path::Path;

/// Uploaded file: client-declared name plus raw bytes.
#[derive(Clone, Debug)]
pub struct UploadedFile {
    pub original_name: String,
    pub bytes: Bytes,
}

impl UploadedFile {
    pub fn new(original_name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            original_name: original_name.into(),
            bytes: bytes.into(),
        }
    }

    /// Read a file from disk, using its file name as the original name.
    pub async fn from_path(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let original_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| {
                std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    format!("{} has no file name", path.display()),
                )
            })?;
        let data = tokio::fs::read(path).await?;
        Ok(Self::new(original_name, data))
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
