//! Uploaded application form images.

use std::path::Path;

use crate::error::UploadError;

/// File extensions accepted for upload.
pub const SUPPORTED_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// Check whether a file name has a supported image extension (case-insensitive).
pub fn is_supported(name: &str) -> bool {
    extension_of(name)
        .map(|ext| SUPPORTED_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false)
}

fn extension_of(name: &str) -> Option<String> {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
}

/// A single uploaded image file.
#[derive(Debug, Clone)]
pub struct Upload {
    name: String,
    bytes: Vec<u8>,
}

impl Upload {
    /// Accept an upload, rejecting unsupported extensions and empty files.
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Result<Self, UploadError> {
        let name = name.into();

        if !is_supported(&name) {
            return Err(UploadError::UnsupportedFormat {
                extension: extension_of(&name).unwrap_or_default(),
            });
        }

        if bytes.is_empty() {
            return Err(UploadError::Empty { name });
        }

        Ok(Self { name, bytes })
    }

    /// Read an upload from disk.
    pub fn from_path(path: &Path) -> Result<Self, UploadError> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        if !is_supported(&name) {
            return Err(UploadError::UnsupportedFormat {
                extension: extension_of(&name).unwrap_or_default(),
            });
        }

        let bytes = std::fs::read(path).map_err(|source| UploadError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Self::new(name, bytes)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supported_extensions() {
        assert!(is_supported("form.png"));
        assert!(is_supported("form.JPG"));
        assert!(is_supported("scan.final.jpeg"));
        assert!(!is_supported("form.pdf"));
        assert!(!is_supported("form"));
    }

    #[test]
    fn test_rejects_unsupported_and_empty() {
        let err = Upload::new("form.tiff", vec![1, 2, 3]).unwrap_err();
        assert!(matches!(
            err,
            UploadError::UnsupportedFormat { ref extension } if extension == "tiff"
        ));

        let err = Upload::new("form.png", Vec::new()).unwrap_err();
        assert!(matches!(err, UploadError::Empty { .. }));
    }

    #[test]
    fn test_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("application.jpeg");
        std::fs::write(&path, b"not really a jpeg").unwrap();

        let upload = Upload::from_path(&path).unwrap();
        assert_eq!(upload.name(), "application.jpeg");
        assert_eq!(upload.bytes(), b"not really a jpeg");

        let missing = dir.path().join("missing.png");
        assert!(matches!(
            Upload::from_path(&missing).unwrap_err(),
            UploadError::Read { .. }
        ));
    }
}
