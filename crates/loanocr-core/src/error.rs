//! Error types for the loanocr-core library.

use std::path::PathBuf;

use thiserror::Error;

use crate::flow::Screen;

/// Main error type for the loanocr library.
#[derive(Error, Debug)]
pub enum LoanOcrError {
    /// Upload rejected before processing.
    #[error("upload error: {0}")]
    Upload(#[from] UploadError),

    /// OCR processing error (includes undecodable images).
    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    /// Record persistence error.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    /// Illegal screen transition.
    #[error("flow error: {0}")]
    Flow(#[from] FlowError),
}

impl LoanOcrError {
    /// True when the uploaded bytes could not be decoded as an image.
    ///
    /// The user may simply re-upload in that case.
    pub fn is_image_decode_failure(&self) -> bool {
        matches!(self, LoanOcrError::Ocr(OcrError::InvalidImage(_)))
    }
}

/// Errors raised when accepting an upload.
#[derive(Error, Debug)]
pub enum UploadError {
    /// File extension is not one of png, jpg, jpeg.
    #[error("unsupported file type '{extension}' (expected png, jpg or jpeg)")]
    UnsupportedFormat { extension: String },

    /// The upload contained no bytes.
    #[error("uploaded file '{name}' is empty")]
    Empty { name: String },

    /// Reading the file from disk failed.
    #[error("failed to read '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors related to OCR processing.
#[derive(Error, Debug)]
pub enum OcrError {
    /// Failed to load OCR models.
    #[error("failed to load model: {0}")]
    ModelLoad(String),

    /// The OCR engine failed on this image.
    #[error("text recognition failed: {0}")]
    Recognition(String),

    /// The uploaded bytes are not a readable image.
    #[error("failed to load image: {0}")]
    InvalidImage(String),
}

/// Errors related to the application record store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Underlying file could not be read or written.
    #[error("record store I/O failed for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// CSV encoding or decoding failed.
    #[error("record store CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Existing file has a header that does not match the record layout.
    #[error("record store '{path}' has unexpected header: {found}")]
    HeaderMismatch { path: PathBuf, found: String },

    /// A stored row could not be turned back into a record.
    #[error("invalid stored record at row {row}: {reason}")]
    InvalidRow { row: usize, reason: String },
}

/// Errors related to the intake screen flow.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FlowError {
    /// The event is not allowed on the current screen.
    #[error("cannot apply {event} while on the {from} screen")]
    InvalidTransition { from: Screen, event: &'static str },
}

/// Result type for the loanocr library.
pub type Result<T> = std::result::Result<T, LoanOcrError>;
