//! Core library for loan application OCR intake.
//!
//! This crate provides:
//! - Image preprocessing (grayscale, denoising, Otsu binarization)
//! - OCR behind the [`OcrBackend`] trait, with a pure Rust ONNX engine
//! - Text normalization and rule-based field extraction
//! - Required field validation
//! - The four-screen intake flow and CSV record storage

pub mod error;
pub mod flow;
pub mod intake;
pub mod models;
pub mod ocr;
pub mod store;

pub use error::{LoanOcrError, Result};
pub use flow::{FlowEvent, IntakeFlow, Screen, Session};
pub use intake::{ApplicationParser, ExtractionResult, IntakePipeline, RuleBasedParser, Upload};
pub use models::{ApplicationRecord, Field, FieldSet, LoanOcrConfig};
pub use ocr::{ImagePreprocessor, OcrBackend, OcrResult, TextBox};
#[cfg(feature = "native")]
pub use ocr::PureOcrEngine;
pub use store::{CsvRecordStore, RecordStore};
