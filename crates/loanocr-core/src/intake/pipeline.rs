//! Upload pipeline: preprocess, OCR, parse.

use std::time::Instant;

use image::DynamicImage;
use tracing::info;

use crate::error::Result;
use crate::models::config::LoanOcrConfig;
use crate::ocr::{ImagePreprocessor, OcrBackend};

use super::parser::{ApplicationParser, ExtractionResult, RuleBasedParser};
use super::upload::Upload;

/// Runs one upload through every stage, blocking until done.
pub struct IntakePipeline<O: OcrBackend> {
    preprocessor: ImagePreprocessor,
    ocr: O,
    parser: RuleBasedParser,
}

impl<O: OcrBackend> IntakePipeline<O> {
    /// Create a pipeline with default preprocessing and normalization.
    pub fn new(ocr: O) -> Self {
        Self {
            preprocessor: ImagePreprocessor::new(),
            ocr,
            parser: RuleBasedParser::new(),
        }
    }

    /// Create a pipeline configured from `config`.
    pub fn from_config(ocr: O, config: &LoanOcrConfig) -> Self {
        Self {
            preprocessor: ImagePreprocessor::from_config(&config.preprocessing),
            ocr,
            parser: RuleBasedParser::from_config(&config.normalization),
        }
    }

    pub fn with_preprocessor(mut self, preprocessor: ImagePreprocessor) -> Self {
        self.preprocessor = preprocessor;
        self
    }

    pub fn parser(&self) -> &RuleBasedParser {
        &self.parser
    }

    /// Process an uploaded image.
    ///
    /// Fails without a partial result when the image cannot be decoded or
    /// the OCR engine fails. Missing fields are reported in
    /// [`ExtractionResult::errors`], not as an error.
    pub fn process_upload(&self, upload: &Upload) -> Result<ExtractionResult> {
        let start = Instant::now();
        info!("Processing upload: {} ({} bytes)", upload.name(), upload.bytes().len());

        let cleaned = self.preprocessor.preprocess(upload.bytes())?;
        let raw_text = self.ocr.extract_text(&DynamicImage::ImageLuma8(cleaned))?;

        let mut result = self.parser.parse(&raw_text);
        result.processing_time_ms = start.elapsed().as_millis() as u64;

        info!(
            "Upload {} processed in {}ms",
            upload.name(),
            result.processing_time_ms
        );

        Ok(result)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::cell::Cell;

    use image::DynamicImage;

    use crate::error::OcrError;
    use crate::ocr::{OcrBackend, OcrResult, TextBox};

    /// OCR stand-in returning fixed text.
    pub struct FixedOcr {
        pub text: String,
        pub calls: Cell<usize>,
    }

    impl FixedOcr {
        pub fn new(text: &str) -> Self {
            Self {
                text: text.to_string(),
                calls: Cell::new(0),
            }
        }
    }

    impl OcrBackend for FixedOcr {
        fn recognize(&self, image: &DynamicImage) -> Result<OcrResult, OcrError> {
            self.calls.set(self.calls.get() + 1);
            let boxes = vec![TextBox {
                bbox: [0.0, 0.0, 10.0, 0.0, 10.0, 10.0, 0.0, 10.0],
                text: self.text.clone(),
                confidence: 1.0,
            }];
            Ok(OcrResult::from_boxes(boxes, (image.width(), image.height()), 0))
        }
    }

    /// OCR stand-in that always fails.
    pub struct FailingOcr;

    impl OcrBackend for FailingOcr {
        fn recognize(&self, _image: &DynamicImage) -> Result<OcrResult, OcrError> {
            Err(OcrError::Recognition("engine crashed".to_string()))
        }
    }

    /// A small valid PNG.
    pub fn png_bytes() -> Vec<u8> {
        let image =
            image::GrayImage::from_fn(8, 8, |x, _| image::Luma([if x < 4 { 10 } else { 240 }]));
        let mut bytes = Vec::new();
        DynamicImage::ImageLuma8(image)
            .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        bytes
    }
}

#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;
    use crate::error::{LoanOcrError, OcrError};
    use crate::models::fields::Field;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = "Name: John Doe\nPAN: ABCDE1234F\nMobile: 9876543210\nDate of Birth: 01/01/1990\nIncome: 50,000\nLoan Amount: 200000";

    fn fast_pipeline<O: OcrBackend>(ocr: O) -> IntakePipeline<O> {
        IntakePipeline::new(ocr).with_preprocessor(ImagePreprocessor::new().with_windows(3, 5))
    }

    #[test]
    fn test_process_upload() {
        let pipeline = fast_pipeline(FixedOcr::new(SAMPLE));
        let upload = Upload::new("form.png", png_bytes()).unwrap();

        let result = pipeline.process_upload(&upload).unwrap();
        assert!(result.is_valid());
        assert_eq!(result.fields.get(Field::LoanAmount), "200000");
        assert_eq!(pipeline.ocr.calls.get(), 1);
    }

    #[test]
    fn test_undecodable_upload_skips_ocr() {
        let pipeline = fast_pipeline(FixedOcr::new(SAMPLE));
        let upload = Upload::new("form.jpg", b"garbage".to_vec()).unwrap();

        let err = pipeline.process_upload(&upload).unwrap_err();
        assert!(err.is_image_decode_failure());
        assert_eq!(pipeline.ocr.calls.get(), 0);
    }

    #[test]
    fn test_ocr_failure_propagates() {
        let pipeline = fast_pipeline(FailingOcr);
        let upload = Upload::new("form.png", png_bytes()).unwrap();

        let err = pipeline.process_upload(&upload).unwrap_err();
        assert!(matches!(err, LoanOcrError::Ocr(OcrError::Recognition(_))));
    }

    #[test]
    fn test_missing_fields_are_not_an_error() {
        let pipeline = fast_pipeline(FixedOcr::new("Name: John Doe"));
        let upload = Upload::new("form.png", png_bytes()).unwrap();

        let result = pipeline.process_upload(&upload).unwrap();
        assert_eq!(result.errors.len(), 5);
        assert_eq!(result.raw_text, "Name: John Doe");
    }
}
