//! Rule-based application parser: normalize, extract, validate.

use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info};

use crate::models::config::NormalizationConfig;
use crate::models::fields::FieldSet;

use super::extractor::FieldExtractor;
use super::normalize::TextNormalizer;
use super::rules::ExtractionMatch;
use super::validator::validate_fields;

/// Result of parsing OCR text.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionResult {
    /// Extracted fields.
    pub fields: FieldSet,
    /// OCR output before normalization.
    pub raw_text: String,
    /// Normalized text the fields were extracted from.
    pub text: String,
    /// Validation messages; empty when every required field was found.
    pub errors: Vec<String>,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

impl ExtractionResult {
    /// Whether every required field was found.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Trait for application parsing.
pub trait ApplicationParser {
    /// Parse an application from raw OCR text.
    fn parse(&self, raw_text: &str) -> ExtractionResult;
}

/// Parser applying the normalizer, the rule table and the validator.
#[derive(Default)]
pub struct RuleBasedParser {
    normalizer: TextNormalizer,
    extractor: FieldExtractor,
}

impl RuleBasedParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &NormalizationConfig) -> Self {
        Self::new().with_normalizer(TextNormalizer::from_config(config))
    }

    pub fn with_normalizer(mut self, normalizer: TextNormalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    /// Matched values with positions in the normalized text.
    pub fn matches(&self, raw_text: &str) -> Vec<ExtractionMatch> {
        let text = self.normalizer.normalize(raw_text);
        self.extractor.extract_matches(&text)
    }
}

impl ApplicationParser for RuleBasedParser {
    fn parse(&self, raw_text: &str) -> ExtractionResult {
        let start = Instant::now();

        let text = self.normalizer.normalize(raw_text);
        if text != raw_text {
            debug!("Normalized OCR text ({} -> {} bytes)", raw_text.len(), text.len());
        }

        let fields = self.extractor.extract(&text);
        let errors = validate_fields(&fields);

        info!(
            "Extracted {}/{} fields, {} validation issue(s)",
            fields.filled_count(),
            crate::models::fields::Field::COUNT,
            errors.len()
        );

        ExtractionResult {
            fields,
            raw_text: raw_text.to_string(),
            text,
            errors,
            processing_time_ms: start.elapsed().as_millis() as u64,
        }
    }
}
