//! Application intake: upload handling, text normalization, field extraction and validation.

mod extractor;
mod normalize;
mod parser;
mod pipeline;
pub mod rules;
mod upload;
mod validator;

pub use extractor::{extract_fields, FieldExtractor};
pub use normalize::{normalize_text, TextNormalizer};
pub use parser::{ApplicationParser, ExtractionResult, RuleBasedParser};
pub use pipeline::IntakePipeline;
pub use rules::{is_required, ExtractionMatch, FieldRule, REQUIRED_FIELDS};
pub use upload::{is_supported, Upload, SUPPORTED_EXTENSIONS};
pub use validator::{missing_fields, missing_message, validate_fields};

#[cfg(test)]
pub(crate) use pipeline::testing;
