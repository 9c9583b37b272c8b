//! Data models: fields, records and configuration.

pub mod config;
pub mod fields;
pub mod record;

pub use config::LoanOcrConfig;
pub use fields::{Field, FieldSet};
pub use record::ApplicationRecord;
