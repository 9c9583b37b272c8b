//! Presence validation of required fields.

use crate::models::fields::{Field, FieldSet};

use super::rules::REQUIRED_FIELDS;

/// Message reported for a missing required field.
pub fn missing_message(field: Field) -> String {
    format!("Missing or invalid value for: {}", field.label())
}

/// Required fields that are empty, in the rule table's required order.
pub fn missing_fields(fields: &FieldSet) -> Vec<Field> {
    REQUIRED_FIELDS
        .iter()
        .copied()
        .filter(|&f| !fields.is_present(f))
        .collect()
}

/// Check that every required field has a value.
///
/// Only presence is checked; formats were already enforced by the extraction
/// patterns. Returns one message per missing field, empty when all are present.
pub fn validate_fields(fields: &FieldSet) -> Vec<String> {
    missing_fields(fields).into_iter().map(missing_message).collect()
}
