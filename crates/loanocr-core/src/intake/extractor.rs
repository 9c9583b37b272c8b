//! Field extraction from normalized OCR text.

use tracing::debug;

use crate::models::fields::FieldSet;

use super::rules::{ExtractionMatch, FieldRule, FIELD_RULES};

/// Applies the rule table to text, one independent rule per field.
pub struct FieldExtractor {
    rules: &'static [FieldRule],
}

impl FieldExtractor {
    pub fn new() -> Self {
        Self {
            rules: &FIELD_RULES[..],
        }
    }

    /// Extract every field. Fields without a match hold `""`.
    pub fn extract(&self, text: &str) -> FieldSet {
        let mut fields = FieldSet::new();
        for m in self.extract_matches(text) {
            fields.set(m.field, m.value);
        }
        fields
    }

    /// Matches for the fields that were found, in layout order.
    pub fn extract_matches(&self, text: &str) -> Vec<ExtractionMatch> {
        self.rules
            .iter()
            .filter_map(|rule| {
                let found = rule.apply(text);
                match &found {
                    Some(m) => debug!("{}: '{}' at {:?}", rule.field, m.value, m.position),
                    None => debug!("{}: no match", rule.field),
                }
                found
            })
            .collect()
    }
}

impl Default for FieldExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Extract fields with the standard rule table.
pub fn extract_fields(text: &str) -> FieldSet {
    FieldExtractor::new().extract(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fields::Field;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = "Name: John Doe\nPAN: ABCDE1234F\nMobile: 9876543210\nDate of Birth: 01/01/1990\nIncome: 50,000\nLoan Amount: 200000";

    #[test]
    fn test_extract_sample_form() {
        let fields = extract_fields(SAMPLE);

        assert_eq!(fields.get(Field::FullName), "John Doe");
        assert_eq!(fields.get(Field::PanNumber), "ABCDE1234F");
        assert_eq!(fields.get(Field::MobileNumber), "9876543210");
        assert_eq!(fields.get(Field::Dob), "01/01/1990");
        assert_eq!(fields.get(Field::MonthlyIncome), "50,000");
        assert_eq!(fields.get(Field::LoanAmount), "200000");
        assert_eq!(fields.get(Field::Email), "");
        assert_eq!(fields.filled_count(), 6);
    }

    #[test]
    fn test_no_labels_gives_all_empty() {
        let fields = extract_fields("lorem ipsum dolor sit amet\n12345");
        assert_eq!(fields.iter().count(), 13);
        assert!(fields.iter().all(|(_, v)| v.is_empty()));
    }

    #[test]
    fn test_extract_full_form() {
        let text = "\
Full Name: Priya Sharma
Date of Birth: 15-08-1988
Gender: female
PAN: PQRSX6789K
Aadhaar: 1234 5678 9012
Mobile-9123456780
Email: priya.s@example.com
Address: 12 MG Road, Bengaluru
Employment Type: Self-Employed
Monthly Income: ₹1,25,000
Employer: Sharma Textiles
Loan Amount: Rs. 5,00,000
Tenure: 36 months";

        let fields = extract_fields(text);
        assert_eq!(fields.get(Field::FullName), "Priya Sharma");
        assert_eq!(fields.get(Field::Dob), "15-08-1988");
        assert_eq!(fields.get(Field::Gender), "female");
        assert_eq!(fields.get(Field::PanNumber), "PQRSX6789K");
        assert_eq!(fields.get(Field::AadhaarNumber), "1234 5678 9012");
        assert_eq!(fields.get(Field::MobileNumber), "9123456780");
        assert_eq!(fields.get(Field::Email), "priya.s@example.com");
        assert_eq!(fields.get(Field::Address), "12 MG Road, Bengaluru");
        assert_eq!(fields.get(Field::EmploymentType), "Self-Employed");
        assert_eq!(fields.get(Field::MonthlyIncome), "1,25,000");
        assert_eq!(fields.get(Field::Organization), "Sharma Textiles");
        assert_eq!(fields.get(Field::LoanAmount), "5,00,000");
        assert_eq!(fields.get(Field::LoanTenure), "36");
    }

    #[test]
    fn test_aadhaar_needs_single_spaces() {
        let fields = extract_fields("Aadhaar 1234  5678 9012");
        assert_eq!(fields.get(Field::AadhaarNumber), "");

        let fields = extract_fields("Aadhaa 1234 5678 9012");
        assert_eq!(fields.get(Field::AadhaarNumber), "1234 5678 9012");
    }

    #[test]
    fn test_matches_report_positions() {
        let matches = FieldExtractor::new().extract_matches(SAMPLE);
        assert_eq!(matches.len(), 6);

        let name = &matches[0];
        assert_eq!(name.field, Field::FullName);
        assert_eq!(name.position, (0, 14));
        assert_eq!(&SAMPLE[name.position.0..name.position.1], "Name: John Doe");
    }
}
