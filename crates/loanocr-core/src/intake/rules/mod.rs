//! Declarative extraction rules for loan application fields.

pub mod patterns;

use lazy_static::lazy_static;
use regex::Regex;

use crate::models::fields::Field;

/// One extraction rule: a field, its labeled pattern and whether it is required.
#[derive(Debug)]
pub struct FieldRule {
    pub field: Field,
    pub pattern: &'static Regex,
    /// Position in the missing-field message order; `None` for optional fields.
    pub required: Option<usize>,
}

/// A value matched by a rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionMatch {
    /// Field the value belongs to.
    pub field: Field,
    /// Trimmed value of capture group 1.
    pub value: String,
    /// Byte range of the whole match in the source text.
    pub position: (usize, usize),
    /// Text matched by the whole pattern.
    pub source: String,
}

impl FieldRule {
    const fn new(field: Field, pattern: &'static Regex, required: Option<usize>) -> Self {
        Self {
            field,
            pattern,
            required,
        }
    }

    pub fn is_required(&self) -> bool {
        self.required.is_some()
    }

    /// Apply the rule; only the first match in the text is considered.
    pub fn apply(&self, text: &str) -> Option<ExtractionMatch> {
        let caps = self.pattern.captures(text)?;
        let full = caps.get(0)?;
        let value = caps.get(1)?.as_str().trim().to_string();

        Some(ExtractionMatch {
            field: self.field,
            value,
            position: (full.start(), full.end()),
            source: full.as_str().to_string(),
        })
    }
}

lazy_static! {
    /// One rule per field, in layout order.
    pub static ref FIELD_RULES: [FieldRule; Field::COUNT] = [
        FieldRule::new(Field::FullName, &patterns::FULL_NAME, Some(0)),
        FieldRule::new(Field::Dob, &patterns::DOB, Some(1)),
        FieldRule::new(Field::Gender, &patterns::GENDER, None),
        FieldRule::new(Field::PanNumber, &patterns::PAN, Some(3)),
        FieldRule::new(Field::AadhaarNumber, &patterns::AADHAAR, None),
        FieldRule::new(Field::MobileNumber, &patterns::MOBILE, Some(2)),
        FieldRule::new(Field::Email, &patterns::EMAIL, None),
        FieldRule::new(Field::Address, &patterns::ADDRESS, None),
        FieldRule::new(Field::EmploymentType, &patterns::EMPLOYMENT_TYPE, None),
        FieldRule::new(Field::MonthlyIncome, &patterns::MONTHLY_INCOME, Some(4)),
        FieldRule::new(Field::Organization, &patterns::ORGANIZATION, None),
        FieldRule::new(Field::LoanAmount, &patterns::LOAN_AMOUNT, Some(5)),
        FieldRule::new(Field::LoanTenure, &patterns::LOAN_TENURE, None),
    ];

    /// Fields whose absence blocks the intake, in message order.
    pub static ref REQUIRED_FIELDS: Vec<Field> = {
        let mut ranked: Vec<(usize, Field)> = FIELD_RULES
            .iter()
            .filter_map(|r| r.required.map(|rank| (rank, r.field)))
            .collect();
        ranked.sort();
        ranked.into_iter().map(|(_, field)| field).collect()
    };
}

/// Look up the rule for a field.
pub fn rule_for(field: Field) -> &'static FieldRule {
    &FIELD_RULES[field as usize]
}

/// Whether a field is required.
pub fn is_required(field: Field) -> bool {
    rule_for(field).is_required()
}
