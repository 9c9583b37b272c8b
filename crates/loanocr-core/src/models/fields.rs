//! Loan application field names and the fixed-key field set.

use std::collections::HashMap;
use std::fmt;

use serde::de::Error as _;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// One of the fixed loan application fields.
///
/// Variant order is the layout order used for display and for the
/// persisted column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    FullName,
    Dob,
    Gender,
    PanNumber,
    AadhaarNumber,
    MobileNumber,
    Email,
    Address,
    EmploymentType,
    MonthlyIncome,
    Organization,
    LoanAmount,
    LoanTenure,
}

impl Field {
    /// Number of fields in a [`FieldSet`].
    pub const COUNT: usize = 13;

    /// All fields in layout order.
    pub const ALL: [Field; Field::COUNT] = [
        Field::FullName,
        Field::Dob,
        Field::Gender,
        Field::PanNumber,
        Field::AadhaarNumber,
        Field::MobileNumber,
        Field::Email,
        Field::Address,
        Field::EmploymentType,
        Field::MonthlyIncome,
        Field::Organization,
        Field::LoanAmount,
        Field::LoanTenure,
    ];

    /// Snake-case key, used as JSON key and CSV column name.
    pub fn key(self) -> &'static str {
        match self {
            Field::FullName => "full_name",
            Field::Dob => "dob",
            Field::Gender => "gender",
            Field::PanNumber => "pan_number",
            Field::AadhaarNumber => "aadhaar_number",
            Field::MobileNumber => "mobile_number",
            Field::Email => "email",
            Field::Address => "address",
            Field::EmploymentType => "employment_type",
            Field::MonthlyIncome => "monthly_income",
            Field::Organization => "organization",
            Field::LoanAmount => "loan_amount",
            Field::LoanTenure => "loan_tenure",
        }
    }

    /// Human-readable label: underscores become spaces, words title-cased.
    ///
    /// `pan_number` -> `Pan Number`, `dob` -> `Dob`.
    pub fn label(self) -> String {
        self.key()
            .split('_')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => {
                        first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                    }
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Parse a snake-case key.
    pub fn from_key(key: &str) -> Option<Field> {
        Field::ALL.iter().copied().find(|f| f.key() == key)
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Values for every [`Field`], in layout order.
///
/// Every key is always present. An empty string means "not found".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSet {
    values: [String; Field::COUNT],
}

impl FieldSet {
    /// Create a field set with every value empty.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the value of a field ("" when absent).
    pub fn get(&self, field: Field) -> &str {
        &self.values[field.index()]
    }

    /// Set the value of a field.
    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        self.values[field.index()] = value.into();
    }

    /// Builder-style setter.
    pub fn with(mut self, field: Field, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    /// Whether a field holds a non-empty value.
    pub fn is_present(&self, field: Field) -> bool {
        !self.get(field).is_empty()
    }

    /// Iterate over `(field, value)` pairs in layout order.
    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> + '_ {
        Field::ALL.iter().map(move |&f| (f, self.get(f)))
    }

    /// Number of fields with a non-empty value.
    pub fn filled_count(&self) -> usize {
        self.values.iter().filter(|v| !v.is_empty()).count()
    }
}

impl Serialize for FieldSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Field::COUNT))?;
        for (field, value) in self.iter() {
            map.serialize_entry(field.key(), value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for FieldSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = HashMap::<String, String>::deserialize(deserializer)?;
        let mut fields = FieldSet::new();
        for (key, value) in raw {
            let field = Field::from_key(&key)
                .ok_or_else(|| D::Error::custom(format!("unknown field '{}'", key)))?;
            fields.set(field, value);
        }
        Ok(fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_labels() {
        assert_eq!(Field::PanNumber.label(), "Pan Number");
        assert_eq!(Field::Dob.label(), "Dob");
        assert_eq!(Field::FullName.label(), "Full Name");
        assert_eq!(Field::EmploymentType.label(), "Employment Type");
    }

    #[test]
    fn test_key_lookup() {
        for field in Field::ALL {
            assert_eq!(Field::from_key(field.key()), Some(field));
        }
        assert_eq!(Field::from_key("salary"), None);
    }

    #[test]
    fn test_new_field_set_has_every_key_empty() {
        let fields = FieldSet::new();
        assert_eq!(fields.iter().count(), 13);
        assert!(fields.iter().all(|(_, v)| v.is_empty()));
        assert_eq!(fields.filled_count(), 0);
    }

    #[test]
    fn test_json_keeps_layout_order() {
        let fields = FieldSet::new()
            .with(Field::LoanTenure, "24")
            .with(Field::FullName, "John Doe");
        let json = serde_json::to_string(&fields).unwrap();

        assert!(json.starts_with(r#"{"full_name":"John Doe","dob":"""#));
        assert!(json.ends_with(r#""loan_tenure":"24"}"#));
    }

    #[test]
    fn test_deserialize_fills_missing_and_rejects_unknown() {
        let fields: FieldSet = serde_json::from_str(r#"{"email":"a@b.com"}"#).unwrap();
        assert_eq!(fields.get(Field::Email), "a@b.com");
        assert_eq!(fields.get(Field::FullName), "");

        let err = serde_json::from_str::<FieldSet>(r#"{"salary":"1"}"#).unwrap_err();
        assert!(err.to_string().contains("unknown field 'salary'"));
    }
}
