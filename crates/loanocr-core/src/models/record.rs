//! Finalized loan application record.

use chrono::{Local, NaiveDateTime, Timelike};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use super::fields::{Field, FieldSet};

/// Column name of the submission timestamp.
pub const SUBMITTED_AT: &str = "submitted_at";

/// Text format of `submitted_at` (local time, second precision).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A corrected field set stamped at submission time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationRecord {
    fields: FieldSet,
    submitted_at: NaiveDateTime,
}

impl ApplicationRecord {
    /// Build a record with an explicit timestamp.
    ///
    /// Sub-second precision is dropped.
    pub fn new(fields: FieldSet, submitted_at: NaiveDateTime) -> Self {
        let submitted_at = submitted_at.with_nanosecond(0).unwrap_or(submitted_at);
        Self {
            fields,
            submitted_at,
        }
    }

    /// Build a record stamped with the current local time.
    pub fn submit_now(fields: FieldSet) -> Self {
        Self::new(fields, Local::now().naive_local())
    }

    pub fn fields(&self) -> &FieldSet {
        &self.fields
    }

    pub fn submitted_at(&self) -> NaiveDateTime {
        self.submitted_at
    }

    /// Timestamp rendered as `YYYY-MM-DD HH:MM:SS`.
    pub fn submitted_at_text(&self) -> String {
        self.submitted_at.format(TIMESTAMP_FORMAT).to_string()
    }

    /// Column names: the field keys followed by `submitted_at`.
    pub fn header() -> Vec<&'static str> {
        Field::ALL
            .iter()
            .map(|f| f.key())
            .chain(std::iter::once(SUBMITTED_AT))
            .collect()
    }

    /// Row values in [`ApplicationRecord::header`] order.
    pub fn row(&self) -> Vec<String> {
        self.fields
            .iter()
            .map(|(_, v)| v.to_string())
            .chain(std::iter::once(self.submitted_at_text()))
            .collect()
    }

    /// Parse a timestamp written by [`ApplicationRecord::submitted_at_text`].
    pub fn parse_timestamp(text: &str) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(text.trim(), TIMESTAMP_FORMAT).ok()
    }
}

impl Serialize for ApplicationRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Field::COUNT + 1))?;
        for (field, value) in self.fields.iter() {
            map.serialize_entry(field.key(), value)?;
        }
        map.serialize_entry(SUBMITTED_AT, &self.submitted_at_text())?;
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn stamp() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_milli_opt(14, 5, 7, 450)
            .unwrap()
    }

    #[test]
    fn test_timestamp_is_second_precision() {
        let record = ApplicationRecord::new(FieldSet::new(), stamp());
        assert_eq!(record.submitted_at_text(), "2024-03-09 14:05:07");
        assert_eq!(
            ApplicationRecord::parse_timestamp("2024-03-09 14:05:07"),
            Some(record.submitted_at())
        );
    }

    #[test]
    fn test_header_and_row_align() {
        let fields = FieldSet::new().with(Field::FullName, "John Doe");
        let record = ApplicationRecord::new(fields, stamp());

        let header = ApplicationRecord::header();
        let row = record.row();
        assert_eq!(header.len(), 14);
        assert_eq!(row.len(), 14);
        assert_eq!(header[0], "full_name");
        assert_eq!(row[0], "John Doe");
        assert_eq!(header[13], "submitted_at");
        assert_eq!(row[13], "2024-03-09 14:05:07");
    }

    #[test]
    fn test_json_includes_timestamp() {
        let record = ApplicationRecord::new(FieldSet::new(), stamp());
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["submitted_at"], "2024-03-09 14:05:07");
        assert_eq!(json["loan_amount"], "");
    }
}
