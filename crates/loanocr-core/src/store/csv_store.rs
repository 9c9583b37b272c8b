//! CSV file record store.

use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use csv::StringRecord;
use tracing::{debug, info};

use crate::error::StoreError;
use crate::models::fields::{Field, FieldSet};
use crate::models::record::ApplicationRecord;

use super::{RecordStore, Result};

/// Stores records as rows of a CSV file with a header row.
///
/// Columns are the field keys in layout order followed by `submitted_at`.
pub struct CsvRecordStore {
    path: PathBuf,
}

impl CsvRecordStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }

    /// Whether the file is missing or empty and needs a header row.
    ///
    /// Fails if an existing header does not match the record layout.
    fn needs_header(&self) -> Result<bool> {
        match fs::metadata(&self.path) {
            Ok(meta) if meta.len() == 0 => return Ok(true),
            Ok(_) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(true),
            Err(e) => return Err(self.io_error(e)),
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_path(&self.path)?;
        let mut header = StringRecord::new();
        if !reader.read_record(&mut header)? {
            return Ok(true);
        }

        self.check_header(&header)?;
        Ok(false)
    }

    /// Whether a non-empty file lacks a final newline.
    fn missing_final_newline(&self) -> Result<bool> {
        let mut file = File::open(&self.path).map_err(|e| self.io_error(e))?;
        if file.seek(SeekFrom::End(0)).map_err(|e| self.io_error(e))? == 0 {
            return Ok(false);
        }
        file.seek(SeekFrom::End(-1)).map_err(|e| self.io_error(e))?;
        let mut last = [0u8; 1];
        file.read_exact(&mut last).map_err(|e| self.io_error(e))?;
        Ok(last[0] != b'\n')
    }

    fn check_header(&self, header: &StringRecord) -> Result<()> {
        let expected = ApplicationRecord::header();
        if header.iter().ne(expected.iter().copied()) {
            return Err(StoreError::HeaderMismatch {
                path: self.path.clone(),
                found: header.iter().collect::<Vec<_>>().join(","),
            });
        }
        Ok(())
    }
}

impl RecordStore for CsvRecordStore {
    fn append(&self, record: &ApplicationRecord) -> Result<()> {
        let write_header = self.needs_header()?;

        // A row glued onto an unterminated last line would corrupt both
        let mut buffer = Vec::new();
        if !write_header && self.missing_final_newline()? {
            buffer.push(b'\n');
        }

        // Encode the whole row first so a failure never leaves half a line behind
        let mut writer = csv::Writer::from_writer(buffer);
        if write_header {
            writer.write_record(ApplicationRecord::header())?;
        }
        writer.write_record(record.row())?;
        let buffer = writer
            .into_inner()
            .map_err(|e| self.io_error(e.into_error()))?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| self.io_error(e))?;
        file.write_all(&buffer).map_err(|e| self.io_error(e))?;
        file.flush().map_err(|e| self.io_error(e))?;

        if write_header {
            debug!("Created record store {}", self.path.display());
        }
        info!(
            "Saved application submitted at {} to {}",
            record.submitted_at_text(),
            self.path.display()
        );

        Ok(())
    }

    fn load(&self) -> Result<Vec<ApplicationRecord>> {
        match fs::metadata(&self.path) {
            Ok(meta) if meta.len() == 0 => return Ok(Vec::new()),
            Ok(_) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(self.io_error(e)),
        }

        let mut reader = csv::Reader::from_path(&self.path)?;
        let header = reader.headers()?.clone();
        self.check_header(&header)?;

        let mut records = Vec::new();
        for (index, row) in reader.records().enumerate() {
            let row = row?;
            // Row numbers are 1-based and count the header
            let row_number = index + 2;

            let mut fields = FieldSet::new();
            for (field, value) in Field::ALL.iter().zip(row.iter()) {
                fields.set(*field, value);
            }

            let stamp = row.get(Field::COUNT).unwrap_or_default();
            let submitted_at =
                ApplicationRecord::parse_timestamp(stamp).ok_or_else(|| StoreError::InvalidRow {
                    row: row_number,
                    reason: format!("invalid submitted_at '{}'", stamp),
                })?;

            records.push(ApplicationRecord::new(fields, submitted_at));
        }

        debug!("Loaded {} records from {}", records.len(), self.path.display());
        Ok(records)
    }
}
