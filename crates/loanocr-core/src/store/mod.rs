//! Persistence of submitted application records.

mod csv_store;

pub use csv_store::CsvRecordStore;

use crate::error::StoreError;
use crate::models::record::ApplicationRecord;

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Append-only store of application records.
///
/// Single-writer access is assumed; implementations do no locking.
pub trait RecordStore {
    /// Append one record, creating the store if it does not exist yet.
    fn append(&self, record: &ApplicationRecord) -> Result<()>;

    /// Read every stored record in insertion order.
    fn load(&self) -> Result<Vec<ApplicationRecord>>;
}

impl<T: RecordStore + ?Sized> RecordStore for &T {
    fn append(&self, record: &ApplicationRecord) -> Result<()> {
        (**self).append(record)
    }

    fn load(&self) -> Result<Vec<ApplicationRecord>> {
        (**self).load()
    }
}
