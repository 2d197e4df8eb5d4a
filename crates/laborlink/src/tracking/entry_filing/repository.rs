use super::domain::EntryFilingRecord;
use crate::tracking::directory::WorkerId;
use crate::tracking::RepositoryError;

/// Storage abstraction for filing records so the service can be exercised
/// without a database. `upsert` is a single atomic insert-or-replace;
/// concurrent writers for the same worker resolve to last-write-wins.
pub trait FilingRepository: Send + Sync {
    fn fetch(&self, worker_id: &WorkerId) -> Result<Option<EntryFilingRecord>, RepositoryError>;
    fn upsert(&self, record: EntryFilingRecord) -> Result<EntryFilingRecord, RepositoryError>;
    fn list_all(&self) -> Result<Vec<EntryFilingRecord>, RepositoryError>;
}
