use super::domain::OverseasProgressRecord;
use crate::tracking::directory::CandidateId;
use crate::tracking::RepositoryError;

/// Storage abstraction for overseas progress records; `upsert` is a single
/// atomic insert-or-replace keyed by candidate.
pub trait OverseasRepository: Send + Sync {
    fn fetch(
        &self,
        candidate_id: &CandidateId,
    ) -> Result<Option<OverseasProgressRecord>, RepositoryError>;
    fn upsert(
        &self,
        record: OverseasProgressRecord,
    ) -> Result<OverseasProgressRecord, RepositoryError>;
    fn list_all(&self) -> Result<Vec<OverseasProgressRecord>, RepositoryError>;
}
