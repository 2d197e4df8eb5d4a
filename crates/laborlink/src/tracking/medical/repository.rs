use super::domain::{CaseId, MedicalExceptionRecord};
use crate::tracking::RepositoryError;

/// Storage abstraction for disease cases. `save` is a single atomic
/// insert-or-replace keyed by case id.
pub trait MedicalExceptionRepository: Send + Sync {
    fn fetch(&self, case_id: &CaseId) -> Result<Option<MedicalExceptionRecord>, RepositoryError>;
    fn save(
        &self,
        record: MedicalExceptionRecord,
    ) -> Result<MedicalExceptionRecord, RepositoryError>;
    fn list_all(&self) -> Result<Vec<MedicalExceptionRecord>, RepositoryError>;
}
