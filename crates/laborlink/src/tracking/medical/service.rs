use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;

use super::domain::{
    CaseId, DiseaseType, MedicalExceptionCreate, MedicalExceptionPatch, MedicalExceptionRecord,
    MedicalExceptionView, TreatmentStatus,
};
use super::repository::MedicalExceptionRepository;
use crate::tracking::directory::{DirectoryError, WorkerDirectory, WorkerId, WorkerIdentity};
use crate::tracking::paging::{Page, PageRequest};
use crate::tracking::{RepositoryError, ValidationError};

/// Service composing validation, notification transitions, and the case
/// store.
pub struct MedicalExceptionService<R, W> {
    repository: Arc<R>,
    workers: Arc<W>,
}

static CASE_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_case_id() -> CaseId {
    let id = CASE_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    CaseId(format!("mex-{id:06}"))
}

impl<R, W> MedicalExceptionService<R, W>
where
    R: MedicalExceptionRepository + 'static,
    W: WorkerDirectory + 'static,
{
    pub fn new(repository: Arc<R>, workers: Arc<W>) -> Self {
        Self { repository, workers }
    }

    /// Open a new case. Required fields are checked before any write;
    /// treatment status defaults to pending.
    pub fn create(
        &self,
        create: MedicalExceptionCreate,
    ) -> Result<MedicalExceptionView, MedicalServiceError> {
        let case = create.validate()?;
        let worker = self.resolve_worker(&case.worker_id)?;

        let record = MedicalExceptionRecord {
            case_id: next_case_id(),
            worker_id: case.worker_id,
            health_check_id: case.health_check_id,
            diagnosis_date: case.diagnosis_date,
            disease_type: case.disease_type,
            description: case.description,
            health_dept_notified: false,
            health_dept_notify_date: None,
            employer_notified: false,
            employer_notify_date: None,
            treatment_status: case.treatment_status,
            resolution_date: None,
            remarks: case.remarks,
        };

        let stored = self.repository.save(record)?;
        Ok(MedicalExceptionView::from_record(stored, worker))
    }

    pub fn get(&self, case_id: &CaseId) -> Result<MedicalExceptionView, MedicalServiceError> {
        let record = self.fetch_case(case_id)?;
        let worker = self.worker_or_unresolved(&record.worker_id)?;
        Ok(MedicalExceptionView::from_record(record, worker))
    }

    /// Generic partial merge of the editable fields.
    pub fn update(
        &self,
        case_id: &CaseId,
        patch: MedicalExceptionPatch,
    ) -> Result<MedicalExceptionView, MedicalServiceError> {
        let patch = patch.validate()?;
        let mut record = self.fetch_case(case_id)?;
        record.apply(patch);
        let stored = self.repository.save(record)?;
        let worker = self.worker_or_unresolved(&stored.worker_id)?;
        Ok(MedicalExceptionView::from_record(stored, worker))
    }

    /// Record the statutory health-department notification. Idempotent; a
    /// repeat call simply re-stamps the timestamp.
    pub fn mark_health_dept_notified(
        &self,
        case_id: &CaseId,
    ) -> Result<MedicalExceptionView, MedicalServiceError> {
        let mut record = self.fetch_case(case_id)?;
        record.health_dept_notified = true;
        record.health_dept_notify_date = Some(Utc::now());
        let stored = self.repository.save(record)?;
        let worker = self.worker_or_unresolved(&stored.worker_id)?;
        Ok(MedicalExceptionView::from_record(stored, worker))
    }

    /// Record the employer notification. Idempotent like the above.
    pub fn mark_employer_notified(
        &self,
        case_id: &CaseId,
    ) -> Result<MedicalExceptionView, MedicalServiceError> {
        let mut record = self.fetch_case(case_id)?;
        record.employer_notified = true;
        record.employer_notify_date = Some(Utc::now());
        let stored = self.repository.save(record)?;
        let worker = self.worker_or_unresolved(&stored.worker_id)?;
        Ok(MedicalExceptionView::from_record(stored, worker))
    }

    /// Paginated listing; the three filters are independent and combinable.
    pub fn list(
        &self,
        treatment_status: Option<&str>,
        disease_type: Option<&str>,
        search: Option<&str>,
        page: PageRequest,
    ) -> Result<Page<MedicalExceptionView>, MedicalServiceError> {
        let mut details = Vec::new();
        let status = match treatment_status {
            None => None,
            Some(value) if value.trim().is_empty() => None,
            Some(value) => match TreatmentStatus::parse(value) {
                Some(status) => Some(status),
                None => {
                    details.push(format!("status filter '{value}' is not a treatment status"));
                    None
                }
            },
        };
        let disease = match disease_type {
            None => None,
            Some(value) if value.trim().is_empty() => None,
            Some(value) => match DiseaseType::parse(value) {
                Some(disease) => Some(disease),
                None => {
                    details.push(format!("diseaseType filter '{value}' is not a known disease"));
                    None
                }
            },
        };
        if !details.is_empty() {
            return Err(ValidationError::new(details).into());
        }
        let needle = search.map(str::to_lowercase);

        let mut records = self.repository.list_all()?;
        records.sort_by(|a, b| a.case_id.0.cmp(&b.case_id.0));

        let mut views = Vec::new();
        for record in records {
            if let Some(wanted) = status {
                if record.treatment_status != wanted {
                    continue;
                }
            }
            if let Some(wanted) = disease {
                if record.disease_type != wanted {
                    continue;
                }
            }
            let worker = self.worker_or_unresolved(&record.worker_id)?;
            if let Some(needle) = &needle {
                let matches = worker.name_zh.to_lowercase().contains(needle)
                    || worker.name_en.to_lowercase().contains(needle);
                if !matches {
                    continue;
                }
            }
            views.push(MedicalExceptionView::from_record(record, worker));
        }

        Ok(Page::from_items(views, page))
    }

    /// Case counts by treatment status.
    pub fn dashboard(&self) -> Result<MedicalDashboard, MedicalServiceError> {
        let records = self.repository.list_all()?;
        let count = |wanted: TreatmentStatus| {
            records
                .iter()
                .filter(|record| record.treatment_status == wanted)
                .count() as u64
        };

        Ok(MedicalDashboard {
            total: records.len() as u64,
            pending: count(TreatmentStatus::Pending),
            in_treatment: count(TreatmentStatus::InTreatment),
            recovered: count(TreatmentStatus::Recovered),
            deported: count(TreatmentStatus::Deported),
        })
    }

    fn fetch_case(&self, case_id: &CaseId) -> Result<MedicalExceptionRecord, MedicalServiceError> {
        self.repository
            .fetch(case_id)?
            .ok_or_else(|| MedicalServiceError::CaseNotFound(case_id.clone()))
    }

    fn resolve_worker(&self, worker_id: &WorkerId) -> Result<WorkerIdentity, MedicalServiceError> {
        self.workers
            .worker(worker_id)?
            .ok_or_else(|| MedicalServiceError::UnknownWorker(worker_id.clone()))
    }

    fn worker_or_unresolved(
        &self,
        worker_id: &WorkerId,
    ) -> Result<WorkerIdentity, MedicalServiceError> {
        Ok(self
            .workers
            .worker(worker_id)?
            .unwrap_or_else(|| WorkerIdentity::unresolved(worker_id.clone())))
    }
}

/// Counts rendered on the disease-case dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicalDashboard {
    pub total: u64,
    pub pending: u64,
    pub in_treatment: u64,
    pub recovered: u64,
    pub deported: u64,
}

/// Error raised by the medical exception service.
#[derive(Debug, thiserror::Error)]
pub enum MedicalServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("worker {0} is not registered")]
    UnknownWorker(WorkerId),
    #[error("medical exception case {0} not found")]
    CaseNotFound(CaseId),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Directory(#[from] DirectoryError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default, Clone)]
    struct MemoryCaseRepository {
        records: Arc<Mutex<HashMap<CaseId, MedicalExceptionRecord>>>,
    }

    impl MedicalExceptionRepository for MemoryCaseRepository {
        fn fetch(
            &self,
            case_id: &CaseId,
        ) -> Result<Option<MedicalExceptionRecord>, RepositoryError> {
            let guard = self.records.lock().expect("repository mutex poisoned");
            Ok(guard.get(case_id).cloned())
        }

        fn save(
            &self,
            record: MedicalExceptionRecord,
        ) -> Result<MedicalExceptionRecord, RepositoryError> {
            let mut guard = self.records.lock().expect("repository mutex poisoned");
            guard.insert(record.case_id.clone(), record.clone());
            Ok(record)
        }

        fn list_all(&self) -> Result<Vec<MedicalExceptionRecord>, RepositoryError> {
            let guard = self.records.lock().expect("repository mutex poisoned");
            Ok(guard.values().cloned().collect())
        }
    }

    #[derive(Default, Clone)]
    struct StaticWorkers {
        workers: HashMap<WorkerId, WorkerIdentity>,
    }

    impl WorkerDirectory for StaticWorkers {
        fn worker(&self, id: &WorkerId) -> Result<Option<WorkerIdentity>, DirectoryError> {
            Ok(self.workers.get(id).cloned())
        }
    }

    fn build_service() -> MedicalExceptionService<MemoryCaseRepository, StaticWorkers> {
        let worker = WorkerIdentity {
            worker_id: WorkerId("W-1001".to_string()),
            name_zh: "阮氏香".to_string(),
            name_en: "NGUYEN THI HUONG".to_string(),
        };
        let workers = StaticWorkers {
            workers: HashMap::from([(worker.worker_id.clone(), worker)]),
        };
        MedicalExceptionService::new(
            Arc::new(MemoryCaseRepository::default()),
            Arc::new(workers),
        )
    }

    fn tb_case() -> MedicalExceptionCreate {
        MedicalExceptionCreate {
            worker_id: Some("W-1001".to_string()),
            diagnosis_date: Some("2024-03-15".to_string()),
            disease_type: Some("TUBERCULOSIS".to_string()),
            ..MedicalExceptionCreate::default()
        }
    }

    #[test]
    fn create_defaults_to_pending_treatment() {
        let service = build_service();
        let view = service.create(tb_case()).expect("case opens");
        assert_eq!(view.treatment_status, TreatmentStatus::Pending);
        assert!(!view.health_dept_notified);
        assert!(view.case_id.0.starts_with("mex-"));
    }

    #[test]
    fn create_collects_missing_required_fields() {
        let service = build_service();
        match service.create(MedicalExceptionCreate::default()) {
            Err(MedicalServiceError::Validation(error)) => {
                assert_eq!(error.details.len(), 3);
            }
            other => panic!("expected validation failure, got {other:?}"),
        }
    }

    #[test]
    fn notifications_are_idempotent_and_restamp() {
        let service = build_service();
        let view = service.create(tb_case()).expect("case opens");

        let first = service
            .mark_health_dept_notified(&view.case_id)
            .expect("first notification");
        assert!(first.health_dept_notified);
        let first_stamp = first.health_dept_notify_date.expect("stamped");

        let second = service
            .mark_health_dept_notified(&view.case_id)
            .expect("repeat notification");
        assert!(second.health_dept_notified);
        let second_stamp = second.health_dept_notify_date.expect("stamped");
        assert!(second_stamp >= first_stamp);

        // The employer flag is independent and untouched.
        assert!(!second.employer_notified);
    }

    #[test]
    fn update_merges_partial_fields() {
        let service = build_service();
        let view = service.create(tb_case()).expect("case opens");

        let patch = MedicalExceptionPatch {
            treatment_status: Some("IN_TREATMENT".to_string()),
            remarks: Some("admitted to chest hospital".to_string()),
            ..MedicalExceptionPatch::default()
        };
        let updated = service.update(&view.case_id, patch).expect("patch applies");

        assert_eq!(updated.treatment_status, TreatmentStatus::InTreatment);
        assert_eq!(updated.remarks.as_deref(), Some("admitted to chest hospital"));
        assert_eq!(updated.disease_type, DiseaseType::Tuberculosis);
    }

    #[test]
    fn update_of_missing_case_is_not_found() {
        let service = build_service();
        let missing = CaseId("mex-404404".to_string());
        match service.update(&missing, MedicalExceptionPatch::default()) {
            Err(MedicalServiceError::CaseNotFound(id)) => assert_eq!(id, missing),
            other => panic!("expected case-not-found, got {other:?}"),
        }
    }

    #[test]
    fn list_filters_compose() {
        let service = build_service();
        service.create(tb_case()).expect("tb case");
        let mut hepatitis = tb_case();
        hepatitis.disease_type = Some("HEPATITIS_B".to_string());
        hepatitis.treatment_status = Some("RECOVERED".to_string());
        service.create(hepatitis).expect("hepatitis case");

        let tuberculosis = service
            .list(None, Some("TUBERCULOSIS"), None, PageRequest::default())
            .expect("filter by disease");
        assert_eq!(tuberculosis.total, 1);

        let recovered_hepatitis = service
            .list(
                Some("RECOVERED"),
                Some("HEPATITIS_B"),
                Some("nguyen"),
                PageRequest::default(),
            )
            .expect("combined filters");
        assert_eq!(recovered_hepatitis.total, 1);

        let mismatch = service
            .list(Some("DEPORTED"), Some("HEPATITIS_B"), None, PageRequest::default())
            .expect("combined filters with no hits");
        assert_eq!(mismatch.total, 0);
    }

    #[test]
    fn dashboard_counts_by_treatment_status() {
        let service = build_service();
        service.create(tb_case()).expect("pending case");
        let mut recovered = tb_case();
        recovered.treatment_status = Some("RECOVERED".to_string());
        service.create(recovered).expect("recovered case");

        let dashboard = service.dashboard().expect("dashboard");
        assert_eq!(dashboard.total, 2);
        assert_eq!(dashboard.pending, 1);
        assert_eq!(dashboard.recovered, 1);
        assert_eq!(dashboard.in_treatment, 0);
        assert_eq!(dashboard.deported, 0);
    }

    #[test]
    fn unknown_worker_cannot_open_a_case() {
        let service = build_service();
        let mut create = tb_case();
        create.worker_id = Some("W-0000".to_string());
        match service.create(create) {
            Err(MedicalServiceError::UnknownWorker(id)) => {
                assert_eq!(id, WorkerId("W-0000".to_string()));
            }
            other => panic!("expected unknown worker, got {other:?}"),
        }
    }
}
