use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use chrono::{Duration, Local, NaiveDate};
use metrics_exporter_prometheus::PrometheusHandle;

use laborlink::tracking::directory::{
    CandidateDirectory, CandidateId, CandidateIdentity, DirectoryError, WorkerDirectory, WorkerId,
    WorkerIdentity,
};
use laborlink::tracking::entry_filing::{EntryFilingRecord, FilingRepository};
use laborlink::tracking::medical::{CaseId, MedicalExceptionRecord, MedicalExceptionRepository};
use laborlink::tracking::overseas::{OverseasProgressRecord, OverseasRepository};
use laborlink::tracking::RepositoryError;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryFilingRepository {
    records: Arc<Mutex<HashMap<WorkerId, EntryFilingRecord>>>,
}

impl FilingRepository for InMemoryFilingRepository {
    fn fetch(&self, worker_id: &WorkerId) -> Result<Option<EntryFilingRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(worker_id).cloned())
    }

    fn upsert(&self, record: EntryFilingRecord) -> Result<EntryFilingRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        guard.insert(record.worker_id.clone(), record.clone());
        Ok(record)
    }

    fn list_all(&self) -> Result<Vec<EntryFilingRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.values().cloned().collect())
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryOverseasRepository {
    records: Arc<Mutex<HashMap<CandidateId, OverseasProgressRecord>>>,
}

impl OverseasRepository for InMemoryOverseasRepository {
    fn fetch(
        &self,
        candidate_id: &CandidateId,
    ) -> Result<Option<OverseasProgressRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(candidate_id).cloned())
    }

    fn upsert(
        &self,
        record: OverseasProgressRecord,
    ) -> Result<OverseasProgressRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        guard.insert(record.candidate_id.clone(), record.clone());
        Ok(record)
    }

    fn list_all(&self) -> Result<Vec<OverseasProgressRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.values().cloned().collect())
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryMedicalRepository {
    records: Arc<Mutex<HashMap<CaseId, MedicalExceptionRecord>>>,
}

impl MedicalExceptionRepository for InMemoryMedicalRepository {
    fn fetch(&self, case_id: &CaseId) -> Result<Option<MedicalExceptionRecord>, RepositoryError> {
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

/// Fixed worker registry stood in for the agency's worker service.
#[derive(Default, Clone)]
pub(crate) struct SeededWorkerDirectory {
    workers: Arc<HashMap<WorkerId, WorkerIdentity>>,
}

impl SeededWorkerDirectory {
    pub(crate) fn with(workers: Vec<WorkerIdentity>) -> Self {
        Self {
            workers: Arc::new(
                workers
                    .into_iter()
                    .map(|worker| (worker.worker_id.clone(), worker))
                    .collect(),
            ),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.workers.len()
    }
}

impl WorkerDirectory for SeededWorkerDirectory {
    fn worker(&self, id: &WorkerId) -> Result<Option<WorkerIdentity>, DirectoryError> {
        Ok(self.workers.get(id).cloned())
    }
}

/// Fixed candidate registry stood in for the recruitment service.
#[derive(Default, Clone)]
pub(crate) struct SeededCandidateDirectory {
    candidates: Arc<HashMap<CandidateId, CandidateIdentity>>,
}

impl SeededCandidateDirectory {
    pub(crate) fn with(candidates: Vec<CandidateIdentity>) -> Self {
        Self {
            candidates: Arc::new(
                candidates
                    .into_iter()
                    .map(|candidate| (candidate.candidate_id.clone(), candidate))
                    .collect(),
            ),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.candidates.len()
    }
}

impl CandidateDirectory for SeededCandidateDirectory {
    fn candidate(&self, id: &CandidateId) -> Result<Option<CandidateIdentity>, DirectoryError> {
        Ok(self.candidates.get(id).cloned())
    }
}

pub(crate) fn seed_workers() -> Vec<WorkerIdentity> {
    vec![
        WorkerIdentity {
            worker_id: WorkerId("W-1001".to_string()),
            name_zh: "阮氏香".to_string(),
            name_en: "NGUYEN THI HUONG".to_string(),
        },
        WorkerIdentity {
            worker_id: WorkerId("W-1002".to_string()),
            name_zh: "蘇西".to_string(),
            name_en: "SITI RAHAYU".to_string(),
        },
        WorkerIdentity {
            worker_id: WorkerId("W-1003".to_string()),
            name_zh: "巴育".to_string(),
            name_en: "SOMCHAI PRAYUT".to_string(),
        },
    ]
}

pub(crate) fn seed_candidates() -> Vec<CandidateIdentity> {
    let today = Local::now().date_naive();
    vec![
        CandidateIdentity {
            candidate_id: CandidateId("C-501".to_string()),
            name_zh: "武氏蘭".to_string(),
            name_en: "VU THI LAN".to_string(),
            passport_no: Some("N1234567".to_string()),
            passport_expiry: Some(today + Duration::days(700)),
            nationality: Some("VN".to_string()),
        },
        CandidateIdentity {
            candidate_id: CandidateId("C-502".to_string()),
            name_zh: "安迪".to_string(),
            name_en: "ANDI PRATAMA".to_string(),
            passport_no: Some("X7654321".to_string()),
            passport_expiry: Some(today + Duration::days(120)),
            nationality: Some("ID".to_string()),
        },
        CandidateIdentity {
            candidate_id: CandidateId("C-503".to_string()),
            name_zh: "瑪麗亞".to_string(),
            name_en: "MARIA SANTOS".to_string(),
            passport_no: Some("P5550123".to_string()),
            passport_expiry: Some(today + Duration::days(400)),
            nationality: Some("PH".to_string()),
        },
    ]
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
