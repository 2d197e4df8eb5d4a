use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;

use crate::tracking::directory::{
    CandidateDirectory, CandidateId, CandidateIdentity, DirectoryError,
};
use crate::tracking::overseas::domain::{OverseasProgressRecord, OverseasProgressUpdate};
use crate::tracking::overseas::repository::OverseasRepository;
use crate::tracking::overseas::service::OverseasProgressService;
use crate::tracking::RepositoryError;

pub(super) fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

pub(super) fn today() -> NaiveDate {
    date(2024, 6, 20)
}

pub(super) fn candidate_id() -> CandidateId {
    CandidateId("C-501".to_string())
}

pub(super) fn registered_candidates() -> Vec<CandidateIdentity> {
    vec![
        CandidateIdentity {
            candidate_id: CandidateId("C-501".to_string()),
            name_zh: "武氏蘭".to_string(),
            name_en: "VU THI LAN".to_string(),
            passport_no: Some("N1234567".to_string()),
            passport_expiry: Some(date(2026, 1, 15)),
            nationality: Some("VN".to_string()),
        },
        CandidateIdentity {
            candidate_id: CandidateId("C-502".to_string()),
            name_zh: "安迪".to_string(),
            name_en: "ANDI PRATAMA".to_string(),
            passport_no: Some("X7654321".to_string()),
            // Inside the six-month window as of the fixture date.
            passport_expiry: Some(date(2024, 9, 1)),
            nationality: Some("ID".to_string()),
        },
        CandidateIdentity {
            candidate_id: CandidateId("C-503".to_string()),
            name_zh: "瑪麗亞".to_string(),
            name_en: "MARIA SANTOS".to_string(),
            passport_no: None,
            passport_expiry: None,
            nationality: Some("PH".to_string()),
        },
    ]
}

#[derive(Default, Clone)]
pub(super) struct MemoryOverseasRepository {
    pub(super) records: Arc<Mutex<HashMap<CandidateId, OverseasProgressRecord>>>,
}

impl OverseasRepository for MemoryOverseasRepository {
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
pub(super) struct StaticCandidates {
    candidates: HashMap<CandidateId, CandidateIdentity>,
}

impl StaticCandidates {
    pub(super) fn with(candidates: Vec<CandidateIdentity>) -> Self {
        Self {
            candidates: candidates
                .into_iter()
                .map(|candidate| (candidate.candidate_id.clone(), candidate))
                .collect(),
        }
    }
}

impl CandidateDirectory for StaticCandidates {
    fn candidate(&self, id: &CandidateId) -> Result<Option<CandidateIdentity>, DirectoryError> {
        Ok(self.candidates.get(id).cloned())
    }
}

pub(super) fn build_service() -> (
    OverseasProgressService<MemoryOverseasRepository, StaticCandidates>,
    Arc<MemoryOverseasRepository>,
) {
    let repository = Arc::new(MemoryOverseasRepository::default());
    let candidates = Arc::new(StaticCandidates::with(registered_candidates()));
    let service = OverseasProgressService::new(repository.clone(), candidates);
    (service, repository)
}

pub(super) fn passport_checked_update() -> OverseasProgressUpdate {
    OverseasProgressUpdate {
        passport_checked: Some(true),
        ..OverseasProgressUpdate::default()
    }
}
