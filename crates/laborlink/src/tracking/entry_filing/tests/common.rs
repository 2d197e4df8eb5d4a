use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;

use crate::tracking::directory::{DirectoryError, WorkerDirectory, WorkerId, WorkerIdentity};
use crate::tracking::entry_filing::domain::{EntryFilingRecord, EntryFilingUpdate};
use crate::tracking::entry_filing::repository::FilingRepository;
use crate::tracking::entry_filing::service::EntryFilingService;
use crate::tracking::RepositoryError;

pub(super) fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

pub(super) fn today() -> NaiveDate {
    date(2024, 6, 20)
}

pub(super) fn worker_id() -> WorkerId {
    WorkerId("W-1001".to_string())
}

pub(super) fn registered_workers() -> Vec<WorkerIdentity> {
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
    ]
}

#[derive(Default, Clone)]
pub(super) struct MemoryFilingRepository {
    pub(super) records: Arc<Mutex<HashMap<WorkerId, EntryFilingRecord>>>,
}

impl FilingRepository for MemoryFilingRepository {
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

pub(super) struct UnavailableFilingRepository;

impl FilingRepository for UnavailableFilingRepository {
    fn fetch(&self, _worker_id: &WorkerId) -> Result<Option<EntryFilingRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn upsert(&self, _record: EntryFilingRecord) -> Result<EntryFilingRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list_all(&self) -> Result<Vec<EntryFilingRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

#[derive(Default, Clone)]
pub(super) struct StaticWorkers {
    workers: HashMap<WorkerId, WorkerIdentity>,
}

impl StaticWorkers {
    pub(super) fn with(workers: Vec<WorkerIdentity>) -> Self {
        Self {
            workers: workers
                .into_iter()
                .map(|worker| (worker.worker_id.clone(), worker))
                .collect(),
        }
    }
}

impl WorkerDirectory for StaticWorkers {
    fn worker(&self, id: &WorkerId) -> Result<Option<WorkerIdentity>, DirectoryError> {
        Ok(self.workers.get(id).cloned())
    }
}

pub(super) fn build_service() -> (
    EntryFilingService<MemoryFilingRepository, StaticWorkers>,
    Arc<MemoryFilingRepository>,
) {
    let repository = Arc::new(MemoryFilingRepository::default());
    let workers = Arc::new(StaticWorkers::with(registered_workers()));
    let service = EntryFilingService::new(repository.clone(), workers);
    (service, repository)
}

pub(super) fn entry_only_update(entry_date: &str) -> EntryFilingUpdate {
    EntryFilingUpdate {
        entry_date: Some(entry_date.to_string()),
        ..EntryFilingUpdate::default()
    }
}

pub(super) fn arc_receipt_update(entry_date: &str, receipt_no: &str) -> EntryFilingUpdate {
    EntryFilingUpdate {
        entry_date: Some(entry_date.to_string()),
        arc_receipt_no: Some(receipt_no.to_string()),
        ..EntryFilingUpdate::default()
    }
}
