use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;

use super::domain::{EntryFilingRecord, EntryFilingUpdate, FilingView};
use super::repository::FilingRepository;
use crate::tracking::directory::{DirectoryError, WorkerDirectory, WorkerId, WorkerIdentity};
use crate::tracking::paging::{Page, PageRequest};
use crate::tracking::status::ComplianceStatus;
use crate::tracking::{RepositoryError, ValidationError};

/// Service composing validation, status derivation, and the filing store.
pub struct EntryFilingService<R, W> {
    repository: Arc<R>,
    workers: Arc<W>,
}

impl<R, W> EntryFilingService<R, W>
where
    R: FilingRepository + 'static,
    W: WorkerDirectory + 'static,
{
    pub fn new(repository: Arc<R>, workers: Arc<W>) -> Self {
        Self { repository, workers }
    }

    /// Fetch a worker's filing. A worker without a record gets the benign
    /// all-pending stub rather than an error.
    pub fn get(&self, worker_id: &WorkerId) -> Result<FilingView, FilingServiceError> {
        let worker = self.resolve_worker(worker_id)?;
        match self.repository.fetch(worker_id)? {
            Some(record) => Ok(FilingView::from_record(record, worker)),
            None => Ok(FilingView::stub(worker)),
        }
    }

    /// Validate, merge, re-derive every status as of `today`, and persist in
    /// one atomic write.
    pub fn upsert(
        &self,
        worker_id: &WorkerId,
        update: EntryFilingUpdate,
        today: NaiveDate,
    ) -> Result<FilingView, FilingServiceError> {
        let fields = update.validate()?;
        let worker = self.resolve_worker(worker_id)?;

        let mut record = match self.repository.fetch(worker_id)? {
            Some(existing) => {
                if existing.entry_date != fields.entry_date {
                    return Err(ValidationError::single(
                        "entryDate is immutable once set; it anchors every deadline",
                    )
                    .into());
                }
                let mut merged = existing;
                merged.apply(fields);
                merged
            }
            None => EntryFilingRecord::new(worker_id.clone(), fields),
        };

        record.recompute_statuses(today);
        let stored = self.repository.upsert(record)?;
        Ok(FilingView::from_record(stored, worker))
    }

    /// Paginated listing filtered by overall compliance and/or a
    /// case-insensitive name search.
    pub fn list(
        &self,
        status: Option<&str>,
        search: Option<&str>,
        page: PageRequest,
    ) -> Result<Page<FilingView>, FilingServiceError> {
        let status = parse_status_filter(status)?;
        let needle = search.map(str::to_lowercase);

        let mut records = self.repository.list_all()?;
        records.sort_by(|a, b| a.worker_id.0.cmp(&b.worker_id.0));

        let mut views = Vec::new();
        for record in records {
            if let Some(wanted) = status {
                if record.overall_compliance != wanted {
                    continue;
                }
            }
            let worker = self
                .workers
                .worker(&record.worker_id)?
                .unwrap_or_else(|| WorkerIdentity::unresolved(record.worker_id.clone()));
            if let Some(needle) = &needle {
                let matches = worker.name_zh.to_lowercase().contains(needle)
                    || worker.name_en.to_lowercase().contains(needle);
                if !matches {
                    continue;
                }
            }
            views.push(FilingView::from_record(record, worker));
        }

        Ok(Page::from_items(views, page))
    }

    /// Aggregate counts for the compliance dashboard.
    pub fn dashboard(&self) -> Result<ComplianceDashboard, FilingServiceError> {
        let records = self.repository.list_all()?;
        let total = records.len() as u64;
        let count = |wanted: ComplianceStatus| {
            records
                .iter()
                .filter(|record| record.overall_compliance == wanted)
                .count() as u64
        };
        let compliant = count(ComplianceStatus::Compliant);
        let overdue = count(ComplianceStatus::Overdue);
        let pending = count(ComplianceStatus::Pending);

        let compliance_rate = if total == 0 {
            0
        } else {
            ((compliant as f64 / total as f64) * 100.0).round() as u32
        };

        Ok(ComplianceDashboard {
            total,
            compliant,
            overdue,
            pending,
            compliance_rate,
        })
    }

    fn resolve_worker(&self, worker_id: &WorkerId) -> Result<WorkerIdentity, FilingServiceError> {
        self.workers
            .worker(worker_id)?
            .ok_or_else(|| FilingServiceError::UnknownWorker(worker_id.clone()))
    }
}

pub(crate) fn parse_status_filter(
    raw: Option<&str>,
) -> Result<Option<ComplianceStatus>, ValidationError> {
    match raw {
        None => Ok(None),
        Some(value) if value.trim().is_empty() => Ok(None),
        Some(value) => ComplianceStatus::parse(value)
            .map(Some)
            .ok_or_else(|| ValidationError::single(format!("status filter '{value}' is not a known compliance status"))),
    }
}

/// Counts rendered on the entry-filing dashboard. Warning and submitted
/// records appear only in `total`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceDashboard {
    pub total: u64,
    pub compliant: u64,
    pub overdue: u64,
    pub pending: u64,
    pub compliance_rate: u32,
}

/// Error raised by the entry-filing service.
#[derive(Debug, thiserror::Error)]
pub enum FilingServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("worker {0} is not registered")]
    UnknownWorker(WorkerId),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Directory(#[from] DirectoryError),
}
