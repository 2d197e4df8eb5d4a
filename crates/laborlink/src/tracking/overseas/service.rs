use std::sync::Arc;

use chrono::NaiveDate;

use super::domain::{
    CheckpointSummary, OverseasProgressRecord, OverseasProgressUpdate, OverseasProgressView,
    OverseasStatus, PoliceStatus, ProgressReport,
};
use super::evaluation::{derive_overall, passport_valid_beyond_six_months};
use super::repository::OverseasRepository;
use crate::tracking::directory::{
    CandidateDirectory, CandidateId, CandidateIdentity, DirectoryError,
};
use crate::tracking::paging::{Page, PageRequest};
use crate::tracking::{ExamResult, RepositoryError, ValidationError};

/// Service composing validation, the passport-validity derivation, and the
/// overseas progress store.
pub struct OverseasProgressService<R, C> {
    repository: Arc<R>,
    candidates: Arc<C>,
}

impl<R, C> OverseasProgressService<R, C>
where
    R: OverseasRepository + 'static,
    C: CandidateDirectory + 'static,
{
    pub fn new(repository: Arc<R>, candidates: Arc<C>) -> Self {
        Self {
            repository,
            candidates,
        }
    }

    /// Fetch a candidate's progress; absence synthesizes the empty
    /// in-progress default.
    pub fn get(&self, candidate_id: &CandidateId) -> Result<OverseasProgressView, OverseasServiceError> {
        let candidate = self.resolve_candidate(candidate_id)?;
        match self.repository.fetch(candidate_id)? {
            Some(record) => Ok(OverseasProgressView::from_record(record, candidate)),
            None => Ok(OverseasProgressView::stub(candidate)),
        }
    }

    /// Validate, merge, re-derive passport validity and the overall status
    /// as of `today`, and persist atomically.
    ///
    /// When the passport has been sighted and the registry knows its expiry,
    /// the derived validity always overrides whatever the caller sent.
    pub fn upsert(
        &self,
        candidate_id: &CandidateId,
        update: OverseasProgressUpdate,
        today: NaiveDate,
    ) -> Result<OverseasProgressView, OverseasServiceError> {
        let fields = update.validate()?;
        let candidate = self.resolve_candidate(candidate_id)?;

        let mut record = match self.repository.fetch(candidate_id)? {
            Some(existing) => existing,
            None => OverseasProgressRecord::new(candidate_id.clone()),
        };
        record.apply(fields);

        if record.passport_checked {
            if let Some(expiry) = candidate.passport_expiry {
                record.passport_expiry_ok =
                    Some(passport_valid_beyond_six_months(expiry, today));
            }
        }
        record.overall_status = derive_overall(&record);

        let stored = self.repository.upsert(record)?;
        Ok(OverseasProgressView::from_record(stored, candidate))
    }

    /// Paginated listing filtered by overall status and/or a search over
    /// candidate names (both scripts) and passport number.
    pub fn list(
        &self,
        status: Option<&str>,
        search: Option<&str>,
        page: PageRequest,
    ) -> Result<Page<OverseasProgressView>, OverseasServiceError> {
        let status = parse_status_filter(status)?;
        let needle = search.map(str::to_lowercase);

        let mut records = self.repository.list_all()?;
        records.sort_by(|a, b| a.candidate_id.0.cmp(&b.candidate_id.0));

        let mut views = Vec::new();
        for record in records {
            if let Some(wanted) = status {
                if record.overall_status != wanted {
                    continue;
                }
            }
            let candidate = self
                .candidates
                .candidate(&record.candidate_id)?
                .unwrap_or_else(|| CandidateIdentity::unresolved(record.candidate_id.clone()));
            if let Some(needle) = &needle {
                let passport = candidate.passport_no.as_deref().unwrap_or("");
                let matches = candidate.name_zh.to_lowercase().contains(needle)
                    || candidate.name_en.to_lowercase().contains(needle)
                    || passport.to_lowercase().contains(needle);
                if !matches {
                    continue;
                }
            }
            views.push(OverseasProgressView::from_record(record, candidate));
        }

        Ok(Page::from_items(views, page))
    }

    /// Render the four-checkpoint summary. A report cannot be produced from
    /// nothing, so absence of a record is an error here.
    pub fn report(&self, candidate_id: &CandidateId) -> Result<ProgressReport, OverseasServiceError> {
        let candidate = self.resolve_candidate(candidate_id)?;
        let record = self
            .repository
            .fetch(candidate_id)?
            .ok_or_else(|| OverseasServiceError::RecordNotFound(candidate_id.clone()))?;

        let checkpoints = vec![
            CheckpointSummary {
                checkpoint: "medical_exam",
                status: medical_summary(&record),
                remark: record.medical_remark.clone(),
            },
            CheckpointSummary {
                checkpoint: "police_clearance",
                status: police_summary(&record),
                remark: record.police_remark.clone(),
            },
            CheckpointSummary {
                checkpoint: "passport_check",
                status: passport_summary(&record),
                remark: record.passport_remark.clone(),
            },
            CheckpointSummary {
                checkpoint: "arc_check",
                status: arc_summary(&record),
                remark: record.arc_remark.clone(),
            },
        ];

        Ok(ProgressReport {
            candidate_id: record.candidate_id,
            candidate_name_zh: candidate.name_zh,
            candidate_name_en: candidate.name_en,
            checkpoints,
            overall_status: record.overall_status,
        })
    }

    fn resolve_candidate(
        &self,
        candidate_id: &CandidateId,
    ) -> Result<CandidateIdentity, OverseasServiceError> {
        self.candidates
            .candidate(candidate_id)?
            .ok_or_else(|| OverseasServiceError::UnknownCandidate(candidate_id.clone()))
    }
}

fn medical_summary(record: &OverseasProgressRecord) -> String {
    match (record.medical_result, record.medical_exam_date) {
        (Some(ExamResult::Pass), Some(date)) => format!("passed on {date}"),
        (Some(ExamResult::Pass), None) => "passed".to_string(),
        (Some(ExamResult::Fail), _) => "failed".to_string(),
        _ => "pending".to_string(),
    }
}

fn police_summary(record: &OverseasProgressRecord) -> String {
    match (record.police_status, record.police_clearance_date) {
        (Some(PoliceStatus::Issued), Some(date)) => format!("issued on {date}"),
        (Some(PoliceStatus::Issued), None) => "issued".to_string(),
        (Some(PoliceStatus::Rejected), _) => "rejected".to_string(),
        _ => "pending".to_string(),
    }
}

fn passport_summary(record: &OverseasProgressRecord) -> String {
    if !record.passport_checked {
        return "not checked yet".to_string();
    }
    match record.passport_expiry_ok {
        Some(true) => "valid beyond six months".to_string(),
        Some(false) => "expires within six months".to_string(),
        None => "checked, expiry unknown".to_string(),
    }
}

fn arc_summary(record: &OverseasProgressRecord) -> String {
    if !record.arc_checked {
        return "not checked yet".to_string();
    }
    if record.arc_has_issues {
        "issues found".to_string()
    } else {
        "no issues".to_string()
    }
}

fn parse_status_filter(
    raw: Option<&str>,
) -> Result<Option<OverseasStatus>, ValidationError> {
    match raw {
        None => Ok(None),
        Some(value) if value.trim().is_empty() => Ok(None),
        Some(value) => OverseasStatus::parse(value)
            .map(Some)
            .ok_or_else(|| ValidationError::single(format!("status filter '{value}' is not a known overseas status"))),
    }
}

/// Error raised by the overseas progress service.
#[derive(Debug, thiserror::Error)]
pub enum OverseasServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("candidate {0} is not registered")]
    UnknownCandidate(CandidateId),
    #[error("no overseas progress recorded for candidate {0}")]
    RecordNotFound(CandidateId),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Directory(#[from] DirectoryError),
}
