//! Read-only lookups against the agency's worker and candidate registries.
//!
//! The tracking stores join identity fields for display but never mutate
//! either entity; the traits keep that boundary explicit and let tests run
//! against fixed in-memory registries.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Identifier wrapper for placed workers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorkerId(pub String);

impl fmt::Display for WorkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier wrapper for pre-arrival candidates.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CandidateId(pub String);

impl fmt::Display for CandidateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Display identity joined onto entry-filing and medical-exception views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkerIdentity {
    pub worker_id: WorkerId,
    pub name_zh: String,
    pub name_en: String,
}

impl WorkerIdentity {
    /// Placeholder identity for a row whose registry entry has gone missing;
    /// list views keep the row rather than dropping the whole page.
    pub fn unresolved(worker_id: WorkerId) -> Self {
        Self {
            worker_id,
            name_zh: String::new(),
            name_en: String::new(),
        }
    }
}

/// Display identity plus the passport fields the overseas checks read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateIdentity {
    pub candidate_id: CandidateId,
    pub name_zh: String,
    pub name_en: String,
    pub passport_no: Option<String>,
    pub passport_expiry: Option<NaiveDate>,
    pub nationality: Option<String>,
}

impl CandidateIdentity {
    pub fn unresolved(candidate_id: CandidateId) -> Self {
        Self {
            candidate_id,
            name_zh: String::new(),
            name_en: String::new(),
            passport_no: None,
            passport_expiry: None,
            nationality: None,
        }
    }
}

/// Registry lookup failure (the registry itself being unreachable; an
/// unknown id is an `Ok(None)`).
#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("directory unavailable: {0}")]
    Unavailable(String),
}

pub trait WorkerDirectory: Send + Sync {
    fn worker(&self, id: &WorkerId) -> Result<Option<WorkerIdentity>, DirectoryError>;
}

pub trait CandidateDirectory: Send + Sync {
    fn candidate(&self, id: &CandidateId) -> Result<Option<CandidateIdentity>, DirectoryError>;
}
