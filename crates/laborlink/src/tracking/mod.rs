//! Statutory compliance tracking workflows.
//!
//! Three record families share the same shape: a typed request DTO is
//! validated up front (collecting every problem into one
//! [`ValidationError`]), derived status fields are recomputed by pure
//! functions, and the result is written through a repository trait in a
//! single insert-or-replace. Worker and candidate identity comes from the
//! read-only [`directory`] traits and is only ever joined, never mutated.

pub mod directory;
pub mod entry_filing;
pub mod medical;
pub mod overseas;
pub mod paging;
pub mod status;

use chrono::NaiveDate;

pub use status::{aggregate, evaluate_item, ComplianceStatus};

/// Malformed or missing request input. Collected before any write happens
/// and surfaced to HTTP callers as a 400 with the `details` array.
#[derive(Debug, Clone, thiserror::Error)]
#[error("validation failed: {}", details.join("; "))]
pub struct ValidationError {
    pub details: Vec<String>,
}

impl ValidationError {
    pub fn new(details: Vec<String>) -> Self {
        Self { details }
    }

    pub fn single(detail: impl Into<String>) -> Self {
        Self {
            details: vec![detail.into()],
        }
    }
}

/// Storage failures shared by all tracking repositories.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Exam outcome used by both the post-arrival health exam and the overseas
/// medical checkpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExamResult {
    Pass,
    Fail,
    Pending,
}

impl ExamResult {
    pub const fn label(self) -> &'static str {
        match self {
            ExamResult::Pass => "PASS",
            ExamResult::Fail => "FAIL",
            ExamResult::Pending => "PENDING",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "PASS" => Some(Self::Pass),
            "FAIL" => Some(Self::Fail),
            "PENDING" => Some(Self::Pending),
            _ => None,
        }
    }
}

/// Parse a `YYYY-MM-DD` wire date, reporting the offending field on failure.
pub fn parse_wire_date(field: &str, raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| format!("{field} must be a YYYY-MM-DD date, got '{raw}'"))
}

pub(crate) fn parse_optional_date(
    field: &str,
    raw: Option<&str>,
    details: &mut Vec<String>,
) -> Option<NaiveDate> {
    let raw = raw?;
    if raw.trim().is_empty() {
        return None;
    }
    match parse_wire_date(field, raw) {
        Ok(date) => Some(date),
        Err(detail) => {
            details.push(detail);
            None
        }
    }
}

/// A receipt or certificate field counts as evidence only when it carries
/// visible characters.
pub(crate) fn has_value(field: Option<&str>) -> bool {
    field.is_some_and(|value| !value.trim().is_empty())
}
