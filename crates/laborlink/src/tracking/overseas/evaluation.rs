//! Derivations the overseas store runs on every write.
//!
//! The blocking/completion rules here are deliberately feature-local and
//! distinct from the entry-filing aggregator: any one blocking condition
//! forces `BLOCKED`, completion requires every positive signal at once.

use chrono::{Months, NaiveDate};

use super::domain::{OverseasProgressRecord, OverseasStatus, PoliceStatus};
use crate::tracking::ExamResult;

/// A passport is deployable only while more than six months of validity
/// remain.
pub fn passport_valid_beyond_six_months(expiry: NaiveDate, today: NaiveDate) -> bool {
    match today.checked_add_months(Months::new(6)) {
        Some(horizon) => expiry > horizon,
        None => false,
    }
}

pub fn derive_overall(record: &OverseasProgressRecord) -> OverseasStatus {
    let blocked = record.medical_result == Some(ExamResult::Fail)
        || record.police_status == Some(PoliceStatus::Rejected)
        || record.passport_expiry_ok == Some(false)
        || record.arc_has_issues;
    if blocked {
        return OverseasStatus::Blocked;
    }

    let completed = record.medical_result == Some(ExamResult::Pass)
        && record.police_status == Some(PoliceStatus::Issued)
        && record.passport_expiry_ok == Some(true);
    if completed {
        OverseasStatus::Completed
    } else {
        OverseasStatus::InProgress
    }
}
