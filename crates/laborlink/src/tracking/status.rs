//! Deadline status evaluation shared by the filing workflows.
//!
//! Both functions are pure so the thresholds can be unit tested without a
//! repository behind them; the stores call them on every write and persist
//! the result alongside the caller-supplied fields.

use serde::{Deserialize, Serialize};

use super::has_value;
use chrono::NaiveDate;

/// Where a deadline-bound item currently stands.
///
/// `Approved` is never produced by [`evaluate_item`]; it arrives from
/// downstream adjudication of a filed application and satisfies the
/// aggregate the same way `Compliant` does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComplianceStatus {
    Pending,
    Warning,
    Submitted,
    Compliant,
    Approved,
    Overdue,
}

impl ComplianceStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ComplianceStatus::Pending => "PENDING",
            ComplianceStatus::Warning => "WARNING",
            ComplianceStatus::Submitted => "SUBMITTED",
            ComplianceStatus::Compliant => "COMPLIANT",
            ComplianceStatus::Approved => "APPROVED",
            ComplianceStatus::Overdue => "OVERDUE",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "PENDING" => Some(Self::Pending),
            "WARNING" => Some(Self::Warning),
            "SUBMITTED" => Some(Self::Submitted),
            "COMPLIANT" => Some(Self::Compliant),
            "APPROVED" => Some(Self::Approved),
            "OVERDUE" => Some(Self::Overdue),
            _ => None,
        }
    }
}

/// Evaluate a single deadline-bound item.
///
/// Evidence of filing outranks timing: a receipt or certificate number alone
/// proves timely filing even when the date field was never entered. This
/// leniency is a deliberate policy, not a gap.
pub fn evaluate_item(
    evidence_date: Option<NaiveDate>,
    receipt_or_ref_no: Option<&str>,
    final_cert_no: Option<&str>,
    days_elapsed: i64,
    deadline_days: i64,
) -> ComplianceStatus {
    if has_value(final_cert_no) || has_value(receipt_or_ref_no) {
        return ComplianceStatus::Compliant;
    }
    if evidence_date.is_some() {
        return ComplianceStatus::Submitted;
    }
    if days_elapsed > deadline_days {
        return ComplianceStatus::Overdue;
    }
    if days_elapsed >= deadline_days - 1 {
        return ComplianceStatus::Warning;
    }
    ComplianceStatus::Pending
}

/// Fold per-item statuses into one record-level status.
///
/// Overdue dominates, then warning; a record is compliant only when every
/// item is compliant or approved. An empty list certifies nothing and stays
/// pending.
pub fn aggregate(statuses: &[ComplianceStatus]) -> ComplianceStatus {
    if statuses.is_empty() {
        return ComplianceStatus::Pending;
    }
    if statuses.contains(&ComplianceStatus::Overdue) {
        return ComplianceStatus::Overdue;
    }
    if statuses.contains(&ComplianceStatus::Warning) {
        return ComplianceStatus::Warning;
    }
    let all_satisfied = statuses
        .iter()
        .all(|status| matches!(status, ComplianceStatus::Compliant | ComplianceStatus::Approved));
    if all_satisfied {
        return ComplianceStatus::Compliant;
    }
    ComplianceStatus::Pending
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn receipt_number_alone_is_compliant() {
        // Evidence outranks timing even when the item is long past deadline.
        let status = evaluate_item(None, Some("R123"), None, 40, 15);
        assert_eq!(status, ComplianceStatus::Compliant);
    }

    #[test]
    fn certificate_outranks_every_other_input() {
        let status = evaluate_item(Some(date(2024, 1, 20)), None, Some("ARC-9"), 100, 3);
        assert_eq!(status, ComplianceStatus::Compliant);
    }

    #[test]
    fn whitespace_receipt_is_not_evidence() {
        let status = evaluate_item(None, Some("   "), Some(""), 2, 15);
        assert_eq!(status, ComplianceStatus::Pending);
    }

    #[test]
    fn filing_date_without_receipt_is_submitted() {
        let status = evaluate_item(Some(date(2024, 1, 2)), None, None, 20, 15);
        assert_eq!(status, ComplianceStatus::Submitted);
    }

    #[test]
    fn past_deadline_without_evidence_is_overdue() {
        assert_eq!(evaluate_item(None, None, None, 16, 15), ComplianceStatus::Overdue);
        assert_eq!(evaluate_item(None, None, None, 20, 15), ComplianceStatus::Overdue);
    }

    #[test]
    fn one_day_of_slack_before_breach_warns() {
        assert_eq!(evaluate_item(None, None, None, 14, 15), ComplianceStatus::Warning);
        assert_eq!(evaluate_item(None, None, None, 15, 15), ComplianceStatus::Warning);
        assert_eq!(evaluate_item(None, None, None, 13, 15), ComplianceStatus::Pending);
    }

    #[test]
    fn overdue_dominates_the_aggregate() {
        let statuses = [
            ComplianceStatus::Compliant,
            ComplianceStatus::Warning,
            ComplianceStatus::Overdue,
        ];
        assert_eq!(aggregate(&statuses), ComplianceStatus::Overdue);
    }

    #[test]
    fn warning_dominates_when_nothing_is_overdue() {
        let statuses = [
            ComplianceStatus::Compliant,
            ComplianceStatus::Warning,
            ComplianceStatus::Pending,
        ];
        assert_eq!(aggregate(&statuses), ComplianceStatus::Warning);
    }

    #[test]
    fn approved_counts_as_satisfied() {
        let statuses = [ComplianceStatus::Compliant, ComplianceStatus::Approved];
        assert_eq!(aggregate(&statuses), ComplianceStatus::Compliant);
    }

    #[test]
    fn submitted_items_keep_the_record_pending() {
        let statuses = [ComplianceStatus::Compliant, ComplianceStatus::Submitted];
        assert_eq!(aggregate(&statuses), ComplianceStatus::Pending);
    }

    #[test]
    fn empty_input_certifies_nothing() {
        assert_eq!(aggregate(&[]), ComplianceStatus::Pending);
    }
}
