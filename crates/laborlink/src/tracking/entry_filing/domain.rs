use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::tracking::directory::{WorkerId, WorkerIdentity};
use crate::tracking::status::{aggregate, evaluate_item, ComplianceStatus};
use crate::tracking::{parse_optional_date, parse_wire_date, ExamResult, ValidationError};

/// Statutory windows measured in days from the entry date.
pub const ENTRY_REPORT_DEADLINE_DAYS: i64 = 3;
pub const INITIAL_EXAM_DEADLINE_DAYS: i64 = 3;
pub const ARC_DEADLINE_DAYS: i64 = 15;
pub const PERMIT_DEADLINE_DAYS: i64 = 15;

/// The permanent filing record kept per worker. All `*_status` fields and
/// `overall_compliance` are derived on every write and never edited
/// directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryFilingRecord {
    pub worker_id: WorkerId,
    pub entry_date: NaiveDate,
    pub flight_no: Option<String>,
    pub visa_no: Option<String>,

    pub entry_report_date: Option<NaiveDate>,
    pub entry_report_ref_no: Option<String>,
    pub entry_report_status: ComplianceStatus,

    pub initial_exam_date: Option<NaiveDate>,
    pub initial_exam_hospital: Option<String>,
    pub initial_exam_result: Option<ExamResult>,
    pub initial_exam_status: ComplianceStatus,

    pub arc_apply_date: Option<NaiveDate>,
    pub arc_receipt_no: Option<String>,
    pub arc_no: Option<String>,
    pub arc_status: ComplianceStatus,

    pub permit_apply_date: Option<NaiveDate>,
    pub permit_receipt_no: Option<String>,
    pub permit_no: Option<String>,
    pub permit_status: ComplianceStatus,

    pub overall_compliance: ComplianceStatus,
}

impl EntryFilingRecord {
    pub fn new(worker_id: WorkerId, fields: EntryFilingFields) -> Self {
        let mut record = Self {
            worker_id,
            entry_date: fields.entry_date,
            flight_no: None,
            visa_no: None,
            entry_report_date: None,
            entry_report_ref_no: None,
            entry_report_status: ComplianceStatus::Pending,
            initial_exam_date: None,
            initial_exam_hospital: None,
            initial_exam_result: None,
            initial_exam_status: ComplianceStatus::Pending,
            arc_apply_date: None,
            arc_receipt_no: None,
            arc_no: None,
            arc_status: ComplianceStatus::Pending,
            permit_apply_date: None,
            permit_receipt_no: None,
            permit_no: None,
            permit_status: ComplianceStatus::Pending,
            overall_compliance: ComplianceStatus::Pending,
        };
        record.apply(fields);
        record
    }

    /// Overlay the supplied fields; fields the caller omitted keep their
    /// stored value.
    pub fn apply(&mut self, fields: EntryFilingFields) {
        let EntryFilingFields {
            entry_date,
            flight_no,
            visa_no,
            entry_report_date,
            entry_report_ref_no,
            initial_exam_date,
            initial_exam_hospital,
            initial_exam_result,
            arc_apply_date,
            arc_receipt_no,
            arc_no,
            permit_apply_date,
            permit_receipt_no,
            permit_no,
        } = fields;

        self.entry_date = entry_date;
        overlay(&mut self.flight_no, flight_no);
        overlay(&mut self.visa_no, visa_no);
        overlay(&mut self.entry_report_date, entry_report_date);
        overlay(&mut self.entry_report_ref_no, entry_report_ref_no);
        overlay(&mut self.initial_exam_date, initial_exam_date);
        overlay(&mut self.initial_exam_hospital, initial_exam_hospital);
        overlay(&mut self.initial_exam_result, initial_exam_result);
        overlay(&mut self.arc_apply_date, arc_apply_date);
        overlay(&mut self.arc_receipt_no, arc_receipt_no);
        overlay(&mut self.arc_no, arc_no);
        overlay(&mut self.permit_apply_date, permit_apply_date);
        overlay(&mut self.permit_receipt_no, permit_receipt_no);
        overlay(&mut self.permit_no, permit_no);
    }

    /// Re-derive the four item statuses and the record-level aggregate as of
    /// `today`. Called by the store on every write.
    pub fn recompute_statuses(&mut self, today: NaiveDate) {
        let days_elapsed = (today - self.entry_date).num_days();

        self.entry_report_status = evaluate_item(
            self.entry_report_date,
            self.entry_report_ref_no.as_deref(),
            None,
            days_elapsed,
            ENTRY_REPORT_DEADLINE_DAYS,
        );

        // A passed exam is the completion evidence; the wire carries no
        // certificate number for this item.
        let exam_evidence = (self.initial_exam_result == Some(ExamResult::Pass)).then_some("PASS");
        self.initial_exam_status = evaluate_item(
            self.initial_exam_date,
            None,
            exam_evidence,
            days_elapsed,
            INITIAL_EXAM_DEADLINE_DAYS,
        );

        self.arc_status = evaluate_item(
            self.arc_apply_date,
            self.arc_receipt_no.as_deref(),
            self.arc_no.as_deref(),
            days_elapsed,
            ARC_DEADLINE_DAYS,
        );

        self.permit_status = evaluate_item(
            self.permit_apply_date,
            self.permit_receipt_no.as_deref(),
            self.permit_no.as_deref(),
            days_elapsed,
            PERMIT_DEADLINE_DAYS,
        );

        self.overall_compliance = aggregate(&[
            self.entry_report_status,
            self.initial_exam_status,
            self.arc_status,
            self.permit_status,
        ]);
    }
}

fn overlay<T>(slot: &mut Option<T>, value: Option<T>) {
    if value.is_some() {
        *slot = value;
    }
}

/// Raw PUT body. Dates and the exam result arrive as strings and are parsed
/// by [`EntryFilingUpdate::validate`] before any business logic runs.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryFilingUpdate {
    pub entry_date: Option<String>,
    pub flight_no: Option<String>,
    pub visa_no: Option<String>,
    pub entry_report_date: Option<String>,
    pub entry_report_ref_no: Option<String>,
    pub initial_exam_date: Option<String>,
    pub initial_exam_hospital: Option<String>,
    pub initial_exam_result: Option<String>,
    pub arc_apply_date: Option<String>,
    pub arc_receipt_no: Option<String>,
    pub arc_no: Option<String>,
    pub permit_apply_date: Option<String>,
    pub permit_receipt_no: Option<String>,
    pub permit_no: Option<String>,
}

impl EntryFilingUpdate {
    /// Parse every date-ish field, collecting all problems before rejecting.
    pub fn validate(self) -> Result<EntryFilingFields, ValidationError> {
        let mut details = Vec::new();

        let entry_date = match self.entry_date.as_deref() {
            Some(raw) => match parse_wire_date("entryDate", raw) {
                Ok(date) => Some(date),
                Err(detail) => {
                    details.push(detail);
                    None
                }
            },
            None => {
                details.push("entryDate is required".to_string());
                None
            }
        };

        let entry_report_date =
            parse_optional_date("entryReportDate", self.entry_report_date.as_deref(), &mut details);
        let initial_exam_date =
            parse_optional_date("initialExamDate", self.initial_exam_date.as_deref(), &mut details);
        let arc_apply_date =
            parse_optional_date("arcApplyDate", self.arc_apply_date.as_deref(), &mut details);
        let permit_apply_date =
            parse_optional_date("permitApplyDate", self.permit_apply_date.as_deref(), &mut details);

        let initial_exam_result = match self.initial_exam_result.as_deref() {
            None => None,
            Some(raw) if raw.trim().is_empty() => None,
            Some(raw) => match ExamResult::parse(raw) {
                Some(result) => Some(result),
                None => {
                    details.push(format!(
                        "initialExamResult must be one of PASS, FAIL, PENDING, got '{raw}'"
                    ));
                    None
                }
            },
        };

        if !details.is_empty() {
            return Err(ValidationError::new(details));
        }

        Ok(EntryFilingFields {
            // Presence checked above.
            entry_date: entry_date.ok_or_else(|| ValidationError::single("entryDate is required"))?,
            flight_no: self.flight_no,
            visa_no: self.visa_no,
            entry_report_date,
            entry_report_ref_no: self.entry_report_ref_no,
            initial_exam_date,
            initial_exam_hospital: self.initial_exam_hospital,
            initial_exam_result,
            arc_apply_date,
            arc_receipt_no: self.arc_receipt_no,
            arc_no: self.arc_no,
            permit_apply_date,
            permit_receipt_no: self.permit_receipt_no,
            permit_no: self.permit_no,
        })
    }
}

/// The validated, typed form of an update.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryFilingFields {
    pub entry_date: NaiveDate,
    pub flight_no: Option<String>,
    pub visa_no: Option<String>,
    pub entry_report_date: Option<NaiveDate>,
    pub entry_report_ref_no: Option<String>,
    pub initial_exam_date: Option<NaiveDate>,
    pub initial_exam_hospital: Option<String>,
    pub initial_exam_result: Option<ExamResult>,
    pub arc_apply_date: Option<NaiveDate>,
    pub arc_receipt_no: Option<String>,
    pub arc_no: Option<String>,
    pub permit_apply_date: Option<NaiveDate>,
    pub permit_receipt_no: Option<String>,
    pub permit_no: Option<String>,
}

/// Wire representation joined with worker identity. `entry_date` is absent
/// on the synthesized default for workers without a filing yet.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilingView {
    pub worker_id: WorkerId,
    pub worker_name_zh: String,
    pub worker_name_en: String,
    pub entry_date: Option<NaiveDate>,
    pub flight_no: Option<String>,
    pub visa_no: Option<String>,
    pub entry_report_date: Option<NaiveDate>,
    pub entry_report_ref_no: Option<String>,
    pub entry_report_status: ComplianceStatus,
    pub initial_exam_date: Option<NaiveDate>,
    pub initial_exam_hospital: Option<String>,
    pub initial_exam_result: Option<ExamResult>,
    pub initial_exam_status: ComplianceStatus,
    pub arc_apply_date: Option<NaiveDate>,
    pub arc_receipt_no: Option<String>,
    pub arc_no: Option<String>,
    pub arc_status: ComplianceStatus,
    pub permit_apply_date: Option<NaiveDate>,
    pub permit_receipt_no: Option<String>,
    pub permit_no: Option<String>,
    pub permit_status: ComplianceStatus,
    pub overall_compliance: ComplianceStatus,
}

impl FilingView {
    pub fn from_record(record: EntryFilingRecord, worker: WorkerIdentity) -> Self {
        Self {
            worker_id: record.worker_id,
            worker_name_zh: worker.name_zh,
            worker_name_en: worker.name_en,
            entry_date: Some(record.entry_date),
            flight_no: record.flight_no,
            visa_no: record.visa_no,
            entry_report_date: record.entry_report_date,
            entry_report_ref_no: record.entry_report_ref_no,
            entry_report_status: record.entry_report_status,
            initial_exam_date: record.initial_exam_date,
            initial_exam_hospital: record.initial_exam_hospital,
            initial_exam_result: record.initial_exam_result,
            initial_exam_status: record.initial_exam_status,
            arc_apply_date: record.arc_apply_date,
            arc_receipt_no: record.arc_receipt_no,
            arc_no: record.arc_no,
            arc_status: record.arc_status,
            permit_apply_date: record.permit_apply_date,
            permit_receipt_no: record.permit_receipt_no,
            permit_no: record.permit_no,
            permit_status: record.permit_status,
            overall_compliance: record.overall_compliance,
        }
    }

    /// The benign "no filing yet" default.
    pub fn stub(worker: WorkerIdentity) -> Self {
        Self {
            worker_id: worker.worker_id,
            worker_name_zh: worker.name_zh,
            worker_name_en: worker.name_en,
            entry_date: None,
            flight_no: None,
            visa_no: None,
            entry_report_date: None,
            entry_report_ref_no: None,
            entry_report_status: ComplianceStatus::Pending,
            initial_exam_date: None,
            initial_exam_hospital: None,
            initial_exam_result: None,
            initial_exam_status: ComplianceStatus::Pending,
            arc_apply_date: None,
            arc_receipt_no: None,
            arc_no: None,
            arc_status: ComplianceStatus::Pending,
            permit_apply_date: None,
            permit_receipt_no: None,
            permit_no: None,
            permit_status: ComplianceStatus::Pending,
            overall_compliance: ComplianceStatus::Pending,
        }
    }
}
