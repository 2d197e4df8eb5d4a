use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::tracking::directory::{CandidateId, CandidateIdentity};
use crate::tracking::{parse_optional_date, ExamResult, ValidationError};

/// Police clearance certificate state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PoliceStatus {
    Issued,
    Pending,
    Rejected,
}

impl PoliceStatus {
    pub const fn label(self) -> &'static str {
        match self {
            PoliceStatus::Issued => "ISSUED",
            PoliceStatus::Pending => "PENDING",
            PoliceStatus::Rejected => "REJECTED",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "ISSUED" => Some(Self::Issued),
            "PENDING" => Some(Self::Pending),
            "REJECTED" => Some(Self::Rejected),
            _ => None,
        }
    }
}

/// Record-level state of the pre-arrival pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OverseasStatus {
    Blocked,
    Completed,
    InProgress,
}

impl OverseasStatus {
    pub const fn label(self) -> &'static str {
        match self {
            OverseasStatus::Blocked => "BLOCKED",
            OverseasStatus::Completed => "COMPLETED",
            OverseasStatus::InProgress => "IN_PROGRESS",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "BLOCKED" => Some(Self::Blocked),
            "COMPLETED" => Some(Self::Completed),
            "IN_PROGRESS" => Some(Self::InProgress),
            _ => None,
        }
    }
}

/// One progress record per candidate. `passport_expiry_ok` and
/// `overall_status` are derived on every write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverseasProgressRecord {
    pub candidate_id: CandidateId,

    pub medical_exam_date: Option<NaiveDate>,
    pub medical_result: Option<ExamResult>,
    pub medical_remark: Option<String>,

    pub police_clearance_date: Option<NaiveDate>,
    pub police_status: Option<PoliceStatus>,
    pub police_remark: Option<String>,

    pub passport_checked: bool,
    pub passport_expiry_ok: Option<bool>,
    pub passport_remark: Option<String>,

    pub arc_checked: bool,
    pub arc_has_issues: bool,
    pub arc_remark: Option<String>,

    pub overall_status: OverseasStatus,
}

impl OverseasProgressRecord {
    pub fn new(candidate_id: CandidateId) -> Self {
        Self {
            candidate_id,
            medical_exam_date: None,
            medical_result: None,
            medical_remark: None,
            police_clearance_date: None,
            police_status: None,
            police_remark: None,
            passport_checked: false,
            passport_expiry_ok: None,
            passport_remark: None,
            arc_checked: false,
            arc_has_issues: false,
            arc_remark: None,
            overall_status: OverseasStatus::InProgress,
        }
    }

    /// Overlay supplied fields; omitted fields keep their stored value.
    pub fn apply(&mut self, fields: OverseasProgressFields) {
        let OverseasProgressFields {
            medical_exam_date,
            medical_result,
            medical_remark,
            police_clearance_date,
            police_status,
            police_remark,
            passport_checked,
            passport_expiry_ok,
            passport_remark,
            arc_checked,
            arc_has_issues,
            arc_remark,
        } = fields;

        overlay(&mut self.medical_exam_date, medical_exam_date);
        overlay(&mut self.medical_result, medical_result);
        overlay(&mut self.medical_remark, medical_remark);
        overlay(&mut self.police_clearance_date, police_clearance_date);
        overlay(&mut self.police_status, police_status);
        overlay(&mut self.police_remark, police_remark);
        if let Some(checked) = passport_checked {
            self.passport_checked = checked;
        }
        overlay(&mut self.passport_expiry_ok, passport_expiry_ok);
        overlay(&mut self.passport_remark, passport_remark);
        if let Some(checked) = arc_checked {
            self.arc_checked = checked;
        }
        if let Some(has_issues) = arc_has_issues {
            self.arc_has_issues = has_issues;
        }
        overlay(&mut self.arc_remark, arc_remark);
    }
}

fn overlay<T>(slot: &mut Option<T>, value: Option<T>) {
    if value.is_some() {
        *slot = value;
    }
}

/// Raw PUT body; dates and enums arrive as strings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverseasProgressUpdate {
    pub medical_exam_date: Option<String>,
    pub medical_result: Option<String>,
    pub medical_remark: Option<String>,
    pub police_clearance_date: Option<String>,
    pub police_status: Option<String>,
    pub police_remark: Option<String>,
    pub passport_checked: Option<bool>,
    pub passport_expiry_ok: Option<bool>,
    pub passport_remark: Option<String>,
    pub arc_checked: Option<bool>,
    pub arc_has_issues: Option<bool>,
    pub arc_remark: Option<String>,
}

impl OverseasProgressUpdate {
    pub fn validate(self) -> Result<OverseasProgressFields, ValidationError> {
        let mut details = Vec::new();

        let medical_exam_date =
            parse_optional_date("medicalExamDate", self.medical_exam_date.as_deref(), &mut details);
        let police_clearance_date = parse_optional_date(
            "policeClearanceDate",
            self.police_clearance_date.as_deref(),
            &mut details,
        );

        let medical_result = parse_enum(
            "medicalResult",
            self.medical_result.as_deref(),
            "PASS, FAIL, PENDING",
            ExamResult::parse,
            &mut details,
        );
        let police_status = parse_enum(
            "policeStatus",
            self.police_status.as_deref(),
            "ISSUED, PENDING, REJECTED",
            PoliceStatus::parse,
            &mut details,
        );

        if !details.is_empty() {
            return Err(ValidationError::new(details));
        }

        Ok(OverseasProgressFields {
            medical_exam_date,
            medical_result,
            medical_remark: self.medical_remark,
            police_clearance_date,
            police_status,
            police_remark: self.police_remark,
            passport_checked: self.passport_checked,
            passport_expiry_ok: self.passport_expiry_ok,
            passport_remark: self.passport_remark,
            arc_checked: self.arc_checked,
            arc_has_issues: self.arc_has_issues,
            arc_remark: self.arc_remark,
        })
    }
}

fn parse_enum<T>(
    field: &str,
    raw: Option<&str>,
    allowed: &str,
    parse: impl Fn(&str) -> Option<T>,
    details: &mut Vec<String>,
) -> Option<T> {
    let raw = raw?;
    if raw.trim().is_empty() {
        return None;
    }
    match parse(raw) {
        Some(value) => Some(value),
        None => {
            details.push(format!("{field} must be one of {allowed}, got '{raw}'"));
            None
        }
    }
}

/// Validated, typed form of an update.
#[derive(Debug, Clone, PartialEq)]
pub struct OverseasProgressFields {
    pub medical_exam_date: Option<NaiveDate>,
    pub medical_result: Option<ExamResult>,
    pub medical_remark: Option<String>,
    pub police_clearance_date: Option<NaiveDate>,
    pub police_status: Option<PoliceStatus>,
    pub police_remark: Option<String>,
    pub passport_checked: Option<bool>,
    pub passport_expiry_ok: Option<bool>,
    pub passport_remark: Option<String>,
    pub arc_checked: Option<bool>,
    pub arc_has_issues: Option<bool>,
    pub arc_remark: Option<String>,
}

/// Wire representation joined with candidate identity.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverseasProgressView {
    pub candidate_id: CandidateId,
    pub candidate_name_zh: String,
    pub candidate_name_en: String,
    pub passport_no: Option<String>,
    pub nationality: Option<String>,
    pub medical_exam_date: Option<NaiveDate>,
    pub medical_result: Option<ExamResult>,
    pub medical_remark: Option<String>,
    pub police_clearance_date: Option<NaiveDate>,
    pub police_status: Option<PoliceStatus>,
    pub police_remark: Option<String>,
    pub passport_checked: bool,
    pub passport_expiry_ok: Option<bool>,
    pub passport_remark: Option<String>,
    pub arc_checked: bool,
    pub arc_has_issues: bool,
    pub arc_remark: Option<String>,
    pub overall_status: OverseasStatus,
}

impl OverseasProgressView {
    pub fn from_record(record: OverseasProgressRecord, candidate: CandidateIdentity) -> Self {
        Self {
            candidate_id: record.candidate_id,
            candidate_name_zh: candidate.name_zh,
            candidate_name_en: candidate.name_en,
            passport_no: candidate.passport_no,
            nationality: candidate.nationality,
            medical_exam_date: record.medical_exam_date,
            medical_result: record.medical_result,
            medical_remark: record.medical_remark,
            police_clearance_date: record.police_clearance_date,
            police_status: record.police_status,
            police_remark: record.police_remark,
            passport_checked: record.passport_checked,
            passport_expiry_ok: record.passport_expiry_ok,
            passport_remark: record.passport_remark,
            arc_checked: record.arc_checked,
            arc_has_issues: record.arc_has_issues,
            arc_remark: record.arc_remark,
            overall_status: record.overall_status,
        }
    }

    /// The benign "no progress recorded yet" default.
    pub fn stub(candidate: CandidateIdentity) -> Self {
        let candidate_id = candidate.candidate_id.clone();
        Self::from_record(OverseasProgressRecord::new(candidate_id), candidate)
    }
}

/// Fixed four-checkpoint summary rendered for case officers.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressReport {
    pub candidate_id: CandidateId,
    pub candidate_name_zh: String,
    pub candidate_name_en: String,
    pub checkpoints: Vec<CheckpointSummary>,
    pub overall_status: OverseasStatus,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckpointSummary {
    pub checkpoint: &'static str,
    pub status: String,
    pub remark: Option<String>,
}
