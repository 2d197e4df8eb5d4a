use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::tracking::directory::{WorkerId, WorkerIdentity};
use crate::tracking::{parse_optional_date, parse_wire_date, ValidationError};

/// Identifier wrapper for reportable-disease cases.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CaseId(pub String);

impl std::fmt::Display for CaseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Diseases reportable from routine worker health checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiseaseType {
    Tuberculosis,
    Syphilis,
    Hiv,
    HepatitisB,
    IntestinalParasite,
    Other,
}

impl DiseaseType {
    pub const fn label(self) -> &'static str {
        match self {
            DiseaseType::Tuberculosis => "TUBERCULOSIS",
            DiseaseType::Syphilis => "SYPHILIS",
            DiseaseType::Hiv => "HIV",
            DiseaseType::HepatitisB => "HEPATITIS_B",
            DiseaseType::IntestinalParasite => "INTESTINAL_PARASITE",
            DiseaseType::Other => "OTHER",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "TUBERCULOSIS" => Some(Self::Tuberculosis),
            "SYPHILIS" => Some(Self::Syphilis),
            "HIV" => Some(Self::Hiv),
            "HEPATITIS_B" => Some(Self::HepatitisB),
            "INTESTINAL_PARASITE" => Some(Self::IntestinalParasite),
            "OTHER" => Some(Self::Other),
            _ => None,
        }
    }
}

/// Treatment state of a case; the only status a caller sets directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TreatmentStatus {
    Pending,
    InTreatment,
    Recovered,
    Deported,
}

impl TreatmentStatus {
    pub const fn label(self) -> &'static str {
        match self {
            TreatmentStatus::Pending => "PENDING",
            TreatmentStatus::InTreatment => "IN_TREATMENT",
            TreatmentStatus::Recovered => "RECOVERED",
            TreatmentStatus::Deported => "DEPORTED",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "PENDING" => Some(Self::Pending),
            "IN_TREATMENT" => Some(Self::InTreatment),
            "RECOVERED" => Some(Self::Recovered),
            "DEPORTED" => Some(Self::Deported),
            _ => None,
        }
    }
}

/// One reportable-disease case. A worker can accumulate several over time;
/// cases are never auto-deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicalExceptionRecord {
    pub case_id: CaseId,
    pub worker_id: WorkerId,
    pub health_check_id: Option<String>,
    pub diagnosis_date: NaiveDate,
    pub disease_type: DiseaseType,
    pub description: Option<String>,

    pub health_dept_notified: bool,
    pub health_dept_notify_date: Option<DateTime<Utc>>,
    pub employer_notified: bool,
    pub employer_notify_date: Option<DateTime<Utc>>,

    pub treatment_status: TreatmentStatus,
    pub resolution_date: Option<NaiveDate>,
    pub remarks: Option<String>,
}

/// Raw POST body for opening a case.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicalExceptionCreate {
    pub worker_id: Option<String>,
    pub health_check_id: Option<String>,
    pub diagnosis_date: Option<String>,
    pub disease_type: Option<String>,
    pub description: Option<String>,
    pub treatment_status: Option<String>,
    pub remarks: Option<String>,
}

impl MedicalExceptionCreate {
    pub fn validate(self) -> Result<ValidatedCase, ValidationError> {
        let mut details = Vec::new();

        let worker_id = match self.worker_id {
            Some(id) if !id.trim().is_empty() => Some(WorkerId(id)),
            _ => {
                details.push("workerId is required".to_string());
                None
            }
        };

        let diagnosis_date = match self.diagnosis_date.as_deref() {
            Some(raw) => match parse_wire_date("diagnosisDate", raw) {
                Ok(date) => Some(date),
                Err(detail) => {
                    details.push(detail);
                    None
                }
            },
            None => {
                details.push("diagnosisDate is required".to_string());
                None
            }
        };

        let disease_type = match self.disease_type.as_deref() {
            Some(raw) => match DiseaseType::parse(raw) {
                Some(disease) => Some(disease),
                None => {
                    details.push(format!("diseaseType '{raw}' is not a known reportable disease"));
                    None
                }
            },
            None => {
                details.push("diseaseType is required".to_string());
                None
            }
        };

        let treatment_status = match self.treatment_status.as_deref() {
            None => TreatmentStatus::Pending,
            Some(raw) => match TreatmentStatus::parse(raw) {
                Some(status) => status,
                None => {
                    details.push(format!(
                        "treatmentStatus must be one of PENDING, IN_TREATMENT, RECOVERED, DEPORTED, got '{raw}'"
                    ));
                    TreatmentStatus::Pending
                }
            },
        };

        if !details.is_empty() {
            return Err(ValidationError::new(details));
        }

        Ok(ValidatedCase {
            worker_id: worker_id.ok_or_else(|| ValidationError::single("workerId is required"))?,
            health_check_id: self.health_check_id,
            diagnosis_date: diagnosis_date
                .ok_or_else(|| ValidationError::single("diagnosisDate is required"))?,
            disease_type: disease_type
                .ok_or_else(|| ValidationError::single("diseaseType is required"))?,
            description: self.description,
            treatment_status,
            remarks: self.remarks,
        })
    }
}

/// Validated form of a create request.
#[derive(Debug, Clone)]
pub struct ValidatedCase {
    pub worker_id: WorkerId,
    pub health_check_id: Option<String>,
    pub diagnosis_date: NaiveDate,
    pub disease_type: DiseaseType,
    pub description: Option<String>,
    pub treatment_status: TreatmentStatus,
    pub remarks: Option<String>,
}

/// Raw PATCH body; every field optional, omitted fields untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicalExceptionPatch {
    pub diagnosis_date: Option<String>,
    pub disease_type: Option<String>,
    pub description: Option<String>,
    pub treatment_status: Option<String>,
    pub resolution_date: Option<String>,
    pub remarks: Option<String>,
}

impl MedicalExceptionPatch {
    pub fn validate(self) -> Result<ValidatedPatch, ValidationError> {
        let mut details = Vec::new();

        let diagnosis_date =
            parse_optional_date("diagnosisDate", self.diagnosis_date.as_deref(), &mut details);
        let resolution_date =
            parse_optional_date("resolutionDate", self.resolution_date.as_deref(), &mut details);

        let disease_type = match self.disease_type.as_deref() {
            None => None,
            Some(raw) if raw.trim().is_empty() => None,
            Some(raw) => match DiseaseType::parse(raw) {
                Some(disease) => Some(disease),
                None => {
                    details.push(format!("diseaseType '{raw}' is not a known reportable disease"));
                    None
                }
            },
        };

        let treatment_status = match self.treatment_status.as_deref() {
            None => None,
            Some(raw) if raw.trim().is_empty() => None,
            Some(raw) => match TreatmentStatus::parse(raw) {
                Some(status) => Some(status),
                None => {
                    details.push(format!(
                        "treatmentStatus must be one of PENDING, IN_TREATMENT, RECOVERED, DEPORTED, got '{raw}'"
                    ));
                    None
                }
            },
        };

        if !details.is_empty() {
            return Err(ValidationError::new(details));
        }

        Ok(ValidatedPatch {
            diagnosis_date,
            disease_type,
            description: self.description,
            treatment_status,
            resolution_date,
            remarks: self.remarks,
        })
    }
}

/// Validated form of a patch.
#[derive(Debug, Clone)]
pub struct ValidatedPatch {
    pub diagnosis_date: Option<NaiveDate>,
    pub disease_type: Option<DiseaseType>,
    pub description: Option<String>,
    pub treatment_status: Option<TreatmentStatus>,
    pub resolution_date: Option<NaiveDate>,
    pub remarks: Option<String>,
}

impl MedicalExceptionRecord {
    pub fn apply(&mut self, patch: ValidatedPatch) {
        if let Some(date) = patch.diagnosis_date {
            self.diagnosis_date = date;
        }
        if let Some(disease) = patch.disease_type {
            self.disease_type = disease;
        }
        if patch.description.is_some() {
            self.description = patch.description;
        }
        if let Some(status) = patch.treatment_status {
            self.treatment_status = status;
        }
        if patch.resolution_date.is_some() {
            self.resolution_date = patch.resolution_date;
        }
        if patch.remarks.is_some() {
            self.remarks = patch.remarks;
        }
    }
}

/// Wire representation joined with worker identity.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicalExceptionView {
    pub case_id: CaseId,
    pub worker_id: WorkerId,
    pub worker_name_zh: String,
    pub worker_name_en: String,
    pub health_check_id: Option<String>,
    pub diagnosis_date: NaiveDate,
    pub disease_type: DiseaseType,
    pub description: Option<String>,
    pub health_dept_notified: bool,
    pub health_dept_notify_date: Option<DateTime<Utc>>,
    pub employer_notified: bool,
    pub employer_notify_date: Option<DateTime<Utc>>,
    pub treatment_status: TreatmentStatus,
    pub resolution_date: Option<NaiveDate>,
    pub remarks: Option<String>,
}

impl MedicalExceptionView {
    pub fn from_record(record: MedicalExceptionRecord, worker: WorkerIdentity) -> Self {
        Self {
            case_id: record.case_id,
            worker_id: record.worker_id,
            worker_name_zh: worker.name_zh,
            worker_name_en: worker.name_en,
            health_check_id: record.health_check_id,
            diagnosis_date: record.diagnosis_date,
            disease_type: record.disease_type,
            description: record.description,
            health_dept_notified: record.health_dept_notified,
            health_dept_notify_date: record.health_dept_notify_date,
            employer_notified: record.employer_notified,
            employer_notify_date: record.employer_notify_date,
            treatment_status: record.treatment_status,
            resolution_date: record.resolution_date,
            remarks: record.remarks,
        }
    }
}
