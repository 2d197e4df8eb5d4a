//! Reportable-disease cases surfaced by worker health checks, with the two
//! statutory notifications (health department, employer) tracked per case.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

pub use domain::{
    CaseId, DiseaseType, MedicalExceptionCreate, MedicalExceptionPatch, MedicalExceptionRecord,
    MedicalExceptionView, TreatmentStatus,
};
pub use repository::MedicalExceptionRepository;
pub use router::medical_exception_router;
pub use service::{MedicalDashboard, MedicalExceptionService, MedicalServiceError};
