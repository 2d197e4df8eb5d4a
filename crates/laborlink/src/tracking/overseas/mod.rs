//! Pre-arrival overseas progress: the checkpoints a candidate clears in the
//! home country (medical exam, police clearance, passport and old-ARC
//! checks) before deployment.

pub mod domain;
pub mod evaluation;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    CheckpointSummary, OverseasProgressFields, OverseasProgressRecord, OverseasProgressUpdate,
    OverseasProgressView, OverseasStatus, PoliceStatus, ProgressReport,
};
pub use repository::OverseasRepository;
pub use router::overseas_progress_router;
pub use service::{OverseasProgressService, OverseasServiceError};
