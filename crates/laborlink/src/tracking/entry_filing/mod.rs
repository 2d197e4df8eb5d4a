//! Post-arrival entry filings: the four statutory submissions measured from
//! a worker's entry date (entry notification, initial health exam, ARC
//! application, work-permit application).

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    EntryFilingFields, EntryFilingRecord, EntryFilingUpdate, FilingView,
    ARC_DEADLINE_DAYS, ENTRY_REPORT_DEADLINE_DAYS, INITIAL_EXAM_DEADLINE_DAYS,
    PERMIT_DEADLINE_DAYS,
};
pub use repository::FilingRepository;
pub use router::entry_filing_router;
pub use service::{ComplianceDashboard, EntryFilingService, FilingServiceError};
