//! Back-office compliance tracking for a migrant-worker placement agency.
//!
//! The `tracking` module carries the three statutory workflows (post-arrival
//! entry filings, pre-arrival overseas progress, reportable-disease cases)
//! behind repository and directory traits so the deadline logic can be
//! exercised without any I/O. `config`, `telemetry`, and `error` provide the
//! service shell shared with the API binary.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod tracking;
