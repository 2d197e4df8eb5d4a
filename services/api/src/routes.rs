use std::sync::Arc;

use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use serde_json::json;

use crate::infra::{
    AppState, InMemoryFilingRepository, InMemoryMedicalRepository, InMemoryOverseasRepository,
    SeededCandidateDirectory, SeededWorkerDirectory,
};
use laborlink::tracking::entry_filing::{entry_filing_router, EntryFilingService};
use laborlink::tracking::medical::{medical_exception_router, MedicalExceptionService};
use laborlink::tracking::overseas::{overseas_progress_router, OverseasProgressService};

pub(crate) type FilingApi = EntryFilingService<InMemoryFilingRepository, SeededWorkerDirectory>;
pub(crate) type OverseasApi =
    OverseasProgressService<InMemoryOverseasRepository, SeededCandidateDirectory>;
pub(crate) type MedicalApi =
    MedicalExceptionService<InMemoryMedicalRepository, SeededWorkerDirectory>;

pub(crate) fn tracking_routes(
    filings: Arc<FilingApi>,
    overseas: Arc<OverseasApi>,
    medical: Arc<MedicalApi>,
) -> axum::Router {
    entry_filing_router(filings)
        .merge(overseas_progress_router(overseas))
        .merge(medical_exception_router(medical))
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
