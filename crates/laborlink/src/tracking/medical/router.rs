use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{CaseId, MedicalExceptionCreate, MedicalExceptionPatch};
use super::repository::MedicalExceptionRepository;
use super::service::{MedicalExceptionService, MedicalServiceError};
use crate::tracking::directory::WorkerDirectory;
use crate::tracking::paging::PageRequest;

/// Router builder exposing the medical-exception endpoints.
pub fn medical_exception_router<R, W>(service: Arc<MedicalExceptionService<R, W>>) -> Router
where
    R: MedicalExceptionRepository + 'static,
    W: WorkerDirectory + 'static,
{
    Router::new()
        .route(
            "/medical-exceptions",
            get(list_handler::<R, W>).post(create_handler::<R, W>),
        )
        .route("/medical-exceptions/dashboard", get(dashboard_handler::<R, W>))
        .route(
            "/medical-exceptions/:case_id",
            get(get_handler::<R, W>).patch(update_handler::<R, W>),
        )
        .route(
            "/medical-exceptions/:case_id/notify-health-dept",
            post(notify_health_dept_handler::<R, W>),
        )
        .route(
            "/medical-exceptions/:case_id/notify-employer",
            post(notify_employer_handler::<R, W>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ExceptionListQuery {
    pub(crate) page: Option<u32>,
    pub(crate) limit: Option<u32>,
    pub(crate) status: Option<String>,
    pub(crate) disease_type: Option<String>,
    pub(crate) search: Option<String>,
}

pub(crate) async fn create_handler<R, W>(
    State(service): State<Arc<MedicalExceptionService<R, W>>>,
    axum::Json(create): axum::Json<MedicalExceptionCreate>,
) -> Response
where
    R: MedicalExceptionRepository + 'static,
    W: WorkerDirectory + 'static,
{
    match service.create(create) {
        Ok(view) => (StatusCode::CREATED, axum::Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn list_handler<R, W>(
    State(service): State<Arc<MedicalExceptionService<R, W>>>,
    Query(query): Query<ExceptionListQuery>,
) -> Response
where
    R: MedicalExceptionRepository + 'static,
    W: WorkerDirectory + 'static,
{
    let page = PageRequest::new(query.page, query.limit);
    match service.list(
        query.status.as_deref(),
        query.disease_type.as_deref(),
        query.search.as_deref(),
        page,
    ) {
        Ok(listing) => (StatusCode::OK, axum::Json(listing)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn dashboard_handler<R, W>(
    State(service): State<Arc<MedicalExceptionService<R, W>>>,
) -> Response
where
    R: MedicalExceptionRepository + 'static,
    W: WorkerDirectory + 'static,
{
    match service.dashboard() {
        Ok(dashboard) => (StatusCode::OK, axum::Json(dashboard)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn get_handler<R, W>(
    State(service): State<Arc<MedicalExceptionService<R, W>>>,
    Path(case_id): Path<String>,
) -> Response
where
    R: MedicalExceptionRepository + 'static,
    W: WorkerDirectory + 'static,
{
    match service.get(&CaseId(case_id)) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn update_handler<R, W>(
    State(service): State<Arc<MedicalExceptionService<R, W>>>,
    Path(case_id): Path<String>,
    axum::Json(patch_body): axum::Json<MedicalExceptionPatch>,
) -> Response
where
    R: MedicalExceptionRepository + 'static,
    W: WorkerDirectory + 'static,
{
    match service.update(&CaseId(case_id), patch_body) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn notify_health_dept_handler<R, W>(
    State(service): State<Arc<MedicalExceptionService<R, W>>>,
    Path(case_id): Path<String>,
) -> Response
where
    R: MedicalExceptionRepository + 'static,
    W: WorkerDirectory + 'static,
{
    match service.mark_health_dept_notified(&CaseId(case_id)) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn notify_employer_handler<R, W>(
    State(service): State<Arc<MedicalExceptionService<R, W>>>,
    Path(case_id): Path<String>,
) -> Response
where
    R: MedicalExceptionRepository + 'static,
    W: WorkerDirectory + 'static,
{
    match service.mark_employer_notified(&CaseId(case_id)) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: MedicalServiceError) -> Response {
    match error {
        MedicalServiceError::Validation(error) => {
            let payload = json!({
                "error": "validation failed",
                "details": error.details,
            });
            (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response()
        }
        MedicalServiceError::UnknownWorker(_) | MedicalServiceError::CaseNotFound(_) => {
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        other => {
            tracing::error!(error = %other, "medical exception request failed");
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
