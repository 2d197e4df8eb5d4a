use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use chrono::Local;
use serde::Deserialize;
use serde_json::json;

use super::domain::OverseasProgressUpdate;
use super::repository::OverseasRepository;
use super::service::{OverseasProgressService, OverseasServiceError};
use crate::tracking::directory::{CandidateDirectory, CandidateId};
use crate::tracking::paging::PageRequest;

/// Router builder exposing the overseas-progress endpoints.
pub fn overseas_progress_router<R, C>(service: Arc<OverseasProgressService<R, C>>) -> Router
where
    R: OverseasRepository + 'static,
    C: CandidateDirectory + 'static,
{
    Router::new()
        .route("/overseas-progress", get(list_handler::<R, C>))
        .route(
            "/overseas-progress/:candidate_id",
            get(get_handler::<R, C>).put(upsert_handler::<R, C>),
        )
        .route(
            "/overseas-progress/:candidate_id/report",
            get(report_handler::<R, C>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProgressListQuery {
    pub(crate) page: Option<u32>,
    pub(crate) limit: Option<u32>,
    pub(crate) status: Option<String>,
    pub(crate) search: Option<String>,
}

pub(crate) async fn list_handler<R, C>(
    State(service): State<Arc<OverseasProgressService<R, C>>>,
    Query(query): Query<ProgressListQuery>,
) -> Response
where
    R: OverseasRepository + 'static,
    C: CandidateDirectory + 'static,
{
    let page = PageRequest::new(query.page, query.limit);
    match service.list(query.status.as_deref(), query.search.as_deref(), page) {
        Ok(listing) => (StatusCode::OK, axum::Json(listing)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn get_handler<R, C>(
    State(service): State<Arc<OverseasProgressService<R, C>>>,
    Path(candidate_id): Path<String>,
) -> Response
where
    R: OverseasRepository + 'static,
    C: CandidateDirectory + 'static,
{
    match service.get(&CandidateId(candidate_id)) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn upsert_handler<R, C>(
    State(service): State<Arc<OverseasProgressService<R, C>>>,
    Path(candidate_id): Path<String>,
    axum::Json(update): axum::Json<OverseasProgressUpdate>,
) -> Response
where
    R: OverseasRepository + 'static,
    C: CandidateDirectory + 'static,
{
    let today = Local::now().date_naive();
    match service.upsert(&CandidateId(candidate_id), update, today) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn report_handler<R, C>(
    State(service): State<Arc<OverseasProgressService<R, C>>>,
    Path(candidate_id): Path<String>,
) -> Response
where
    R: OverseasRepository + 'static,
    C: CandidateDirectory + 'static,
{
    match service.report(&CandidateId(candidate_id)) {
        Ok(report) => (StatusCode::OK, axum::Json(report)).into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: OverseasServiceError) -> Response {
    match error {
        OverseasServiceError::Validation(error) => {
            let payload = json!({
                "error": "validation failed",
                "details": error.details,
            });
            (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response()
        }
        OverseasServiceError::UnknownCandidate(_) | OverseasServiceError::RecordNotFound(_) => {
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        other => {
            tracing::error!(error = %other, "overseas progress request failed");
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
