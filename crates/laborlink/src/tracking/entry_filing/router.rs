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

use super::domain::EntryFilingUpdate;
use super::repository::FilingRepository;
use super::service::{EntryFilingService, FilingServiceError};
use crate::tracking::directory::{WorkerDirectory, WorkerId};
use crate::tracking::paging::PageRequest;

/// Router builder exposing the entry-filing endpoints.
pub fn entry_filing_router<R, W>(service: Arc<EntryFilingService<R, W>>) -> Router
where
    R: FilingRepository + 'static,
    W: WorkerDirectory + 'static,
{
    Router::new()
        .route("/entry-filings", get(list_handler::<R, W>))
        .route("/entry-filings/dashboard", get(dashboard_handler::<R, W>))
        .route(
            "/entry-filings/:worker_id",
            get(get_handler::<R, W>).put(upsert_handler::<R, W>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct FilingListQuery {
    pub(crate) page: Option<u32>,
    pub(crate) limit: Option<u32>,
    pub(crate) status: Option<String>,
    pub(crate) search: Option<String>,
}

pub(crate) async fn list_handler<R, W>(
    State(service): State<Arc<EntryFilingService<R, W>>>,
    Query(query): Query<FilingListQuery>,
) -> Response
where
    R: FilingRepository + 'static,
    W: WorkerDirectory + 'static,
{
    let page = PageRequest::new(query.page, query.limit);
    match service.list(query.status.as_deref(), query.search.as_deref(), page) {
        Ok(listing) => (StatusCode::OK, axum::Json(listing)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn dashboard_handler<R, W>(
    State(service): State<Arc<EntryFilingService<R, W>>>,
) -> Response
where
    R: FilingRepository + 'static,
    W: WorkerDirectory + 'static,
{
    match service.dashboard() {
        Ok(dashboard) => (StatusCode::OK, axum::Json(dashboard)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn get_handler<R, W>(
    State(service): State<Arc<EntryFilingService<R, W>>>,
    Path(worker_id): Path<String>,
) -> Response
where
    R: FilingRepository + 'static,
    W: WorkerDirectory + 'static,
{
    match service.get(&WorkerId(worker_id)) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn upsert_handler<R, W>(
    State(service): State<Arc<EntryFilingService<R, W>>>,
    Path(worker_id): Path<String>,
    axum::Json(update): axum::Json<EntryFilingUpdate>,
) -> Response
where
    R: FilingRepository + 'static,
    W: WorkerDirectory + 'static,
{
    let today = Local::now().date_naive();
    match service.upsert(&WorkerId(worker_id), update, today) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: FilingServiceError) -> Response {
    match error {
        FilingServiceError::Validation(error) => {
            let payload = json!({
                "error": "validation failed",
                "details": error.details,
            });
            (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response()
        }
        FilingServiceError::UnknownWorker(worker_id) => {
            let payload = json!({
                "error": format!("worker {} is not registered", worker_id.0),
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        other => {
            tracing::error!(error = %other, "entry filing request failed");
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
