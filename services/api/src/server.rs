use crate::cli::ServeArgs;
use crate::infra::{
    seed_candidates, seed_workers, AppState, InMemoryFilingRepository, InMemoryMedicalRepository,
    InMemoryOverseasRepository, SeededCandidateDirectory, SeededWorkerDirectory,
};
use crate::routes::tracking_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use laborlink::config::AppConfig;
use laborlink::error::AppError;
use laborlink::telemetry;
use laborlink::tracking::entry_filing::EntryFilingService;
use laborlink::tracking::medical::MedicalExceptionService;
use laborlink::tracking::overseas::OverseasProgressService;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let workers = Arc::new(SeededWorkerDirectory::with(seed_workers()));
    let candidates = Arc::new(SeededCandidateDirectory::with(seed_candidates()));

    let filings = Arc::new(EntryFilingService::new(
        Arc::new(InMemoryFilingRepository::default()),
        workers.clone(),
    ));
    let overseas = Arc::new(OverseasProgressService::new(
        Arc::new(InMemoryOverseasRepository::default()),
        candidates.clone(),
    ));
    let medical = Arc::new(MedicalExceptionService::new(
        Arc::new(InMemoryMedicalRepository::default()),
        workers.clone(),
    ));

    let app = tracking_routes(filings, overseas, medical)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        workers = workers.len(),
        candidates = candidates.len(),
        "compliance tracking service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
