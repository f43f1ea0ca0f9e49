use crate::cli::ServeArgs;
use crate::infra::{
    default_review_schedule, default_scoring_thresholds, AppState, InMemoryAssessmentRepository,
    InMemoryRecordStore,
};
use crate::routes::with_compliance_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use advisory_compliance::config::AppConfig;
use advisory_compliance::error::AppError;
use advisory_compliance::telemetry;
use advisory_compliance::workflows::assessment::AssessmentService;
use advisory_compliance::workflows::records::{DashboardState, RecordMaterializer};
use advisory_compliance::workflows::roster::ClientRosterImporter;
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

    let subjects = match args.roster_csv.take() {
        Some(path) => {
            let subjects = ClientRosterImporter::from_path(&path)?;
            info!(count = subjects.len(), ?path, "seeded client roster");
            subjects
        }
        None => Vec::new(),
    };

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let store = Arc::new(InMemoryRecordStore::with_subjects(subjects));
    let repository = Arc::new(InMemoryAssessmentRepository::default());
    let schedule = default_review_schedule();
    let assessments = Arc::new(AssessmentService::new(
        repository,
        store.clone(),
        default_scoring_thresholds(),
        schedule,
    ));
    let dashboard = Arc::new(DashboardState {
        materializer: RecordMaterializer::new(store),
        schedule,
    });

    let app = with_compliance_routes(assessments, dashboard)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "compliance desk ready");

    axum::serve(listener, app).await?;
    Ok(())
}
