use crate::cli::ServeArgs;
use crate::infra::{seed_enquiries, AppState};
use crate::routes::with_workflow_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use institute_admin::config::AppConfig;
use institute_admin::error::AppError;
use institute_admin::store::MemoryRecordStore;
use institute_admin::telemetry;
use institute_admin::workflows::enquiries::EnquiryService;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    if let Some(path) = args.seed_enquiries.take() {
        config.seed.enquiries_csv = Some(path);
    }

    telemetry::init(&config.telemetry, config.environment)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let store = Arc::new(MemoryRecordStore::default());
    if let Some(path) = config.seed.enquiries_csv.as_deref() {
        seed_enquiries(&EnquiryService::new(Arc::clone(&store)), path)?;
    }

    let app = with_workflow_routes(store)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "institute admin api ready");

    axum::serve(listener, app).await?;
    Ok(())
}
