use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Json, Router};
use institute_admin::workflows::catalog::{catalog_router, CatalogRepository, CatalogService};
use institute_admin::workflows::demos::{demo_router, DemoRepository, DemoService};
use institute_admin::workflows::enquiries::{enquiry_router, EnquiryService};
use institute_admin::workflows::placement::{
    placement_router, PlacementIntakeService, PlacementRepository,
};
use serde_json::json;
use std::sync::Arc;

/// Every workflow router over one shared store, plus the health and metrics endpoints.
pub(crate) fn with_workflow_routes<R>(store: Arc<R>) -> Router
where
    R: PlacementRepository + DemoRepository + CatalogRepository + 'static,
{
    let enquiries = Arc::new(EnquiryService::new(Arc::clone(&store)));
    let placements = Arc::new(PlacementIntakeService::new(Arc::clone(&store)));
    let demos = Arc::new(DemoService::new(Arc::clone(&store)));
    let catalog = Arc::new(CatalogService::new(store));

    enquiry_router(enquiries)
        .merge(placement_router(placements))
        .merge(demo_router(demos))
        .merge(catalog_router(catalog))
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
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
