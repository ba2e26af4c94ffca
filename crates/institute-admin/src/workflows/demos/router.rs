use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch, post},
    Json, Router,
};

use super::domain::{DemoDraft, DemoId, DemoStatusUpdate};
use super::repository::DemoRepository;
use super::service::{DemoService, DemoServiceError};
use crate::workflows::enquiries::EnquiryId;
use crate::workflows::http::{
    decode, error_response, json_body, repository_response, validation_response,
};

/// Router for the demo class list and the enquiry move-to-demo action.
pub fn demo_router<R>(service: Arc<DemoService<R>>) -> Router
where
    R: DemoRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/demos",
            get(list_handler::<R>).post(create_handler::<R>),
        )
        .route("/api/v1/demos/:demo_id", patch(status_handler::<R>))
        .route(
            "/api/v1/enquiries/:enquiry_id/move-to-demo",
            post(move_handler::<R>),
        )
        .with_state(service)
}

async fn list_handler<R>(State(service): State<Arc<DemoService<R>>>) -> Response
where
    R: DemoRepository + 'static,
{
    match service.list() {
        Ok(views) => (StatusCode::OK, Json(views)).into_response(),
        Err(error) => service_error_response(error),
    }
}

async fn create_handler<R>(State(service): State<Arc<DemoService<R>>>, body: Bytes) -> Response
where
    R: DemoRepository + 'static,
{
    let draft = match json_body(&body).and_then(decode::<DemoDraft>) {
        Ok(draft) => draft,
        Err(errors) => return validation_response("Invalid demo payload", &errors),
    };

    match service.create(draft) {
        Ok(view) => (StatusCode::CREATED, Json(view)).into_response(),
        Err(error) => service_error_response(error),
    }
}

async fn status_handler<R>(
    State(service): State<Arc<DemoService<R>>>,
    Path(demo_id): Path<String>,
    body: Bytes,
) -> Response
where
    R: DemoRepository + 'static,
{
    let Ok(id) = demo_id.trim().parse::<u64>() else {
        return error_response(StatusCode::NOT_FOUND, "Demo entry not found");
    };
    let update = match json_body(&body).and_then(decode::<DemoStatusUpdate>) {
        Ok(update) => update,
        Err(errors) => return validation_response("Invalid demo payload", &errors),
    };

    match service.update_status(DemoId(id), update) {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(error) => service_error_response(error),
    }
}

async fn move_handler<R>(
    State(service): State<Arc<DemoService<R>>>,
    Path(enquiry_id): Path<String>,
) -> Response
where
    R: DemoRepository + 'static,
{
    let Ok(id) = enquiry_id.trim().parse::<u64>() else {
        return error_response(StatusCode::NOT_FOUND, "Enquiry not found");
    };

    match service.move_enquiry(EnquiryId(id)) {
        Ok(view) => (StatusCode::CREATED, Json(view)).into_response(),
        Err(error) => service_error_response(error),
    }
}

fn service_error_response(error: DemoServiceError) -> Response {
    match error {
        DemoServiceError::EnquiryNotFound(_) | DemoServiceError::DemoNotFound(_) => {
            error_response(StatusCode::NOT_FOUND, error.to_string())
        }
        DemoServiceError::AlreadyMoved(_) => error_response(StatusCode::CONFLICT, error.to_string()),
        DemoServiceError::Validation(errors) => validation_response("Invalid demo payload", &errors),
        DemoServiceError::Repository(error) => repository_response(&error),
    }
}
