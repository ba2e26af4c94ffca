use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};

use super::domain::{EnquiryDraft, EnquiryId, EnquiryPatch, EnquirySummaryView, FollowUpNote};
use super::repository::EnquiryRepository;
use super::service::{EnquiryService, EnquiryServiceError};
use crate::workflows::http::{
    decode, error_response, json_body, repository_response, validation_response,
};

/// Router exposing enquiry intake, listing, updates, and follow-up calls.
pub fn enquiry_router<R>(service: Arc<EnquiryService<R>>) -> Router
where
    R: EnquiryRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/enquiries",
            post(create_handler::<R>).get(list_handler::<R>),
        )
        .route(
            "/api/v1/enquiries/:enquiry_id",
            get(detail_handler::<R>).patch(update_handler::<R>),
        )
        .route(
            "/api/v1/enquiries/:enquiry_id/follow-ups",
            post(follow_up_handler::<R>),
        )
        .with_state(service)
}

pub(crate) async fn create_handler<R>(
    State(service): State<Arc<EnquiryService<R>>>,
    body: Bytes,
) -> Response
where
    R: EnquiryRepository + 'static,
{
    let draft = match json_body(&body).and_then(decode::<EnquiryDraft>) {
        Ok(draft) => draft,
        Err(errors) => return validation_response("Invalid enquiry payload", &errors),
    };

    match service.create(draft) {
        Ok(enquiry) => (StatusCode::CREATED, Json(enquiry.view())).into_response(),
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn list_handler<R>(State(service): State<Arc<EnquiryService<R>>>) -> Response
where
    R: EnquiryRepository + 'static,
{
    match service.list() {
        Ok(enquiries) => {
            let rows: Vec<EnquirySummaryView> =
                enquiries.iter().map(|enquiry| enquiry.summary_view()).collect();
            (StatusCode::OK, Json(rows)).into_response()
        }
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn detail_handler<R>(
    State(service): State<Arc<EnquiryService<R>>>,
    Path(enquiry_id): Path<String>,
) -> Response
where
    R: EnquiryRepository + 'static,
{
    let Some(id) = parse_id(&enquiry_id) else {
        return error_response(StatusCode::NOT_FOUND, "Enquiry not found");
    };

    match service.get(id) {
        Ok(enquiry) => (StatusCode::OK, Json(enquiry.view())).into_response(),
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn update_handler<R>(
    State(service): State<Arc<EnquiryService<R>>>,
    Path(enquiry_id): Path<String>,
    body: Bytes,
) -> Response
where
    R: EnquiryRepository + 'static,
{
    let Some(id) = parse_id(&enquiry_id) else {
        return error_response(StatusCode::NOT_FOUND, "Enquiry not found");
    };
    let patch = match json_body(&body).and_then(decode::<EnquiryPatch>) {
        Ok(patch) => patch,
        Err(errors) => return validation_response("Invalid enquiry payload", &errors),
    };

    match service.update(id, patch) {
        Ok(enquiry) => (StatusCode::OK, Json(enquiry.view())).into_response(),
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn follow_up_handler<R>(
    State(service): State<Arc<EnquiryService<R>>>,
    Path(enquiry_id): Path<String>,
    body: Bytes,
) -> Response
where
    R: EnquiryRepository + 'static,
{
    let Some(id) = parse_id(&enquiry_id) else {
        return error_response(StatusCode::NOT_FOUND, "Enquiry not found");
    };
    let note = match json_body(&body).and_then(decode::<FollowUpNote>) {
        Ok(note) => note,
        Err(errors) => return validation_response("Invalid follow-up payload", &errors),
    };

    match service.record_follow_up(id, note) {
        Ok(enquiry) => (StatusCode::OK, Json(enquiry.view())).into_response(),
        Err(error) => service_error_response(error),
    }
}

fn parse_id(raw: &str) -> Option<EnquiryId> {
    raw.trim().parse::<u64>().ok().map(EnquiryId)
}

fn service_error_response(error: EnquiryServiceError) -> Response {
    match error {
        EnquiryServiceError::NotFound(_) => error_response(StatusCode::NOT_FOUND, error.to_string()),
        EnquiryServiceError::Validation(errors) => {
            validation_response("Invalid enquiry payload", &errors)
        }
        EnquiryServiceError::Repository(error) => repository_response(&error),
    }
}
