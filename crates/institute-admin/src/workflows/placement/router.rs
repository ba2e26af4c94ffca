use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

use super::domain::{PlacementPatch, PlacementSubmission};
use super::repository::PlacementRepository;
use super::service::{PlacementIntakeService, PlacementServiceError};
use crate::workflows::enquiries::EnquiryId;
use crate::workflows::http::{
    decode, error_response, json_body, repository_response, validation_response,
};

/// Query string accepted by the intake endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct EnquiryQuery {
    pub enquiry_id: Option<String>,
}

/// Router exposing the public placement intake form endpoint.
pub fn placement_router<R>(service: Arc<PlacementIntakeService<R>>) -> Router
where
    R: PlacementRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/placements",
            get(intake_handler::<R>)
                .post(submit_handler::<R>)
                .put(update_handler::<R>),
        )
        .with_state(service)
}

pub(crate) async fn intake_handler<R>(
    State(service): State<Arc<PlacementIntakeService<R>>>,
    Query(query): Query<EnquiryQuery>,
) -> Response
where
    R: PlacementRepository + 'static,
{
    let enquiry_id = match resolve_enquiry_id(query.enquiry_id.as_deref(), None) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match service.intake_state(enquiry_id) {
        Ok(state) => (StatusCode::OK, Json(state)).into_response(),
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn submit_handler<R>(
    State(service): State<Arc<PlacementIntakeService<R>>>,
    Query(query): Query<EnquiryQuery>,
    body: Bytes,
) -> Response
where
    R: PlacementRepository + 'static,
{
    let payload = json_body(&body);
    let enquiry_id = match resolve_enquiry_id(query.enquiry_id.as_deref(), payload.as_ref().ok()) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match service.submit_with(enquiry_id, move || payload.and_then(decode::<PlacementSubmission>)) {
        Ok(_) => {
            let body = json!({
                "success": true,
                "message": "Form submitted successfully!",
            });
            (StatusCode::CREATED, Json(body)).into_response()
        }
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn update_handler<R>(
    State(service): State<Arc<PlacementIntakeService<R>>>,
    Query(query): Query<EnquiryQuery>,
    body: Bytes,
) -> Response
where
    R: PlacementRepository + 'static,
{
    let payload = json_body(&body);
    let enquiry_id = match resolve_enquiry_id(query.enquiry_id.as_deref(), payload.as_ref().ok()) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match service.update_with(enquiry_id, move || payload.and_then(decode::<PlacementPatch>)) {
        Ok(_) => {
            let body = json!({
                "success": true,
                "message": "Placement updated successfully!",
            });
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(error) => service_error_response(error),
    }
}

/// The query string wins over the body. Blank values count as missing; values that are not
/// a positive integer cannot name an enquiry and are reported as not found.
fn resolve_enquiry_id(query: Option<&str>, body: Option<&Value>) -> Result<EnquiryId, Response> {
    let raw = match query.map(str::trim).filter(|value| !value.is_empty()) {
        Some(value) => Some(value.to_string()),
        None => match body.and_then(|payload| payload.get("enquiry_id")) {
            Some(Value::Number(number)) => Some(number.to_string()),
            Some(Value::String(text)) if !text.trim().is_empty() => Some(text.trim().to_string()),
            _ => None,
        },
    };

    let Some(raw) = raw else {
        return Err(error_response(StatusCode::BAD_REQUEST, "Missing enquiry_id"));
    };

    raw.parse::<u64>()
        .ok()
        .filter(|id| *id > 0)
        .map(EnquiryId)
        .ok_or_else(|| error_response(StatusCode::NOT_FOUND, "Enquiry not found"))
}

fn service_error_response(error: PlacementServiceError) -> Response {
    match error {
        PlacementServiceError::EnquiryNotFound(_) | PlacementServiceError::PlacementNotFound(_) => {
            error_response(StatusCode::NOT_FOUND, error.to_string())
        }
        PlacementServiceError::AlreadySubmitted(_) => {
            error_response(StatusCode::BAD_REQUEST, error.to_string())
        }
        PlacementServiceError::Validation(errors) => {
            validation_response("Invalid placement payload", &errors)
        }
        PlacementServiceError::Repository(error) => repository_response(&error),
    }
}
