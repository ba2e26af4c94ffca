use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use super::common::*;
use crate::workflows::enquiries::EnquiryRepository;
use crate::workflows::http::read_json_body;
use crate::workflows::placement::{placement_router, PlacementIntakeService};

fn seeded_router() -> (Router, Arc<crate::store::MemoryRecordStore>, u64) {
    let (store, enquiry_id) = seeded_store();
    let router = placement_router(Arc::new(intake_service(&store)));
    (router, store, enquiry_id.0)
}

fn request(method: &str, uri: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder().method(method).uri(uri);
    match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("request")
}

#[tokio::test]
async fn get_returns_prefill_then_stored_placement() {
    let (router, _, id) = seeded_router();
    let uri = format!("/api/v1/placements?enquiry_id={id}");

    let response = router
        .clone()
        .oneshot(request("GET", &uri, None))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["prefilled"], json!(false));
    assert_eq!(body["data"]["full_name"], json!("Asha Rao"));
    assert_eq!(body["data"]["course"], json!("Data Engineering"));
    assert!(body["data"].get("id").is_none());

    let response = router
        .clone()
        .oneshot(request("POST", &uri, Some(submission_json())))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(
        read_json_body(response).await,
        json!({"success": true, "message": "Form submitted successfully!"})
    );

    let response = router
        .oneshot(request("GET", &uri, None))
        .await
        .expect("response");
    let body = read_json_body(response).await;
    assert_eq!(body["prefilled"], json!(true));
    assert_eq!(body["data"]["experiences"][1]["employer"], json!("Globex"));
    assert_eq!(body["data"]["experiences"][1]["end_date"], Value::Null);
}

#[tokio::test]
async fn post_accepts_enquiry_id_in_body() {
    let (router, store, id) = seeded_router();
    let mut payload = submission_json();
    payload["enquiry_id"] = json!(id.to_string());

    let response = router
        .oneshot(request("POST", "/api/v1/placements", Some(payload)))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::CREATED);
    let enquiry = store
        .fetch_enquiry(crate::workflows::enquiries::EnquiryId(id))
        .expect("fetch")
        .expect("enquiry");
    assert!(!enquiry.link_active);
}

#[tokio::test]
async fn second_post_is_bad_request_even_with_malformed_body() {
    let (router, _, id) = seeded_router();
    let uri = format!("/api/v1/placements?enquiry_id={id}");
    router
        .clone()
        .oneshot(request("POST", &uri, Some(submission_json())))
        .await
        .expect("first");

    let response = router
        .oneshot(
            Request::post(&uri)
                .header("content-type", "application/json")
                .body(Body::from("{\"full_name\":"))
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        read_json_body(response).await,
        json!({"error": "Form already submitted!"})
    );
}

#[tokio::test]
async fn post_with_invalid_experience_returns_nested_errors() {
    let (router, _, id) = seeded_router();
    let mut payload = submission_json();
    payload["experiences"][0]["end_date"] = json!("2019-01-01");

    let response = router
        .oneshot(request(
            "POST",
            &format!("/api/v1/placements?enquiry_id={id}"),
            Some(payload),
        ))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json_body(response).await;
    assert_eq!(
        body["fields"]["experiences"]["0"]["end_date"],
        json!(["End date cannot be before the start date."])
    );
}

#[tokio::test]
async fn put_updates_existing_placement() {
    let (router, store, id) = seeded_router();
    let uri = format!("/api/v1/placements?enquiry_id={id}");
    router
        .clone()
        .oneshot(request("POST", &uri, Some(submission_json())))
        .await
        .expect("submitted");

    let response = router
        .oneshot(request(
            "PUT",
            &uri,
            Some(json!({"location_current": "Bengaluru", "experiences": []})),
        ))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        read_json_body(response).await["message"],
        json!("Placement updated successfully!")
    );
    let stored = crate::workflows::placement::PlacementRepository::placement_for_enquiry(
        store.as_ref(),
        crate::workflows::enquiries::EnquiryId(id),
    )
    .expect("lookup")
    .expect("placement");
    assert_eq!(stored.location_current.as_deref(), Some("Bengaluru"));
    assert_eq!(stored.experiences.len(), 2);
}

#[tokio::test]
async fn put_before_submission_is_not_found() {
    let (router, _, id) = seeded_router();
    let response = router
        .oneshot(request(
            "PUT",
            &format!("/api/v1/placements?enquiry_id={id}"),
            Some(json!({"course": "Cloud"})),
        ))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        read_json_body(response).await["error"],
        json!("No placement record found to update")
    );
}

#[tokio::test]
async fn missing_and_unresolvable_ids() {
    let (router, _, _) = seeded_router();
    let cases = [
        ("/api/v1/placements", StatusCode::BAD_REQUEST, "Missing enquiry_id"),
        ("/api/v1/placements?enquiry_id=", StatusCode::BAD_REQUEST, "Missing enquiry_id"),
        ("/api/v1/placements?enquiry_id=abc", StatusCode::NOT_FOUND, "Enquiry not found"),
        ("/api/v1/placements?enquiry_id=999", StatusCode::NOT_FOUND, "Enquiry not found"),
    ];

    for (uri, status, message) in cases {
        let response = router
            .clone()
            .oneshot(request("GET", uri, None))
            .await
            .expect("response");
        assert_eq!(response.status(), status, "{uri}");
        assert_eq!(read_json_body(response).await["error"], json!(message), "{uri}");
    }
}

#[tokio::test]
async fn store_failure_is_internal_error() {
    let router = placement_router(Arc::new(PlacementIntakeService::new(Arc::new(
        UnavailableStore,
    ))));

    let response = router
        .oneshot(request("GET", "/api/v1/placements?enquiry_id=1", None))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        read_json_body(response).await["error"],
        json!("repository unavailable: database offline")
    );
}
