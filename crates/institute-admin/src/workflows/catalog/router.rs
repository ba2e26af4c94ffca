use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};

use super::domain::{BatchTimingDraft, CourseDraft, CourseView};
use super::repository::CatalogRepository;
use super::service::{CatalogService, CatalogServiceError};
use crate::workflows::http::{
    decode, error_response, json_body, repository_response, validation_response,
};

pub fn catalog_router<R>(service: Arc<CatalogService<R>>) -> Router
where
    R: CatalogRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/courses",
            get(list_courses_handler::<R>).post(create_course_handler::<R>),
        )
        .route(
            "/api/v1/batch-timings",
            get(list_batch_timings_handler::<R>).post(create_batch_timing_handler::<R>),
        )
        .with_state(service)
}

async fn list_courses_handler<R>(State(service): State<Arc<CatalogService<R>>>) -> Response
where
    R: CatalogRepository + 'static,
{
    match service.courses() {
        Ok(courses) => {
            let views: Vec<CourseView> = courses.iter().map(|course| course.view()).collect();
            (StatusCode::OK, Json(views)).into_response()
        }
        Err(error) => service_error_response(error),
    }
}

async fn create_course_handler<R>(
    State(service): State<Arc<CatalogService<R>>>,
    body: Bytes,
) -> Response
where
    R: CatalogRepository + 'static,
{
    let draft = match json_body(&body).and_then(decode::<CourseDraft>) {
        Ok(draft) => draft,
        Err(errors) => return validation_response("Invalid course payload", &errors),
    };

    match service.add_course(draft) {
        Ok(course) => (StatusCode::CREATED, Json(course.view())).into_response(),
        Err(error) => service_error_response(error),
    }
}

async fn list_batch_timings_handler<R>(State(service): State<Arc<CatalogService<R>>>) -> Response
where
    R: CatalogRepository + 'static,
{
    match service.batch_timings() {
        Ok(views) => (StatusCode::OK, Json(views)).into_response(),
        Err(error) => service_error_response(error),
    }
}

async fn create_batch_timing_handler<R>(
    State(service): State<Arc<CatalogService<R>>>,
    body: Bytes,
) -> Response
where
    R: CatalogRepository + 'static,
{
    let draft = match json_body(&body).and_then(decode::<BatchTimingDraft>) {
        Ok(draft) => draft,
        Err(errors) => return validation_response("Invalid batch timing payload", &errors),
    };

    match service.add_batch_timing(draft) {
        Ok(view) => (StatusCode::CREATED, Json(view)).into_response(),
        Err(error) => service_error_response(error),
    }
}

fn service_error_response(error: CatalogServiceError) -> Response {
    match error {
        CatalogServiceError::DuplicateCourse(_) => {
            error_response(StatusCode::CONFLICT, error.to_string())
        }
        CatalogServiceError::CourseNotFound(_) => {
            error_response(StatusCode::NOT_FOUND, error.to_string())
        }
        CatalogServiceError::Validation(errors) => {
            validation_response("Invalid catalog payload", &errors)
        }
        CatalogServiceError::Repository(error) => repository_response(&error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use serde_json::json;
    use tower::ServiceExt;

    use crate::store::MemoryRecordStore;
    use crate::workflows::http::read_json_body;

    fn router() -> Router {
        catalog_router(Arc::new(CatalogService::new(Arc::new(
            MemoryRecordStore::default(),
        ))))
    }

    fn post(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::post(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .expect("request")
    }

    #[tokio::test]
    async fn course_then_batch_timing_round_trip_through_http() {
        let router = router();

        let response = router
            .clone()
            .oneshot(post("/api/v1/courses", json!({"name": "Data Science"})))
            .await
            .expect("course response");
        assert_eq!(response.status(), StatusCode::CREATED);
        let course = read_json_body(response).await;

        let response = router
            .clone()
            .oneshot(post(
                "/api/v1/batch-timings",
                json!({"name": "Evening", "time_range": "18:00-20:00", "course_id": course["id"]}),
            ))
            .await
            .expect("timing response");
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = router
            .oneshot(
                Request::get("/api/v1/batch-timings")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("list response");
        let body = read_json_body(response).await;
        assert_eq!(body[0]["time_range"], json!("18:00-20:00"));
        assert_eq!(body[0]["course"]["name"], json!("Data Science"));
    }

    #[tokio::test]
    async fn duplicate_course_is_conflict() {
        let router = router();
        for expected in [StatusCode::CREATED, StatusCode::CONFLICT] {
            let response = router
                .clone()
                .oneshot(post("/api/v1/courses", json!({"name": "DevOps"})))
                .await
                .expect("response");
            assert_eq!(response.status(), expected);
        }
    }

    #[tokio::test]
    async fn batch_timing_for_missing_course_is_not_found() {
        let response = router()
            .oneshot(post(
                "/api/v1/batch-timings",
                json!({"name": "Weekend", "time_range": "10:00-13:00", "course_id": 9}),
            ))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = read_json_body(response).await;
        assert_eq!(body["error"], json!("Course not found"));
    }
}
