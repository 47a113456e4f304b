use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::json;
use tower::ServiceExt;

use super::common::*;
use crate::workflows::accounts::Actor;
use crate::workflows::applications::ApplicationStatus;
use crate::workflows::interviews::interview_router;

fn router(status: ApplicationStatus) -> Router {
    interview_router(Arc::new(fixture(status).service))
}

fn request(
    method: &str,
    uri: &str,
    actor: Actor,
    body: Option<serde_json::Value>,
) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .extension(actor);
    let body = match body {
        Some(value) => Body::from(serde_json::to_vec(&value).expect("encode body")),
        None => Body::empty(),
    };
    builder.body(body).expect("request builds")
}

#[tokio::test]
async fn schedule_route_answers_with_interview_payload() {
    let router = router(ApplicationStatus::InReview);

    let response = router
        .oneshot(request(
            "POST",
            "/api/interviews/schedule",
            Actor::recruiter(RECRUITER),
            Some(json!({
                "applicationId": 1,
                "scheduledDate": "2025-06-03T11:30:00+02:00",
                "duration": 30,
                "meetingLink": "https://meet.example.com/xyz"
            })),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::CREATED);
    let payload = read_json_body(response).await;
    let interview = &payload["data"]["interview"];
    assert_eq!(interview["status"], "SCHEDULED");
    assert_eq!(interview["scheduledDate"], "2025-06-03T09:30:00Z");
    assert_eq!(interview["duration"], 30);
    assert!(interview.get("location").is_none());
}

#[tokio::test]
async fn past_date_is_bad_request() {
    let router = router(ApplicationStatus::Applied);

    let response = router
        .oneshot(request(
            "POST",
            "/api/interviews/schedule",
            Actor::recruiter(RECRUITER),
            Some(json!({
                "applicationId": 1,
                "scheduledDate": "2025-06-01T09:00:00Z"
            })),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = read_json_body(response).await;
    assert_eq!(payload["message"], "Interview date must be in the future.");
}

#[tokio::test]
async fn lifecycle_over_http() {
    let fx = fixture(ApplicationStatus::InReview);
    let scheduled = fx
        .service
        .schedule(&Actor::recruiter(RECRUITER), schedule_request(60))
        .expect("schedule");
    let router = interview_router(Arc::new(fx.service));
    let uri = format!("/api/interviews/{}", scheduled.id);

    let response = router
        .clone()
        .oneshot(request(
            "PATCH",
            &uri,
            Actor::recruiter(RECRUITER),
            Some(json!({ "scheduledDate": "2025-06-05T15:00:00Z", "duration": 120 })),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["data"]["interview"]["status"], "RESCHEDULED");

    let response = router
        .clone()
        .oneshot(request("DELETE", &uri, Actor::recruiter(RECRUITER), None))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);

    let response = router
        .clone()
        .oneshot(request("DELETE", &uri, Actor::recruiter(RECRUITER), None))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let response = router
        .oneshot(request(
            "POST",
            &format!("{uri}/complete"),
            Actor::recruiter(RECRUITER),
            None,
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn application_lookup_is_not_found_without_interview() {
    let router = router(ApplicationStatus::Applied);

    let response = router
        .oneshot(request(
            "GET",
            "/api/interviews/application/1",
            Actor::developer(DEVELOPER),
            None,
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn duplicate_schedule_is_conflict() {
    let fx = fixture(ApplicationStatus::InReview);
    fx.service
        .schedule(&Actor::recruiter(RECRUITER), schedule_request(60))
        .expect("schedule");
    let router = interview_router(Arc::new(fx.service));

    let response = router
        .oneshot(request(
            "POST",
            "/api/interviews/schedule",
            Actor::recruiter(RECRUITER),
            Some(json!({ "applicationId": 1, "scheduledDate": "2025-06-04T10:00:00Z" })),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn developer_listing_supports_upcoming_filter() {
    let fx = fixture(ApplicationStatus::InReview);
    fx.service
        .schedule(&Actor::recruiter(RECRUITER), schedule_request(60))
        .expect("schedule");
    let router = interview_router(Arc::new(fx.service));

    let response = router
        .oneshot(request(
            "GET",
            "/api/interviews/developer/all?upcoming=true",
            Actor::developer(DEVELOPER),
            None,
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["data"].as_array().map(Vec::len), Some(1));
}
