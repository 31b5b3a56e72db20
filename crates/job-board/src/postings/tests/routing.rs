use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use super::common::*;
use crate::postings::router::{job_post_router, ACTOR_HEADER};

fn request(method: Method, uri: &str, actor: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(actor) = actor {
        builder = builder.header(ACTOR_HEADER, actor);
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&body).expect("serialize")))
            .expect("request builds"),
        None => builder.body(Body::empty()).expect("request builds"),
    }
}

fn register_payload() -> Value {
    json!({
        "title": "Warehouse picker",
        "location": "Busan",
        "deadline": "2026-03-15",
        "body": "Morning shifts, lifting required.",
        "min_age": 20,
        "gender": "undefined",
    })
}

#[tokio::test]
async fn create_route_requires_actor_header() {
    let harness = Harness::new();
    let router = job_post_router(harness.service.clone());

    let response = router
        .oneshot(request(
            Method::POST,
            "/api/v1/job-posts",
            None,
            Some(register_payload()),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn create_then_read_counts_a_view() {
    let harness = Harness::new();

    let response = job_post_router(harness.service.clone())
        .oneshot(request(
            Method::POST,
            "/api/v1/job-posts",
            Some(AUTHOR),
            Some(register_payload()),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::CREATED);
    let id = read_json_body(response).await["id"]
        .as_u64()
        .expect("numeric id");

    let response = job_post_router(harness.service.clone())
        .oneshot(request(
            Method::GET,
            &format!("/api/v1/job-posts/{id}"),
            None,
            None,
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["title"], "Warehouse picker");
    assert_eq!(payload["author"], AUTHOR);
    assert_eq!(payload["view_count"], 1);
    assert_eq!(payload["min_age"], 20);
    assert_eq!(payload["gender"], "undefined");
}

#[tokio::test]
async fn missing_post_maps_to_not_found() {
    let harness = Harness::new();
    let response = job_post_router(harness.service.clone())
        .oneshot(request(
            Method::GET,
            &format!("/api/v1/job-posts/{}", u64::MAX),
            None,
            None,
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn duplicate_interest_maps_to_forbidden() {
    let harness = Harness::new();
    let id = harness.write_post();
    let uri = format!("/api/v1/job-posts/{id}/interest");

    let first = job_post_router(harness.service.clone())
        .oneshot(request(Method::POST, &uri, Some(ALICE), None))
        .await
        .expect("route executes");
    assert_eq!(first.status(), StatusCode::NO_CONTENT);

    let second = job_post_router(harness.service.clone())
        .oneshot(request(Method::POST, &uri, Some(ALICE), None))
        .await
        .expect("route executes");
    assert_eq!(second.status(), StatusCode::FORBIDDEN);
    let payload = read_json_body(second).await;
    assert!(payload["error"]
        .as_str()
        .expect("error message")
        .contains("interest already expressed"));

    let interests = job_post_router(harness.service.clone())
        .oneshot(request(
            Method::GET,
            &format!("/api/v1/members/{}/interests", member_id(ALICE)),
            None,
            None,
        ))
        .await
        .expect("route executes");
    let payload = read_json_body(interests).await;
    assert_eq!(payload.as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn modify_by_stranger_is_forbidden_and_invalid_form_is_unprocessable() {
    let harness = Harness::new();
    let id = harness.write_post();
    let uri = format!("/api/v1/job-posts/{id}");
    let payload = json!({
        "title": "Changed",
        "deadline": "2026-03-30",
        "body": "Changed body",
        "min_age": 30,
    });

    let response = job_post_router(harness.service.clone())
        .oneshot(request(Method::PUT, &uri, Some(BOB), Some(payload)))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let blank = json!({
        "title": "",
        "deadline": "2026-03-30",
        "body": "Changed body",
    });
    let response = job_post_router(harness.service.clone())
        .oneshot(request(Method::PUT, &uri, Some(AUTHOR), Some(blank)))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(harness.aggregate(id).post.title, "Weekend cafe shift");
}

#[tokio::test]
async fn application_flow_over_http() {
    let harness = Harness::new();
    let id = harness.write_post();

    let response = job_post_router(harness.service.clone())
        .oneshot(request(
            Method::POST,
            &format!("/api/v1/job-posts/{id}/applications"),
            Some(ALICE),
            Some(json!({ "body": "Available every weekend." })),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::CREATED);
    let application_id = read_json_body(response).await["id"]
        .as_u64()
        .expect("numeric id");

    let response = job_post_router(harness.service.clone())
        .oneshot(request(
            Method::PUT,
            &format!("/api/v1/job-posts/{id}/applications/{application_id}"),
            Some(AUTHOR),
            Some(json!({ "approve": false })),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json_body(response).await["status"], "rejected");

    let response = job_post_router(harness.service.clone())
        .oneshot(request(
            Method::POST,
            &format!("/api/v1/job-posts/{id}/deadline"),
            Some(AUTHOR),
            None,
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json_body(response).await["removed"], 1);
    assert_eq!(harness.aggregate(id).post.application_count, 0);
}

#[tokio::test]
async fn admin_delete_route_removes_the_post() {
    let harness = Harness::new();
    let id = harness.write_post();

    let response = job_post_router(harness.service.clone())
        .oneshot(request(
            Method::DELETE,
            &format!("/api/v1/admin/job-posts/{id}"),
            Some(ADMIN),
            None,
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = job_post_router(harness.service.clone())
        .oneshot(request(
            Method::GET,
            &format!("/api/v1/members/{AUTHOR}/job-posts"),
            None,
            None,
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json_body(response).await, json!([]));
}
