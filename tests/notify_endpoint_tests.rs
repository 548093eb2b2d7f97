// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Notification endpoint validation tests.
//!
//! These use a stub mailer, so a 200 means the request passed
//! validation and credential resolution. The missing-secrets case lives
//! in `notify_config_tests.rs` (separate binary, it mutates the same
//! environment variables these tests set).

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    response::Response,
};
use tower::ServiceExt;

mod common;

/// SMTP secrets shared by every test in this binary.
fn set_test_secrets() {
    std::env::set_var("SMTP_EMAIL", "alerts@example.com");
    std::env::set_var("SMTP_PASSWORD", "test-password");
}

async fn post_notify(body: &str) -> Response {
    set_test_secrets();
    let (app, _state) = common::create_test_app();

    app.oneshot(
        Request::builder()
            .method("POST")
            .uri("/notify")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

async fn body_text(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn test_missing_id_rejected() {
    let response = post_notify("{}").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_text(response).await, "Missing or invalid 'id'");
}

#[tokio::test]
async fn test_non_string_id_rejected() {
    let response = post_notify(r#"{"id": 123}"#).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_empty_id_rejected() {
    let response = post_notify(r#"{"id": ""}"#).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_malformed_body_rejected() {
    let response = post_notify("not json at all").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_wrong_method_rejected() {
    let (app, _state) = common::create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/notify")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_valid_id_accepted() {
    let response = post_notify(r#"{"id": "visitor-abc"}"#).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "Email sent successfully");
}

#[tokio::test]
async fn test_json_encoded_string_body_accepted() {
    // Some callers double-encode the payload: the body is a JSON string
    // containing the object.
    let double_encoded = serde_json::Value::String(r#"{"id": "visitor-abc"}"#.to_string());
    let response = post_notify(&double_encoded.to_string()).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_cross_origin_request_allowed() {
    set_test_secrets();
    let (app, _state) = common::create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/notify")
                .header(header::ORIGIN, "https://visitor.example.net")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"id": "visitor-abc"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .unwrap(),
        "*"
    );
}

#[tokio::test]
async fn test_health_check() {
    let (app, _state) = common::create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}
