//! Authentication short-circuit behavior: these paths must fail before any
//! storage round-trip, so they run against a pool that never connects.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::json;

#[tokio::test]
async fn list_users_without_header_is_unauthorized() {
    let router = common::lazy_router().await;
    let request = Request::builder()
        .method("GET")
        .uri("/api/v1/iam/users")
        .body(Body::empty())
        .unwrap();

    let response = common::send(&router, request).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = common::body_json(response).await;
    assert_eq!(body["message"], "invalid authentication token");
    assert_eq!(body["error"], true);
}

#[tokio::test]
async fn bearer_scheme_is_rejected() {
    let router = common::lazy_router().await;
    let request = Request::builder()
        .method("GET")
        .uri("/api/v1/iam/users")
        .header("Authorization", "Bearer sometoken")
        .body(Body::empty())
        .unwrap();

    let response = common::send(&router, request).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = common::body_json(response).await;
    assert_eq!(body["message"], "invalid authentication token");
}

#[tokio::test]
async fn empty_token_value_is_rejected() {
    let router = common::lazy_router().await;
    let request = Request::builder()
        .method("GET")
        .uri("/api/v1/iam/users")
        .header("Authorization", "Token ")
        .body(Body::empty())
        .unwrap();

    let response = common::send(&router, request).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn superuser_route_without_header_is_unauthorized() {
    let router = common::lazy_router().await;
    let request = Request::builder()
        .method("DELETE")
        .uri(format!("/api/v1/iam/users/{}", uuid::Uuid::new_v4()))
        .body(Body::empty())
        .unwrap();

    let response = common::send(&router, request).await;
    // Missing credentials are a 401; 403 is reserved for valid tokens
    // lacking the superuser flag.
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn external_authenticate_without_header_is_unauthorized() {
    let router = common::lazy_router().await;
    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/iam/authenticate")
        .body(Body::empty())
        .unwrap();

    let response = common::send(&router, request).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = common::body_json(response).await;
    assert_eq!(body["message"], "invalid authentication token");
    assert_eq!(body["error"], true);
}

#[tokio::test]
async fn signup_with_mismatched_confirmation_is_bad_request() {
    let router = common::lazy_router().await;
    let request = common::json_request(
        "POST",
        "/api/v1/iam/signup",
        json!({
            "email": "a@x.com",
            "password": "p1",
            "confirm_password": "p2",
            "first_name": "A",
            "last_name": "X"
        }),
    );

    let response = common::send(&router, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = common::body_json(response).await;
    assert_eq!(body["error"], true);
}

#[tokio::test]
async fn signup_with_invalid_email_is_bad_request() {
    let router = common::lazy_router().await;
    let request = common::json_request(
        "POST",
        "/api/v1/iam/signup",
        json!({
            "email": "not-an-email",
            "password": "p1",
            "confirm_password": "p1",
            "first_name": "A",
            "last_name": "X"
        }),
    );

    let response = common::send(&router, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn login_with_malformed_body_is_bad_request() {
    let router = common::lazy_router().await;
    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/iam/login")
        .header("Content-Type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let response = common::send(&router, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = common::body_json(response).await;
    assert_eq!(body["error"], true);
}
