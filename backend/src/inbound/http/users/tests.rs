//! Tests for registration and login handlers.

use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use rstest::rstest;
use serde_json::{Value, json};

use crate::inbound::http::test_utils::{TestContext, test_app, test_context};

async fn post_json(context: &TestContext, uri: &str, body: Value) -> (StatusCode, Value) {
    let app = actix_test::init_service(test_app(context.state.clone())).await;
    let request = actix_test::TestRequest::post()
        .uri(uri)
        .set_json(body)
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    let status = response.status();
    let value: Value = actix_test::read_body_json(response).await;
    (status, value)
}

#[rstest]
#[actix_web::test]
async fn register_then_login_issues_token(test_context: TestContext) {
    let credentials = json!({"username": "alice", "password": "pw1"});

    let (status, body) = post_json(&test_context, "/auth/register", credentials.clone()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "User registered"}));

    let (status, body) = post_json(&test_context, "/auth/login", credentials).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "User logged in");
    let token = body["token"].as_str().expect("token string");
    assert!(!token.is_empty());
}

#[rstest]
#[actix_web::test]
async fn duplicate_registration_is_rejected(test_context: TestContext) {
    test_context.seed_user("alice", "pw1").await;

    let (status, body) = post_json(
        &test_context,
        "/auth/register",
        json!({"username": "alice", "password": "other"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "conflict");
}

#[rstest]
#[case(json!({"password": "pw1"}), "username", "missing_field")]
#[case(json!({"username": "alice"}), "password", "missing_field")]
#[case(json!({"username": "  ", "password": "pw1"}), "username", "empty_username")]
#[case(json!({"username": "alice", "password": "pw"}), "password", "password_too_short")]
#[actix_web::test]
async fn register_validates_fields(
    test_context: TestContext,
    #[case] body: Value,
    #[case] field: &str,
    #[case] code: &str,
) {
    let (status, body) = post_json(&test_context, "/auth/register", body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_request");
    assert_eq!(body["details"]["field"], field);
    assert_eq!(body["details"]["code"], code);
}

#[rstest]
#[case("bob", "pw1", "not_authenticated", "User not found")]
#[case("alice", "wrong", "invalid_credentials", "Incorrect password")]
#[actix_web::test]
async fn login_failures_are_bad_requests(
    test_context: TestContext,
    #[case] username: &str,
    #[case] password: &str,
    #[case] code: &str,
    #[case] message: &str,
) {
    test_context.seed_user("alice", "pw1").await;

    let (status, body) = post_json(
        &test_context,
        "/auth/login",
        json!({"username": username, "password": password}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], code);
    assert_eq!(body["error"], message);
}

#[rstest]
#[actix_web::test]
async fn malformed_json_is_an_invalid_request(test_context: TestContext) {
    let app = actix_test::init_service(test_app(test_context.state.clone())).await;
    let request = actix_test::TestRequest::post()
        .uri("/auth/login")
        .insert_header(("content-type", "application/json"))
        .set_payload("{not json")
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["details"]["code"], "invalid_json");
}
