use std::time::Duration;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use sitekit_server::{api::app_router, build_state, config::Config};
use tempfile::{tempdir, TempDir};
use tower::ServiceExt;

async fn build_test_router() -> (Router, TempDir) {
    let tmp = tempdir().unwrap();
    let config = Config {
        listen_addr: "127.0.0.1:0".parse().unwrap(),
        database_url: tmp.path().join("site.db").to_string_lossy().to_string(),
        database_name: "site".to_string(),
        site_url: "http://localhost:8080".to_string(),
        auth: None,
        cors_allow: vec!["*".to_string()],
        request_timeout: Duration::from_secs(30),
        cookie_secure: false,
        static_dir: "build".to_string(),
    };
    let state = build_state(&config).await.unwrap();
    (app_router(state, &config), tmp)
}

async fn post_user(app: &Router, body: Value) -> (StatusCode, Value) {
    post_raw(app, body.to_string()).await
}

async fn post_raw(app: &Router, body: String) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/api/users")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn registering_the_same_user_twice_conflicts() {
    let (app, _tmp) = build_test_router().await;
    let body = json!({"email": "a@b.com", "name": "Ada", "externalId": "ext-1"});

    let (status, created) = post_user(&app, body.clone()).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["email"], "a@b.com");
    assert_eq!(created["name"], "Ada");
    assert_eq!(created["externalId"], "ext-1");
    assert!(created["_id"].as_str().is_some_and(|id| !id.is_empty()));
    assert_eq!(created["createdAt"], created["updatedAt"]);

    let (status, error) = post_user(&app, body).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error["message"], "User already exists");
}

#[tokio::test]
async fn registering_a_taken_email_conflicts() {
    let (app, _tmp) = build_test_router().await;
    post_user(
        &app,
        json!({"email": "a@b.com", "name": "Ada", "externalId": "ext-1"}),
    )
    .await;

    let (status, error) = post_user(
        &app,
        json!({"email": "a@b.com", "name": "Other", "externalId": "ext-2"}),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error["message"], "User with this email already exists");
}

#[tokio::test]
async fn registration_requires_every_field() {
    let (app, _tmp) = build_test_router().await;

    let (status, error) = post_user(&app, json!({"email": "a@b.com", "externalId": "ext-1"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], 400);
    assert_eq!(error["message"], "Email, name, and externalId are required");

    let (_, listing) = get_json(&app, "/api/users").await;
    assert_eq!(listing["total"], 0);
}

#[tokio::test]
async fn malformed_registration_body_returns_json_error() {
    let (app, _tmp) = build_test_router().await;

    let (status, error) = post_raw(&app, "{not json".to_string()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], 400);
    assert!(error["message"].as_str().is_some_and(|m| !m.is_empty()));

    let (status, error) = post_raw(&app, "[1, 2]".to_string()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], 400);

    let (_, listing) = get_json(&app, "/api/users").await;
    assert_eq!(listing["total"], 0);
}

#[tokio::test]
async fn listing_paginates_and_falls_back_to_defaults() {
    let (app, _tmp) = build_test_router().await;
    for i in 0..3 {
        let (status, _) = post_user(
            &app,
            json!({"email": format!("user{i}@b.com"), "name": format!("User {i}"), "externalId": format!("ext-{i}")}),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, page) = get_json(&app, "/api/users?page=2&limit=2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["total"], 3);
    let users = page["users"].as_array().unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0]["email"], "user2@b.com");

    let (_, page) = get_json(&app, "/api/users?page=abc&limit=0").await;
    assert_eq!(page["total"], 3);
    assert_eq!(page["users"].as_array().unwrap().len(), 3);
}
