use std::time::Duration;

use axum::{
    body::{to_bytes, Body},
    http::Request,
};
use sitekit_server::{api::app_router, build_state, config::Config};
use tempfile::tempdir;
use tower::ServiceExt;

fn test_config(db_path: &std::path::Path) -> Config {
    Config {
        listen_addr: "127.0.0.1:0".parse().unwrap(),
        database_url: db_path.to_string_lossy().to_string(),
        database_name: "site".to_string(),
        site_url: "http://localhost:8080".to_string(),
        auth: None,
        cors_allow: vec!["https://site.test".to_string()],
        request_timeout: Duration::from_secs(30),
        cookie_secure: true,
        static_dir: "build".to_string(),
    }
}

#[tokio::test]
async fn healthz_works() {
    let tmp = tempdir().unwrap();
    let config = test_config(&tmp.path().join("test.db"));
    let state = build_state(&config).await.unwrap();
    let app = app_router(state, &config);

    let response = app
        .oneshot(Request::builder().uri("/api/healthz").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    assert!(response.headers().contains_key("x-request-id"));
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(body, "ok".as_bytes());
}

#[tokio::test]
async fn openapi_lists_the_routes() {
    let tmp = tempdir().unwrap();
    let config = test_config(&tmp.path().join("test.db"));
    let state = build_state(&config).await.unwrap();
    let app = app_router(state, &config);

    let response = app
        .oneshot(Request::builder().uri("/openapi.json").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let doc: serde_json::Value = serde_json::from_slice(&body).unwrap();
    for path in ["/api/users", "/auth/magic-link", "/auth/confirm", "/private"] {
        assert!(doc["paths"].get(path).is_some(), "missing {path}");
    }
}

#[tokio::test]
async fn database_shutdown_is_idempotent() {
    let tmp = tempdir().unwrap();
    let config = test_config(&tmp.path().join("test.db"));
    let state = build_state(&config).await.unwrap();

    state.database.shutdown();
    state.database.shutdown();
    assert!(state.database.is_closed());
}

#[tokio::test]
async fn startup_fails_without_a_database() {
    let mut config = test_config(std::path::Path::new(""));
    config.database_url = String::new();
    assert!(build_state(&config).await.is_err());
}
